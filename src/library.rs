//! Library module: hierarchy queries over a `collection/year/[show/]track`
//! folder tree.
//!
//! A year folder is either flat (it holds the tracks directly) or grouped
//! (it holds show folders that hold the tracks). Direct files win when both
//! exist.

mod index;
mod model;
mod probe;
mod scan;

pub use index::LibraryIndex;
pub use model::*;
pub use probe::probe_duration;
