//! Playlist module: the navigable list shown to the user and the cursor that
//! walks it for auto-advance and shuffle.

mod cursor;
mod display;

pub use cursor::{PlaylistCursor, RandomPick, position_of};
pub use display::*;
