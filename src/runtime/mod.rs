//! Control loop standing in for a UI: stdin commands in, engine calls out,
//! with a poll timer for progress and auto-advance.

use std::path::PathBuf;
use std::sync::mpsc;

use crate::config;
use crate::error::Result;
use crate::library::LibraryIndex;

mod commands;
mod event_loop;
mod progress;
mod settings;
mod startup;

pub use commands::{Command, parse};
pub use event_loop::{Flow, Runtime, render_bars};
pub use progress::{ProgressPoller, format_time};
pub use settings::load_settings;
pub use startup::resolve_root;

pub fn run(settings: config::Settings, root_arg: Option<PathBuf>) -> Result<()> {
    let library = LibraryIndex::new(startup::resolve_root(root_arg, &settings));
    let backend = startup::open_backend(&settings)?;
    let mut runtime = Runtime::new(settings, library, backend, std::io::stdout());

    let (tx, rx) = mpsc::channel::<Command>();
    let _reader = commands::spawn_stdin_reader(tx);

    event_loop::run(&mut runtime, &rx)
}

#[cfg(test)]
mod tests;
