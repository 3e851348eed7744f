use std::env;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> cassette::Result<()> {
    init_tracing();
    let settings = cassette::runtime::load_settings();
    cassette::runtime::run(settings, env::args().nth(1).map(PathBuf::from))
}
