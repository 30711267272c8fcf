//! # Timeline CLI

use clap::Parser;
use log::LevelFilter;
use std::io;
use timeline_cli::{run, Args};
use timeline_index::logging;

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = run(&args, &mut out) {
        log::debug!("{:?}", e);
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }
}

/// `-v` enables info, `-vv` debug; `RUST_LOG` still overrides per target
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = logging::init_global_logging() {
        log::warn!("Index logging not initialized: {}", e);
    }
}
