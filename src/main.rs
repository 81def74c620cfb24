//! Track Registry - register music tracks by ISRC.
//!
//! Given a recording code, the registry fetches the track's metadata and
//! album cover from a catalog provider exactly once, stores both locally and
//! serves them from local storage afterwards. Everything is driven from CLI
//! commands.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod registry;
pub mod storage;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("track_registry=info".parse()?))
        .init();

    cli::run_command(&args)
}
