//! Command-line interface for track-registry.
//!
//! This module provides CLI commands for registering tracks by ISRC,
//! showing stored records, exporting cover images and managing the config
//! file.

mod commands;

pub use commands::{Cli, Commands, run_command};
