// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Running with no arguments supervises the built-in script list with the
//! default interpreter. Every flag is optional.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{DEFAULT_CHUNK_SIZE, DEFAULT_INTERPRETER};

/// Command-line arguments for `scriptvisor`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "scriptvisor",
    version,
    about = "Run scripts concurrently and relay their output with per-script prefixes.",
    long_about = None
)]
pub struct CliArgs {
    /// Scripts to run, relative to the working directory.
    ///
    /// Default: the built-in list (`Gesture_Controller.py`, `proton.py`).
    #[arg(value_name = "SCRIPT")]
    pub scripts: Vec<String>,

    /// Interpreter each script is passed to.
    #[arg(long, value_name = "PROGRAM", default_value = DEFAULT_INTERPRETER)]
    pub interpreter: String,

    /// Maximum bytes read from a child stream before relaying.
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Resolve scripts against this directory instead of the current one.
    #[arg(long, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SCRIPTVISOR_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
