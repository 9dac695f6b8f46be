// src/config.rs

//! Run configuration.
//!
//! There is no config file: everything comes from CLI arguments layered over
//! the built-in defaults below, then validated once before any job starts.

use std::path::PathBuf;

use crate::cli::CliArgs;
use crate::errors::{Result, ScriptvisorError};

/// Scripts run when none are given on the command line.
pub const DEFAULT_SCRIPTS: &[&str] = &["Gesture_Controller.py", "proton.py"];

/// Interpreter binary, resolved through `PATH`.
pub const DEFAULT_INTERPRETER: &str = "python";

/// Upper bound on bytes per relayed chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Settings shared by every supervised job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorConfig {
    /// Program each script is passed to.
    pub interpreter: String,

    /// Read buffer size for the stdout/stderr relays.
    pub chunk_size: usize,

    /// Directory script names are resolved against.
    ///
    /// `None` means the process working directory at the time a job starts.
    pub working_dir: Option<PathBuf>,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            interpreter: DEFAULT_INTERPRETER.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            working_dir: None,
        }
    }
}

/// Everything needed for one coordinator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub scripts: Vec<String>,
    pub supervisor: SupervisorConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            scripts: DEFAULT_SCRIPTS.iter().map(|s| s.to_string()).collect(),
            supervisor: SupervisorConfig::default(),
        }
    }
}

impl RunConfig {
    /// Build and validate a config from parsed CLI arguments.
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let defaults = Self::default();
        let cfg = Self {
            scripts: if args.scripts.is_empty() {
                defaults.scripts
            } else {
                args.scripts.clone()
            },
            supervisor: SupervisorConfig {
                interpreter: args.interpreter.clone(),
                chunk_size: args.chunk_size,
                working_dir: args.dir.clone(),
            },
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.supervisor.chunk_size == 0 {
            return Err(ScriptvisorError::ConfigError(
                "chunk size must be greater than zero".to_string(),
            ));
        }

        if self.supervisor.interpreter.trim().is_empty() {
            return Err(ScriptvisorError::ConfigError(
                "interpreter must not be empty".to_string(),
            ));
        }

        if let Some(dir) = &self.supervisor.working_dir {
            if !dir.is_dir() {
                return Err(ScriptvisorError::ConfigError(format!(
                    "working directory {:?} is not a directory",
                    dir
                )));
            }
        }

        if let Some(empty) = self.scripts.iter().position(|s| s.trim().is_empty()) {
            return Err(ScriptvisorError::ConfigError(format!(
                "script #{} has an empty name",
                empty + 1
            )));
        }

        Ok(())
    }
}
