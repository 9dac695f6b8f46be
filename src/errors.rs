// src/errors.rs

//! Crate-wide error types.
//!
//! [`JobError`] covers everything that can end a single supervised job early.
//! Its `Display` output is exactly the status line written to the console, so
//! the supervisor never formats error lines by hand.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::console::StreamKind;

/// Why a job did not complete successfully.
#[derive(Error, Debug)]
pub enum JobError {
    #[error("Error getting current directory for {name}: {source}")]
    WorkingDir {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("Error: File not found: {}", path.display())]
    NotFound { name: String, path: PathBuf },

    #[error("Error creating {stream} pipe for {name}")]
    StreamSetup { name: String, stream: StreamKind },

    #[error("Error starting {name} with '{interpreter}': {source}")]
    Launch {
        name: String,
        interpreter: String,
        #[source]
        source: io::Error,
    },

    #[error("{name} completed with error: {source}")]
    Wait {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("{name} completed with error: {status}")]
    Execution { name: String, status: ExitStatus },
}

/// Failures outside any single job: bad configuration or logger setup.
#[derive(Error, Debug)]
pub enum ScriptvisorError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Logging setup error: {0}")]
    LoggingError(String),
}

pub type Result<T> = std::result::Result<T, ScriptvisorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_line_names_the_resolved_path() {
        let err = JobError::NotFound {
            name: "b.py".into(),
            path: PathBuf::from("/work/b.py"),
        };
        assert_eq!(err.to_string(), "Error: File not found: /work/b.py");
    }

    #[test]
    fn stream_setup_line_names_the_stream() {
        let err = JobError::StreamSetup {
            name: "a.py".into(),
            stream: StreamKind::Stderr,
        };
        assert_eq!(err.to_string(), "Error creating stderr pipe for a.py");
    }
}
