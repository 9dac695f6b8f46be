// src/supervisor.rs

//! Process supervisor: run one script to completion while relaying its output.
//!
//! A job goes through resolve → spawn → relay both streams → wait for exit →
//! drain relays → report. Any failure writes its status line and ends the job
//! at that step. Nothing is propagated to the caller beyond the returned
//! [`JobStatus`].

use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;

use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tracing::{debug, info, warn};

use crate::config::SupervisorConfig;
use crate::console::{OutputSink, StreamKind};
use crate::errors::JobError;
use crate::relay::spawn_relay;

/// A script whose path has been resolved and checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptJob {
    /// Identifier as given, used for prefixes and status lines.
    pub name: String,
    /// Absolute path handed to the interpreter.
    pub path: PathBuf,
}

impl ScriptJob {
    /// Resolve `name` against `working_dir` (or the process cwd).
    ///
    /// Only a missing file counts as not found; other metadata errors are left
    /// for the interpreter to report.
    pub async fn resolve(name: &str, working_dir: Option<&Path>) -> Result<Self, JobError> {
        let working_dir_err = |source: io::Error| JobError::WorkingDir {
            name: name.to_string(),
            source,
        };

        let base = match working_dir {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir().map_err(working_dir_err)?,
        };
        let path = std::path::absolute(base.join(name)).map_err(working_dir_err)?;

        match tokio::fs::metadata(&path).await {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(JobError::NotFound {
                name: name.to_string(),
                path,
            }),
            _ => Ok(Self {
                name: name.to_string(),
                path,
            }),
        }
    }
}

/// How a job ended.
#[derive(Debug)]
pub enum JobStatus {
    Succeeded,
    Failed(JobError),
}

impl JobStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, JobStatus::Succeeded)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, JobStatus::Failed(JobError::NotFound { .. }))
    }

    pub fn error(&self) -> Option<&JobError> {
        match self {
            JobStatus::Succeeded => None,
            JobStatus::Failed(err) => Some(err),
        }
    }
}

/// Runs scripts with a shared configuration and console.
#[derive(Clone)]
pub struct Supervisor {
    config: Arc<SupervisorConfig>,
    sink: Arc<dyn OutputSink>,
}

impl Supervisor {
    pub fn new(config: SupervisorConfig, sink: Arc<dyn OutputSink>) -> Self {
        Self {
            config: Arc::new(config),
            sink,
        }
    }

    pub fn sink(&self) -> &Arc<dyn OutputSink> {
        &self.sink
    }

    /// Run `name` to completion and write its status line.
    pub async fn run(&self, name: &str) -> JobStatus {
        match self.execute(name).await {
            Ok(()) => {
                info!(script = name, "job succeeded");
                self.status_line(&format!("{name} completed successfully"));
                JobStatus::Succeeded
            }
            Err(err) => {
                info!(script = name, error = %err, "job failed");
                self.status_line(&err.to_string());
                JobStatus::Failed(err)
            }
        }
    }

    async fn execute(&self, name: &str) -> Result<(), JobError> {
        let job = ScriptJob::resolve(name, self.config.working_dir.as_deref()).await?;
        debug!(script = name, path = %job.path.display(), "resolved script");

        let mut cmd = Command::new(&self.config.interpreter);
        cmd.arg(&job.path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|source| JobError::Launch {
            name: job.name.clone(),
            interpreter: self.config.interpreter.clone(),
            source,
        })?;
        debug!(script = name, pid = ?child.id(), interpreter = %self.config.interpreter, "spawned");

        let (stdout, stderr) = take_pipes(&mut child, &job.name).await?;

        let chunk_size = self.config.chunk_size;
        let relays = [
            (
                StreamKind::Stdout,
                spawn_relay(job.name.clone(), StreamKind::Stdout, stdout, chunk_size, self.sink.clone()),
            ),
            (
                StreamKind::Stderr,
                spawn_relay(job.name.clone(), StreamKind::Stderr, stderr, chunk_size, self.sink.clone()),
            ),
        ];

        let waited = child.wait().await;

        // Pipes may still hold data after exit; drain them before reporting.
        for (stream, relay) in relays {
            if let Err(err) = relay.await {
                warn!(script = name, %stream, error = %err, "relay task did not finish cleanly");
            }
        }

        exit_result(&job.name, waited)
    }

    fn status_line(&self, line: &str) {
        if let Err(err) = self.sink.line(line) {
            warn!(error = %err, line, "console write failed");
        }
    }
}

/// Take both output pipes from a freshly spawned child.
///
/// If either is missing the child is killed and reaped before returning.
async fn take_pipes(
    child: &mut Child,
    name: &str,
) -> Result<(ChildStdout, ChildStderr), JobError> {
    match (child.stdout.take(), child.stderr.take()) {
        (Some(stdout), Some(stderr)) => Ok((stdout, stderr)),
        (stdout, _) => {
            let stream = if stdout.is_none() {
                StreamKind::Stdout
            } else {
                StreamKind::Stderr
            };
            if let Err(err) = child.kill().await {
                warn!(script = name, error = %err, "failed to kill child after pipe setup error");
            }
            Err(JobError::StreamSetup {
                name: name.to_string(),
                stream,
            })
        }
    }
}

/// Map the outcome of waiting on a child to the job result.
fn exit_result(name: &str, waited: io::Result<ExitStatus>) -> Result<(), JobError> {
    let status = waited.map_err(|source| JobError::Wait {
        name: name.to_string(),
        source,
    })?;
    debug!(script = name, %status, "child exited");

    if status.success() {
        Ok(())
    } else {
        Err(JobError::Execution {
            name: name.to_string(),
            status,
        })
    }
}
