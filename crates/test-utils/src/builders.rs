#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use scriptvisor::config::SupervisorConfig;
use scriptvisor::console::MemorySink;
use scriptvisor::coordinator::Coordinator;
use scriptvisor::supervisor::Supervisor;
use tempfile::TempDir;

/// Interpreter used by the tests; scripts are plain POSIX shell.
pub const TEST_INTERPRETER: &str = "sh";

/// Temporary working directory populated with scripts.
pub struct ScriptDir {
    dir: TempDir,
    interpreter: String,
    chunk_size: Option<usize>,
}

impl ScriptDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
            interpreter: TEST_INTERPRETER.to_string(),
            chunk_size: None,
        }
    }

    pub fn with_script(self, name: &str, body: &str) -> Self {
        fs::write(self.dir.path().join(name), body).expect("Failed to write script");
        self
    }

    pub fn with_interpreter(mut self, interpreter: &str) -> Self {
        self.interpreter = interpreter.to_string();
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> SupervisorConfig {
        let defaults = SupervisorConfig::default();
        SupervisorConfig {
            interpreter: self.interpreter.clone(),
            chunk_size: self.chunk_size.unwrap_or(defaults.chunk_size),
            working_dir: Some(self.dir.path().to_path_buf()),
        }
    }

    /// Supervisor rooted in this directory, writing to a fresh `MemorySink`.
    pub fn supervisor(&self) -> (Supervisor, MemorySink) {
        let sink = MemorySink::new();
        (Supervisor::new(self.config(), Arc::new(sink.clone())), sink)
    }

    pub fn coordinator(&self, scripts: &[&str]) -> (Coordinator, MemorySink) {
        let (supervisor, sink) = self.supervisor();
        let scripts = scripts.iter().map(|s| s.to_string()).collect();
        (Coordinator::new(scripts, supervisor), sink)
    }
}

impl Default for ScriptDir {
    fn default() -> Self {
        Self::new()
    }
}
