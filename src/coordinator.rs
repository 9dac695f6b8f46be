// src/coordinator.rs

//! Fan-out/fan-in over the script list.
//!
//! Every job runs on its own Tokio task. The coordinator only waits on the
//! [`CompletionBarrier`]; it never looks at individual job results, so a run
//! always ends the same way no matter how many jobs failed.

use tracing::{debug, info, warn};

use crate::barrier::CompletionBarrier;
use crate::supervisor::Supervisor;

/// Printed once every job has signalled completion.
pub const FINISHED_MESSAGE: &str = "All scripts have finished executing";

pub struct Coordinator {
    scripts: Vec<String>,
    supervisor: Supervisor,
}

impl Coordinator {
    pub fn new(scripts: Vec<String>, supervisor: Supervisor) -> Self {
        Self {
            scripts,
            supervisor,
        }
    }

    /// Run every script concurrently and wait for all of them.
    pub async fn run(&self) {
        // Sized up front so an early finisher cannot open the barrier before
        // the remaining jobs are started.
        let barrier = CompletionBarrier::new(self.scripts.len());
        info!(jobs = self.scripts.len(), "starting jobs");

        for name in &self.scripts {
            let guard = barrier.guard();
            let supervisor = self.supervisor.clone();
            let name = name.clone();

            tokio::spawn(async move {
                let _guard = guard;
                let status = supervisor.run(&name).await;
                debug!(script = %name, success = status.is_success(), "job finished");
            });
        }

        barrier.wait().await;

        if let Err(err) = self.supervisor.sink().line(FINISHED_MESSAGE) {
            warn!(error = %err, "console write failed");
        }
        info!("all jobs finished");
    }
}
