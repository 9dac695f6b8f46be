// src/barrier.rs

//! Completion barrier shared by the coordinator and its jobs.
//!
//! The barrier starts at the number of jobs and each job hands back one
//! [`CompletionGuard`]. Dropping the guard counts the job as finished, so a
//! job signals exactly once whether it returns normally, bails out early or
//! panics.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Notify;
use tracing::{trace, warn};

#[derive(Debug)]
pub struct CompletionBarrier {
    outstanding: AtomicUsize,
    notify: Notify,
}

impl CompletionBarrier {
    /// Create a barrier expecting `count` completions.
    pub fn new(count: usize) -> Arc<Self> {
        Arc::new(Self {
            outstanding: AtomicUsize::new(count),
            notify: Notify::new(),
        })
    }

    /// Number of jobs that have not signalled yet.
    pub fn remaining(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    /// Hand out a guard that signals this barrier when dropped.
    pub fn guard(self: &Arc<Self>) -> CompletionGuard {
        CompletionGuard {
            barrier: Arc::clone(self),
        }
    }

    fn signal(&self) {
        match self
            .outstanding
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
        {
            Ok(1) => {
                trace!("last job signalled; waking coordinator");
                self.notify.notify_waiters();
            }
            Ok(prev) => trace!(remaining = prev - 1, "job signalled"),
            Err(_) => warn!("completion signalled on a drained barrier; ignoring"),
        }
    }

    /// Wait until every expected job has signalled.
    pub async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register before checking so a signal between the check and the
            // await is not lost.
            notified.as_mut().enable();

            if self.remaining() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Signals its barrier exactly once, on drop.
#[derive(Debug)]
pub struct CompletionGuard {
    barrier: Arc<CompletionBarrier>,
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        self.barrier.signal();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn empty_barrier_is_already_open() {
        let barrier = CompletionBarrier::new(0);
        timeout(Duration::from_secs(1), barrier.wait())
            .await
            .expect("wait on an empty barrier should return immediately");
    }

    #[tokio::test]
    async fn opens_after_every_guard_is_dropped() {
        let barrier = CompletionBarrier::new(8);

        for i in 0..8u64 {
            let guard = barrier.guard();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(5 * i)).await;
                drop(guard);
            });
        }

        timeout(Duration::from_secs(5), barrier.wait())
            .await
            .expect("barrier should open once all guards are gone");
        assert_eq!(barrier.remaining(), 0);
    }

    #[tokio::test]
    async fn stays_closed_while_a_guard_is_alive() {
        let barrier = CompletionBarrier::new(2);
        let first = barrier.guard();
        let second = barrier.guard();
        drop(first);

        assert_eq!(barrier.remaining(), 1);
        assert!(
            timeout(Duration::from_millis(50), barrier.wait())
                .await
                .is_err()
        );

        drop(second);
        timeout(Duration::from_secs(1), barrier.wait())
            .await
            .expect("barrier should open after the last guard");
    }

    #[tokio::test]
    async fn panicking_job_still_signals() {
        let barrier = CompletionBarrier::new(1);
        let guard = barrier.guard();

        let handle = tokio::spawn(async move {
            let _guard = guard;
            panic!("job blew up");
        });
        assert!(handle.await.is_err());

        timeout(Duration::from_secs(1), barrier.wait())
            .await
            .expect("guard should signal during unwinding");
    }

    #[test]
    fn extra_signals_do_not_underflow() {
        let barrier = CompletionBarrier::new(1);
        drop(barrier.guard());
        drop(barrier.guard());
        assert_eq!(barrier.remaining(), 0);
    }
}
