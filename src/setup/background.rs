// ABOUTME: Supervised handle for the wizard's fire-and-forget work
// ABOUTME: Named tasks tracked in a JoinSet with failures reported on an error channel
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

use std::future::Future;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::error;

use crate::errors::AppError;

/// Tracks the background work a setup flow spawns (reap passes, mirror
/// passes) so nothing is fire-and-forget in the untraceable sense.
///
/// Every task reports its failure on an internal channel instead of
/// vanishing; [`drain_errors`](Self::drain_errors) logs and counts what
/// arrived, and [`wait_idle`](Self::wait_idle) lets tests and shutdown
/// paths wait for all spawned work deterministically.
///
/// Dropping the handle aborts tasks that are still running.
pub struct BackgroundTasks {
    tasks: JoinSet<()>,
    error_tx: mpsc::UnboundedSender<(&'static str, AppError)>,
    error_rx: mpsc::UnboundedReceiver<(&'static str, AppError)>,
}

impl BackgroundTasks {
    /// Create an empty task set.
    #[must_use]
    pub fn new() -> Self {
        let (error_tx, error_rx) = mpsc::unbounded_channel();
        Self {
            tasks: JoinSet::new(),
            error_tx,
            error_rx,
        }
    }

    /// Spawn a named task. Its error, if any, lands on the error channel
    /// rather than being dropped with the join handle.
    pub fn spawn<F>(&mut self, name: &'static str, future: F)
    where
        F: Future<Output = crate::errors::AppResult<()>> + Send + 'static,
    {
        let error_tx = self.error_tx.clone();
        self.tasks.spawn(async move {
            if let Err(err) = future.await {
                // The receiver lives as long as self; a send failure only
                // happens during teardown and is safe to ignore.
                let _ = error_tx.send((name, err));
            }
        });
    }

    /// Number of tasks still running or not yet joined.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// True when no spawned task is outstanding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for every spawned task to finish, then drain their errors to
    /// the log. Returns the number of task failures observed.
    pub async fn wait_idle(&mut self) -> usize {
        while let Some(joined) = self.tasks.join_next().await {
            if let Err(join_err) = joined {
                error!(error = %join_err, "Background task panicked or was aborted");
            }
        }
        self.drain_errors()
    }

    /// Log every task failure reported since the last drain and return how
    /// many there were. Called opportunistically by the flow controller;
    /// tests use it to assert clean runs.
    pub fn drain_errors(&mut self) -> usize {
        let mut drained = 0;
        while let Ok((name, err)) = self.error_rx.try_recv() {
            error!(task = name, error = %err, "Background task failed");
            drained += 1;
        }
        drained
    }
}

impl Default for BackgroundTasks {
    fn default() -> Self {
        Self::new()
    }
}
