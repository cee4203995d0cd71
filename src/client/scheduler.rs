// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tokio-backed periodic work scheduler.
//!
//! Jobs are keyed by unique name. The first run happens one interval after
//! enqueueing, then every interval after that.

use super::platform::{
    EnqueueOutcome, ExistingPeriodicWorkPolicy, PeriodicWorkRequest, PlatformError, WorkResult,
    WorkScheduler, Worker,
};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

struct ScheduledWork {
    interval: Duration,
    handle: JoinHandle<()>,
}

/// In-process scheduler for unique periodic work.
#[derive(Default)]
pub struct TokioWorkScheduler {
    jobs: DashMap<String, ScheduledWork>,
}

impl TokioWorkScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of scheduled jobs still running.
    pub fn active_work_count(&self) -> usize {
        self.jobs
            .iter()
            .filter(|job| !job.handle.is_finished())
            .count()
    }

    /// Interval of an active job, if one exists under `name`.
    pub fn interval_of(&self, name: &str) -> Option<Duration> {
        self.jobs
            .get(name)
            .filter(|job| !job.handle.is_finished())
            .map(|job| job.interval)
    }

    /// Cancel a job. Returns whether one was scheduled.
    pub fn cancel_unique_work(&self, name: &str) -> bool {
        match self.jobs.remove(name) {
            Some((_, job)) => {
                job.handle.abort();
                tracing::info!(work = name, "Periodic work cancelled");
                true
            }
            None => false,
        }
    }

    fn spawn(request: &PeriodicWorkRequest) -> Result<ScheduledWork, PlatformError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| PlatformError::Unavailable(format!("no async runtime: {e}")))?;

        let name = request.unique_name.clone();
        let interval = request.interval;
        let worker = request.worker.clone();

        let handle = runtime.spawn(run_periodic(name, interval, worker));
        Ok(ScheduledWork { interval, handle })
    }
}

async fn run_periodic(name: String, period: Duration, worker: Arc<dyn Worker>) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match worker.do_work().await {
            WorkResult::Success => tracing::debug!(work = %name, "Periodic work succeeded"),
            // Periodic work runs again next interval either way.
            result => tracing::warn!(work = %name, result = ?result, "Periodic work did not succeed"),
        }
    }
}

impl WorkScheduler for TokioWorkScheduler {
    fn enqueue_unique_periodic_work(
        &self,
        request: PeriodicWorkRequest,
        policy: ExistingPeriodicWorkPolicy,
    ) -> Result<EnqueueOutcome, PlatformError> {
        match self.jobs.entry(request.unique_name.clone()) {
            Entry::Occupied(mut existing) => {
                let running = !existing.get().handle.is_finished();
                if running && policy == ExistingPeriodicWorkPolicy::Keep {
                    return Ok(EnqueueOutcome::KeptExisting);
                }

                let job = Self::spawn(&request)?;
                existing.get().handle.abort();
                existing.insert(job);

                tracing::info!(work = %request.unique_name, "Periodic work rescheduled");
                Ok(if running {
                    EnqueueOutcome::Replaced
                } else {
                    EnqueueOutcome::Enqueued
                })
            }
            Entry::Vacant(slot) => {
                slot.insert(Self::spawn(&request)?);
                tracing::info!(
                    work = %request.unique_name,
                    interval_secs = request.interval.as_secs(),
                    "Periodic work enqueued"
                );
                Ok(EnqueueOutcome::Enqueued)
            }
        }
    }
}

impl Drop for TokioWorkScheduler {
    fn drop(&mut self) {
        for job in self.jobs.iter() {
            job.handle.abort();
        }
    }
}
