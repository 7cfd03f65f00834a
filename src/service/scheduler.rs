//! Self-correcting fixed-interval scheduler.
//!
//! One run fires at startup, then every `interval` after that. If a run
//! overruns, the missed ticks are executed back to back (never in parallel)
//! until the schedule is back in the future. The single-flight guard and the
//! next-run timestamp are private to the scheduler and share one mutex.

use crate::domain::schedule::{pending_runs, ScheduleState};
use crate::ports::clock_port::ClockPort;
use async_trait::async_trait;
use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Work executed on every tick. Implementations contain their own failures.
#[async_trait]
pub trait ScheduledJob: Send + Sync {
    async fn run(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    Completed,
    /// Another run held the guard, nothing was executed.
    Skipped,
}

pub struct Scheduler {
    job: Arc<dyn ScheduledJob>,
    clock: Arc<dyn ClockPort + Send + Sync>,
    interval: Duration,
    state: Mutex<ScheduleState>,
}

/// Releases the single-flight guard on drop, including when the run panics.
struct RunGuard<'a> {
    state: &'a Mutex<ScheduleState>,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.state.lock().finish();
    }
}

impl Scheduler {
    pub fn new(
        job: Arc<dyn ScheduledJob>,
        clock: Arc<dyn ClockPort + Send + Sync>,
        interval: Duration,
    ) -> Self {
        Self {
            job,
            clock,
            interval: interval.max(Duration::milliseconds(1)),
            state: Mutex::new(ScheduleState::new()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_run(&self) -> Option<DateTime<Tz>> {
        self.state.lock().next_run()
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().is_running()
    }

    fn try_acquire(&self) -> Option<RunGuard<'_>> {
        let acquired = self.state.lock().try_begin();
        // Lazy: a guard that was never acquired must not release on drop.
        acquired.then(|| RunGuard { state: &self.state })
    }

    /// Executes the job now unless a run is already in flight. Does not
    /// touch the schedule.
    pub async fn trigger(&self) -> TriggerOutcome {
        let Some(_guard) = self.try_acquire() else {
            debug!("report run already in flight, skipping trigger");
            return TriggerOutcome::Skipped;
        };
        self.job.run().await;
        TriggerOutcome::Completed
    }

    /// Drives the schedule until `cancel` fires. An in-flight run is always
    /// allowed to finish.
    pub async fn run(&self, cancel: CancellationToken) {
        info!(
            interval_minutes = self.interval.num_minutes(),
            "power position scheduler started"
        );

        self.trigger().await;
        let first_run = self.clock.now() + self.interval;
        self.state.lock().start_at(first_run);
        debug!(next_run = %first_run, "first scheduled run");

        while !cancel.is_cancelled() {
            let now = self.clock.now();
            let remaining = self.state.lock().remaining(now);

            if let Some(wait) = remaining {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(wait) => {}
                }
                continue;
            }

            self.catch_up(&cancel).await;
        }

        info!("power position scheduler stopped");
    }

    /// Executes due ticks one after another until the next one lies in the
    /// future. Each tick moves `next_run` by exactly one interval, whatever
    /// the run's duration or outcome.
    async fn catch_up(&self, cancel: &CancellationToken) {
        loop {
            if self.trigger().await == TriggerOutcome::Skipped {
                debug!("scheduled tick skipped, run already in flight");
            }

            let next_run = {
                let mut state = self.state.lock();
                state.advance(self.interval);
                state.next_run()
            };
            let Some(next_run) = next_run else { return };

            let now = self.clock.now();
            if now < next_run || cancel.is_cancelled() {
                debug!(%next_run, "next scheduled run");
                return;
            }

            warn!(
                %next_run,
                owed = pending_runs(next_run, now, self.interval),
                "behind schedule, catching up"
            );
        }
    }
}
