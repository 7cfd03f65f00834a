//! Fixed-interval schedule bookkeeping.
//!
//! Pure state only; the async loop that drives it lives in
//! [`crate::service::scheduler`].

use chrono::{DateTime, Duration};
use chrono_tz::Tz;

pub const DEFAULT_INTERVAL_MINUTES: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleState {
    next_run: Option<DateTime<Tz>>,
    is_running: bool,
}

impl ScheduleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_run(&self) -> Option<DateTime<Tz>> {
        self.next_run
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Takes the single-flight guard. Returns `false` if a run already holds it.
    pub fn try_begin(&mut self) -> bool {
        if self.is_running {
            return false;
        }
        self.is_running = true;
        true
    }

    pub fn finish(&mut self) {
        self.is_running = false;
    }

    /// Sets the first scheduled tick.
    pub fn start_at(&mut self, first_run: DateTime<Tz>) {
        self.next_run = Some(first_run);
    }

    /// Moves the next tick forward by exactly one interval.
    pub fn advance(&mut self, interval: Duration) -> Option<DateTime<Tz>> {
        self.next_run = self.next_run.map(|next| next + interval);
        self.next_run
    }

    /// Time left until the next tick, `None` once it is due or unset.
    pub fn remaining(&self, now: DateTime<Tz>) -> Option<std::time::Duration> {
        let next = self.next_run?;
        if now >= next {
            return None;
        }
        (next - now).to_std().ok()
    }
}

/// Converts a configured minute count into the schedule interval.
pub fn interval_from_minutes(minutes: u32) -> Duration {
    Duration::minutes(i64::from(minutes.max(1)))
}

/// Parses the configured interval. Anything that is not a positive integer
/// falls back to [`DEFAULT_INTERVAL_MINUTES`].
pub fn parse_interval_minutes(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|&m| m > 0)
        .and_then(|m| u32::try_from(m).ok())
        .unwrap_or(DEFAULT_INTERVAL_MINUTES)
}

/// Runs owed at `now` for a tick scheduled at `next_run`:
/// `floor((now - next_run) / interval) + 1` once due, zero before that.
pub fn pending_runs(next_run: DateTime<Tz>, now: DateTime<Tz>, interval: Duration) -> u64 {
    if now < next_run {
        return 0;
    }
    let step = interval.num_milliseconds().max(1);
    let behind = (now - next_run).num_milliseconds();
    u64::try_from(behind / step).unwrap_or(0) + 1
}
