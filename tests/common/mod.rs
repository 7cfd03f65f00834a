#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone};
use chrono_tz::{Europe::London, Tz};
use parking_lot::Mutex;
use powerpos::domain::error::{PowerposError, TradeSourceError};
use powerpos::domain::position::PositionSummary;
use powerpos::domain::trade::{Trade, TradePeriod};
use powerpos::ports::clock_port::ClockPort;
use powerpos::ports::report_port::ReportPort;
use powerpos::ports::trade_port::TradePort;
use powerpos::service::scheduler::ScheduledJob;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn london(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
    London.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn make_trade(id: &str, periods: &[(i32, f64)]) -> Trade {
    Trade::new(
        id,
        periods
            .iter()
            .map(|&(period, volume)| TradePeriod::new(period, volume))
            .collect(),
    )
}

/// Clock pinned to one instant.
pub struct FixedClock(pub DateTime<Tz>);

impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Tz> {
        self.0
    }
}

/// Wall clock that follows tokio's (pausable) clock from a fixed start.
pub struct TokioClock {
    base: DateTime<Tz>,
    start: tokio::time::Instant,
}

impl TokioClock {
    pub fn new(base: DateTime<Tz>) -> Self {
        Self {
            base,
            start: tokio::time::Instant::now(),
        }
    }

    pub fn base(&self) -> DateTime<Tz> {
        self.base
    }

    /// Whole minutes elapsed since `base` at `at`.
    pub fn minutes_at(&self, at: DateTime<Tz>) -> i64 {
        (at - self.base).num_minutes()
    }
}

impl ClockPort for TokioClock {
    fn now(&self) -> DateTime<Tz> {
        self.base + chrono::Duration::from_std(self.start.elapsed()).unwrap()
    }
}

/// Job that records when it ran and sleeps for a scripted duration.
pub struct RecordingJob {
    clock: Arc<TokioClock>,
    durations: Mutex<VecDeque<Duration>>,
    starts: Mutex<Vec<DateTime<Tz>>>,
    active: AtomicUsize,
    max_active: AtomicUsize,
    completed: AtomicUsize,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl RecordingJob {
    pub fn new(clock: Arc<TokioClock>) -> Self {
        Self {
            clock,
            durations: Mutex::new(VecDeque::new()),
            starts: Mutex::new(Vec::new()),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            cancel_after: None,
        }
    }

    /// Run `n` (0-based) takes `durations[n]`; later runs are instant.
    pub fn with_durations(self, durations: Vec<Duration>) -> Self {
        *self.durations.lock() = durations.into();
        self
    }

    pub fn cancel_after(mut self, runs: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((runs, token));
        self
    }

    pub fn start_minutes(&self) -> Vec<i64> {
        self.starts
            .lock()
            .iter()
            .map(|&t| self.clock.minutes_at(t))
            .collect()
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScheduledJob for RecordingJob {
    async fn run(&self) {
        self.starts.lock().push(self.clock.now());
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);

        let duration = self.durations.lock().pop_front().unwrap_or(Duration::ZERO);
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }

        self.active.fetch_sub(1, Ordering::SeqCst);
        let done = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((runs, token)) = &self.cancel_after {
            if done >= *runs {
                token.cancel();
            }
        }
    }
}

/// Trade source answering from a script, one entry per call. Once the script
/// is exhausted it keeps returning `fallback`.
pub struct MockTradePort {
    script: Mutex<VecDeque<Result<Vec<Trade>, TradeSourceError>>>,
    fallback: Vec<Trade>,
    pub calls: Mutex<Vec<NaiveDate>>,
}

impl MockTradePort {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_trades(self, trades: Vec<Trade>) -> Self {
        self.script.lock().push_back(Ok(trades));
        self
    }

    pub fn with_outage(self, reason: &str) -> Self {
        self.script
            .lock()
            .push_back(Err(TradeSourceError::Unavailable {
                reason: reason.to_string(),
            }));
        self
    }

    pub fn with_fallback(mut self, trades: Vec<Trade>) -> Self {
        self.fallback = trades;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl TradePort for MockTradePort {
    fn get_trades(&self, date: NaiveDate) -> Result<Vec<Trade>, TradeSourceError> {
        self.calls.lock().push(date);
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}

#[derive(Default)]
pub struct MemoryReportPort {
    pub written: Mutex<Vec<(String, PositionSummary)>>,
}

impl MemoryReportPort {
    pub fn artifact_names(&self) -> Vec<String> {
        self.written.lock().iter().map(|(n, _)| n.clone()).collect()
    }
}

impl ReportPort for MemoryReportPort {
    fn write(
        &self,
        artifact_name: &str,
        summary: &PositionSummary,
    ) -> Result<PathBuf, PowerposError> {
        self.written
            .lock()
            .push((artifact_name.to_string(), summary.clone()));
        Ok(PathBuf::from(artifact_name))
    }
}

/// Wraps another job and cancels `token` once it has run `runs` times.
pub struct CancelAfter<J> {
    pub inner: J,
    runs: usize,
    seen: AtomicUsize,
    token: CancellationToken,
}

impl<J> CancelAfter<J> {
    pub fn new(inner: J, runs: usize, token: CancellationToken) -> Self {
        Self {
            inner,
            runs,
            seen: AtomicUsize::new(0),
            token,
        }
    }
}

#[async_trait]
impl<J: ScheduledJob> ScheduledJob for CancelAfter<J> {
    async fn run(&self) {
        self.inner.run().await;
        if self.seen.fetch_add(1, Ordering::SeqCst) + 1 >= self.runs {
            self.token.cancel();
        }
    }
}
