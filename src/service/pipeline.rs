//! Fetch → aggregate → persist for one reference date.
//!
//! Every failure stops at this boundary: a provider outage is logged as a
//! warning, anything else as an error, and the caller only sees a
//! [`RunOutcome`].

use crate::domain::error::PowerposError;
use crate::domain::position::compute_position;
use crate::domain::report::artifact_name;
use crate::ports::clock_port::ClockPort;
use crate::ports::report_port::ReportPort;
use crate::ports::trade_port::TradePort;
use crate::service::scheduler::ScheduledJob;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Written { artifact: PathBuf },
    /// Trade source reported an outage; no report was written.
    ProviderUnavailable,
    Failed,
}

impl RunOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, RunOutcome::Written { .. })
    }
}

#[derive(Clone)]
pub struct PositionPipeline {
    trades: Arc<dyn TradePort + Send + Sync>,
    reports: Arc<dyn ReportPort + Send + Sync>,
    clock: Arc<dyn ClockPort + Send + Sync>,
}

impl PositionPipeline {
    pub fn new(
        trades: Arc<dyn TradePort + Send + Sync>,
        reports: Arc<dyn ReportPort + Send + Sync>,
        clock: Arc<dyn ClockPort + Send + Sync>,
    ) -> Self {
        Self {
            trades,
            reports,
            clock,
        }
    }

    /// Produces one report for `reference_date`. Never fails outward.
    pub fn run_once(&self, reference_date: NaiveDate) -> RunOutcome {
        match self.try_run(reference_date) {
            Ok(artifact) => RunOutcome::Written { artifact },
            Err(PowerposError::TradeSource(e)) if e.is_unavailable() => {
                warn!(%reference_date, error = %e, "not able to get trades from trade source");
                RunOutcome::ProviderUnavailable
            }
            Err(e) => {
                error!(%reference_date, error = %e, "unexpected error while processing positions");
                RunOutcome::Failed
            }
        }
    }

    fn try_run(&self, reference_date: NaiveDate) -> Result<PathBuf, PowerposError> {
        let trades = self.trades.get_trades(reference_date)?;
        debug!(%reference_date, trades = trades.len(), "trades fetched");

        let summary = compute_position(reference_date, &trades);
        info!(%reference_date, total_volume = summary.total_volume(), "positions processed");

        let name = artifact_name(&self.clock.now());
        self.reports.write(&name, &summary)
    }

    /// Runs the pipeline for tomorrow's delivery day on a blocking worker.
    pub async fn run_day_ahead(&self) -> RunOutcome {
        let reference_date = self.clock.day_ahead();
        let pipeline = self.clone();

        match tokio::task::spawn_blocking(move || pipeline.run_once(reference_date)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let err = PowerposError::Worker {
                    reason: e.to_string(),
                };
                error!(
                    %reference_date,
                    error = %err,
                    "unexpected error while processing positions"
                );
                RunOutcome::Failed
            }
        }
    }
}

#[async_trait]
impl ScheduledJob for PositionPipeline {
    async fn run(&self) {
        self.run_day_ahead().await;
    }
}
