//! Report persistence port.

use crate::domain::error::PowerposError;
use crate::domain::position::PositionSummary;
use std::path::PathBuf;

/// Port for persisting position reports.
pub trait ReportPort {
    /// Durably writes `summary` under `artifact_name`, returning where it landed.
    fn write(
        &self,
        artifact_name: &str,
        summary: &PositionSummary,
    ) -> Result<PathBuf, PowerposError>;
}
