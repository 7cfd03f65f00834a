//! CSV position report writer.

use crate::domain::error::PowerposError;
use crate::domain::position::PositionSummary;
use crate::domain::report::{report_rows, REPORT_HEADER};
use crate::ports::report_port::ReportPort;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub struct CsvReportAdapter {
    output_dir: PathBuf,
}

impl CsvReportAdapter {
    /// Creates the writer, making `output_dir` if it does not exist yet.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, PowerposError> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    fn write_csv(path: &Path, summary: &PositionSummary) -> Result<(), csv::Error> {
        let file = File::create(path)?;
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_writer(file);

        writer.write_record(REPORT_HEADER)?;
        for row in report_rows(summary) {
            writer.write_record(&row)?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        artifact_name: &str,
        summary: &PositionSummary,
    ) -> Result<PathBuf, PowerposError> {
        let path = self.output_dir.join(artifact_name);

        match Self::write_csv(&path, summary) {
            Ok(()) => {
                let full_path = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
                info!(path = %full_path.display(), "report saved");
                Ok(full_path)
            }
            Err(e) => {
                error!(artifact = artifact_name, error = %e, "position file could not be saved");
                Err(PowerposError::ReportWrite {
                    artifact: artifact_name.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }
}
