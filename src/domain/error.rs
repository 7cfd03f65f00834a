//! Domain error types.

/// Failure reported by a trade source.
///
/// `Unavailable` is the expected, recoverable provider condition (upstream
/// down, file not yet delivered). Everything else is `Unexpected`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TradeSourceError {
    #[error("trade source unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("trade source failed: {reason}")]
    Unexpected { reason: String },
}

impl TradeSourceError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, TradeSourceError::Unavailable { .. })
    }
}

/// Top-level error type for powerpos.
#[derive(Debug, thiserror::Error)]
pub enum PowerposError {
    #[error(transparent)]
    TradeSource(#[from] TradeSourceError),

    #[error("failed to write report {artifact}: {reason}")]
    ReportWrite { artifact: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("unknown time zone: {id}")]
    UnknownTimeZone { id: String },

    #[error("report worker failed: {reason}")]
    Worker { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&PowerposError> for std::process::ExitCode {
    fn from(err: &PowerposError) -> Self {
        let code: u8 = match err {
            PowerposError::Io(_) => 1,
            PowerposError::ConfigParse { .. }
            | PowerposError::ConfigInvalid { .. }
            | PowerposError::UnknownTimeZone { .. } => 2,
            PowerposError::TradeSource(_) => 3,
            PowerposError::ReportWrite { .. } | PowerposError::Worker { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
