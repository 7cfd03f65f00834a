//! Service settings built from a [`ConfigPort`].

use crate::domain::error::PowerposError;
use crate::domain::schedule::{interval_from_minutes, parse_interval_minutes};
use crate::domain::time_zone::{resolve_time_zone, DEFAULT_TIME_ZONE};
use crate::ports::config_port::ConfigPort;
use chrono::Duration;
use chrono_tz::Tz;
use std::path::PathBuf;

pub const DEFAULT_OUTPUT_DIR: &str = "./reports";
pub const DEFAULT_FAILURE_RATE: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub enum SourceConfig {
    /// Trades read from `trades_<YYYYMMDD>.csv` files in a directory.
    Csv { directory: PathBuf },
    /// Randomly generated trades with an injected failure rate.
    Simulated { failure_rate: f64, seed: Option<u64> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub output_dir: PathBuf,
    pub interval_minutes: u32,
    pub time_zone: Tz,
    pub source: SourceConfig,
    pub logging: LoggingConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            interval_minutes: 1,
            time_zone: Tz::Europe__London,
            source: SourceConfig::Simulated {
                failure_rate: DEFAULT_FAILURE_RATE,
                seed: None,
            },
            logging: LoggingConfig::default(),
        }
    }
}

impl ServiceConfig {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, PowerposError> {
        let output_dir = config
            .get_string("output", "directory")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let interval_minutes =
            parse_interval_minutes(config.get_string("schedule", "interval_minutes").as_deref());

        let zone_id = config
            .get_string("schedule", "timezone")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TIME_ZONE.to_string());
        let time_zone = resolve_time_zone(&zone_id).map_err(|_| PowerposError::ConfigInvalid {
            section: "schedule".into(),
            key: "timezone".into(),
            reason: format!("unknown time zone '{zone_id}'"),
        })?;

        let source = parse_source(config)?;

        let logging = LoggingConfig {
            level: config
                .get_string("logging", "level")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "info".into()),
            json: config.get_bool("logging", "json", false),
        };

        Ok(Self {
            output_dir,
            interval_minutes,
            time_zone,
            source,
            logging,
        })
    }

    pub fn interval(&self) -> Duration {
        interval_from_minutes(self.interval_minutes)
    }
}

fn parse_source(config: &dyn ConfigPort) -> Result<SourceConfig, PowerposError> {
    let kind = config
        .get_string("source", "kind")
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_else(|| "simulated".into());

    match kind.as_str() {
        "csv" => {
            let directory = config
                .get_string("source", "directory")
                .filter(|s| !s.trim().is_empty())
                .ok_or_else(|| PowerposError::ConfigInvalid {
                    section: "source".into(),
                    key: "directory".into(),
                    reason: "directory is required for csv source".into(),
                })?;
            Ok(SourceConfig::Csv {
                directory: PathBuf::from(directory),
            })
        }
        "simulated" => {
            let failure_rate = config.get_double("source", "failure_rate", DEFAULT_FAILURE_RATE);
            if !(0.0..=1.0).contains(&failure_rate) {
                return Err(PowerposError::ConfigInvalid {
                    section: "source".into(),
                    key: "failure_rate".into(),
                    reason: "failure_rate must be between 0 and 1".into(),
                });
            }
            let seed = config
                .get_string("source", "seed")
                .and_then(|s| s.trim().parse::<u64>().ok());
            Ok(SourceConfig::Simulated { failure_rate, seed })
        }
        other => Err(PowerposError::ConfigInvalid {
            section: "source".into(),
            key: "kind".into(),
            reason: format!("unknown source kind '{other}' (expected csv or simulated)"),
        }),
    }
}
