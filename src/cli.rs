//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::csv_trade_adapter::CsvTradeAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::system_clock::SystemClock;
use crate::domain::config::{ServiceConfig, SourceConfig};
use crate::domain::error::PowerposError;
use crate::logging::init_logging;
use crate::ports::clock_port::ClockPort;
use crate::ports::trade_port::TradePort;
use crate::service::pipeline::{PositionPipeline, RunOutcome};
use crate::service::scheduler::Scheduler;

#[derive(Parser, Debug)]
#[command(name = "powerpos", about = "Day-ahead power position reporter")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the scheduled report service until interrupted
    Run {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Minutes between reports
        #[arg(short, long, allow_hyphen_values = true)]
        interval: Option<i64>,
    },
    /// Extract a single report and exit
    Once {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Reference date (YYYY-MM-DD), defaults to tomorrow
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Validate a configuration file and print the resolved settings
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            output,
            interval,
        } => run_service(config.as_ref(), output.as_ref(), interval),
        Command::Once {
            config,
            output,
            date,
        } => run_once(config.as_ref(), output.as_ref(), date),
        Command::Validate { config } => run_validate(&config),
    }
}

/// Loads settings from an optional INI file with command-line overrides
/// applied on top.
pub fn load_settings(
    config_path: Option<&PathBuf>,
    output: Option<&PathBuf>,
    interval: Option<i64>,
) -> Result<ServiceConfig, PowerposError> {
    let mut adapter = match config_path {
        Some(path) => {
            FileConfigAdapter::from_file(path).map_err(|e| PowerposError::ConfigParse {
                file: path.display().to_string(),
                reason: e.to_string(),
            })?
        }
        None => FileConfigAdapter::default(),
    };

    if let Some(output) = output {
        adapter.set("output", "directory", output.display().to_string());
    }
    if let Some(interval) = interval {
        adapter.set("schedule", "interval_minutes", interval.to_string());
    }

    ServiceConfig::from_config(&adapter)
}

pub fn build_trade_port(
    source: &SourceConfig,
) -> Result<Arc<dyn TradePort + Send + Sync>, PowerposError> {
    match source {
        SourceConfig::Csv { directory } => Ok(Arc::new(CsvTradeAdapter::new(directory.clone()))),
        #[cfg(feature = "simulated")]
        SourceConfig::Simulated { failure_rate, seed } => {
            use crate::adapters::simulated_trade_adapter::SimulatedTradeAdapter;
            Ok(Arc::new(SimulatedTradeAdapter::new(*failure_rate, *seed)))
        }
        #[cfg(not(feature = "simulated"))]
        SourceConfig::Simulated { .. } => Err(PowerposError::ConfigInvalid {
            section: "source".into(),
            key: "kind".into(),
            reason: "simulated feature is required for the simulated source".into(),
        }),
    }
}

pub fn build_pipeline(
    config: &ServiceConfig,
) -> Result<(PositionPipeline, Arc<SystemClock>), PowerposError> {
    let clock = Arc::new(SystemClock::new(config.time_zone));
    let trades = build_trade_port(&config.source)?;
    let reports = Arc::new(CsvReportAdapter::new(&config.output_dir)?);
    let pipeline = PositionPipeline::new(trades, reports, clock.clone());
    Ok((pipeline, clock))
}

/// Runs one extraction for `date` (tomorrow when unset).
pub fn execute_once(
    config: &ServiceConfig,
    date: Option<NaiveDate>,
) -> Result<RunOutcome, PowerposError> {
    let (pipeline, clock) = build_pipeline(config)?;
    let reference_date = date.unwrap_or_else(|| clock.day_ahead());
    Ok(pipeline.run_once(reference_date))
}

fn run_service(
    config_path: Option<&PathBuf>,
    output: Option<&PathBuf>,
    interval: Option<i64>,
) -> ExitCode {
    let config = match load_settings(config_path, output, interval) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    init_logging(&config.logging);

    let (pipeline, clock) = match build_pipeline(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    info!(
        output_dir = %config.output_dir.display(),
        interval_minutes = config.interval_minutes,
        time_zone = %config.time_zone,
        "power position service starting"
    );

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(r) => r,
        Err(e) => {
            let err = PowerposError::Io(e);
            eprintln!("error: {err}");
            return (&err).into();
        }
    };

    runtime.block_on(async {
        let scheduler = Scheduler::new(Arc::new(pipeline), clock, config.interval());
        let cancel = CancellationToken::new();

        if let Err(e) = spawn_shutdown_listener(cancel.clone()) {
            let err = PowerposError::Io(e);
            eprintln!("error: failed to install signal handlers: {err}");
            return ExitCode::from(&err);
        }

        scheduler.run(cancel).await;
        ExitCode::SUCCESS
    })
}

/// Cancels `cancel` on Ctrl-C, or on SIGINT/SIGTERM on unix. Handlers are
/// installed before this returns.
pub fn spawn_shutdown_listener(cancel: CancellationToken) -> std::io::Result<JoinHandle<()>> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        Ok(tokio::spawn(async move {
            tokio::select! {
                _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
                _ = sigint.recv() => info!("received SIGINT, shutting down"),
            }
            cancel.cancel();
        }))
    }

    #[cfg(not(unix))]
    {
        Ok(tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("received Ctrl-C, shutting down");
                    cancel.cancel();
                }
                Err(e) => tracing::error!(error = %e, "failed to listen for Ctrl-C"),
            }
        }))
    }
}

fn run_once(
    config_path: Option<&PathBuf>,
    output: Option<&PathBuf>,
    date: Option<NaiveDate>,
) -> ExitCode {
    let config = match load_settings(config_path, output, None) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    init_logging(&config.logging);

    match execute_once(&config, date) {
        Ok(RunOutcome::Written { artifact }) => {
            println!("{}", artifact.display());
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::ProviderUnavailable) => {
            eprintln!("error: trade source unavailable, no report written");
            ExitCode::from(3)
        }
        Ok(RunOutcome::Failed) => {
            eprintln!("error: report run failed");
            ExitCode::from(4)
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_settings(Some(config_path), None, None) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("  Output directory: {}", config.output_dir.display());
    eprintln!("  Interval:         {} min", config.interval_minutes);
    eprintln!("  Time zone:        {}", config.time_zone);
    match &config.source {
        SourceConfig::Csv { directory } => {
            eprintln!("  Trade source:     csv ({})", directory.display());
        }
        SourceConfig::Simulated { failure_rate, seed } => {
            let seed = seed.map_or_else(|| "random".to_string(), |s| s.to_string());
            eprintln!("  Trade source:     simulated (failure rate {failure_rate}, seed {seed})");
        }
    }
    eprintln!("  Log level:        {}", config.logging.level);

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
