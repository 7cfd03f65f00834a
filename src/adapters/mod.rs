//! Concrete adapter implementations for ports.

pub mod csv_report_adapter;
pub mod csv_trade_adapter;
pub mod file_config_adapter;
#[cfg(feature = "simulated")]
pub mod simulated_trade_adapter;
pub mod system_clock;
