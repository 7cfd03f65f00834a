//! Port traits the service talks to its collaborators through.

pub mod clock_port;
pub mod config_port;
pub mod report_port;
pub mod trade_port;
