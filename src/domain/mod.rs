//! Core domain types and logic.

pub mod config;
pub mod error;
pub mod position;
pub mod report;
pub mod schedule;
pub mod time_zone;
pub mod trade;
