//! Trades as delivered by the upstream trading system.

/// One (period, volume) pair of a trade. `period` is 1-based on the daily
/// 24-slot grid, where period 1 is the hour starting 23:00 the day before.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradePeriod {
    pub period: i32,
    pub volume: f64,
}

impl TradePeriod {
    pub fn new(period: i32, volume: f64) -> Self {
        Self { period, volume }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub id: String,
    pub periods: Vec<TradePeriod>,
}

impl Trade {
    pub fn new(id: impl Into<String>, periods: Vec<TradePeriod>) -> Self {
        Self {
            id: id.into(),
            periods,
        }
    }
}
