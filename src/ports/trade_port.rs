//! Trade source port.

use crate::domain::error::TradeSourceError;
use crate::domain::trade::Trade;
use chrono::NaiveDate;

/// Upstream trading system that knows the trades for a delivery day.
pub trait TradePort {
    /// Trades for `date`. A provider outage is reported as
    /// [`TradeSourceError::Unavailable`].
    fn get_trades(&self, date: NaiveDate) -> Result<Vec<Trade>, TradeSourceError>;
}
