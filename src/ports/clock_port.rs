//! Wall clock port.

use chrono::{DateTime, Days, NaiveDate};
use chrono_tz::Tz;

/// Supplies "now" in the service's civil time zone.
pub trait ClockPort {
    fn now(&self) -> DateTime<Tz>;

    /// The delivery day reports are produced for: tomorrow, local time.
    fn day_ahead(&self) -> NaiveDate {
        let today = self.now().date_naive();
        today.checked_add_days(Days::new(1)).unwrap_or(today)
    }
}
