//! Day-ahead position aggregation.
//!
//! Trade periods are folded into a fixed 24-slot hourly timeline. Slot 0 is
//! the hour starting 23:00 on the day before the reference date, because
//! period 1 of the upstream grid begins before local midnight.

use crate::domain::trade::Trade;
use chrono::{Duration, NaiveDate, NaiveTime};

pub const HOURS_PER_DAY: usize = 24;

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyVolume {
    /// Wall-clock start of the hour, `HH:MM`.
    pub local_time: String,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionSummary {
    pub reference_date: NaiveDate,
    pub hourly_volumes: [HourlyVolume; HOURS_PER_DAY],
}

impl PositionSummary {
    /// All 24 slots labelled for `reference_date`, every volume zero.
    pub fn empty(reference_date: NaiveDate) -> Self {
        Self {
            reference_date,
            hourly_volumes: std::array::from_fn(|slot| HourlyVolume {
                local_time: slot_label(reference_date, slot),
                volume: 0.0,
            }),
        }
    }

    pub fn total_volume(&self) -> f64 {
        self.hourly_volumes.iter().map(|h| h.volume).sum()
    }

    pub fn volumes(&self) -> [f64; HOURS_PER_DAY] {
        std::array::from_fn(|slot| self.hourly_volumes[slot].volume)
    }
}

/// Label for `slot`: reference midnight minus one hour plus `slot` hours.
///
/// Computed on the naive wall clock, so DST transition days still produce
/// 24 evenly spaced labels.
pub fn slot_label(reference_date: NaiveDate, slot: usize) -> String {
    let midnight = reference_date.and_time(NaiveTime::MIN);
    let start = midnight - Duration::hours(1) + Duration::hours(slot as i64);
    start.format("%H:%M").to_string()
}

/// Maps a 1-based period onto its slot, `None` when off the grid.
pub fn slot_index(period: i32) -> Option<usize> {
    let index = period.checked_sub(1)?;
    usize::try_from(index).ok().filter(|&i| i < HOURS_PER_DAY)
}

/// Aggregates every trade period into the hourly timeline for
/// `reference_date`.
///
/// Periods outside `1..=24` are discarded so one bad record never blocks
/// reporting the rest of the position.
pub fn compute_position(reference_date: NaiveDate, trades: &[Trade]) -> PositionSummary {
    let mut summary = PositionSummary::empty(reference_date);

    for trade in trades {
        for period in &trade.periods {
            if let Some(slot) = slot_index(period.period) {
                summary.hourly_volumes[slot].volume += period.volume;
            }
        }
    }

    summary
}
