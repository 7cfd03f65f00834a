//! Report naming and record layout.

use crate::domain::position::PositionSummary;
use chrono::{DateTime, TimeZone};

pub const REPORT_HEADER: [&str; 2] = ["Local Time", "Volume"];

/// `PowerPosition_<YYYYMMDD>_<HHMM>.csv`, stamped with the extraction time
/// rather than the reference date.
pub fn artifact_name<Tz: TimeZone>(extracted_at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("PowerPosition_{}.csv", extracted_at.format("%Y%m%d_%H%M"))
}

/// Shortest decimal that round-trips, without a trailing `.0`
/// (`10`, `10.5`, `-0.125`).
///
/// Magnitudes with a decimal exponent of 15 or more, or below -4, switch to
/// exponent form with a signed, at least two-digit exponent (`1E+15`,
/// `-2.5E-07`).
pub fn format_volume(volume: f64) -> String {
    if volume == 0.0 {
        return "0".to_string();
    }

    let scientific = format!("{volume:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return volume.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return volume.to_string();
    };

    if (-4..15).contains(&exponent) {
        return volume.to_string();
    }
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}E{sign}{:02}", exponent.abs())
}

/// Data rows in slot order, one `[local time, volume]` pair per hour.
pub fn report_rows(summary: &PositionSummary) -> Vec<[String; 2]> {
    summary
        .hourly_volumes
        .iter()
        .map(|h| [h.local_time.clone(), format_volume(h.volume)])
        .collect()
}
