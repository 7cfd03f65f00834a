//! Civil time zone resolution.
//!
//! Zone ids are resolved in this order:
//! 1. IANA name (`Europe/London`)
//! 2. Windows zone name (`GMT Standard Time`) via [`WINDOWS_ZONE_ALIASES`]

use crate::domain::error::PowerposError;
use chrono_tz::Tz;

pub const DEFAULT_TIME_ZONE: &str = "Europe/London";

pub const WINDOWS_ZONE_ALIASES: &[(&str, &str)] = &[
    ("GMT Standard Time", "Europe/London"),
    ("Greenwich Standard Time", "Atlantic/Reykjavik"),
    ("W. Europe Standard Time", "Europe/Berlin"),
    ("Romance Standard Time", "Europe/Paris"),
    ("Central Europe Standard Time", "Europe/Budapest"),
    ("Central European Standard Time", "Europe/Warsaw"),
    ("E. Europe Standard Time", "Europe/Chisinau"),
    ("GTB Standard Time", "Europe/Bucharest"),
    ("FLE Standard Time", "Europe/Kyiv"),
    ("Eastern Standard Time", "America/New_York"),
    ("Central Standard Time", "America/Chicago"),
    ("Pacific Standard Time", "America/Los_Angeles"),
    ("UTC", "Etc/UTC"),
];

pub fn resolve_time_zone(id: &str) -> Result<Tz, PowerposError> {
    let id = id.trim();
    if let Ok(tz) = id.parse::<Tz>() {
        return Ok(tz);
    }

    WINDOWS_ZONE_ALIASES
        .iter()
        .find(|(windows, _)| windows.eq_ignore_ascii_case(id))
        .and_then(|(_, iana)| iana.parse::<Tz>().ok())
        .ok_or_else(|| PowerposError::UnknownTimeZone { id: id.to_string() })
}
