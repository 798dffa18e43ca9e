//! Physical constants and time-axis conversions.
//!
//! Distances are in AU, time in days (Julian Date), angles in radians.

/// Gaussian gravitational constant k (AU^(3/2) / day).
pub const GAUSSIAN_K: f64 = 0.01720209895;

/// Heliocentric gravitational parameter μ = k² in AU³/day².
pub const MU_SUN: f64 = GAUSSIAN_K * GAUSSIAN_K;

/// Degrees to radians conversion factor
pub const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Seconds per day
pub const SECONDS_PER_DAY: f64 = 86400.0;

/// Milliseconds per day
pub const MS_PER_DAY: f64 = SECONDS_PER_DAY * 1000.0;

/// Julian Date of the Unix epoch (1970-01-01 00:00 UTC).
pub const UNIX_EPOCH_JD: f64 = 2440587.5;

/// Julian Date of the J2000.0 epoch (2000-01-01 12:00 TT).
pub const J2000_JD: f64 = 2451545.0;

/// Convert Unix milliseconds to a Julian Date.
pub fn unix_ms_to_julian_date(unix_ms: f64) -> f64 {
    unix_ms / MS_PER_DAY + UNIX_EPOCH_JD
}

/// Convert a Julian Date to Unix milliseconds.
pub fn julian_date_to_unix_ms(jd: f64) -> f64 {
    (jd - UNIX_EPOCH_JD) * MS_PER_DAY
}

/// Current system time as Unix milliseconds.
///
/// A system clock set before 1970 reads as the Unix epoch.
pub fn current_unix_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Format a Julian Date as a human-readable date string.
/// Returns format: "YYYY-MM-DD HH:MM:SS UTC (approx)"
///
/// **Note:** This is an approximation for display purposes only.
/// It ignores leap seconds and the TT/UTC offset. A non-finite date is shown
/// as the raw value.
pub fn julian_date_to_date_string(jd: f64) -> String {
    if !jd.is_finite() {
        return format!("JD {jd}");
    }
    let unix_secs = (julian_date_to_unix_ms(jd) / 1000.0).floor() as i64;

    let days_since_epoch = unix_secs.div_euclid(86400);
    let time_of_day = unix_secs.rem_euclid(86400);

    let hours = time_of_day / 3600;
    let minutes = (time_of_day % 3600) / 60;
    let seconds = time_of_day % 60;

    let (year, month, day) = days_to_ymd(days_since_epoch);

    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02} UTC (approx)",
        year, month, day, hours, minutes, seconds
    )
}

/// Convert days since Unix epoch to year, month, day (proleptic Gregorian).
fn days_to_ymd(days: i64) -> (i32, u32, u32) {
    let shifted = days + 719468; // Days from 0000-03-01 to 1970-01-01

    let era = shifted.div_euclid(146097);
    let day_of_era = shifted.rem_euclid(146097) as u32;
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36524 - day_of_era / 146096) / 365;
    let year = (year_of_era as i64 + era * 400) as i32;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let mp = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = if month <= 2 { year + 1 } else { year };

    (year, month, day)
}
