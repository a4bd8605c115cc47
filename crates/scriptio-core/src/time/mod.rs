//! Calendar time.
//!
//! Converts seconds since the Unix epoch into broken-down civil time (UTC)
//! and renders it with a `strftime`-style formatter. The proleptic Gregorian
//! calendar arithmetic is exact over the full `i64` second range.

mod fmt;

pub use fmt::{DateFormatError, format};

/// Broken-down civil time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilTime {
    /// Full year (e.g. 2026).
    pub year: i32,
    /// Month, 1..=12.
    pub month: u32,
    /// Day of month, 1..=31.
    pub day: u32,
    /// Hour, 0..=23.
    pub hour: u32,
    /// Minute, 0..=59.
    pub minute: u32,
    /// Second, 0..=59.
    pub second: u32,
    /// Day of week, 0..=6 with Sunday = 0.
    pub weekday: u32,
    /// Day of year, 0..=365.
    pub yearday: u32,
}

impl CivilTime {
    /// Break down seconds since the Unix epoch.
    #[must_use]
    pub fn from_unix(secs: i64) -> CivilTime {
        let days = secs.div_euclid(86_400);
        let rem = secs.rem_euclid(86_400);
        let (year, month, day) = civil_from_days(days);
        // 1970-01-01 was a Thursday.
        let weekday = (days + 4).rem_euclid(7) as u32;
        CivilTime {
            year,
            month,
            day,
            hour: (rem / 3600) as u32,
            minute: (rem / 60 % 60) as u32,
            second: (rem % 60) as u32,
            weekday,
            yearday: day_of_year(year, month, day),
        }
    }
}

/// True for Gregorian leap years.
#[must_use]
pub const fn is_leap(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

// Days in each month of a common year, cumulative before each month.
const DAYS_BEFORE_MONTH: [u32; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

fn day_of_year(year: i32, month: u32, day: u32) -> u32 {
    let leap_bump = u32::from(month > 2 && is_leap(year));
    DAYS_BEFORE_MONTH[(month - 1) as usize] + leap_bump + day - 1
}

/// Civil date from days since the epoch (shifted-era algorithm).
fn civil_from_days(z: i64) -> (i32, u32, u32) {
    let z = z + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097); // day of era, [0, 146096]
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year as i32, month, day)
}
