//! `strftime`-style rendering of broken-down time.

use thiserror::Error;

use super::CivilTime;

/// A date format that cannot be rendered.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateFormatError {
    /// A `%` conversion this formatter does not know.
    #[error("unknown conversion `%{0}` in date format")]
    UnknownConversion(char),
    /// The format string ends in the middle of a conversion.
    #[error("date format ends with a bare `%`")]
    TrailingPercent,
}

const WEEKDAY_ABBR: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const WEEKDAY_FULL: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];
const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const MONTH_FULL: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Render `spec`, expanding `%` conversions against `time`.
///
/// The supported conversions are the C-locale core of `strftime`; composite
/// ones (`%c`, `%x`, `%r`, ...) expand to their conventional equivalents.
/// Anything unknown is an error rather than silently passed through.
pub fn format(time: &CivilTime, spec: &str) -> Result<String, DateFormatError> {
    let mut out = String::with_capacity(spec.len() * 2);
    let mut chars = spec.chars();
    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        let conv = chars.next().ok_or(DateFormatError::TrailingPercent)?;
        expand(time, conv, &mut out)?;
    }
    Ok(out)
}

fn expand(time: &CivilTime, conv: char, out: &mut String) -> Result<(), DateFormatError> {
    use std::fmt::Write;

    // write! into a String cannot fail; results are discarded.
    let wd = time.weekday as usize;
    let mo = (time.month - 1) as usize;
    match conv {
        'a' => out.push_str(WEEKDAY_ABBR[wd]),
        'A' => out.push_str(WEEKDAY_FULL[wd]),
        'b' | 'h' => out.push_str(MONTH_ABBR[mo]),
        'B' => out.push_str(MONTH_FULL[mo]),
        'c' => out.push_str(&format(time, "%a %b %e %H:%M:%S %Y")?),
        'C' => {
            let _ = write!(out, "{:02}", time.year.div_euclid(100));
        }
        'd' => {
            let _ = write!(out, "{:02}", time.day);
        }
        'D' | 'x' => out.push_str(&format(time, "%m/%d/%y")?),
        'e' => {
            let _ = write!(out, "{:2}", time.day);
        }
        'F' => out.push_str(&format(time, "%Y-%m-%d")?),
        'H' => {
            let _ = write!(out, "{:02}", time.hour);
        }
        'I' => {
            let hour12 = match time.hour % 12 {
                0 => 12,
                h => h,
            };
            let _ = write!(out, "{hour12:02}");
        }
        'j' => {
            let _ = write!(out, "{:03}", time.yearday + 1);
        }
        'm' => {
            let _ = write!(out, "{:02}", time.month);
        }
        'M' => {
            let _ = write!(out, "{:02}", time.minute);
        }
        'n' => out.push('\n'),
        'p' => out.push_str(if time.hour < 12 { "AM" } else { "PM" }),
        'r' => out.push_str(&format(time, "%I:%M:%S %p")?),
        'R' => out.push_str(&format(time, "%H:%M")?),
        'S' => {
            let _ = write!(out, "{:02}", time.second);
        }
        't' => out.push('\t'),
        'T' | 'X' => out.push_str(&format(time, "%H:%M:%S")?),
        'u' => {
            let iso = if time.weekday == 0 { 7 } else { time.weekday };
            let _ = write!(out, "{iso}");
        }
        'U' => {
            // Week of year, first Sunday starts week 1.
            let _ = write!(out, "{:02}", (time.yearday + 7 - time.weekday) / 7);
        }
        'w' => {
            let _ = write!(out, "{}", time.weekday);
        }
        'W' => {
            // Week of year, first Monday starts week 1.
            let monday_based = (time.weekday + 6) % 7;
            let _ = write!(out, "{:02}", (time.yearday + 7 - monday_based) / 7);
        }
        'y' => {
            let _ = write!(out, "{:02}", time.year.rem_euclid(100));
        }
        'Y' => {
            let _ = write!(out, "{}", time.year);
        }
        'z' => out.push_str("+0000"),
        'Z' => out.push_str("UTC"),
        '%' => out.push('%'),
        other => return Err(DateFormatError::UnknownConversion(other)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2009-02-13 23:31:30 UTC, a Friday.
    fn sample() -> CivilTime {
        CivilTime::from_unix(1_234_567_890)
    }

    #[test]
    fn literal_text_passes_through() {
        assert_eq!(format(&sample(), "at: ").unwrap(), "at: ");
        assert_eq!(format(&sample(), "100%%").unwrap(), "100%");
    }

    #[test]
    fn default_representation() {
        assert_eq!(
            format(&sample(), "%c").unwrap(),
            "Fri Feb 13 23:31:30 2009"
        );
    }

    #[test]
    fn numeric_fields_are_zero_padded() {
        let t = CivilTime::from_unix(0);
        assert_eq!(format(&t, "%Y-%m-%d %H:%M:%S").unwrap(), "1970-01-01 00:00:00");
        assert_eq!(format(&t, "%j").unwrap(), "001");
    }

    #[test]
    fn twelve_hour_clock_and_meridiem() {
        assert_eq!(format(&sample(), "%I %p").unwrap(), "11 PM");
        let midnight = CivilTime::from_unix(0);
        assert_eq!(format(&midnight, "%I %p").unwrap(), "12 AM");
        assert_eq!(format(&midnight, "%r").unwrap(), "12:00:00 AM");
    }

    #[test]
    fn weekday_conversions_agree() {
        let t = sample(); // Friday
        assert_eq!(format(&t, "%a %A %u %w").unwrap(), "Fri Friday 5 5");
        let sunday = CivilTime::from_unix(259_200); // 1970-01-04
        assert_eq!(format(&sunday, "%u %w").unwrap(), "7 0");
    }

    #[test]
    fn space_padded_day() {
        let t = CivilTime::from_unix(0);
        assert_eq!(format(&t, "%e").unwrap(), " 1");
    }

    #[test]
    fn composite_date_forms() {
        let t = sample();
        assert_eq!(format(&t, "%D").unwrap(), "02/13/09");
        assert_eq!(format(&t, "%F").unwrap(), "2009-02-13");
        assert_eq!(format(&t, "%T").unwrap(), "23:31:30");
        assert_eq!(format(&t, "%R").unwrap(), "23:31");
    }

    #[test]
    fn fixed_zone_markers() {
        assert_eq!(format(&sample(), "%z %Z").unwrap(), "+0000 UTC");
    }

    #[test]
    fn week_numbers() {
        // 1970-01-01 was a Thursday: week 0 for both conventions.
        let t = CivilTime::from_unix(0);
        assert_eq!(format(&t, "%U %W").unwrap(), "00 00");
        // 1970-01-05 was the first Monday.
        let mon = CivilTime::from_unix(4 * 86_400);
        assert_eq!(format(&mon, "%W").unwrap(), "01");
    }

    #[test]
    fn unknown_conversion_is_an_error() {
        assert_eq!(
            format(&sample(), "%Q"),
            Err(DateFormatError::UnknownConversion('Q'))
        );
    }

    #[test]
    fn trailing_percent_is_an_error() {
        assert_eq!(format(&sample(), "oops %"), Err(DateFormatError::TrailingPercent));
    }
}
