//! Parsing for the date-times clients send us, either as an event's
//! timestamp or as the bounds of an event listing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// What time of day to assume when a client sends a bare date.
#[derive(Clone, Copy, Debug)]
pub enum DefaultTime {
    StartOfDay,
    EndOfDay,
}

impl DefaultTime {
    fn time(self) -> NaiveTime {
        match self {
            DefaultTime::StartOfDay => NaiveTime::MIN,
            DefaultTime::EndOfDay => {
                // Stored timestamps keep nanoseconds.
                NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
                    .unwrap_or(NaiveTime::MIN)
            }
        }
    }
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Returns `None` if `raw` is not a date or date-time we understand.
/// Date-times with an offset are converted to UTC.
///
/// Only a bare date gets `default_time`. An explicit time is always kept,
/// midnight included: `2023-10-14T00:00:00` as an end bound means the
/// instant midnight, not the whole of the 14th.
pub fn parse(raw: &str, default_time: DefaultTime) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(default_time.time()))
}

pub fn parse_error_detail(field: &str) -> String {
    format!("Unable to parse {field}. Use YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
            .expect("valid fixture")
    }

    #[test]
    fn test_bare_date_gets_default_time() {
        assert_eq!(
            parse("2023-10-14", DefaultTime::StartOfDay),
            Some(dt("2023-10-14 00:00:00"))
        );
        assert_eq!(
            parse("2023-10-14", DefaultTime::EndOfDay),
            Some(dt("2023-10-14 23:59:59.999999999"))
        );
    }

    #[test]
    fn test_explicit_time_is_kept() {
        // Midnight is a real time when the client says so.
        assert_eq!(
            parse("2023-10-14T00:00:00", DefaultTime::EndOfDay),
            Some(dt("2023-10-14 00:00:00"))
        );
        assert_eq!(
            parse("2023-10-14T08:30", DefaultTime::StartOfDay),
            Some(dt("2023-10-14 08:30:00"))
        );
        assert_eq!(
            parse("2023-10-14 08:30:15.25", DefaultTime::StartOfDay),
            Some(dt("2023-10-14 08:30:15.25"))
        );
    }

    #[test]
    fn test_offsets_become_utc() {
        assert_eq!(
            parse("2023-10-14T08:30:00-04:00", DefaultTime::StartOfDay),
            Some(dt("2023-10-14 12:30:00"))
        );
    }

    #[test]
    fn test_garbage() {
        assert_eq!(parse("yesterday", DefaultTime::StartOfDay), None);
        assert_eq!(parse("2023-13-01", DefaultTime::StartOfDay), None);
        assert_eq!(parse("", DefaultTime::StartOfDay), None);
    }
}
