//! Domain models for the physiotrack system.

mod clinic;
mod exercise;
mod patient;
mod progress;
mod seed;

pub use clinic::*;
pub use exercise::*;
pub use patient::*;
pub use progress::*;
pub use seed::*;

use chrono::{DateTime, NaiveDate, Utc};

/// Current UTC time in the ISO-8601 form used for every stored timestamp.
pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Parse a stored timestamp. Accepts RFC 3339 or a bare `YYYY-MM-DD` date,
/// which is read as midnight UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_forms() {
        let full = parse_timestamp("2024-06-01T00:00:00Z").unwrap();
        assert_eq!(parse_timestamp("2024-06-01"), Some(full));
        assert_eq!(
            parse_timestamp("2024-06-01T10:00:00+02:00"),
            parse_timestamp("2024-06-01T08:00:00Z")
        );
        assert!(parse_timestamp(&now_timestamp()).is_some());
        assert_eq!(parse_timestamp("June 1st"), None);
        assert_eq!(parse_timestamp(""), None);
    }
}
