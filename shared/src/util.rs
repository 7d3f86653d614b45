//! Time helpers

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

/// Asia/Kathmandu offset (UTC+05:45), used for all booking times on screen
const KATHMANDU_OFFSET_SECS: i32 = 5 * 3600 + 45 * 60;

/// Today's date in UTC, the default upper bound of dashboard filters
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Convert a UTC instant to Nepal local time
pub fn to_kathmandu(instant: DateTime<Utc>) -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(KATHMANDU_OFFSET_SECS).unwrap_or_else(|| Utc.fix());
    instant.with_timezone(&offset)
}

/// Render a booking instant the way the console tables show it
pub fn format_local(instant: Option<DateTime<Utc>>) -> String {
    match instant {
        Some(t) => to_kathmandu(t).format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

/// Date-stamped file name for the CSV booking report
pub fn report_file_name(date: NaiveDate) -> String {
    format!("booking-report-{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_kathmandu_offset() {
        let utc = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let local = to_kathmandu(utc);
        assert_eq!(local.format("%H:%M").to_string(), "05:45");
    }

    #[test]
    fn test_format_local_missing() {
        assert_eq!(format_local(None), "-");
    }

    #[test]
    fn test_report_file_name() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(report_file_name(date), "booking-report-2025-03-09.csv");
    }
}
