use chrono::DateTime;

/// RFC 3339 `date-time`.
pub fn is_date_time(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
}
