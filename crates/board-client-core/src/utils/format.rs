use chrono::{DateTime, Local, NaiveDateTime, Timelike};

/// Format a timestamp the way the board shows it, e.g. "2025. 10. 31. 오후 04:32".
///
/// Accepts RFC 3339 (converted to the local time zone) or a naive ISO
/// date-time, which is taken as already local. Empty input gives an empty
/// string; anything else unparseable is returned as-is.
pub fn format_timestamp(timestamp: &str) -> String {
    let timestamp = timestamp.trim();
    if timestamp.is_empty() {
        return String::new();
    }
    let parsed = DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.with_timezone(&Local).naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S%.f"));
    match parsed {
        Ok(dt) => format_naive(&dt),
        Err(_) => timestamp.to_string(),
    }
}

/// Korean 12-hour rendering of a wall-clock time
pub fn format_naive(dt: &NaiveDateTime) -> String {
    let (is_pm, hour) = dt.hour12();
    let meridiem = if is_pm { "오후" } else { "오전" };
    format!(
        "{}. {} {:02}:{:02}",
        dt.format("%Y. %m. %d"),
        meridiem,
        hour,
        dt.minute()
    )
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp("2025-10-31T16:32:05"), "2025. 10. 31. 오후 04:32");
        assert_eq!(format_timestamp("2025-10-31T09:05:00.123"), "2025. 10. 31. 오전 09:05");
        assert_eq!(format_timestamp("2025-01-02 00:10:00"), "2025. 01. 02. 오전 12:10");
    }

    #[test]
    fn test_format_timestamp_converts_offset_to_local() {
        let input = "2025-10-31T12:00:00+09:00";
        let local = DateTime::parse_from_rfc3339(input)
            .expect("valid rfc3339")
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(format_timestamp(input), format_naive(&local));
        assert_eq!(
            format_timestamp("2025-10-31T03:00:00Z"),
            format_timestamp("2025-10-31T12:00:00+09:00")
        );
    }

    #[test]
    fn test_format_timestamp_passthrough() {
        assert_eq!(format_timestamp(""), "");
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("안녕하세요 여러분", 6), "안녕하...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
    }
}
