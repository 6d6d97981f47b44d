//! Timestamp parsing and the watch-face time formats.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

/// Parse a timestamp as sent by the API.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` and bare dates. Values without an
/// offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// `HH:MM` in the given zone.
pub fn hours_minutes(dt: &DateTime<Utc>, zone: &FixedOffset) -> String {
    dt.with_timezone(zone).format("%H:%M").to_string()
}

/// `DD/MM` in the given zone.
pub fn day_month(dt: &DateTime<Utc>, zone: &FixedOffset) -> String {
    dt.with_timezone(zone).format("%d/%m").to_string()
}

/// The device's current UTC offset.
pub fn local_offset() -> FixedOffset {
    Local::now().offset().fix()
}

/// Minutes to add to local time to get UTC, the convention the API's `tz`
/// parameter expects (UTC+10 is `-600`).
pub fn tz_offset_minutes(zone: &FixedOffset) -> i32 {
    -zone.local_minus_utc() / 60
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc10() -> FixedOffset {
        FixedOffset::east_opt(10 * 3600).unwrap()
    }

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_timestamp("2024-01-01T00:00:00Z").unwrap();
        assert_eq!(hours_minutes(&dt, &FixedOffset::east_opt(0).unwrap()), "00:00");
        assert_eq!(hours_minutes(&dt, &utc10()), "10:00");
    }

    #[test]
    fn test_parse_offset_timestamp() {
        let dt = parse_timestamp("2024-06-21T17:05:00+10:00").unwrap();
        assert_eq!(hours_minutes(&dt, &utc10()), "17:05");
        assert_eq!(hours_minutes(&dt, &FixedOffset::east_opt(0).unwrap()), "07:05");
    }

    #[test]
    fn test_parse_space_separated() {
        let dt = parse_timestamp("2024-03-02 21:30:00").unwrap();
        assert_eq!(hours_minutes(&dt, &FixedOffset::east_opt(0).unwrap()), "21:30");
    }

    #[test]
    fn test_parse_bare_date() {
        let dt = parse_timestamp("2024-03-02").unwrap();
        assert_eq!(day_month(&dt, &FixedOffset::east_opt(0).unwrap()), "02/03");
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("tomorrow").is_none());
    }

    #[test]
    fn test_tz_offset_sign() {
        assert_eq!(tz_offset_minutes(&utc10()), -600);
        assert_eq!(tz_offset_minutes(&FixedOffset::west_opt(5 * 3600).unwrap()), 300);
        assert_eq!(tz_offset_minutes(&FixedOffset::east_opt(0).unwrap()), 0);
    }
}
