use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

/// Monotonic clock that works on both native and wasm32.
pub type AppInstant = web_time::Instant;

pub struct TimeUtils;

impl TimeUtils {
    pub const STANDARD_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

    pub fn now_utc() -> DateTime<Utc> {
        Utc::now()
    }

    pub fn now_timestamp_ms() -> i64 {
        Utc::now().timestamp_millis()
    }

    /// Ledger inception arrives as unix seconds.
    pub fn from_unix_secs(secs: i64) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(secs, 0).single()
    }

    pub fn from_unix_ms(ms: i64) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(ms).single()
    }

    /// `2024-03-01T12:00:00.000Z` - the shape the address endpoint expects for `ledgerTimestamp`.
    pub fn to_iso_millis(instant: &DateTime<Utc>) -> String {
        instant.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Accepts an RFC 3339 string or raw epoch milliseconds (both appear in entry URLs).
    pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(ms) = raw.parse::<i64>() {
            return Self::from_unix_ms(ms);
        }
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

// Display helpers

pub fn format_instant(instant: &DateTime<Utc>) -> String {
    format!("{}", instant.format(TimeUtils::STANDARD_TIME_FORMAT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_millis_matches_browser_format() {
        let t = TimeUtils::from_unix_secs(1_700_000_000).unwrap();
        assert_eq!(TimeUtils::to_iso_millis(&t), "2023-11-14T22:13:20.000Z");
    }

    #[test]
    fn parse_instant_accepts_ms_and_rfc3339() {
        let from_ms = TimeUtils::parse_instant("1700000000000").unwrap();
        let from_str = TimeUtils::parse_instant("2023-11-14T22:13:20Z").unwrap();
        assert_eq!(from_ms, from_str);
        assert!(TimeUtils::parse_instant("").is_none());
        assert!(TimeUtils::parse_instant("yesterday").is_none());
    }
}
