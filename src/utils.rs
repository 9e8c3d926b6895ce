/// Utility functions for timestamps, identifiers and duration formatting
use log::warn;
use std::time::Duration;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use time_tz::{timezones, OffsetDateTimeExt, Tz};

/// Result of resolving a configured timezone name
#[derive(Clone, Copy)]
pub enum TargetZone {
    /// Empty name or `UTC`
    Utc,
    Named(&'static Tz),
    Unknown,
}

pub fn resolve_timezone(target_location: &str) -> TargetZone {
    let name = target_location.trim();
    if name.is_empty() || name.eq_ignore_ascii_case("UTC") {
        return TargetZone::Utc;
    }
    match timezones::get_by_name(name) {
        Some(tz) => TargetZone::Named(tz),
        None => TargetZone::Unknown,
    }
}

/// Format a timestamp in the connector's `YYYY-MM-DD_HH:MM:SS` layout,
/// converted to the named IANA timezone.
///
/// An empty name means UTC. An unknown name is logged and the timestamp is
/// rendered in UTC; the event is still produced.
pub fn format_target_timestamp(now: OffsetDateTime, target_location: &str) -> String {
    let format = format_description!("[year]-[month]-[day]_[hour]:[minute]:[second]");

    let local = match resolve_timezone(target_location) {
        TargetZone::Utc => now.to_offset(UtcOffset::UTC),
        TargetZone::Named(tz) => now.to_timezone(tz),
        TargetZone::Unknown => {
            warn!(
                "Unable to load timezone '{}', falling back to UTC",
                target_location
            );
            now.to_offset(UtcOffset::UTC)
        }
    };

    local
        .format(format)
        .unwrap_or_else(|_| local.unix_timestamp().to_string())
}

/// Fresh transaction key: a v4 UUID as 32 lowercase hex characters
pub fn transaction_key() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Render elapsed time as `seconds.nanoseconds`, nine fractional digits
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{}.{:09}", elapsed.as_secs(), elapsed.subsec_nanos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn formats_in_target_timezone() {
        // Bucharest is UTC+3 in summer
        let now = datetime!(2024-07-01 09:15:30 UTC);
        assert_eq!(
            format_target_timestamp(now, "Europe/Bucharest"),
            "2024-07-01_12:15:30"
        );
    }

    #[test]
    fn unknown_timezone_renders_utc() {
        let now = datetime!(2024-01-02 03:04:05 UTC);
        assert_eq!(
            format_target_timestamp(now, "Not/AZone"),
            "2024-01-02_03:04:05"
        );
    }

    #[test]
    fn missing_timezone_means_utc() {
        assert!(matches!(resolve_timezone(""), TargetZone::Utc));
        assert!(matches!(resolve_timezone("UTC"), TargetZone::Utc));
        assert!(matches!(resolve_timezone("Europe/Bucharest"), TargetZone::Named(_)));
        assert!(matches!(resolve_timezone("Not/AZone"), TargetZone::Unknown));

        let now = datetime!(2024-01-02 03:04:05 +02:00);
        assert_eq!(format_target_timestamp(now, ""), "2024-01-02_01:04:05");
    }

    #[test]
    fn transaction_keys_are_32_hex_chars() {
        let key = transaction_key();
        assert_eq!(key.len(), 32);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(key, transaction_key());
    }

    #[test]
    fn elapsed_has_nine_fraction_digits() {
        assert_eq!(format_elapsed(Duration::from_millis(1500)), "1.500000000");
        assert_eq!(format_elapsed(Duration::from_nanos(42)), "0.000000042");
    }
}
