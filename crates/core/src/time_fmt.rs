// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared human-readable duration and timestamp formatting.

use chrono::{DateTime, Utc};

/// Format seconds as a short human-readable duration: `"5s"`, `"2m"`, `"1h30m"`, `"3d"`.
pub fn format_elapsed(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86400 {
        let h = secs / 3600;
        let m = (secs % 3600) / 60;
        if m > 0 {
            format!("{}h{}m", h, m)
        } else {
            format!("{}h", h)
        }
    } else {
        format!("{}d", secs / 86400)
    }
}

/// Format milliseconds as a short human-readable duration.
pub fn format_elapsed_ms(ms: u64) -> String {
    format_elapsed(ms / 1000)
}

/// Render a timestamp as RFC 3339 / ISO 8601, the wire and on-disk format
/// for every `created_at`/`updated_at` field.
pub fn to_iso8601(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_seconds() {
        assert_eq!(format_elapsed(5), "5s");
        assert_eq!(format_elapsed(59), "59s");
    }

    #[test]
    fn formats_minutes() {
        assert_eq!(format_elapsed(120), "2m");
    }

    #[test]
    fn formats_hours_with_and_without_minutes() {
        assert_eq!(format_elapsed(3600), "1h");
        assert_eq!(format_elapsed(3600 + 5 * 60), "1h5m");
    }

    #[test]
    fn formats_days() {
        assert_eq!(format_elapsed(3 * 86400), "3d");
    }

    #[test]
    fn iso8601_round_trips_through_parse() {
        let now = Utc::now();
        let s = to_iso8601(now);
        let parsed: DateTime<Utc> = s.parse().expect("rfc3339 parse");
        assert_eq!(parsed.timestamp_millis(), now.timestamp_millis());
    }
}
