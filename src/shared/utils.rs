//! Small helpers shared across operations

use chrono::{DateTime, Duration, Utc};

/// Bounds of the UTC calendar day containing `now`, as `[start, end)`.
pub fn utc_day_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight exists on every date")
        .and_utc();
    (start, start + Duration::days(1))
}

/// Trim free text; whitespace-only input collapses to `None`.
pub fn normalized_note(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn day_bounds_cover_exactly_one_day() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 15, 9, 26).unwrap();
        let (start, end) = utc_day_bounds(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 14, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 3, 15, 0, 0, 0).unwrap());
        assert!(start <= now && now < end);
    }

    #[test]
    fn notes_are_trimmed_and_emptiness_collapses() {
        assert_eq!(normalized_note(Some("  ok  ")), Some("ok".to_owned()));
        assert_eq!(normalized_note(Some("   ")), None);
        assert_eq!(normalized_note(Some("")), None);
        assert_eq!(normalized_note(None), None);
    }
}
