//! Display helpers shared by the cards.

use chrono::{DateTime, Local, Utc};

/// Human-readable age of a listen, e.g. "5 minutes ago". Anything older than
/// a week is shown as a date.
pub fn format_listened_at(listened_at: Option<i64>, now: DateTime<Utc>) -> Option<String> {
    let at = DateTime::<Utc>::from_timestamp(listened_at?, 0)?;
    let seconds = (now - at).num_seconds();

    let text = match seconds {
        s if s < 60 => "just now".to_string(),
        s if s < 3600 => plural(s / 60, "minute"),
        s if s < 86_400 => plural(s / 3600, "hour"),
        s if s < 2 * 86_400 => "yesterday".to_string(),
        s if s < 7 * 86_400 => plural(s / 86_400, "day"),
        _ => at.with_timezone(&Local).format("%b %-d, %Y").to_string(),
    };
    Some(text)
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

/// `m:ss` for a track duration in milliseconds.
pub fn format_duration_ms(duration_ms: Option<u64>) -> String {
    let Some(ms) = duration_ms else {
        return String::new();
    };
    let total = ms / 1000;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn relative_ages() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let ts = |secs_ago: i64| Some(now.timestamp() - secs_ago);

        assert_eq!(format_listened_at(ts(10), now).as_deref(), Some("just now"));
        assert_eq!(format_listened_at(ts(60), now).as_deref(), Some("1 minute ago"));
        assert_eq!(format_listened_at(ts(7200), now).as_deref(), Some("2 hours ago"));
        assert_eq!(format_listened_at(ts(90_000), now).as_deref(), Some("yesterday"));
        assert_eq!(format_listened_at(ts(3 * 86_400), now).as_deref(), Some("3 days ago"));
        assert_eq!(format_listened_at(None, now), None);
    }

    #[test]
    fn old_listens_show_a_date() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let text = format_listened_at(Some(now.timestamp() - 60 * 86_400), now).unwrap();
        assert!(text.ends_with("2024"), "{text}");
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration_ms(Some(321_000)), "5:21");
        assert_eq!(format_duration_ms(Some(59_999)), "0:59");
        assert_eq!(format_duration_ms(None), "");
    }
}
