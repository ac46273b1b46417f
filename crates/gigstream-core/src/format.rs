//! Display helpers shared by every renderer.

use chrono::DateTime;

const DAY_MS: u64 = 24 * 60 * 60 * 1000;

/// Abbreviate an address to `0x1234...cdef`.
///
/// Strings of ten characters or fewer are returned unchanged.
#[must_use]
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// `"N days remaining"` rounded up, or `"Expired"` once the deadline passes.
#[must_use]
pub fn days_remaining(deadline_ms: u64, now_ms: u64) -> String {
    if deadline_ms <= now_ms {
        return "Expired".to_string();
    }
    let days = (deadline_ms - now_ms).div_ceil(DAY_MS);
    format!("{days} days remaining")
}

/// Split a joined skill string into display tags.
#[must_use]
pub fn skill_tags(skills: &str) -> Vec<&str> {
    skills
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// `YYYY-MM-DD` (UTC) for an epoch-millisecond timestamp.
#[must_use]
pub fn format_date(ms: u64) -> String {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .map_or_else(|| ms.to_string(), |dt| dt.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_addresses_are_shortened() {
        assert_eq!(short_address("0x1234567890abcdef"), "0x1234...cdef");
    }

    #[test]
    fn short_addresses_are_unchanged() {
        assert_eq!(short_address("0x12345678"), "0x12345678");
        assert_eq!(short_address(""), "");
    }

    #[test]
    fn remaining_days_round_up() {
        let now = 1_000_000;
        assert_eq!(days_remaining(now + 1, now), "1 days remaining");
        assert_eq!(days_remaining(now + DAY_MS, now), "1 days remaining");
        assert_eq!(days_remaining(now + DAY_MS + 1, now), "2 days remaining");
        assert_eq!(days_remaining(now + 7 * DAY_MS, now), "7 days remaining");
    }

    #[test]
    fn past_deadlines_are_expired() {
        assert_eq!(days_remaining(5, 5), "Expired");
        assert_eq!(days_remaining(0, 5), "Expired");
    }

    #[test]
    fn tags_drop_blanks() {
        assert_eq!(skill_tags(" Rust, ,Move ,"), vec!["Rust", "Move"]);
        assert!(skill_tags("").is_empty());
    }

    #[test]
    fn dates_render_in_utc() {
        assert_eq!(format_date(1_893_456_000_000), "2030-01-01");
    }
}
