// src/text_utils.rs
// Utility functions for transport and list formatting

/// Format seconds as `m:ss`. Unknown or invalid values render as `0:00`.
pub fn format_time(seconds: Option<f64>) -> String {
    let total = match seconds {
        Some(s) if s.is_finite() && s > 0.0 => s.floor() as u64,
        _ => 0,
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Playback progress in percent, `0.0` while the duration is unknown or zero.
pub fn progress_percent(position: f64, duration: Option<f64>) -> f64 {
    match duration {
        Some(d) if d.is_finite() && d > 0.0 && position.is_finite() => {
            (position / d * 100.0).clamp(0.0, 100.0)
        }
        _ => 0.0,
    }
}

/// Cut `text` to at most `width` characters, ending with `…` when shortened.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(Some(0.0)), "0:00");
        assert_eq!(format_time(Some(65.9)), "1:05");
        assert_eq!(format_time(Some(600.0)), "10:00");
    }

    #[test]
    fn unknown_time_is_zero() {
        assert_eq!(format_time(None), "0:00");
        assert_eq!(format_time(Some(f64::NAN)), "0:00");
        assert_eq!(format_time(Some(-3.0)), "0:00");
    }

    #[test]
    fn progress() {
        assert_eq!(progress_percent(30.0, Some(120.0)), 25.0);
        assert_eq!(progress_percent(30.0, None), 0.0);
        assert_eq!(progress_percent(30.0, Some(0.0)), 0.0);
        assert_eq!(progress_percent(500.0, Some(120.0)), 100.0);
    }

    #[test]
    fn truncates_by_character() {
        assert_eq!(truncate("晴天", 5), "晴天");
        assert_eq!(truncate("故事的小黄花", 4), "故事的…");
    }
}
