use crate::lyrics::types::{LyricLine, LyricTrack};
use once_cell::sync::Lazy;
use regex::Regex;

// Two-digit minutes and seconds, one to three fractional digits. Anything
// else is not a tag and leaves the line untimed.
static TIMESTAMP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([0-9]{2}):([0-9]{2})\.([0-9]{1,3})\]").unwrap());

// Credit lines (lyricist, composer, arranger, producer, mixing, recording,
// mastering) followed by an ASCII or full-width colon.
static CREDIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(作词|作曲|编曲|制作|混音|录音|母带)[：:]").unwrap());

/// Parse LRC-style timed lyrics into a sorted track.
///
/// A line with several tags fans out into one entry per tag. Untimed lines,
/// blank lines and credit lines are dropped. Malformed tags are not errors;
/// they simply never match.
pub fn parse_lrc(raw: &str) -> LyricTrack {
    let re = &TIMESTAMP_RE;
    let mut lines = Vec::new();
    for line in raw.lines() {
        let times: Vec<f64> = re.captures_iter(line).map(|cap| tag_seconds(&cap)).collect();
        if times.is_empty() {
            continue;
        }
        let text = re.replace_all(line, "").trim().to_string();
        if text.is_empty() || CREDIT_RE.is_match(&text) {
            continue;
        }
        for time in times {
            lines.push(LyricLine {
                time,
                text: text.clone(),
            });
        }
    }
    LyricTrack::from_unsorted(lines)
}

/// Like [`parse_lrc`] but treats a missing payload as an empty track.
pub fn parse_optional_lrc(raw: Option<&str>) -> LyricTrack {
    raw.map(parse_lrc).unwrap_or_default()
}

fn tag_seconds(cap: &regex::Captures<'_>) -> f64 {
    let min = cap
        .get(1)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .unwrap_or(0);
    let sec = cap
        .get(2)
        .and_then(|s| s.as_str().parse::<u32>().ok())
        .unwrap_or(0);
    // ".3" and ".34" are tenths and hundredths, so right-pad to milliseconds.
    let millis = cap
        .get(3)
        .map(|f| format!("{:0<3}", f.as_str()))
        .and_then(|f| f.parse::<u32>().ok())
        .unwrap_or(0);
    min as f64 * 60.0 + sec as f64 + millis as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn parses_basic_lines_in_order() {
        let track = parse_lrc("[00:12.34]first\n[01:05.123]second\n");
        assert_eq!(track.len(), 2);
        assert!(approx(track[0].time, 12.34));
        assert_eq!(track[0].text, "first");
        assert!(approx(track[1].time, 65.123));
        assert_eq!(track[1].text, "second");
    }

    #[test]
    fn repeated_tags_fan_out() {
        let track = parse_lrc("[00:01.00][00:02.00]hello");
        assert_eq!(track.len(), 2);
        assert!(track.iter().all(|l| l.text == "hello"));
        assert!(approx(track[0].time, 1.0));
        assert!(approx(track[1].time, 2.0));
    }

    #[test]
    fn fraction_is_right_padded_to_millis() {
        let track = parse_lrc("[00:12.3]x");
        assert_eq!(track.len(), 1);
        assert!(approx(track[0].time, 12.3));

        let track = parse_lrc("[00:12.34]x");
        assert!(approx(track[0].time, 12.34));
    }

    #[test]
    fn credit_lines_are_excluded() {
        let raw = "[00:00.00]作词：张三\n[00:01.00]作曲:李四\n[00:02.00]母带：王五\n[00:03.00]real line";
        let track = parse_lrc(raw);
        assert_eq!(track.len(), 1);
        assert_eq!(track[0].text, "real line");
    }

    #[test]
    fn untimed_blank_and_malformed_lines_are_dropped() {
        let raw = "[ti:Title]\nplain text\n[00:05.00]   \n[0:05.00]short minutes\n[00:05.1234]long fraction\n[00:06.00]kept";
        let track = parse_lrc(raw);
        assert_eq!(track.len(), 1);
        assert_eq!(track[0].text, "kept");
    }

    #[test]
    fn empty_input_is_empty_track() {
        assert!(parse_lrc("").is_empty());
        assert!(parse_optional_lrc(None).is_empty());
    }

    #[test]
    fn output_is_sorted_and_stable() {
        let raw = "[00:30.00]c\n[00:10.00]a\n[00:20.00]b1\n[00:20.00]b2\n[00:05.00][00:40.00]d";
        let track = parse_lrc(raw);
        for pair in track.windows(2) {
            assert!(pair[0].time <= pair[1].time);
        }
        let texts: Vec<&str> = track.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["d", "a", "b1", "b2", "c", "d"]);
    }

    #[test]
    fn crlf_input_is_trimmed() {
        let track = parse_lrc("[00:01.00]one\r\n[00:02.00]two\r\n");
        assert_eq!(track.len(), 2);
        assert_eq!(track[1].text, "two");
    }
}
