use std::ops::Deref;

/// One timed lyric line. Produced only by the parser, never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct LyricLine {
    /// Offset from the start of the track, in seconds.
    pub time: f64,
    /// Line text with all timestamp tags removed and whitespace trimmed.
    pub text: String,
}

/// Lines sorted ascending by `time`. Equal timestamps keep source order.
///
/// Tracks are immutable once built and are shared by `Arc` between the
/// sync engine and whoever renders them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LyricTrack {
    lines: Vec<LyricLine>,
}

impl LyricTrack {
    /// Build a track from unordered lines. The sort is stable so repeated
    /// timestamps keep first-seen order.
    pub fn from_unsorted(mut lines: Vec<LyricLine>) -> Self {
        lines.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { lines }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl Deref for LyricTrack {
    type Target = [LyricLine];

    fn deref(&self) -> &Self::Target {
        &self.lines
    }
}

/// Index of the line that is "currently playing". `None` means the position
/// is before the first line or the track has no lines.
pub type ActiveLineIndex = Option<usize>;
