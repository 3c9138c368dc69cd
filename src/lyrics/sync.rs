use crate::lyrics::types::{ActiveLineIndex, LyricTrack};
use std::sync::Arc;

/// Greatest index whose timestamp is `<= position`, or `None` when the
/// position precedes the first line or the track is empty.
///
/// The track is sorted, so this is a binary partition rather than a scan.
/// Ties resolve to the last of the equal timestamps.
pub fn resolve_active_line(track: &LyricTrack, position: f64) -> ActiveLineIndex {
    if position.is_nan() {
        return None;
    }
    let after = track.partition_point(|line| line.time <= position);
    after.checked_sub(1)
}

/// Holds the current track and the last resolved line for it.
#[derive(Debug, Default)]
pub struct LyricSync {
    track: Arc<LyricTrack>,
    active: ActiveLineIndex,
}

impl LyricSync {
    pub fn track(&self) -> &Arc<LyricTrack> {
        &self.track
    }

    pub fn active(&self) -> ActiveLineIndex {
        self.active
    }

    /// Swap in a new track. The active line resets until the next recompute.
    pub fn set_track(&mut self, track: Arc<LyricTrack>) {
        self.track = track;
        self.active = None;
    }

    pub fn clear(&mut self) {
        self.set_track(Arc::new(LyricTrack::empty()));
    }

    /// Recompute for `position`. Returns the new index only when it changed.
    pub fn update(&mut self, position: f64) -> Option<ActiveLineIndex> {
        let next = resolve_active_line(&self.track, position);
        if next != self.active {
            self.active = next;
            Some(next)
        } else {
            None
        }
    }
}
