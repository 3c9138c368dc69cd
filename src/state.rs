// state.rs: now-playing state (clock + lyric sync) and the updates it emits

use crate::detail::DetailState;
use crate::lyrics::{ActiveLineIndex, LyricSync, LyricTrack};
use crate::playback::{MediaPrimitive, MediaSignal, PlaybackClock, PlaybackSession, SessionId};
use crate::search::SearchState;
use std::sync::Arc;

/// A change the presentation layer should render.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// The highlighted lyric line moved, or the lyric track was replaced.
    ActiveLine {
        track_id: String,
        lines: Arc<LyricTrack>,
        index: ActiveLineIndex,
    },
    Playback(PlaybackSession),
    Detail(DetailState),
    Search(SearchState),
}

/// Bundles the playback clock with lyric sync for the current track, plus
/// versioning so callers can tell when anything visible changed.
pub struct NowPlaying<M: MediaPrimitive> {
    clock: PlaybackClock<M>,
    lyrics: LyricSync,
    /// Bumped on any playback or lyric change.
    pub version: u64,
    /// Bumped only when the active line or the lyric track changes.
    pub line_version: u64,
}

impl<M: MediaPrimitive> NowPlaying<M> {
    pub fn new(clock: PlaybackClock<M>) -> Self {
        Self {
            clock,
            lyrics: LyricSync::default(),
            version: 0,
            line_version: 0,
        }
    }

    pub fn clock(&self) -> &PlaybackClock<M> {
        &self.clock
    }

    pub fn lines(&self) -> &Arc<LyricTrack> {
        self.lyrics.track()
    }

    pub fn active_line(&self) -> ActiveLineIndex {
        self.lyrics.active()
    }

    pub fn track_id(&self) -> Option<&str> {
        self.clock.track_id()
    }

    pub fn snapshot(&self) -> Option<PlaybackSession> {
        self.clock.snapshot()
    }

    /// Switch to `track_id`. Lyrics of a previous track are dropped at once.
    pub fn open(&mut self, track_id: &str) -> SessionId {
        let previous = self.clock.session_id();
        let id = self.clock.select_track(track_id);
        if previous != Some(id) {
            self.lyrics.clear();
            self.bump_lines();
        }
        id
    }

    pub fn close(&mut self) {
        self.clock.close();
        self.lyrics.clear();
        self.bump_lines();
    }

    /// Install the parsed lyrics for `track_id`. Ignored if another track is
    /// open by now.
    pub fn set_lyrics(&mut self, track_id: &str, track: Arc<LyricTrack>) -> bool {
        if self.clock.track_id() != Some(track_id) {
            tracing::debug!(track_id, "Dropping lyrics for a track that is no longer open");
            return false;
        }
        self.lyrics.set_track(track);
        self.bump_lines();
        self.recompute();
        true
    }

    /// Feed a primitive signal through the clock, then resync lyrics.
    pub fn handle_signal(&mut self, signal: MediaSignal) -> bool {
        if !self.clock.handle(signal) {
            return false;
        }
        self.version += 1;
        self.recompute();
        true
    }

    pub fn play(&mut self) {
        self.clock.play();
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn toggle_play(&mut self) {
        self.clock.toggle_play();
    }

    pub fn seek(&mut self, position: f64) -> Option<f64> {
        let landed = self.clock.seek(position)?;
        self.version += 1;
        self.recompute();
        Some(landed)
    }

    pub fn restart(&mut self) -> Option<f64> {
        let landed = self.clock.restart()?;
        self.version += 1;
        self.recompute();
        Some(landed)
    }

    /// Jump to the start of lyric line `index`.
    pub fn seek_to_line(&mut self, index: usize) -> Option<f64> {
        let time = self.lyrics.track().get(index)?.time;
        self.seek(time)
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.clock.set_volume(volume);
        self.version += 1;
    }

    pub fn toggle_mute(&mut self) {
        self.clock.toggle_mute();
        self.version += 1;
    }

    /// The current active-line update, if a track is open.
    pub fn line_update(&self) -> Option<Update> {
        Some(Update::ActiveLine {
            track_id: self.clock.track_id()?.to_string(),
            lines: self.lyrics.track().clone(),
            index: self.lyrics.active(),
        })
    }

    fn recompute(&mut self) -> bool {
        let changed = self.lyrics.update(self.clock.position()).is_some();
        if changed {
            self.bump_lines();
        }
        changed
    }

    fn bump_lines(&mut self) {
        self.version += 1;
        self.line_version += 1;
    }
}
