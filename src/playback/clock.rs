use crate::playback::media::{
    MediaEventHooks, MediaPrimitive, MediaSignal, SessionId, SignalSender, SourceLocator,
};
use crate::timer::sanitize_position;

/// Where a session is in its lifecycle. `Errored` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackPhase {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
    Ended,
    Errored,
}

/// Snapshot of the current session for rendering transport controls.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    pub id: SessionId,
    pub track_id: String,
    pub position: f64,
    /// `None` until the primitive reports it.
    pub duration: Option<f64>,
    pub phase: PlaybackPhase,
    pub volume: f64,
    pub muted: bool,
    pub errored: bool,
    pub failure: Option<String>,
}

#[derive(Debug, Clone)]
struct Session {
    id: SessionId,
    track_id: String,
    position: f64,
    duration: Option<f64>,
    phase: PlaybackPhase,
    failure: Option<String>,
    /// Seeks the primitive has accepted in this session.
    seek_epoch: u64,
}

impl Session {
    fn new(id: SessionId, track_id: &str) -> Self {
        Self {
            id,
            track_id: track_id.to_string(),
            position: 0.0,
            duration: None,
            phase: PlaybackPhase::Loading,
            failure: None,
            seek_epoch: 0,
        }
    }

    fn errored(&self) -> bool {
        self.phase == PlaybackPhase::Errored
    }
}

/// Volume settings outlive sessions and are re-applied on every track switch.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AudioSettings {
    volume: f64,
    muted: bool,
}

/// Wraps a media primitive and tracks one playback session at a time.
///
/// Phase changes come only from primitive events. `play`/`pause` are
/// requests that the primitive may ignore or reject.
pub struct PlaybackClock<M: MediaPrimitive> {
    media: M,
    api_base: String,
    signals: SignalSender,
    session: Option<Session>,
    audio: AudioSettings,
    next_session: u64,
}

impl<M: MediaPrimitive> PlaybackClock<M> {
    pub fn new(media: M, api_base: impl Into<String>, signals: SignalSender, volume: f64) -> Self {
        let volume = clamp_volume(volume);
        Self {
            media,
            api_base: api_base.into(),
            signals,
            session: None,
            audio: AudioSettings {
                volume,
                muted: volume == 0.0,
            },
            next_session: 1,
        }
    }

    /// Bind the clock to `track_id`. A different track discards the old
    /// session entirely; the same track keeps it.
    pub fn select_track(&mut self, track_id: &str) -> SessionId {
        if let Some(current) = &self.session
            && current.track_id == track_id
        {
            return current.id;
        }

        // Old subscriptions go before the new ones are installed.
        self.media.detach();

        let id = SessionId(self.next_session);
        self.next_session += 1;
        self.session = Some(Session::new(id, track_id));

        let source = SourceLocator::for_track(&self.api_base, track_id);
        tracing::info!(session = %id, track_id = %track_id, source = source.as_str(), "Playback session started");
        self.media.attach(id, &source, self.signals.clone());
        self.media.set_volume(self.audio.volume);
        self.media.set_muted(self.audio.muted);
        id
    }

    /// Tear down the session, e.g. when the detail view goes away.
    pub fn close(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::info!(session = %session.id, "Playback session closed");
            self.media.detach();
        }
    }

    /// Apply a primitive signal. Signals from any other session are dropped.
    pub fn handle(&mut self, signal: MediaSignal) -> bool {
        match &self.session {
            Some(session) if session.id == signal.session => {
                self.dispatch(signal.event);
                true
            }
            _ => {
                tracing::debug!(session = %signal.session, event = ?signal.event, "Dropping signal from superseded session");
                false
            }
        }
    }

    pub fn play(&mut self) {
        if !self.controls_enabled() {
            return;
        }
        // A rejected play looks exactly like a pending one to the caller;
        // only a later Failed event changes state.
        if let Err(e) = self.media.play() {
            tracing::debug!(error = %e, "Play request rejected by media");
        }
    }

    pub fn pause(&mut self) {
        if self.controls_enabled() {
            self.media.pause();
        }
    }

    pub fn toggle_play(&mut self) {
        if self.phase() == PlaybackPhase::Playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Move to `position`, clamped into `[0, duration]` when the duration is
    /// known. Works in every phase, including `Errored`.
    pub fn seek(&mut self, position: f64) -> Option<f64> {
        let session = self.session.as_mut()?;
        let mut target = sanitize_position(position);
        if let Some(duration) = session.duration {
            target = target.min(duration);
        }
        session.position = target;
        match self.media.seek(target) {
            Ok(()) => session.seek_epoch += 1,
            Err(e) => tracing::debug!(error = %e, position = target, "Seek rejected by media"),
        }
        Some(target)
    }

    /// Seek to zero without touching the phase.
    pub fn restart(&mut self) -> Option<f64> {
        self.seek(0.0)
    }

    pub fn set_volume(&mut self, volume: f64) {
        let volume = clamp_volume(volume);
        self.audio.volume = volume;
        self.audio.muted = volume == 0.0;
        self.media.set_volume(volume);
        self.media.set_muted(self.audio.muted);
    }

    /// Flip mute without touching the stored volume.
    pub fn toggle_mute(&mut self) {
        self.audio.muted = !self.audio.muted;
        self.media.set_muted(self.audio.muted);
    }

    pub fn controls_enabled(&self) -> bool {
        self.session.as_ref().is_some_and(|s| !s.errored())
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.session
            .as_ref()
            .map(|s| s.phase)
            .unwrap_or(PlaybackPhase::Idle)
    }

    pub fn position(&self) -> f64 {
        self.session.as_ref().map(|s| s.position).unwrap_or(0.0)
    }

    pub fn duration(&self) -> Option<f64> {
        self.session.as_ref().and_then(|s| s.duration)
    }

    pub fn volume(&self) -> f64 {
        self.audio.volume
    }

    pub fn muted(&self) -> bool {
        self.audio.muted
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    pub fn track_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.track_id.as_str())
    }

    pub fn snapshot(&self) -> Option<PlaybackSession> {
        self.session.as_ref().map(|s| PlaybackSession {
            id: s.id,
            track_id: s.track_id.clone(),
            position: s.position,
            duration: s.duration,
            phase: s.phase,
            volume: self.audio.volume,
            muted: self.audio.muted,
            errored: s.errored(),
            failure: s.failure.clone(),
        })
    }

    #[cfg(test)]
    pub(crate) fn media(&self) -> &M {
        &self.media
    }

    fn live_session(&mut self) -> Option<&mut Session> {
        self.session.as_mut().filter(|s| !s.errored())
    }
}

impl<M: MediaPrimitive> MediaEventHooks for PlaybackClock<M> {
    fn on_ready(&mut self, duration: Option<f64>) {
        if let Some(session) = self.session.as_mut() {
            session.duration = duration.filter(|d| d.is_finite() && *d >= 0.0);
            if session.phase == PlaybackPhase::Loading {
                session.phase = PlaybackPhase::Paused;
            }
        }
    }

    fn on_start(&mut self) {
        if let Some(session) = self.live_session() {
            session.phase = PlaybackPhase::Playing;
        }
    }

    fn on_suspend(&mut self) {
        if let Some(session) = self.live_session() {
            session.phase = PlaybackPhase::Paused;
        }
    }

    fn on_finish(&mut self) {
        if let Some(session) = self.live_session() {
            session.phase = PlaybackPhase::Ended;
            session.position = 0.0;
        }
    }

    fn on_fail(&mut self, reason: String) {
        if let Some(session) = self.live_session() {
            tracing::warn!(session = %session.id, track_id = %session.track_id, reason = %reason, "Playback failed");
            session.phase = PlaybackPhase::Errored;
            session.failure = Some(reason);
        }
    }

    fn on_time_update(&mut self, position: f64, seek_epoch: u64) {
        if let Some(session) = self.session.as_mut() {
            // Sampled before the latest seek reached the primitive.
            if seek_epoch < session.seek_epoch {
                tracing::debug!(session = %session.id, position, "Dropping position from before seek");
                return;
            }
            session.position = sanitize_position(position);
        }
    }
}

fn clamp_volume(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}
