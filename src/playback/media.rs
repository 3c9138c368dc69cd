//! Abstraction over the platform media element.
//!
//! A primitive is bound to one session at a time. It reports what happened
//! through [`MediaSignal`]s tagged with the session that produced them, and
//! the clock ignores anything not tagged with its current session.

use std::fmt;
use tokio::sync::mpsc;

/// Identifies one playback session. Strictly increasing per clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// Where the primitive fetches audio for a track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocator(String);

impl SourceLocator {
    /// The backend proxies audio at `{base}/songs/{id}/audio`.
    pub fn for_track(api_base: &str, track_id: &str) -> Self {
        Self(format!(
            "{}/songs/{}/audio",
            api_base.trim_end_matches('/'),
            urlencoding::encode(track_id)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Events a primitive can emit.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Metadata loaded; duration in seconds if the primitive knows it.
    Ready { duration: Option<f64> },
    Started,
    Suspended,
    Finished,
    Failed(String),
    /// Periodic position report. `seek_epoch` is the number of seeks the
    /// primitive had applied in this session when it sampled `position`.
    TimeUpdate { position: f64, seek_epoch: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaSignal {
    pub session: SessionId,
    pub event: MediaEvent,
}

pub type SignalSender = mpsc::UnboundedSender<MediaSignal>;

/// Errors a primitive may report synchronously for a request.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    #[error("playback rejected: {0}")]
    Rejected(String),
    #[error("no source attached")]
    Unavailable,
}

/// The platform media element, seen from the clock.
///
/// `play`/`seek` may fail synchronously; the clock treats such failures as
/// no-ops and relies on a later `Failed` event for anything user visible.
pub trait MediaPrimitive: Send {
    /// Bind to `source` and start emitting signals tagged with `session`.
    fn attach(&mut self, session: SessionId, source: &SourceLocator, signals: SignalSender);
    /// Release every subscription installed by the last `attach`.
    fn detach(&mut self);
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    /// Every successful seek starts a new seek epoch for later time updates.
    fn seek(&mut self, position: f64) -> Result<(), PlaybackError>;
    fn set_volume(&mut self, volume: f64);
    fn set_muted(&mut self, muted: bool);
}

/// Hooks the clock exposes to whatever adapts a primitive's native events.
pub trait MediaEventHooks {
    fn on_ready(&mut self, duration: Option<f64>);
    fn on_start(&mut self);
    fn on_suspend(&mut self);
    fn on_finish(&mut self);
    fn on_fail(&mut self, reason: String);
    fn on_time_update(&mut self, position: f64, seek_epoch: u64);

    /// Route one event to the matching hook.
    fn dispatch(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::Ready { duration } => self.on_ready(duration),
            MediaEvent::Started => self.on_start(),
            MediaEvent::Suspended => self.on_suspend(),
            MediaEvent::Finished => self.on_finish(),
            MediaEvent::Failed(reason) => self.on_fail(reason),
            MediaEvent::TimeUpdate {
                position,
                seek_epoch,
            } => self.on_time_update(position, seek_epoch),
        }
    }
}
