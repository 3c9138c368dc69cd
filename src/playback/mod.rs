//! Playback module: media primitive abstraction and the clock that tracks it.

pub mod clock;
pub mod media;
pub mod simulated;

pub use clock::{PlaybackClock, PlaybackPhase, PlaybackSession};
pub use media::{
    MediaEvent, MediaEventHooks, MediaPrimitive, MediaSignal, PlaybackError, SessionId,
    SignalSender, SourceLocator,
};
pub use simulated::SimulatedMedia;

#[cfg(test)]
pub(crate) mod testing {
    use super::media::{MediaPrimitive, PlaybackError, SessionId, SignalSender, SourceLocator};

    #[derive(Debug, Clone, PartialEq)]
    pub enum MediaCall {
        Attach(SessionId, String),
        Detach,
        Play,
        Pause,
        Seek(f64),
        SetVolume(f64),
        SetMuted(bool),
    }

    /// Records every request and never emits signals on its own.
    #[derive(Debug, Default)]
    pub struct FakeMedia {
        pub calls: Vec<MediaCall>,
        pub reject_play: bool,
        pub reject_seek: bool,
    }

    impl FakeMedia {
        pub fn count(&self, call: &MediaCall) -> usize {
            self.calls.iter().filter(|c| *c == call).count()
        }
    }

    impl MediaPrimitive for FakeMedia {
        fn attach(&mut self, session: SessionId, source: &SourceLocator, _signals: SignalSender) {
            self.calls
                .push(MediaCall::Attach(session, source.as_str().to_string()));
        }

        fn detach(&mut self) {
            self.calls.push(MediaCall::Detach);
        }

        fn play(&mut self) -> Result<(), PlaybackError> {
            self.calls.push(MediaCall::Play);
            if self.reject_play {
                Err(PlaybackError::Rejected("restricted".to_string()))
            } else {
                Ok(())
            }
        }

        fn pause(&mut self) {
            self.calls.push(MediaCall::Pause);
        }

        fn seek(&mut self, position: f64) -> Result<(), PlaybackError> {
            self.calls.push(MediaCall::Seek(position));
            if self.reject_seek {
                Err(PlaybackError::Unavailable)
            } else {
                Ok(())
            }
        }

        fn set_volume(&mut self, volume: f64) {
            self.calls.push(MediaCall::SetVolume(volume));
        }

        fn set_muted(&mut self, muted: bool) {
            self.calls.push(MediaCall::SetMuted(muted));
        }
    }
}
