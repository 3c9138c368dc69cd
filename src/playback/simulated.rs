//! Headless media primitive.
//!
//! Nothing is decoded; a [`PlaybackTimer`] stands in for the audio clock and
//! a background task reports its position at a fixed interval. The binary
//! uses this to follow lyrics without an audio device.

use crate::playback::media::{
    MediaEvent, MediaPrimitive, MediaSignal, PlaybackError, SessionId, SignalSender, SourceLocator,
};
use crate::timer::PlaybackTimer;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
struct Binding {
    session: SessionId,
    signals: SignalSender,
}

impl Binding {
    fn emit(&self, event: MediaEvent) {
        let _ = self.signals.send(MediaSignal {
            session: self.session,
            event,
        });
    }
}

/// Timer plus the count of seeks applied since attach, shared with the ticker.
#[derive(Debug, Default)]
struct Transport {
    timer: PlaybackTimer,
    seeks: u64,
}

pub struct SimulatedMedia {
    tick: Duration,
    duration: Option<f64>,
    restricted: bool,
    transport: Arc<Mutex<Transport>>,
    binding: Option<Binding>,
    ticker: Option<JoinHandle<()>>,
    volume: f64,
    muted: bool,
}

impl SimulatedMedia {
    pub fn new(tick: Duration, duration: Option<f64>) -> Self {
        Self {
            tick,
            duration,
            restricted: false,
            transport: Arc::new(Mutex::new(Transport::default())),
            binding: None,
            ticker: None,
            volume: 1.0,
            muted: false,
        }
    }

    /// Reject every play request, like access-restricted content does.
    pub fn restricted(mut self) -> Self {
        self.restricted = true;
        self
    }

    fn gain(&self) -> f64 {
        if self.muted { 0.0 } else { self.volume }
    }

    fn with_transport<R>(&self, f: impl FnOnce(&mut Transport) -> R) -> R {
        let mut guard = self.transport.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }

    fn spawn_ticker(&self, binding: Binding) -> JoinHandle<()> {
        let transport = self.transport.clone();
        let tick = self.tick;
        let duration = self.duration;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            loop {
                interval.tick().await;
                let (position, running, seek_epoch) = {
                    let guard = transport.lock().unwrap_or_else(|e| e.into_inner());
                    (guard.timer.estimate(), guard.timer.is_running(), guard.seeks)
                };
                if !running {
                    continue;
                }
                if let Some(total) = duration
                    && position >= total
                {
                    transport
                        .lock()
                        .unwrap_or_else(|e| e.into_inner())
                        .timer
                        .reset(0.0);
                    binding.emit(MediaEvent::Finished);
                    continue;
                }
                binding.emit(MediaEvent::TimeUpdate {
                    position,
                    seek_epoch,
                });
            }
        })
    }
}

impl MediaPrimitive for SimulatedMedia {
    fn attach(&mut self, session: SessionId, source: &SourceLocator, signals: SignalSender) {
        tracing::debug!(session = %session, source = source.as_str(), "Simulated media attached");
        self.with_transport(|t| *t = Transport::default());
        let binding = Binding { session, signals };
        self.ticker = Some(self.spawn_ticker(binding.clone()));
        binding.emit(MediaEvent::Ready {
            duration: self.duration,
        });
        self.binding = Some(binding);
    }

    fn detach(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        self.binding = None;
        self.with_transport(|t| *t = Transport::default());
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        let binding = self.binding.clone().ok_or(PlaybackError::Unavailable)?;
        if self.restricted {
            binding.emit(MediaEvent::Failed("source is not playable".to_string()));
            return Err(PlaybackError::Rejected("source is not playable".to_string()));
        }
        self.with_transport(|t| t.timer.resume());
        binding.emit(MediaEvent::Started);
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(binding) = self.binding.clone() {
            self.with_transport(|t| t.timer.pause());
            binding.emit(MediaEvent::Suspended);
        }
    }

    fn seek(&mut self, position: f64) -> Result<(), PlaybackError> {
        if self.binding.is_none() {
            return Err(PlaybackError::Unavailable);
        }
        self.with_transport(|t| {
            t.timer.set_position(position);
            t.seeks += 1;
        });
        Ok(())
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
        tracing::debug!(gain = self.gain(), "Simulated output gain");
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        tracing::debug!(gain = self.gain(), "Simulated output gain");
    }
}

impl Drop for SimulatedMedia {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn locator() -> SourceLocator {
        SourceLocator::for_track("/api", "1")
    }

    #[tokio::test]
    async fn attach_emits_ready_for_its_session() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut media = SimulatedMedia::new(Duration::from_millis(5), Some(30.0));
        media.attach(SessionId(3), &locator(), tx);
        let sig = rx.recv().await.unwrap();
        assert_eq!(sig.session, SessionId(3));
        assert_eq!(sig.event, MediaEvent::Ready { duration: Some(30.0) });
    }

    #[tokio::test]
    async fn restricted_play_rejects_and_emits_failure() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut media = SimulatedMedia::new(Duration::from_millis(5), None).restricted();
        media.attach(SessionId(1), &locator(), tx);
        let _ready = rx.recv().await.unwrap();
        assert!(matches!(media.play(), Err(PlaybackError::Rejected(_))));
        let sig = rx.recv().await.unwrap();
        assert!(matches!(sig.event, MediaEvent::Failed(_)));
    }

    #[tokio::test]
    async fn playing_reports_position_updates() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut media = SimulatedMedia::new(Duration::from_millis(5), None);
        media.attach(SessionId(1), &locator(), tx);
        media.play().unwrap();
        let mut saw_started = false;
        let mut saw_position = false;
        while !(saw_started && saw_position) {
            match rx.recv().await.unwrap().event {
                MediaEvent::Started => saw_started = true,
                MediaEvent::TimeUpdate { .. } => saw_position = true,
                _ => {}
            }
        }
    }

    #[tokio::test]
    async fn ticks_after_seek_carry_the_new_epoch() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut media = SimulatedMedia::new(Duration::from_millis(5), None);
        media.attach(SessionId(1), &locator(), tx);
        media.play().unwrap();
        media.seek(40.0).unwrap();
        loop {
            if let MediaEvent::TimeUpdate {
                position,
                seek_epoch,
            } = rx.recv().await.unwrap().event
            {
                assert_eq!(seek_epoch, 1);
                assert!(position >= 40.0);
                break;
            }
        }
    }

    #[tokio::test]
    async fn detach_requires_reattach() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut media = SimulatedMedia::new(Duration::from_millis(5), None);
        media.attach(SessionId(1), &locator(), tx);
        media.detach();
        assert_eq!(media.play(), Err(PlaybackError::Unavailable));
        assert_eq!(media.seek(1.0), Err(PlaybackError::Unavailable));
    }

    #[test]
    fn mute_zeroes_gain_but_keeps_volume() {
        let mut media = SimulatedMedia::new(Duration::from_millis(5), None);
        media.set_volume(0.6);
        media.set_muted(true);
        assert_eq!(media.gain(), 0.0);
        media.set_muted(false);
        assert_eq!(media.gain(), 0.6);
    }
}
