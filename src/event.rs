use crate::api::Catalog;
use crate::detail::{DetailCompletion, DetailFanoutLoader};
use crate::playback::{MediaPrimitive, MediaSignal};
use crate::search::{SearchCompletion, SearchFlow};
use crate::state::{NowPlaying, Update};
use tokio::sync::mpsc;

/// A user intent coming from the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Show a song: start its playback session and load its detail view.
    Open(String),
    Search(String),
    Play,
    Pause,
    TogglePlay,
    Seek(f64),
    SeekToLine(usize),
    Restart,
    SetVolume(f64),
    ToggleMute,
    Close,
}

#[derive(Debug)]
pub enum Event {
    Media(MediaSignal),
    Detail(DetailCompletion),
    Search(SearchCompletion),
    Command(Command),
    Shutdown,
}

/// Versions last delivered to the presentation layer.
#[derive(Debug, Default)]
struct Sent {
    version: u64,
    line_version: u64,
}

/// Owns all mutable state and applies events one at a time.
///
/// Network work is spawned and re-enters the loop as [`Event::Detail`] or
/// [`Event::Search`], so every mutation happens on this loop.
pub struct EventLoop<C: Catalog, M: MediaPrimitive> {
    now_playing: NowPlaying<M>,
    detail: DetailFanoutLoader<C>,
    search: SearchFlow<C>,
    events: mpsc::UnboundedSender<Event>,
    updates: mpsc::Sender<Update>,
    sent: Sent,
}

impl<C: Catalog, M: MediaPrimitive> EventLoop<C, M> {
    pub fn new(
        now_playing: NowPlaying<M>,
        detail: DetailFanoutLoader<C>,
        search: SearchFlow<C>,
        events: mpsc::UnboundedSender<Event>,
        updates: mpsc::Sender<Update>,
    ) -> Self {
        Self {
            now_playing,
            detail,
            search,
            events,
            updates,
            sent: Sent::default(),
        }
    }

    pub fn now_playing(&self) -> &NowPlaying<M> {
        &self.now_playing
    }

    pub fn detail(&self) -> &DetailFanoutLoader<C> {
        &self.detail
    }

    pub fn search(&self) -> &SearchFlow<C> {
        &self.search
    }

    /// Run until [`Event::Shutdown`] or until nobody listens for updates.
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<Event>,
        mut signals: mpsc::UnboundedReceiver<MediaSignal>,
    ) {
        loop {
            let event = tokio::select! {
                Some(ev) = events.recv() => ev,
                Some(sig) = signals.recv() => Event::Media(sig),
                else => break,
            };
            if !self.process(event).await || self.updates.is_closed() {
                break;
            }
        }
        tracing::debug!("Event loop stopped");
    }

    /// Apply one event. Returns `false` once the loop should stop.
    pub async fn process(&mut self, event: Event) -> bool {
        match event {
            Event::Media(signal) => {
                self.now_playing.handle_signal(signal);
            }
            Event::Detail(done) => self.apply_detail(done).await,
            Event::Search(done) => {
                if self.search.apply(done) {
                    self.emit(Update::Search(self.search.state().clone())).await;
                }
            }
            Event::Command(cmd) => self.command(cmd).await,
            Event::Shutdown => {
                self.send_update(true).await;
                return false;
            }
        }
        self.send_update(false).await;
        true
    }

    async fn command(&mut self, cmd: Command) {
        match cmd {
            Command::Open(id) => {
                self.now_playing.open(&id);
                for fetch in self.detail.load(&id) {
                    let tx = self.events.clone();
                    tokio::spawn(async move {
                        let _ = tx.send(Event::Detail(fetch.await));
                    });
                }
                self.emit(Update::Detail(self.detail.state().clone())).await;
            }
            Command::Search(query) => {
                if let Some(fut) = self.search.submit(&query) {
                    let tx = self.events.clone();
                    tokio::spawn(async move {
                        let _ = tx.send(Event::Search(fut.await));
                    });
                    self.emit(Update::Search(self.search.state().clone())).await;
                }
            }
            Command::Play => self.now_playing.play(),
            Command::Pause => self.now_playing.pause(),
            Command::TogglePlay => self.now_playing.toggle_play(),
            Command::Seek(t) => {
                self.now_playing.seek(t);
            }
            Command::SeekToLine(i) => {
                self.now_playing.seek_to_line(i);
            }
            Command::Restart => {
                self.now_playing.restart();
            }
            Command::SetVolume(v) => self.now_playing.set_volume(v),
            Command::ToggleMute => self.now_playing.toggle_mute(),
            Command::Close => self.now_playing.close(),
        }
    }

    async fn apply_detail(&mut self, done: DetailCompletion) {
        let lyrics = done.is_lyrics();
        if !self.detail.apply(done) {
            return;
        }
        let state = self.detail.state();
        if lyrics && let Some(target) = &state.target {
            self.now_playing.set_lyrics(target, state.lyric_track());
        }
        self.emit(Update::Detail(state.clone())).await;
    }

    async fn emit(&self, update: Update) {
        if self.updates.send(update).await.is_err() {
            tracing::debug!("Update receiver dropped");
        }
    }

    /// Push line and playback snapshots whose version moved since the last
    /// delivery, or unconditionally when `force` is set.
    async fn send_update(&mut self, force: bool) {
        let line_version = self.now_playing.line_version;
        if (force || line_version != self.sent.line_version)
            && let Some(update) = self.now_playing.line_update()
            && self.updates.send(update).await.is_ok()
        {
            self.sent.line_version = line_version;
        }

        let version = self.now_playing.version;
        if (force || version != self.sent.version)
            && let Some(snapshot) = self.now_playing.snapshot()
            && self.updates.send(Update::Playback(snapshot)).await.is_ok()
        {
            self.sent.version = version;
        }
    }
}
