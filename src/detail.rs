//! Detail view loading: metadata, timed lyrics and recommendations fetched
//! concurrently under one shared ticket.
//!
//! Each fetch lands in its own slice as soon as it finishes, whatever the
//! other two are doing. Switching targets mid-flight discards all three
//! results of the old target together.

use crate::api::{ApiResult, Catalog, LrcPayload, RecommendResponse, SongDetail, SongSearchResult};
use crate::lyrics::{LyricTrack, parse_optional_lrc};
use crate::sequencer::{Guarded, RequestCounter, SequenceId, Sequenced, tag};
use futures_util::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;

/// One independently loaded part of the view.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Slice<T> {
    #[default]
    Pending,
    Loaded(T),
    Failed(String),
}

impl<T> Slice<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Slice::Loaded(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Slice::Failed(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Slice::Pending)
    }

    fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(v) => Slice::Loaded(v),
            Err(e) => Slice::Failed(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailState {
    pub target: Option<String>,
    pub loading: bool,
    pub metadata: Slice<SongDetail>,
    pub lyrics: Slice<Arc<LyricTrack>>,
    pub recommendations: Slice<Vec<SongSearchResult>>,
}

impl DetailState {
    /// The parsed track, or an empty one if lyrics are missing or failed.
    pub fn lyric_track(&self) -> Arc<LyricTrack> {
        self.lyrics.loaded().cloned().unwrap_or_default()
    }

    pub fn recommendations(&self) -> &[SongSearchResult] {
        self.recommendations
            .loaded()
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The song itself could not be fetched.
    pub fn not_found(&self) -> bool {
        self.metadata.is_failed()
    }

    /// Every slice has an outcome.
    pub fn settled(&self) -> bool {
        !self.metadata.is_pending() && !self.lyrics.is_pending() && !self.recommendations.is_pending()
    }

    /// Only set when every slice failed; partial success is not a failure.
    pub fn failed(&self) -> bool {
        self.metadata.is_failed() && self.lyrics.is_failed() && self.recommendations.is_failed()
    }
}

/// The outcome of one of the three fetches.
#[derive(Debug)]
pub enum DetailPart {
    Metadata(ApiResult<SongDetail>),
    Lyrics(ApiResult<LrcPayload>),
    Recommendations(ApiResult<RecommendResponse>),
}

/// One finished fetch, tagged with the ticket shared by its fan-out.
#[derive(Debug)]
pub struct DetailCompletion {
    pub target: String,
    part: Sequenced<DetailPart>,
}

impl DetailCompletion {
    pub fn is_lyrics(&self) -> bool {
        matches!(self.part.value, DetailPart::Lyrics(_))
    }
}

pub type DetailFetch = BoxFuture<'static, DetailCompletion>;

fn fetch<F>(target: &str, sequence: SequenceId, op: F) -> DetailFetch
where
    F: Future<Output = DetailPart> + Send + 'static,
{
    let target = target.to_string();
    async move {
        DetailCompletion {
            part: tag(sequence, op).await,
            target,
        }
    }
    .boxed()
}

pub struct DetailFanoutLoader<C: Catalog> {
    catalog: C,
    counter: RequestCounter,
    recommend_limit: usize,
    state: DetailState,
}

impl<C: Catalog> DetailFanoutLoader<C> {
    pub fn new(catalog: C, recommend_limit: usize) -> Self {
        Self {
            catalog,
            counter: RequestCounter::new(),
            recommend_limit,
            state: DetailState::default(),
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    /// Start loading `target`. State resets immediately.
    ///
    /// Returns the metadata, lyrics and recommendations fetches, in that
    /// order. Each is independent; feed every one back through [`apply`] as
    /// soon as it finishes.
    ///
    /// [`apply`]: DetailFanoutLoader::apply
    pub fn load(&mut self, target: &str) -> [DetailFetch; 3] {
        let sequence = self.counter.issue();
        tracing::debug!(song_id = %target, sequence = %sequence, "Loading detail");
        self.state = DetailState {
            target: Some(target.to_string()),
            loading: true,
            ..DetailState::default()
        };

        let id = target.to_string();
        let limit = self.recommend_limit;
        let (c1, c2, c3) = (self.catalog.clone(), self.catalog.clone(), self.catalog.clone());
        let (id1, id2, id3) = (id.clone(), id.clone(), id);
        [
            fetch(target, sequence, async move {
                DetailPart::Metadata(c1.song_detail(&id1).await)
            }),
            fetch(target, sequence, async move {
                DetailPart::Lyrics(c2.song_lrc(&id2).await)
            }),
            fetch(target, sequence, async move {
                DetailPart::Recommendations(c3.recommendations(&id3, limit).await)
            }),
        ]
    }

    /// Apply one finished fetch to its slice only. Returns `false` when its
    /// fan-out was superseded.
    pub fn apply(&mut self, done: DetailCompletion) -> bool {
        let DetailCompletion { target, part } = done;
        let part = match part.accept(&self.counter) {
            Guarded::Current(p) => p,
            Guarded::Stale(_) => return false,
        };

        let (slice, error) = match part {
            DetailPart::Metadata(r) => {
                self.state.metadata = Slice::from_result(r);
                ("metadata", failure(&self.state.metadata))
            }
            DetailPart::Lyrics(r) => {
                self.state.lyrics = Slice::from_result(
                    r.map(|payload| Arc::new(parse_optional_lrc(payload.lrc.as_deref()))),
                );
                ("lyrics", failure(&self.state.lyrics))
            }
            DetailPart::Recommendations(r) => {
                self.state.recommendations = Slice::from_result(r.map(|resp| resp.recommendations));
                ("recommendations", failure(&self.state.recommendations))
            }
        };
        if let Some(err) = error {
            tracing::warn!(song_id = %target, slice, error = %err, "Detail slice failed");
        }
        self.state.loading = !self.state.settled();
        true
    }
}

fn failure<T>(slice: &Slice<T>) -> Option<String> {
    match slice {
        Slice::Failed(e) => Some(e.clone()),
        _ => None,
    }
}
