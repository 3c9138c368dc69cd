//! Stale-response guard for overlapping async loads.
//!
//! Every new intent takes a ticket from a [`RequestCounter`]. When its work
//! completes, the result is applied only if no newer ticket has been issued
//! since. Nothing is cancelled; superseded results are dropped on arrival.
//!
//! Each concern (search, detail) owns its own counter, so tickets from one
//! never supersede the other.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceId(pub u64);

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues strictly increasing sequence ids and remembers the latest one.
///
/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct RequestCounter {
    latest: Arc<AtomicU64>,
}

impl RequestCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new intent. Every earlier ticket becomes stale.
    pub fn issue(&self) -> SequenceId {
        SequenceId(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn latest(&self) -> SequenceId {
        SequenceId(self.latest.load(Ordering::SeqCst))
    }

    pub fn is_current(&self, id: SequenceId) -> bool {
        self.latest() == id
    }
}

/// A finished async call tagged with the intent that started it.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequenced<T> {
    pub sequence: SequenceId,
    pub value: T,
}

/// Outcome of consuming a [`Sequenced`] result.
#[derive(Debug, Clone, PartialEq)]
pub enum Guarded<T> {
    Current(T),
    Stale(SequenceId),
}

impl<T> Guarded<T> {
    pub fn is_stale(&self) -> bool {
        matches!(self, Guarded::Stale(_))
    }
}

impl<T> Sequenced<T> {
    /// Keep the value only if its intent is still the latest one.
    pub fn accept(self, counter: &RequestCounter) -> Guarded<T> {
        if counter.is_current(self.sequence) {
            Guarded::Current(self.value)
        } else {
            tracing::debug!(
                sequence = %self.sequence,
                latest = %counter.latest(),
                "Discarding stale result"
            );
            Guarded::Stale(self.sequence)
        }
    }
}

/// Run `op` on behalf of ticket `sequence` and tag its output.
///
/// The check against the counter happens in [`Sequenced::accept`], at the
/// point where the result is about to touch state.
pub async fn tag<F, T>(sequence: SequenceId, op: F) -> Sequenced<T>
where
    F: Future<Output = T>,
{
    Sequenced {
        sequence,
        value: op.await,
    }
}

/// Issue a fresh ticket, run `op`, and return its result only if no newer
/// intent was issued while it ran.
pub async fn guard<F, T>(counter: &RequestCounter, op: F) -> Guarded<T>
where
    F: Future<Output = T>,
{
    let sequence = counter.issue();
    tag(sequence, op).await.accept(counter)
}
