//! Presentation helpers shared by the stdout views.

use crate::api::SongSearchResult;
use crate::playback::{PlaybackPhase, PlaybackSession};
use crate::text_utils::{format_time, progress_percent, truncate};

/// Display label for a search intent tag. Unknown tags pass through as-is.
pub fn intent_label(intent: &str) -> &str {
    match intent {
        "vibe" => "Vibe match",
        "lyrics" => "Lyrics match",
        "exact" => "Exact match",
        other => other,
    }
}

/// One list row: `id  title - artist  [tags]`.
pub fn result_row(song: &SongSearchResult) -> String {
    let mut row = format!(
        "{:>10}  {} - {}",
        song.id,
        truncate(&song.title, 32),
        truncate(&song.artist, 24)
    );
    if let Some(tags) = song.vibe_tags.as_deref()
        && !tags.is_empty()
    {
        row.push_str(&format!("  [{}]", tags.join(", ")));
    }
    row
}

fn phase_label(phase: PlaybackPhase) -> &'static str {
    match phase {
        PlaybackPhase::Idle => "idle",
        PlaybackPhase::Loading => "loading",
        PlaybackPhase::Playing => "playing",
        PlaybackPhase::Paused => "paused",
        PlaybackPhase::Ended => "ended",
        PlaybackPhase::Errored => "error",
    }
}

/// Transport status: `[playing] 1:05 / 4:00 (27%)`, plus volume state.
pub fn transport_line(session: &PlaybackSession) -> String {
    let mut line = format!(
        "[{}] {} / {} ({:.0}%)",
        phase_label(session.phase),
        format_time(Some(session.position)),
        format_time(session.duration),
        progress_percent(session.position, session.duration)
    );
    if session.muted {
        line.push_str("  muted");
    } else {
        line.push_str(&format!("  vol {:.0}%", session.volume * 100.0));
    }
    line
}
