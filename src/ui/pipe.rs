use crate::lyrics::ActiveLineIndex;
use crate::playback::PlaybackPhase;
use crate::state::Update;
use crate::ui::util::transport_line;
use std::io::Write;
use tokio::sync::mpsc;

/// What the pipe view wants after an update.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Continue,
    Done,
    Abort(String),
}

/// Prints each newly active lyric line once, in order.
///
/// With the transport line on, a status line is also printed whenever the
/// phase or mute state changes.
#[derive(Debug, Default)]
pub struct LyricPipe {
    last_track: Option<String>,
    last_index: ActiveLineIndex,
    stop_at_last_line: bool,
    show_transport: bool,
    last_transport: Option<(PlaybackPhase, bool)>,
}

impl LyricPipe {
    pub fn new(stop_at_last_line: bool) -> Self {
        Self {
            stop_at_last_line,
            ..Self::default()
        }
    }

    pub fn with_transport(mut self) -> Self {
        self.show_transport = true;
        self
    }

    pub fn feed(&mut self, upd: &Update, out: &mut impl Write) -> std::io::Result<Step> {
        match upd {
            Update::ActiveLine {
                track_id,
                lines,
                index,
            } => {
                if self.last_track.as_deref() != Some(track_id.as_str()) {
                    self.last_track = Some(track_id.clone());
                    self.last_index = None;
                }
                if *index == self.last_index {
                    return Ok(Step::Continue);
                }
                self.last_index = *index;
                if let Some(i) = *index
                    && let Some(line) = lines.get(i)
                {
                    writeln!(out, "{}", line.text)?;
                    if self.stop_at_last_line && i + 1 == lines.len() {
                        return Ok(Step::Done);
                    }
                }
                Ok(Step::Continue)
            }
            Update::Playback(session) => match session.phase {
                PlaybackPhase::Ended => Ok(Step::Done),
                PlaybackPhase::Errored => Ok(Step::Abort(format!(
                    "Playback failed: {}",
                    session.failure.as_deref().unwrap_or("unknown error")
                ))),
                _ => {
                    let key = Some((session.phase, session.muted));
                    if self.show_transport && key != self.last_transport {
                        self.last_transport = key;
                        writeln!(out, "{}", transport_line(session))?;
                    }
                    Ok(Step::Continue)
                }
            },
            Update::Detail(detail) => {
                if detail.not_found() {
                    Ok(Step::Abort("Song not found".to_string()))
                } else if !detail.lyrics.is_pending() && detail.lyric_track().is_empty() {
                    Ok(Step::Abort("No timed lyrics for this song".to_string()))
                } else {
                    Ok(Step::Continue)
                }
            }
            _ => Ok(Step::Continue),
        }
    }
}

/// Display lyrics in pipe mode (stdout only, for scripting)
pub async fn display_lyrics_pipe(
    mut rx: mpsc::Receiver<Update>,
    mut pipe: LyricPipe,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    while let Some(upd) = rx.recv().await {
        let step = {
            let mut stdout = std::io::stdout().lock();
            let step = pipe.feed(&upd, &mut stdout)?;
            stdout.flush()?;
            step
        };
        match step {
            Step::Continue => {}
            Step::Done => break,
            Step::Abort(msg) => return Err(msg.into()),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detail::{DetailState, Slice};
    use crate::lyrics::{LyricTrack, parse_lrc};
    use crate::playback::{PlaybackSession, SessionId};
    use std::sync::Arc;

    fn lines() -> Arc<LyricTrack> {
        Arc::new(parse_lrc("[00:01.00]一\n[00:02.00]二\n[00:03.00]三"))
    }

    fn line(track: &str, index: ActiveLineIndex) -> Update {
        Update::ActiveLine {
            track_id: track.to_string(),
            lines: lines(),
            index,
        }
    }

    fn session(phase: PlaybackPhase) -> Update {
        playback(phase, false)
    }

    fn playback(phase: PlaybackPhase, muted: bool) -> Update {
        Update::Playback(PlaybackSession {
            id: SessionId(1),
            track_id: "a".into(),
            position: 0.0,
            duration: None,
            phase,
            volume: 1.0,
            muted,
            errored: phase == PlaybackPhase::Errored,
            failure: Some("restricted".into()),
        })
    }

    fn run(pipe: &mut LyricPipe, updates: &[Update]) -> (String, Step) {
        let mut out = Vec::new();
        let mut step = Step::Continue;
        for u in updates {
            step = pipe.feed(u, &mut out).unwrap();
            if step != Step::Continue {
                break;
            }
        }
        (String::from_utf8(out).unwrap(), step)
    }

    #[test]
    fn prints_each_line_once() {
        let mut pipe = LyricPipe::new(false);
        let (out, step) = run(
            &mut pipe,
            &[
                line("a", None),
                line("a", Some(0)),
                line("a", Some(0)),
                line("a", Some(1)),
            ],
        );
        assert_eq!(out, "一\n二\n");
        assert_eq!(step, Step::Continue);
    }

    #[test]
    fn backward_seek_prints_again() {
        let mut pipe = LyricPipe::new(false);
        let (out, _) = run(
            &mut pipe,
            &[line("a", Some(1)), line("a", Some(0)), line("a", Some(1))],
        );
        assert_eq!(out, "二\n一\n二\n");
    }

    #[test]
    fn stops_after_last_line_when_asked() {
        let mut pipe = LyricPipe::new(true);
        let (out, step) = run(&mut pipe, &[line("a", Some(1)), line("a", Some(2))]);
        assert_eq!(out, "二\n三\n");
        assert_eq!(step, Step::Done);
    }

    #[test]
    fn new_track_resets_last_index() {
        let mut pipe = LyricPipe::new(false);
        let (out, _) = run(&mut pipe, &[line("a", Some(0)), line("b", Some(0))]);
        assert_eq!(out, "一\n一\n");
    }

    #[test]
    fn playback_end_and_failure() {
        let mut pipe = LyricPipe::new(false);
        assert_eq!(run(&mut pipe, &[session(PlaybackPhase::Ended)]).1, Step::Done);
        assert_eq!(
            run(&mut pipe, &[session(PlaybackPhase::Errored)]).1,
            Step::Abort("Playback failed: restricted".into())
        );
    }

    #[test]
    fn missing_song_aborts() {
        let mut pipe = LyricPipe::new(false);
        let detail = DetailState {
            target: Some("x".into()),
            loading: false,
            metadata: Slice::Failed("HTTP 404".into()),
            ..DetailState::default()
        };
        assert_eq!(
            run(&mut pipe, &[Update::Detail(detail)]).1,
            Step::Abort("Song not found".into())
        );
    }

    #[test]
    fn empty_lyrics_abort_once_the_lyrics_slice_lands() {
        let mut pipe = LyricPipe::new(false);
        let pending = DetailState {
            target: Some("x".into()),
            loading: true,
            metadata: Slice::Loaded(Default::default()),
            ..DetailState::default()
        };
        assert_eq!(run(&mut pipe, &[Update::Detail(pending.clone())]).1, Step::Continue);

        let empty = DetailState {
            lyrics: Slice::Loaded(Arc::new(LyricTrack::default())),
            ..pending
        };
        assert_eq!(
            run(&mut pipe, &[Update::Detail(empty)]).1,
            Step::Abort("No timed lyrics for this song".into())
        );
    }

    #[test]
    fn transport_prints_on_phase_and_mute_changes() {
        let mut pipe = LyricPipe::new(false).with_transport();
        let (out, step) = run(
            &mut pipe,
            &[
                playback(PlaybackPhase::Playing, false),
                playback(PlaybackPhase::Playing, false),
                playback(PlaybackPhase::Playing, true),
                line("a", Some(0)),
                playback(PlaybackPhase::Paused, true),
            ],
        );
        assert_eq!(
            out,
            "[playing] 0:00 / 0:00 (0%)  vol 100%\n\
             [playing] 0:00 / 0:00 (0%)  muted\n\
             一\n\
             [paused] 0:00 / 0:00 (0%)  muted\n"
        );
        assert_eq!(step, Step::Continue);
    }

    #[test]
    fn transport_is_off_by_default() {
        let mut pipe = LyricPipe::new(false);
        let (out, _) = run(&mut pipe, &[playback(PlaybackPhase::Playing, false)]);
        assert!(out.is_empty());
    }
}
