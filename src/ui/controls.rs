//! Line-based transport controls read from stdin.

use crate::event::{Command, Event};
use std::io::BufRead;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Command(Command),
    Quit,
}

pub const HELP: &str =
    "p: play/pause  r: restart  s <secs>: seek  l <n>: jump to line  m: mute  v <0-1>: volume  q: quit";

/// Parse one input line. Unknown or malformed input yields `None`.
pub fn parse_input(line: &str) -> Option<Input> {
    let mut parts = line.split_whitespace();
    let key = parts.next()?;
    let arg = parts.next();
    let cmd = match (key, arg) {
        ("p", None) => Command::TogglePlay,
        ("r", None) => Command::Restart,
        ("m", None) => Command::ToggleMute,
        ("s", Some(a)) => Command::Seek(a.parse().ok()?),
        ("l", Some(a)) => Command::SeekToLine(a.parse().ok()?),
        ("v", Some(a)) => Command::SetVolume(a.parse().ok()?),
        ("q", None) => return Some(Input::Quit),
        _ => return None,
    };
    Some(Input::Command(cmd))
}

/// Forward stdin commands to the event loop until `q` or end of input.
///
/// Runs on its own thread; a blocking stdin read must not hold up runtime
/// shutdown.
pub fn spawn_controls(events: mpsc::UnboundedSender<Event>) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || read_controls(std::io::stdin().lock(), &events))
}

fn read_controls(input: impl BufRead, events: &mpsc::UnboundedSender<Event>) {
    for line in input.lines() {
        let Ok(line) = line else { break };
        match parse_input(&line) {
            Some(Input::Command(cmd)) => {
                if events.send(Event::Command(cmd)).is_err() {
                    break;
                }
            }
            Some(Input::Quit) => break,
            None => eprintln!("{}", HELP),
        }
    }
    let _ = events.send(Event::Shutdown);
}
