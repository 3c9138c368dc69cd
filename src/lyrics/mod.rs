// lyrics/mod.rs - timed lyric parsing and active-line resolution
pub mod parse;
pub mod sync;
pub mod types;

pub use parse::{parse_lrc, parse_optional_lrc};
pub use sync::{LyricSync, resolve_active_line};
pub use types::{ActiveLineIndex, LyricLine, LyricTrack};
