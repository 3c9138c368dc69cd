pub mod controls;
pub mod pipe;
pub mod util;

// Re-export the helpers the binary uses directly.
pub use pipe::{LyricPipe, display_lyrics_pipe};
pub use util::{intent_label, result_row, transport_line};
