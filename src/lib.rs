//! VibeCheck client core: time-synced lyrics over a playback clock, and
//! race-free loading of search results and song details.

pub mod api;
pub mod config;
pub mod detail;
pub mod event;
pub mod lyrics;
pub mod playback;
pub mod search;
pub mod sequencer;
pub mod state;
pub mod text_utils;
pub mod timer;
pub mod ui;
