// config.rs: command line and environment configuration

use clap::{Parser, Subcommand};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000/api";
const API_BASE_ENV: &str = "VIBECHECK_API_BASE";

/// Application configuration from CLI
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Config {
    /// Base URL of the VibeCheck API. Falls back to VIBECHECK_API_BASE.
    #[arg(long)]
    pub api_base: Option<String>,
    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 15)]
    pub timeout_secs: u64,
    /// Maximum number of search results
    #[arg(long, default_value_t = 20)]
    pub search_limit: usize,
    /// Number of related songs loaded with a song's detail
    #[arg(long, default_value_t = 6)]
    pub recommend_limit: usize,
    /// Number of songs listed by `random`
    #[arg(long, default_value_t = 12)]
    pub random_limit: usize,
    /// Initial playback volume in [0, 1]
    #[arg(long, default_value_t = 0.7)]
    pub volume: f64,
    /// Enable debug logging to stderr
    #[arg(long)]
    pub debug_log: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Search the catalog by mood, lyrics or title
    Search { query: String },
    /// Load a song and follow its lyrics in time with playback
    Song {
        id: String,
        /// Track length in seconds for the headless player (default: until the last line)
        #[arg(long)]
        duration: Option<f64>,
        /// Read transport commands from stdin
        #[arg(long)]
        interactive: bool,
        /// Make the headless player refuse playback, as for restricted content
        #[arg(long)]
        restricted: bool,
    },
    /// List random songs
    Random,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }
}

/// Fill `api_base` from the environment when it was not given on the command line.
pub fn api_base_from_env_if_empty(cfg: &mut Config) {
    if cfg.api_base.is_none()
        && let Ok(s) = std::env::var(API_BASE_ENV)
    {
        let s = s.trim();
        if !s.is_empty() {
            cfg.api_base = Some(s.to_string());
        }
    }
}
