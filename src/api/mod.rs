// api/mod.rs - catalog backend client and wire types
pub mod client;
pub mod types;

use thiserror::Error;

pub use client::{ApiClient, Catalog};
pub use types::{LrcPayload, RecommendResponse, SearchResponse, SongBase, SongDetail, SongSearchResult};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("API error: HTTP {status} from {url}")]
    Status { status: u16, url: String },
    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid API base URL: {0:?}")]
    InvalidBaseUrl(String),
}

pub type ApiResult<T> = Result<T, ApiError>;
