use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SongBase {
    pub id: String,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub album_cover: Option<String>,
}

/// Full song record including the AI analysis fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SongDetail {
    pub id: String,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub album_cover: Option<String>,
    #[serde(default)]
    pub lyrics: Option<String>,
    #[serde(default)]
    pub core_lyrics: Option<String>,
    #[serde(default)]
    pub review_text: Option<String>,
    #[serde(default)]
    pub vibe_tags: Option<Vec<String>>,
    /// Radar chart axes; values are passed through untouched.
    #[serde(default)]
    pub vibe_scores: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    pub recommend_scene: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SongSearchResult {
    pub id: String,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub album_cover: Option<String>,
    #[serde(default)]
    pub review_text: Option<String>,
    #[serde(default)]
    pub vibe_tags: Option<Vec<String>>,
    #[serde(default)]
    pub core_lyrics: Option<String>,
    #[serde(default)]
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub query: String,
    /// Classification of the query. Opaque to the core.
    #[serde(default)]
    pub intent_type: Option<String>,
    #[serde(default)]
    pub results: Vec<SongSearchResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecommendResponse {
    #[serde(default)]
    pub source_song: Option<SongBase>,
    #[serde(default)]
    pub recommendations: Vec<SongSearchResult>,
}

/// Raw timed lyrics for one song. `lrc` is absent when the song has none.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LrcPayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub lrc: Option<String>,
}
