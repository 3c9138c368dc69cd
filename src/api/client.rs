use crate::api::types::{LrcPayload, RecommendResponse, SearchResponse, SongBase, SongDetail};
use crate::api::{ApiError, ApiResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;

/// The backend operations the core depends on.
///
/// Implemented over HTTP by [`ApiClient`]; tests use in-memory fakes.
pub trait Catalog: Clone + Send + Sync + 'static {
    fn song_detail(&self, id: &str) -> impl Future<Output = ApiResult<SongDetail>> + Send;
    fn song_lrc(&self, id: &str) -> impl Future<Output = ApiResult<LrcPayload>> + Send;
    fn recommendations(
        &self,
        id: &str,
        top_k: usize,
    ) -> impl Future<Output = ApiResult<RecommendResponse>> + Send;
    fn search(
        &self,
        query: &str,
        top_k: usize,
    ) -> impl Future<Output = ApiResult<SearchResponse>> + Send;
    fn random_songs(&self, count: usize) -> impl Future<Output = ApiResult<Vec<SongBase>>> + Send;
}

/// HTTP client for the VibeCheck API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    const USER_AGENT: &'static str = concat!("vibecheck/", env!("CARGO_PKG_VERSION"));

    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::InvalidBaseUrl(base_url));
        }
        let http = Client::builder()
            .user_agent(Self::USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> String {
        let mut url = format!("{}{}", self.base_url, path);
        if !params.is_empty() {
            let query = params
                .iter()
                .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> ApiResult<T> {
        tracing::debug!(url = %url, "GET");
        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url,
            });
        }
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

impl Catalog for ApiClient {
    async fn song_detail(&self, id: &str) -> ApiResult<SongDetail> {
        self.get_json(self.url(&format!("/songs/{}", segment(id)), &[]))
            .await
    }

    async fn song_lrc(&self, id: &str) -> ApiResult<LrcPayload> {
        self.get_json(self.url(&format!("/songs/{}/lrc", segment(id)), &[]))
            .await
    }

    async fn recommendations(&self, id: &str, top_k: usize) -> ApiResult<RecommendResponse> {
        self.get_json(self.url(
            &format!("/recommend/{}", segment(id)),
            &[("top_k", top_k.to_string())],
        ))
        .await
    }

    async fn search(&self, query: &str, top_k: usize) -> ApiResult<SearchResponse> {
        self.get_json(self.url(
            "/search",
            &[("q", query.to_string()), ("top_k", top_k.to_string())],
        ))
        .await
    }

    async fn random_songs(&self, count: usize) -> ApiResult<Vec<SongBase>> {
        self.get_json(self.url("/songs/random/list", &[("count", count.to_string())]))
            .await
    }
}
