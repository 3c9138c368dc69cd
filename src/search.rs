// search.rs: free-text search guarded against out-of-order responses

use crate::api::{ApiResult, Catalog, SearchResponse, SongSearchResult};
use crate::sequencer::{Guarded, RequestCounter, Sequenced, tag};
use std::future::Future;

/// What the search view renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<SongSearchResult>,
    pub intent_type: Option<String>,
    pub loading: bool,
    pub has_searched: bool,
    /// User-visible failure message for the latest search only.
    pub notice: Option<String>,
}

#[derive(Debug)]
pub struct SearchCompletion {
    pub query: String,
    response: Sequenced<ApiResult<SearchResponse>>,
}

pub struct SearchFlow<C: Catalog> {
    catalog: C,
    counter: RequestCounter,
    limit: usize,
    state: SearchState,
}

impl<C: Catalog> SearchFlow<C> {
    pub fn new(catalog: C, limit: usize) -> Self {
        Self {
            catalog,
            counter: RequestCounter::new(),
            limit,
            state: SearchState::default(),
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Start a search for `query`. Blank queries issue nothing and return `None`.
    pub fn submit(
        &mut self,
        query: &str,
    ) -> Option<impl Future<Output = SearchCompletion> + Send + use<C>> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let sequence = self.counter.issue();
        tracing::debug!(query, sequence = %sequence, "Searching");
        self.state.query = query.to_string();
        self.state.loading = true;
        self.state.has_searched = true;
        self.state.intent_type = None;
        self.state.notice = None;

        let catalog = self.catalog.clone();
        let query = query.to_string();
        let limit = self.limit;
        Some(async move {
            let response = tag(sequence, catalog.search(&query, limit)).await;
            SearchCompletion { query, response }
        })
    }

    /// Apply a finished search. Returns `false` when a newer one superseded it.
    pub fn apply(&mut self, done: SearchCompletion) -> bool {
        let result = match done.response.accept(&self.counter) {
            Guarded::Current(r) => r,
            Guarded::Stale(_) => return false,
        };

        self.state.loading = false;
        match result {
            Ok(resp) => {
                self.state.results = resp.results;
                self.state.intent_type = resp.intent_type;
            }
            Err(e) => {
                tracing::warn!(query = %done.query, error = %e, "Search failed");
                self.state.results.clear();
                self.state.notice = Some(format!("Search failed: {}", e));
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{FakeCatalog, Op};

    fn catalog() -> FakeCatalog {
        let c = FakeCatalog::default();
        c.add_search("雨天", "vibe", &["1", "2", "3"]);
        c.add_search("晴天", "exact", &["7"]);
        c
    }

    #[tokio::test]
    async fn applies_results_and_intent() {
        let mut flow = SearchFlow::new(catalog(), 20);
        let fut = flow.submit("  雨天 ").unwrap();
        assert!(flow.state().loading);
        assert!(flow.state().has_searched);
        assert_eq!(flow.state().query, "雨天");

        assert!(flow.apply(fut.await));
        let st = flow.state();
        assert!(!st.loading);
        assert_eq!(st.results.len(), 3);
        assert_eq!(st.intent_type.as_deref(), Some("vibe"));
        assert_eq!(st.notice, None);
    }

    #[tokio::test]
    async fn blank_query_issues_nothing() {
        let mut flow = SearchFlow::new(catalog(), 20);
        assert!(flow.submit("   ").is_none());
        assert!(!flow.state().has_searched);
        assert!(!flow.state().loading);
    }

    #[tokio::test]
    async fn older_search_finishing_last_is_discarded() {
        let mut flow = SearchFlow::new(catalog(), 20);
        let first = flow.submit("雨天").unwrap();
        let second = flow.submit("晴天").unwrap();

        assert!(flow.apply(second.await));
        assert!(!flow.apply(first.await));

        let st = flow.state();
        assert_eq!(st.query, "晴天");
        assert_eq!(st.results.len(), 1);
        assert_eq!(st.results[0].id, "7");
        assert_eq!(st.intent_type.as_deref(), Some("exact"));
    }

    #[tokio::test]
    async fn latest_failure_clears_results_and_sets_notice() {
        let c = catalog();
        c.fail(Op::Search, "broken");
        let mut flow = SearchFlow::new(c, 20);
        let ok = flow.submit("雨天").unwrap();
        flow.apply(ok.await);
        assert_eq!(flow.state().results.len(), 3);

        let bad = flow.submit("broken").unwrap();
        assert!(flow.apply(bad.await));
        assert!(flow.state().results.is_empty());
        assert!(flow.state().notice.is_some());
        assert!(!flow.state().loading);
    }

    #[tokio::test]
    async fn stale_failure_is_silent() {
        let c = catalog();
        c.fail(Op::Search, "broken");
        let mut flow = SearchFlow::new(c, 20);
        let bad = flow.submit("broken").unwrap();
        let good = flow.submit("雨天").unwrap();

        assert!(flow.apply(good.await));
        assert!(!flow.apply(bad.await));
        assert_eq!(flow.state().notice, None);
        assert_eq!(flow.state().results.len(), 3);
    }

    #[tokio::test]
    async fn stale_completion_keeps_newer_loading() {
        let mut flow = SearchFlow::new(catalog(), 20);
        let first = flow.submit("雨天").unwrap();
        let _second = flow.submit("晴天").unwrap();
        flow.apply(first.await);
        assert!(flow.state().loading);
        assert!(flow.state().results.is_empty());
    }

    #[tokio::test]
    async fn passes_result_limit() {
        let c = catalog();
        let mut flow = SearchFlow::new(c.clone(), 5);
        let fut = flow.submit("雨天").unwrap();
        flow.apply(fut.await);
        assert_eq!(c.last_top_k(), Some(5));
    }
}
