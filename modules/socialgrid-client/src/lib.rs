//! Client-side fetch orchestrator: drives one search cycle against the
//! entry point, keeps the loading/results view state, and fires the
//! fire-and-forget save-search call.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use socialgrid_common::SearchResults;

/// The entry point as the orchestrator sees it. A trait so tests can
/// stand in a scripted backend.
#[async_trait]
pub trait SearchApi: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResults>;
    async fn save_search(&self, query: &str, timestamp: DateTime<Utc>) -> Result<()>;
}

/// reqwest-backed implementation talking to a running socialgrid-server.
pub struct HttpSearchApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSearchApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl SearchApi for HttpSearchApi {
    async fn search(&self, query: &str) -> Result<SearchResults> {
        let resp = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json().await?)
    }

    async fn save_search(&self, query: &str, timestamp: DateTime<Utc>) -> Result<()> {
        self.client
            .post(format!("{}/save-search", self.base_url))
            .json(&serde_json::json!({"query": query, "timestamp": timestamp}))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// What the grid renders: a loading flag and the latest results. Updated
/// only after a search cycle fully settles, never incrementally.
#[derive(Debug, Clone, Default)]
pub struct SearchView {
    pub loading: bool,
    pub results: SearchResults,
}

/// Owns the view state and runs search cycles against a `SearchApi`.
pub struct SearchController {
    api: Arc<dyn SearchApi>,
    view: Arc<RwLock<SearchView>>,
}

impl SearchController {
    pub fn new(api: Arc<dyn SearchApi>) -> Self {
        Self {
            api,
            view: Arc::new(RwLock::new(SearchView::default())),
        }
    }

    /// Snapshot of the current view state.
    pub async fn view(&self) -> SearchView {
        self.view.read().await.clone()
    }

    /// Run one search cycle. Never returns an error to the caller: any
    /// failure resets the results to the all-empty shape. The loading
    /// flag is set for exactly the duration of the search call and
    /// cleared on every path.
    pub async fn run(&self, query: &str) {
        self.view.write().await.loading = true;

        match self.api.search(query).await {
            Ok(results) => {
                self.view.write().await.results = results;

                // Record the query without blocking the grid on the
                // persistence call or surfacing its failure.
                let api = Arc::clone(&self.api);
                let query = query.to_string();
                tokio::spawn(async move {
                    if let Err(e) = api.save_search(&query, Utc::now()).await {
                        debug!(query, error = %e, "save-search failed, ignoring");
                    }
                });
            }
            Err(e) => {
                warn!(query, error = %e, "Search failed, clearing results");
                self.view.write().await.results = SearchResults::empty();
            }
        }

        self.view.write().await.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    use chrono::TimeZone;
    use socialgrid_common::{Platform, Post, PostMetadata};

    fn fixed_results() -> SearchResults {
        let mut results = SearchResults::empty();
        results.set(
            Platform::Reddit,
            vec![Post {
                id: "r1".to_string(),
                title: "title".to_string(),
                content: "content".to_string(),
                author: "author".to_string(),
                timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
                url: "https://example.com/r1".to_string(),
                platform: Platform::Reddit,
                metadata: PostMetadata::default(),
            }],
        );
        results
    }

    /// Search blocks until released, so tests can observe the in-flight
    /// window; saves are recorded and signaled.
    struct GatedApi {
        entered: Arc<Notify>,
        release: Arc<Notify>,
        fail: bool,
        saved: Arc<Notify>,
        save_count: AtomicUsize,
    }

    impl GatedApi {
        fn new(fail: bool) -> (Arc<Self>, Arc<Notify>, Arc<Notify>) {
            let entered = Arc::new(Notify::new());
            let release = Arc::new(Notify::new());
            let api = Arc::new(Self {
                entered: Arc::clone(&entered),
                release: Arc::clone(&release),
                fail,
                saved: Arc::new(Notify::new()),
                save_count: AtomicUsize::new(0),
            });
            (api, entered, release)
        }
    }

    #[async_trait]
    impl SearchApi for GatedApi {
        async fn search(&self, _query: &str) -> Result<SearchResults> {
            self.entered.notify_one();
            self.release.notified().await;
            if self.fail {
                anyhow::bail!("upstream unavailable");
            }
            Ok(fixed_results())
        }

        async fn save_search(&self, _query: &str, _timestamp: DateTime<Utc>) -> Result<()> {
            self.save_count.fetch_add(1, Ordering::SeqCst);
            self.saved.notify_one();
            Ok(())
        }
    }

    #[tokio::test]
    async fn loading_flag_is_true_strictly_during_the_call() {
        let (api, entered, release) = GatedApi::new(false);
        let controller = Arc::new(SearchController::new(api.clone()));
        assert!(!controller.view().await.loading);

        let runner = Arc::clone(&controller);
        let task = tokio::spawn(async move { runner.run("rust").await });

        entered.notified().await;
        assert!(controller.view().await.loading, "loading while in flight");

        release.notify_one();
        task.await.unwrap();

        let view = controller.view().await;
        assert!(!view.loading, "loading cleared after settlement");
        assert_eq!(view.results, fixed_results());
    }

    #[tokio::test]
    async fn failure_clears_loading_and_resets_results() {
        let (api, entered, release) = GatedApi::new(true);
        let controller = Arc::new(SearchController::new(api.clone()));

        let runner = Arc::clone(&controller);
        let task = tokio::spawn(async move { runner.run("rust").await });
        entered.notified().await;
        assert!(controller.view().await.loading);
        release.notify_one();
        task.await.unwrap();

        let view = controller.view().await;
        assert!(!view.loading);
        assert_eq!(view.results, SearchResults::empty());
        // No persistence call on the failure path.
        assert_eq!(api.save_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn successful_search_fires_the_save_call() {
        let (api, _entered, release) = GatedApi::new(false);
        release.notify_one();
        let controller = SearchController::new(api.clone());
        controller.run("rust").await;

        tokio::time::timeout(Duration::from_secs(1), api.saved.notified())
            .await
            .expect("save-search should fire after a successful search");
        assert_eq!(api.save_count.load(Ordering::SeqCst), 1);
    }

    /// First call succeeds, later calls fail.
    struct FlakyApi {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SearchApi for FlakyApi {
        async fn search(&self, _query: &str) -> Result<SearchResults> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(fixed_results())
            } else {
                anyhow::bail!("flaked")
            }
        }

        async fn save_search(&self, _query: &str, _timestamp: DateTime<Utc>) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn failed_cycle_replaces_previous_results_with_empty() {
        let controller = SearchController::new(Arc::new(FlakyApi {
            calls: AtomicUsize::new(0),
        }));
        controller.run("rust").await;
        assert_eq!(controller.view().await.results, fixed_results());

        controller.run("rust").await;
        assert_eq!(controller.view().await.results, SearchResults::empty());
    }
}
