use std::sync::Arc;

use tracing::warn;

use socialgrid_common::{AppConfig, Post, SearchResults};

use crate::{GithubSource, MastodonSource, PeertubeSource, RedditSource, SearchSource, RESULT_LIMIT};

/// Fans one query out to every source concurrently and merges the settled
/// results into a `SearchResults` keyed by platform. Stateless: each call
/// produces a fresh value, and nothing is shared between runs.
pub struct Aggregator {
    sources: Vec<Arc<dyn SearchSource>>,
}

impl Aggregator {
    /// The production source set: Mastodon, Reddit, PeerTube, GitHub.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_sources(vec![
            Arc::new(MastodonSource::new(config)),
            Arc::new(RedditSource::new(config)),
            Arc::new(PeertubeSource::new(config)),
            Arc::new(GithubSource::new(config)),
        ])
    }

    pub fn with_sources(sources: Vec<Arc<dyn SearchSource>>) -> Self {
        Self { sources }
    }

    /// Run all sources for `query` and collect the combined results.
    ///
    /// No retry, timeout, or cancellation: latency is bounded by the
    /// slowest source. A failing source contributes an empty sequence and
    /// never disturbs its siblings; the result always carries all platform
    /// keys even when every source fails.
    pub async fn aggregate(&self, query: &str) -> SearchResults {
        let tasks = self.sources.iter().map(|source| {
            let source = Arc::clone(source);
            let query = query.to_string();
            async move {
                let posts = fetch_platform_posts(source.as_ref(), &query).await;
                (source.platform(), posts)
            }
        });

        let mut results = SearchResults::empty();
        for (platform, posts) in futures::future::join_all(tasks).await {
            results.set(platform, posts);
        }
        results
    }
}

/// One source call that never fails outward: any error is logged and
/// absorbed into an empty sequence. Posts are capped and re-tagged with
/// the source's platform so the keying invariant holds even for a
/// misbehaving source.
async fn fetch_platform_posts(source: &dyn SearchSource, query: &str) -> Vec<Post> {
    match source.search(query).await {
        Ok(mut posts) => {
            posts.truncate(RESULT_LIMIT);
            let platform = source.platform();
            for post in &mut posts {
                post.platform = platform;
            }
            posts
        }
        Err(e) => {
            warn!(source = source.name(), error = %e, "Source search failed, returning no posts");
            Vec::new()
        }
    }
}
