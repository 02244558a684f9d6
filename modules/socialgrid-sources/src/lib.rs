pub mod aggregator;
pub mod github;
pub mod mastodon;
pub mod peertube;
pub mod reddit;

pub use aggregator::Aggregator;
pub use github::GithubSource;
pub use mastodon::MastodonSource;
pub use peertube::PeertubeSource;
pub use reddit::RedditSource;

use async_trait::async_trait;
use socialgrid_common::{Platform, Post, SourceResult};

/// Fixed per-source result cap. Every adapter returns at most this many
/// posts, in the source's native relevance/recency order.
pub const RESULT_LIMIT: usize = 3;

/// Identifying header sent with every outbound search call.
pub(crate) const CLIENT_USER_AGENT: &str = "socialgrid/0.1";

/// One external search backend. Implementations issue a single outbound
/// call per query and project the response into the common post shape.
/// Errors are typed here; the aggregator is the layer that absorbs them.
#[async_trait]
pub trait SearchSource: Send + Sync {
    /// The outward platform tag this source's posts are keyed under.
    fn platform(&self) -> Platform;

    /// Short name for log lines.
    fn name(&self) -> &str;

    async fn search(&self, query: &str) -> SourceResult<Vec<Post>>;
}
