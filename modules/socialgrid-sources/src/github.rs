// GitHub discussion search. Backs the `linkedin` tile.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

use socialgrid_common::{AppConfig, Platform, Post, PostMetadata, SourceError, SourceResult};

use crate::{SearchSource, CLIENT_USER_AGENT, RESULT_LIMIT};

#[derive(Debug, serde::Deserialize)]
struct DiscussionSearchResponse {
    #[serde(default)]
    items: Vec<Discussion>,
}

#[derive(Debug, serde::Deserialize)]
struct Discussion {
    #[serde(default)]
    node_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    html_url: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    user: DiscussionUser,
    #[serde(default)]
    repository: DiscussionRepository,
    #[serde(default)]
    category: DiscussionCategory,
    #[serde(default)]
    answer_count: Option<i64>,
}

#[derive(Debug, Default, serde::Deserialize)]
struct DiscussionUser {
    #[serde(default)]
    login: String,
}

#[derive(Debug, Default, serde::Deserialize)]
struct DiscussionRepository {
    #[serde(default)]
    full_name: String,
}

#[derive(Debug, Default, serde::Deserialize)]
struct DiscussionCategory {
    #[serde(default)]
    name: String,
}

pub struct GithubSource {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GithubSource {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.github_base_url.clone(),
            token: config.github_token.clone(),
        }
    }
}

#[async_trait]
impl SearchSource for GithubSource {
    fn platform(&self) -> Platform {
        Platform::Linkedin
    }

    fn name(&self) -> &str {
        "github"
    }

    async fn search(&self, query: &str) -> SourceResult<Vec<Post>> {
        info!(query, source = self.name(), "Searching discussions");

        // Recency window: only discussions opened in the last day.
        let since = (Utc::now() - Duration::days(1)).format("%Y-%m-%d");
        let q = format!("{query} created:>={since}");

        let mut req = self
            .client
            .get(format!("{}/search/discussions", self.base_url))
            .query(&[("q", q.as_str()), ("sort", "reactions"), ("order", "desc")])
            .header(reqwest::header::ACCEPT, "application/vnd.github.v3+json")
            .header(reqwest::header::USER_AGENT, CLIENT_USER_AGENT);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let data: DiscussionSearchResponse = resp.json().await?;
        let posts = map_discussions(data);
        info!(query, count = posts.len(), "GitHub search complete");
        Ok(posts)
    }
}

// The discussion search endpoint takes no count parameter, so the cap is
// applied here after the fact.
fn map_discussions(data: DiscussionSearchResponse) -> Vec<Post> {
    data.items
        .into_iter()
        .take(RESULT_LIMIT)
        .map(|discussion| Post {
            id: discussion.node_id,
            title: discussion.title,
            content: format!(
                "{} - {}",
                discussion.repository.full_name, discussion.category.name
            ),
            author: discussion.user.login,
            timestamp: discussion.created_at,
            url: discussion.html_url,
            platform: Platform::Linkedin,
            metadata: PostMetadata {
                repository: Some(discussion.repository.full_name),
                category: Some(discussion.category.name),
                answers: Some(discussion.answer_count.unwrap_or(0)),
                ..Default::default()
            },
        })
        .collect()
}
