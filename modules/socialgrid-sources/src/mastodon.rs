// Mastodon status search. Backs the `twitter` tile.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use socialgrid_common::{AppConfig, Platform, Post, PostMetadata, SourceError, SourceResult};

use crate::{SearchSource, CLIENT_USER_AGENT, RESULT_LIMIT};

#[derive(Debug, serde::Deserialize)]
struct StatusSearchResponse {
    #[serde(default)]
    statuses: Vec<Status>,
}

#[derive(Debug, serde::Deserialize)]
struct Status {
    #[serde(default)]
    id: String,
    #[serde(default)]
    content: String,
    created_at: DateTime<Utc>,
    /// Nullable upstream: remote-only statuses can lack a canonical URL.
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    account: StatusAccount,
    #[serde(default)]
    reblogs_count: i64,
    #[serde(default)]
    favourites_count: i64,
}

#[derive(Debug, Default, serde::Deserialize)]
struct StatusAccount {
    #[serde(default)]
    username: String,
    #[serde(default)]
    display_name: String,
}

pub struct MastodonSource {
    client: reqwest::Client,
    base_url: String,
}

impl MastodonSource {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.mastodon_base_url.clone(),
        }
    }
}

#[async_trait]
impl SearchSource for MastodonSource {
    fn platform(&self) -> Platform {
        Platform::Twitter
    }

    fn name(&self) -> &str {
        "mastodon"
    }

    async fn search(&self, query: &str) -> SourceResult<Vec<Post>> {
        info!(query, source = self.name(), "Searching statuses");

        let limit = RESULT_LIMIT.to_string();
        let resp = self
            .client
            .get(format!("{}/api/v2/search", self.base_url))
            .query(&[("q", query), ("type", "statuses"), ("limit", &limit)])
            .header(reqwest::header::USER_AGENT, CLIENT_USER_AGENT)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let data: StatusSearchResponse = resp.json().await?;
        let posts = map_statuses(data);
        info!(query, count = posts.len(), "Mastodon search complete");
        Ok(posts)
    }
}

fn map_statuses(data: StatusSearchResponse) -> Vec<Post> {
    data.statuses
        .into_iter()
        .map(|status| Post {
            id: status.id,
            title: status.account.display_name,
            content: strip_html(&status.content),
            author: format!("@{}", status.account.username),
            timestamp: status.created_at,
            url: status.url.unwrap_or_default(),
            platform: Platform::Twitter,
            metadata: PostMetadata {
                reblogs: Some(status.reblogs_count),
                favorites: Some(status.favourites_count),
                ..Default::default()
            },
        })
        .collect()
}

/// Status bodies arrive as HTML fragments; the grid renders plain text.
fn strip_html(html: &str) -> String {
    html2text::from_read(html.as_bytes(), 80)
        .unwrap_or_default()
        .trim()
        .to_string()
}
