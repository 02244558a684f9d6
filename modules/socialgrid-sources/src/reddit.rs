// Reddit post search via the public search.json endpoint.

use async_trait::async_trait;
use chrono::DateTime;
use tracing::info;

use socialgrid_common::{AppConfig, Platform, Post, PostMetadata, SourceError, SourceResult};

use crate::{SearchSource, CLIENT_USER_AGENT, RESULT_LIMIT};

#[derive(Debug, serde::Deserialize)]
struct Listing {
    #[serde(default)]
    data: ListingData,
}

#[derive(Debug, Default, serde::Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Debug, serde::Deserialize)]
struct ListingChild {
    data: RedditPost,
}

#[derive(Debug, serde::Deserialize)]
struct RedditPost {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    author: String,
    /// Epoch seconds, may carry a fractional part.
    created_utc: f64,
    #[serde(default)]
    permalink: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    subreddit_name_prefixed: String,
    #[serde(default)]
    num_comments: i64,
}

pub struct RedditSource {
    client: reqwest::Client,
    base_url: String,
}

impl RedditSource {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.reddit_base_url.clone(),
        }
    }
}

#[async_trait]
impl SearchSource for RedditSource {
    fn platform(&self) -> Platform {
        Platform::Reddit
    }

    fn name(&self) -> &str {
        "reddit"
    }

    async fn search(&self, query: &str) -> SourceResult<Vec<Post>> {
        info!(query, source = self.name(), "Searching posts");

        let limit = RESULT_LIMIT.to_string();
        let resp = self
            .client
            .get(format!("{}/search.json", self.base_url))
            .query(&[("q", query), ("sort", "hot"), ("limit", &limit), ("t", "day")])
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

        let data: Listing = resp.json().await?;
        let posts = map_listing(data);
        info!(query, count = posts.len(), "Reddit search complete");
        Ok(posts)
    }
}

fn map_listing(listing: Listing) -> Vec<Post> {
    listing
        .data
        .children
        .into_iter()
        .map(|child| {
            let post = child.data;
            // Self posts can have an empty body; the tile still needs text.
            let content = if post.selftext.is_empty() {
                format!("{} - {} points", post.subreddit_name_prefixed, post.score)
            } else {
                post.selftext
            };
            Post {
                id: post.id,
                title: post.title,
                content,
                author: post.author,
                timestamp: DateTime::from_timestamp_millis((post.created_utc * 1000.0) as i64)
                    .unwrap_or(DateTime::UNIX_EPOCH),
                url: format!("https://reddit.com{}", post.permalink),
                platform: Platform::Reddit,
                metadata: PostMetadata {
                    score: Some(post.score),
                    subreddit: Some(post.subreddit_name_prefixed),
                    num_comments: Some(post.num_comments),
                    ..Default::default()
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn fixture(selftext: &str) -> String {
        format!(
            r#"{{
                "data": {{
                    "children": [{{
                        "data": {{
                            "id": "1abcde",
                            "title": "Why rust",
                            "selftext": "{selftext}",
                            "author": "crab_fan",
                            "created_utc": 1709294400.5,
                            "permalink": "/r/rust/comments/1abcde/why_rust/",
                            "score": 128,
                            "subreddit_name_prefixed": "r/rust",
                            "num_comments": 37
                        }}
                    }}]
                }}
            }}"#
        )
    }

    #[test]
    fn maps_post_fields() {
        let listing: Listing = serde_json::from_str(&fixture("body text")).unwrap();
        let posts = map_listing(listing);
        assert_eq!(posts.len(), 1);
        let post = &posts[0];
        assert_eq!(post.id, "1abcde");
        assert_eq!(post.content, "body text");
        assert_eq!(post.author, "crab_fan");
        assert_eq!(post.url, "https://reddit.com/r/rust/comments/1abcde/why_rust/");
        assert_eq!(post.platform, Platform::Reddit);
        assert_eq!(post.metadata.score, Some(128));
        assert_eq!(post.metadata.subreddit.as_deref(), Some("r/rust"));
        assert_eq!(post.metadata.num_comments, Some(37));
    }

    #[test]
    fn empty_selftext_falls_back_to_subreddit_and_score() {
        let listing: Listing = serde_json::from_str(&fixture("")).unwrap();
        let posts = map_listing(listing);
        assert_eq!(posts[0].content, "r/rust - 128 points");
    }

    #[test]
    fn fractional_created_utc_is_preserved_to_millis() {
        let listing: Listing = serde_json::from_str(&fixture("x")).unwrap();
        let posts = map_listing(listing);
        let expected = Utc.timestamp_millis_opt(1_709_294_400_500).unwrap();
        assert_eq!(posts[0].timestamp, expected);
    }

    #[test]
    fn missing_data_key_maps_to_no_posts() {
        let listing: Listing = serde_json::from_str("{}").unwrap();
        assert!(map_listing(listing).is_empty());
    }
}
