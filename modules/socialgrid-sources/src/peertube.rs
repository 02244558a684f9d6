// PeerTube video search. Backs the `youtube` tile.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use socialgrid_common::{AppConfig, Platform, Post, PostMetadata, SourceError, SourceResult};

use crate::{SearchSource, CLIENT_USER_AGENT, RESULT_LIMIT};

#[derive(Debug, serde::Deserialize)]
struct VideoSearchResponse {
    #[serde(default)]
    data: Vec<Video>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct Video {
    #[serde(default)]
    uuid: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    channel: VideoChannel,
    published_at: DateTime<Utc>,
    #[serde(default)]
    views: i64,
    #[serde(default)]
    duration: i64,
    #[serde(default)]
    thumbnail_url: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
struct VideoChannel {
    #[serde(default)]
    name: String,
}

pub struct PeertubeSource {
    client: reqwest::Client,
    base_url: String,
}

impl PeertubeSource {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.peertube_base_url.clone(),
        }
    }
}

#[async_trait]
impl SearchSource for PeertubeSource {
    fn platform(&self) -> Platform {
        Platform::Youtube
    }

    fn name(&self) -> &str {
        "peertube"
    }

    async fn search(&self, query: &str) -> SourceResult<Vec<Post>> {
        info!(query, source = self.name(), "Searching videos");

        let count = RESULT_LIMIT.to_string();
        let resp = self
            .client
            .get(format!("{}/api/v1/search/videos", self.base_url))
            .query(&[("search", query), ("sort", "-publishedAt"), ("count", &count)])
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

        let data: VideoSearchResponse = resp.json().await?;
        let posts = map_videos(data, &self.base_url);
        info!(query, count = posts.len(), "PeerTube search complete");
        Ok(posts)
    }
}

fn map_videos(data: VideoSearchResponse, base_url: &str) -> Vec<Post> {
    data.data
        .into_iter()
        .map(|video| Post {
            url: format!("{}/videos/watch/{}", base_url, video.uuid),
            id: video.uuid,
            title: video.name,
            content: video.description.unwrap_or_default(),
            author: video.channel.name,
            timestamp: video.published_at,
            platform: Platform::Youtube,
            metadata: PostMetadata {
                views: Some(video.views),
                duration: Some(video.duration),
                thumbnail: video.thumbnail_url,
                ..Default::default()
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "data": [{
            "uuid": "9c9de5e8-0a1e-484a-b099-e80766180a6d",
            "name": "Rust in 10 minutes",
            "description": null,
            "channel": {"name": "systems_talks"},
            "publishedAt": "2024-03-01T08:30:00.000Z",
            "views": 1523,
            "duration": 612,
            "thumbnailUrl": "https://tube.example/thumbs/9c9de5e8.jpg"
        }]
    }"#;

    #[test]
    fn maps_video_fields() {
        let data: VideoSearchResponse = serde_json::from_str(FIXTURE).unwrap();
        let posts = map_videos(data, "https://tube.example");
        assert_eq!(posts.len(), 1);
        let post = &posts[0];
        assert_eq!(post.id, "9c9de5e8-0a1e-484a-b099-e80766180a6d");
        assert_eq!(post.title, "Rust in 10 minutes");
        assert_eq!(post.content, "");
        assert_eq!(post.author, "systems_talks");
        assert_eq!(
            post.url,
            "https://tube.example/videos/watch/9c9de5e8-0a1e-484a-b099-e80766180a6d"
        );
        assert_eq!(post.platform, Platform::Youtube);
        assert_eq!(post.metadata.views, Some(1523));
        assert_eq!(post.metadata.duration, Some(612));
        assert_eq!(
            post.metadata.thumbnail.as_deref(),
            Some("https://tube.example/thumbs/9c9de5e8.jpg")
        );
    }

    #[test]
    fn empty_response_maps_to_no_posts() {
        let data: VideoSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(map_videos(data, "https://tube.example").is_empty());
    }
}
