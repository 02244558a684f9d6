use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outward platform tags for the four search sources.
///
/// The labels are the product-facing names; the backing services differ
/// (Mastodon behind `twitter`, PeerTube behind `youtube`, GitHub
/// Discussions behind `linkedin`). The label-to-adapter mapping is fixed
/// by each adapter's `platform()` and must stay consistent end-to-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Reddit,
    Youtube,
    Linkedin,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Twitter,
        Platform::Reddit,
        Platform::Youtube,
        Platform::Linkedin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Twitter => "twitter",
            Platform::Reddit => "reddit",
            Platform::Youtube => "youtube",
            Platform::Linkedin => "linkedin",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized item from any platform. Immutable after construction.
///
/// `id` is unique within its source platform only, not globally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    /// Free text body. May be HTML-stripped or synthesized from other
    /// fields when the source defines a fallback; may be empty.
    pub content: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub url: String,
    pub platform: Platform,
    #[serde(default)]
    pub metadata: PostMetadata,
}

/// Union of all platform-specific metadata fields. Every field is
/// optional; consumers must treat each one as possibly absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_comments: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subreddit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reblogs: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorites: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<i64>,
    /// Video length in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answers: Option<i64>,
}

/// Combined result of one aggregation run: every platform tag maps to an
/// ordered sequence of posts (source-native order, not merged across
/// platforms). A sequence is empty, never absent, when its adapter failed
/// or found nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub twitter: Vec<Post>,
    #[serde(default)]
    pub reddit: Vec<Post>,
    #[serde(default)]
    pub youtube: Vec<Post>,
    #[serde(default)]
    pub linkedin: Vec<Post>,
}

impl SearchResults {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn posts(&self, platform: Platform) -> &[Post] {
        match platform {
            Platform::Twitter => &self.twitter,
            Platform::Reddit => &self.reddit,
            Platform::Youtube => &self.youtube,
            Platform::Linkedin => &self.linkedin,
        }
    }

    pub fn set(&mut self, platform: Platform, posts: Vec<Post>) {
        match platform {
            Platform::Twitter => self.twitter = posts,
            Platform::Reddit => self.reddit = posts,
            Platform::Youtube => self.youtube = posts,
            Platform::Linkedin => self.linkedin = posts,
        }
    }

    pub fn total_posts(&self) -> usize {
        Platform::ALL.iter().map(|p| self.posts(*p).len()).sum()
    }
}
