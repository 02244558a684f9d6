use anyhow::Result;

/// Application configuration loaded from environment variables.
/// Base URLs default to the public instances and exist as env overrides
/// mainly so deployments can point at mirrors.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,

    pub mastodon_base_url: String,
    pub reddit_base_url: String,
    pub peertube_base_url: String,
    pub github_base_url: String,

    /// Optional bearer token for the GitHub discussion search. Unset means
    /// unauthenticated requests (lower rate limits, same behavior).
    pub github_token: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8787,
            mastodon_base_url: "https://mastodon.social".to_string(),
            reddit_base_url: "https://www.reddit.com".to_string(),
            peertube_base_url: "https://tube.tchncs.de".to_string(),
            github_base_url: "https://api.github.com".to_string(),
            github_token: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let config = Self {
            port: match std::env::var("PORT") {
                Ok(raw) => raw.parse()?,
                Err(_) => defaults.port,
            },
            mastodon_base_url: std::env::var("MASTODON_BASE_URL")
                .unwrap_or(defaults.mastodon_base_url),
            reddit_base_url: std::env::var("REDDIT_BASE_URL").unwrap_or(defaults.reddit_base_url),
            peertube_base_url: std::env::var("PEERTUBE_BASE_URL")
                .unwrap_or(defaults.peertube_base_url),
            github_base_url: std::env::var("GITHUB_BASE_URL").unwrap_or(defaults.github_base_url),
            github_token: std::env::var("GITHUB_TOKEN").ok(),
        };

        tracing::debug!(
            port = config.port,
            github_auth = config.github_token.is_some(),
            "Config loaded"
        );
        Ok(config)
    }
}
