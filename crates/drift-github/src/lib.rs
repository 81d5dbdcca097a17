//! # drift-github
//!
//! GitHub REST API adapters for wikidrift.
//!
//! - [`GithubWiki`] lists wiki articles under a docs directory
//!   ([`WikiSource`](drift_core::ports::WikiSource))
//! - [`GithubClient`] looks up latest releases
//!   ([`ReleaseLookup`](drift_core::ports::ReleaseLookup)) and files issues
//!   ([`IssueTracker`](drift_core::ports::IssueTracker))

mod contents;
mod error;
mod http;
mod issues;
mod releases;

pub use contents::GithubWiki;
pub use error::GithubError;

use drift_config::GithubConfig;

const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

/// Authenticated HTTP client for the GitHub REST API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl GithubClient {
    /// Build a client from configuration. An empty token means anonymous
    /// access, which is enough for reads on public repositories.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(config: &GithubConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent(config.user_agent.as_str())
                .timeout(std::time::Duration::from_secs(config.timeout_secs))
                .build()
                .expect("reqwest client should build"),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: Some(config.token.clone()).filter(|t| !t.is_empty()),
        }
    }

    /// Absolute URL for an API path such as `/repos/o/r/releases/latest`.
    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let builder = self
            .http
            .request(method, url)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.request(reqwest::Method::GET, url)
    }
}

/// `/repos/{owner}/{repo}` with both segments percent-encoded.
fn repo_path(owner: &str, repo: &str) -> String {
    format!(
        "/repos/{}/{}",
        urlencoding::encode(owner),
        urlencoding::encode(repo)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_url: &str, token: &str) -> GithubConfig {
        GithubConfig {
            token: token.into(),
            api_url: api_url.into(),
            ..GithubConfig::default()
        }
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let client = GithubClient::new(&config("https://ghe.example.com/api/v3/", ""));
        assert_eq!(
            client.endpoint("/repos/o/r"),
            "https://ghe.example.com/api/v3/repos/o/r"
        );
    }

    #[test]
    fn empty_token_is_anonymous() {
        let client = GithubClient::new(&config("https://api.github.com", ""));
        assert!(client.token.is_none());
        let client = GithubClient::new(&config("https://api.github.com", "ghp_x"));
        assert_eq!(client.token.as_deref(), Some("ghp_x"));
    }

    #[test]
    fn repo_path_encodes_segments() {
        assert_eq!(repo_path("airalab", "robonomics"), "/repos/airalab/robonomics");
        assert_eq!(repo_path("a b", "c/d"), "/repos/a%20b/c%2Fd");
    }
}
