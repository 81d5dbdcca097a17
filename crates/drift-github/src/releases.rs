//! Latest-release lookup.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use drift_core::entities::Release;
use drift_core::ports::{PortError, ReleaseLookup};

use crate::{GithubClient, error::GithubError, http::check_response, repo_path};

#[derive(serde::Deserialize)]
struct ReleaseResponse {
    name: Option<String>,
    tag_name: String,
    html_url: String,
    published_at: Option<DateTime<Utc>>,
}

impl From<ReleaseResponse> for Release {
    fn from(r: ReleaseResponse) -> Self {
        Self {
            name: r
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| r.tag_name.clone()),
            tag: r.tag_name,
            url: r.html_url,
            publish_date: r.published_at,
        }
    }
}

impl GithubClient {
    /// Fetch the latest published release of `owner/repo`.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::NotFound`] when the repository does not exist
    /// or has no releases, and other [`GithubError`]s for transport, status
    /// or parse failures.
    pub async fn fetch_latest_release(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Release, GithubError> {
        let url = self.endpoint(&format!("{}/releases/latest", repo_path(owner, repo)));
        let resp = check_response(self.get(&url).send().await?).await?;
        let body: ReleaseResponse = resp
            .json()
            .await
            .map_err(|e| GithubError::Parse(format!("release {owner}/{repo}: {e}")))?;
        tracing::debug!(owner, repo, tag = %body.tag_name, "fetched latest release");
        Ok(body.into())
    }
}

#[async_trait]
impl ReleaseLookup for GithubClient {
    async fn latest_release(&self, owner: &str, repo: &str) -> Result<Release, PortError> {
        Ok(self.fetch_latest_release(owner, repo).await?)
    }
}
