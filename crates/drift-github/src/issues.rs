//! Issue creation.

use async_trait::async_trait;
use drift_core::issue::IssuePayload;
use drift_core::ports::{IssueTracker, PortError};

use crate::{GithubClient, error::GithubError, http::check_response, repo_path};

#[derive(serde::Serialize)]
struct CreateIssueRequest<'a> {
    title: &'a str,
    body: &'a str,
    #[serde(skip_serializing_if = "is_empty")]
    labels: &'a [String],
    #[serde(skip_serializing_if = "is_empty")]
    assignees: &'a [String],
}

fn is_empty(values: &&[String]) -> bool {
    values.is_empty()
}

#[derive(serde::Deserialize)]
struct CreatedIssue {
    html_url: String,
    number: u64,
}

impl GithubClient {
    /// File an issue and return its web URL.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::Unauthorized`] without a valid token,
    /// [`GithubError::Validation`] when GitHub rejects labels or assignees,
    /// and other [`GithubError`]s for transport or parse failures.
    pub async fn post_issue(&self, issue: &IssuePayload) -> Result<String, GithubError> {
        let url = self.endpoint(&format!("{}/issues", repo_path(&issue.owner, &issue.repo)));
        let request = CreateIssueRequest {
            title: &issue.title,
            body: &issue.body,
            labels: &issue.labels,
            assignees: &issue.assignees,
        };
        let resp = check_response(
            self.request(reqwest::Method::POST, &url)
                .json(&request)
                .send()
                .await?,
        )
        .await?;
        let created: CreatedIssue = resp
            .json()
            .await
            .map_err(|e| GithubError::Parse(format!("created issue: {e}")))?;
        tracing::info!(number = created.number, url = %created.html_url, "issue created");
        Ok(created.html_url)
    }
}

#[async_trait]
impl IssueTracker for GithubClient {
    async fn create_issue(&self, issue: &IssuePayload) -> Result<String, PortError> {
        Ok(self.post_issue(issue).await?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn request_body_shape() {
        let labels = vec!["deprecation".to_string()];
        let assignees = vec!["alice".to_string(), "bob".to_string()];
        let request = CreateIssueRequest {
            title: "t",
            body: "b",
            labels: &labels,
            assignees: &assignees,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "title": "t",
                "body": "b",
                "labels": ["deprecation"],
                "assignees": ["alice", "bob"],
            })
        );
    }

    #[test]
    fn empty_lists_are_omitted() {
        let request = CreateIssueRequest {
            title: "t",
            body: "b",
            labels: &[],
            assignees: &[],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"title": "t", "body": "b"})
        );
    }

    #[test]
    fn parse_created_issue() {
        let created: CreatedIssue = serde_json::from_str(
            r#"{"id": 1, "number": 42, "html_url": "https://github.com/o/r/issues/42", "state": "open"}"#,
        )
        .unwrap();
        assert_eq!(created.number, 42);
        assert_eq!(created.html_url, "https://github.com/o/r/issues/42");
    }
}
