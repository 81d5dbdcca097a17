//! Wiki article listing through the contents and commits APIs.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use drift_config::WikiConfig;
use drift_core::entities::ArticleFile;
use drift_core::ports::{PortError, WikiSource};
use tokio::sync::Semaphore;

use crate::{GithubClient, error::GithubError, http::check_response, repo_path};

#[derive(Debug, serde::Deserialize)]
struct ContentEntry {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
    download_url: Option<String>,
}

#[derive(serde::Deserialize)]
struct CommitEntry {
    commit: CommitDetail,
}

#[derive(serde::Deserialize)]
struct CommitDetail {
    committer: Option<CommitSignature>,
    author: Option<CommitSignature>,
}

#[derive(serde::Deserialize)]
struct CommitSignature {
    date: DateTime<Utc>,
}

/// Articles stored as files in a directory of a GitHub repository.
pub struct GithubWiki {
    client: GithubClient,
    owner: String,
    repo: String,
    docs_dir: String,
    extension: String,
    concurrency: usize,
}

impl GithubWiki {
    /// `concurrency` caps in-flight per-file fetches; `0` means unbounded.
    #[must_use]
    pub fn new(client: GithubClient, config: &WikiConfig, concurrency: usize) -> Self {
        Self {
            client,
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            docs_dir: config.docs_path().to_string(),
            extension: config.extension.trim_start_matches('.').to_string(),
            concurrency,
        }
    }

    /// List the docs directory, then fetch every article's content and
    /// last-commit date concurrently.
    ///
    /// A file that fails to fetch is skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError`] if the directory listing itself fails.
    pub async fn fetch_articles(&self) -> Result<Vec<ArticleFile>, GithubError> {
        let started = std::time::Instant::now();
        let entries = self.list_entries().await?;
        let files: Vec<(String, String, String)> = entries
            .into_iter()
            .filter(|e| self.is_article(e))
            .filter_map(|e| e.download_url.map(|url| (e.name, e.path, url)))
            .collect();

        let permits = if self.concurrency == 0 {
            Semaphore::MAX_PERMITS
        } else {
            self.concurrency
        };
        let semaphore = Arc::new(Semaphore::new(permits));
        let mut set = tokio::task::JoinSet::new();

        for (idx, (name, path, download_url)) in files.iter().cloned().enumerate() {
            let client = self.client.clone();
            let commits_url = self.commits_url(&path);
            let sem = Arc::clone(&semaphore);
            set.spawn(async move {
                let Ok(_permit) = sem.acquire().await else {
                    return (idx, Err(GithubError::Parse("semaphore closed".into())));
                };
                let result = fetch_article(&client, name, download_url, &commits_url).await;
                (idx, result)
            });
        }

        let mut slots: Vec<Option<ArticleFile>> = vec![None; files.len()];
        while let Some(res) = set.join_next().await {
            match res {
                Ok((idx, Ok(article))) => slots[idx] = Some(article),
                Ok((idx, Err(e))) => {
                    tracing::warn!(file = %files[idx].0, %e, "skipping article that failed to fetch");
                }
                Err(e) => tracing::warn!(%e, "article fetch task failed"),
            }
        }

        let articles: Vec<ArticleFile> = slots.into_iter().flatten().collect();
        tracing::info!(
            articles = articles.len(),
            elapsed_secs = started.elapsed().as_secs_f64(),
            "fetched wiki articles"
        );
        Ok(articles)
    }

    async fn list_entries(&self) -> Result<Vec<ContentEntry>, GithubError> {
        let url = self.client.endpoint(&format!(
            "{}/contents/{}",
            repo_path(&self.owner, &self.repo),
            encode_path(&self.docs_dir)
        ));
        let resp = check_response(self.client.get(&url).send().await?).await?;
        resp.json()
            .await
            .map_err(|e| GithubError::Parse(format!("contents of {}: {e}", self.docs_dir)))
    }

    fn is_article(&self, entry: &ContentEntry) -> bool {
        entry.kind == "file"
            && entry
                .name
                .rsplit_once('.')
                .is_some_and(|(stem, ext)| !stem.is_empty() && ext.eq_ignore_ascii_case(&self.extension))
    }

    fn commits_url(&self, path: &str) -> String {
        self.client.endpoint(&format!(
            "{}/commits?path={}&per_page=1",
            repo_path(&self.owner, &self.repo),
            urlencoding::encode(path)
        ))
    }
}

async fn fetch_article(
    client: &GithubClient,
    name: String,
    download_url: String,
    commits_url: &str,
) -> Result<ArticleFile, GithubError> {
    let content = check_response(client.get(&download_url).send().await?)
        .await?
        .text()
        .await?;

    let resp = check_response(client.get(commits_url).send().await?).await?;
    let commits: Vec<CommitEntry> = resp
        .json()
        .await
        .map_err(|e| GithubError::Parse(format!("commits for {name}: {e}")))?;
    let last_modified = last_commit_date(&commits)
        .ok_or_else(|| GithubError::Parse(format!("no commit history for {name}")))?;

    Ok(ArticleFile {
        name,
        content,
        download_url,
        last_modified,
    })
}

fn last_commit_date(commits: &[CommitEntry]) -> Option<DateTime<Utc>> {
    let detail = &commits.first()?.commit;
    detail
        .committer
        .as_ref()
        .or(detail.author.as_ref())
        .map(|s| s.date)
}

/// Percent-encode each segment of a slash-separated path.
fn encode_path(path: &str) -> String {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::encode(s).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl WikiSource for GithubWiki {
    async fn list_articles(&self) -> Result<Vec<ArticleFile>, PortError> {
        Ok(self.fetch_articles().await?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use drift_config::GithubConfig;

    use super::*;

    const CONTENTS_FIXTURE: &str = r#"[
        {"name": "connect-sensor.md", "path": "docs/en/connect-sensor.md", "type": "file",
         "download_url": "https://raw.githubusercontent.com/airalab/robonomics-wiki/master/docs/en/connect-sensor.md"},
        {"name": "images", "path": "docs/en/images", "type": "dir", "download_url": null},
        {"name": "logo.png", "path": "docs/en/logo.png", "type": "file",
         "download_url": "https://raw.githubusercontent.com/airalab/robonomics-wiki/master/docs/en/logo.png"},
        {"name": "README.MD", "path": "docs/en/README.MD", "type": "file",
         "download_url": "https://raw.githubusercontent.com/airalab/robonomics-wiki/master/docs/en/README.MD"},
        {"name": ".md", "path": "docs/en/.md", "type": "file",
         "download_url": "https://raw.githubusercontent.com/airalab/robonomics-wiki/master/docs/en/.md"}
    ]"#;

    const COMMITS_FIXTURE: &str = r#"[
        {"sha": "abc", "commit": {
            "author": {"name": "a", "date": "2024-01-02T10:00:00Z"},
            "committer": {"name": "GitHub", "date": "2024-01-03T11:00:00Z"}
        }}
    ]"#;

    fn wiki() -> GithubWiki {
        let config = WikiConfig {
            owner: "airalab".into(),
            repo: "robonomics-wiki".into(),
            docs_dir: "/docs/en/".into(),
            extension: ".md".into(),
        };
        GithubWiki::new(GithubClient::new(&GithubConfig::default()), &config, 4)
    }

    #[test]
    fn filters_articles_by_extension() {
        let wiki = wiki();
        let entries: Vec<ContentEntry> = serde_json::from_str(CONTENTS_FIXTURE).unwrap();
        let names: Vec<&str> = entries
            .iter()
            .filter(|e| wiki.is_article(e))
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["connect-sensor.md", "README.MD"]);
    }

    #[test]
    fn commit_date_prefers_committer() {
        let commits: Vec<CommitEntry> = serde_json::from_str(COMMITS_FIXTURE).unwrap();
        assert_eq!(
            last_commit_date(&commits),
            Some(Utc.with_ymd_and_hms(2024, 1, 3, 11, 0, 0).unwrap())
        );
        assert_eq!(last_commit_date(&[]), None);
    }

    #[test]
    fn commits_url_encodes_path() {
        assert_eq!(
            wiki().commits_url("docs/en/connect sensor.md"),
            "https://api.github.com/repos/airalab/robonomics-wiki/commits?path=docs%2Fen%2Fconnect%20sensor.md&per_page=1"
        );
    }

    #[test]
    fn encode_path_keeps_separators() {
        assert_eq!(encode_path("/docs/en/"), "docs/en");
        assert_eq!(encode_path("docs/my wiki"), "docs/my%20wiki");
    }

    #[tokio::test]
    #[ignore = "hits the live GitHub API"]
    async fn live_list_articles() {
        let articles = wiki().fetch_articles().await.unwrap();
        assert!(!articles.is_empty());
    }
}
