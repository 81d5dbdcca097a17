//! In-memory collaborators for pipeline tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use drift_core::entities::{ArticleFile, Release};
use drift_core::issue::{IssuePayload, IssueTarget};
use drift_core::ports::{IssueTracker, PortError, ReleaseLookup, WikiSource};
use drift_db::Ledger;
use drift_pipeline::{RunContext, RunOptions};

pub fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, d, 12, 0, 0).unwrap()
}

pub fn article(name: &str, modified: DateTime<Utc>, contributors: &[&str], deps: &[&str]) -> ArticleFile {
    let mut front = format!("contributors: [{}]\n", contributors.join(", "));
    if !deps.is_empty() {
        front.push_str("dependencies:\n");
        for dep in deps {
            front.push_str(&format!("  - {dep}\n"));
        }
    }
    ArticleFile {
        name: name.into(),
        content: format!("---\n{front}---\n\n# {name}\n"),
        download_url: format!("https://raw.githubusercontent.com/airalab/robonomics-wiki/master/docs/en/{name}"),
        last_modified: modified,
    }
}

#[derive(Default)]
pub struct FakeWiki {
    pub files: Mutex<Vec<ArticleFile>>,
}

impl FakeWiki {
    pub fn new(files: Vec<ArticleFile>) -> Self {
        Self {
            files: Mutex::new(files),
        }
    }
}

#[async_trait]
impl WikiSource for FakeWiki {
    async fn list_articles(&self) -> Result<Vec<ArticleFile>, PortError> {
        Ok(self.files.lock().unwrap().clone())
    }
}

/// Latest releases keyed by lowercased `owner/name`; unknown repos are not found.
#[derive(Default)]
pub struct FakeReleases {
    pub releases: Mutex<HashMap<String, Release>>,
}

impl FakeReleases {
    pub fn set(&self, key: &str, tag: &str, published: DateTime<Utc>) {
        self.releases.lock().unwrap().insert(
            key.to_lowercase(),
            Release {
                name: tag.into(),
                tag: tag.into(),
                url: format!("https://github.com/{key}/releases/tag/{tag}"),
                publish_date: Some(published),
            },
        );
    }
}

#[async_trait]
impl ReleaseLookup for FakeReleases {
    async fn latest_release(&self, owner: &str, repo: &str) -> Result<Release, PortError> {
        tokio::task::yield_now().await;
        let key = format!("{owner}/{repo}").to_lowercase();
        self.releases
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or(PortError::NotFound(key))
    }
}

/// Files issues in memory; titles mentioning a name in `failing` are rejected.
#[derive(Default)]
pub struct FakeTracker {
    pub filed: Mutex<Vec<IssuePayload>>,
    pub failing: Mutex<HashSet<String>>,
}

impl FakeTracker {
    pub fn fail_for(&self, article: &str) {
        self.failing.lock().unwrap().insert(article.to_string());
    }

    pub fn recover(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub fn filed_titles(&self) -> Vec<String> {
        self.filed
            .lock()
            .unwrap()
            .iter()
            .map(|i| i.title.clone())
            .collect()
    }
}

#[async_trait]
impl IssueTracker for FakeTracker {
    async fn create_issue(&self, issue: &IssuePayload) -> Result<String, PortError> {
        tokio::task::yield_now().await;
        if self
            .failing
            .lock()
            .unwrap()
            .iter()
            .any(|a| issue.title.contains(a.as_str()))
        {
            return Err(PortError::RateLimited {
                retry_after_secs: 60,
            });
        }
        let mut filed = self.filed.lock().unwrap();
        filed.push(issue.clone());
        Ok(format!(
            "https://github.com/{}/{}/issues/{}",
            issue.owner,
            issue.repo,
            filed.len()
        ))
    }
}

pub struct Harness {
    pub wiki: Arc<FakeWiki>,
    pub releases: Arc<FakeReleases>,
    pub tracker: Arc<FakeTracker>,
}

impl Harness {
    pub fn new(files: Vec<ArticleFile>) -> Self {
        Self {
            wiki: Arc::new(FakeWiki::new(files)),
            releases: Arc::new(FakeReleases::default()),
            tracker: Arc::new(FakeTracker::default()),
        }
    }

    pub fn context(&self, ledger: Ledger, options: RunOptions) -> RunContext {
        RunContext {
            source: Arc::clone(&self.wiki) as Arc<dyn WikiSource>,
            lookup: Arc::clone(&self.releases) as Arc<dyn ReleaseLookup>,
            tracker: Arc::clone(&self.tracker) as Arc<dyn IssueTracker>,
            ledger,
            target: IssueTarget {
                owner: "airalab".into(),
                repo: "robonomics-wiki".into(),
                labels: vec!["deprecation".into()],
                assign_contributors: true,
            },
            options,
        }
    }
}
