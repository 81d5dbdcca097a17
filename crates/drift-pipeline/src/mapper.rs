//! Dependency Mapper: wiki files in, dependency graph out.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use drift_core::entities::{
    Article, ArticleFile, Dependency, DependencyGraph, GithubAccount, Release, Repo, RepoId,
    repo_key,
};
use drift_core::enums::LookupFailurePolicy;
use drift_core::ports::{PortError, ReleaseLookup, WikiSource};
use drift_parser::{RepoRef, extract_contributors_usernames, extract_dependencies};
use serde::Serialize;

use crate::error::PipelineError;
use crate::fan_out_limit;

/// A release lookup that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupFailure {
    pub owner: String,
    pub repo: String,
    pub error: String,
}

/// Result of the mapping stage.
#[derive(Debug)]
pub struct MappedGraph {
    pub graph: DependencyGraph,
    /// Lookups skipped under [`LookupFailurePolicy::Skip`], in first-declaration order.
    pub lookup_failures: Vec<LookupFailure>,
}

struct ParsedArticle {
    file: ArticleFile,
    refs: Vec<RepoRef>,
    contributors: Vec<String>,
}

/// Build the run's dependency graph.
///
/// Each distinct repository (by case-insensitive `owner/name`) is looked up
/// once; lookups run concurrently, at most `concurrency` at a time (`0` for
/// no cap), and all of them settle before this returns.
///
/// # Errors
///
/// [`PipelineError::Source`] if the wiki cannot be listed, and
/// [`PipelineError::Lookup`] if any lookup failed under
/// [`LookupFailurePolicy::Abort`].
pub async fn map_dependencies(
    source: &dyn WikiSource,
    lookup: Arc<dyn ReleaseLookup>,
    policy: LookupFailurePolicy,
    concurrency: usize,
) -> Result<MappedGraph, PipelineError> {
    let started = Instant::now();
    let files = source.list_articles().await.map_err(PipelineError::Source)?;
    tracing::debug!(
        articles = files.len(),
        elapsed_secs = started.elapsed().as_secs_f64(),
        "fetched articles"
    );

    let parsed: Vec<ParsedArticle> = files.into_iter().map(parse_article).collect();
    let distinct = distinct_repos(&parsed);

    let lookup_started = Instant::now();
    let results = lookup_all(lookup, &distinct, concurrency).await;
    tracing::debug!(
        repos = distinct.len(),
        elapsed_secs = lookup_started.elapsed().as_secs_f64(),
        "fetched latest releases"
    );

    let mut graph = DependencyGraph::new();
    let mut failures = Vec::new();
    for (repo_ref, result) in distinct.iter().zip(results) {
        match result {
            Ok(release) => {
                graph.add_repo(Repo {
                    owner: repo_ref.owner.clone(),
                    name: repo_ref.name.clone(),
                    url: repo_ref.url.clone(),
                    latest_release: release,
                });
            }
            Err(error) => {
                tracing::warn!(
                    owner = %repo_ref.owner,
                    repo = %repo_ref.name,
                    %error,
                    "release lookup failed"
                );
                failures.push(LookupFailure {
                    owner: repo_ref.owner.clone(),
                    repo: repo_ref.name.clone(),
                    error: error.to_string(),
                });
            }
        }
    }

    if policy == LookupFailurePolicy::Abort && !failures.is_empty() {
        return Err(PipelineError::Lookup { failures });
    }

    for article in parsed {
        graph.add_article(resolve_article(&graph, article))?;
    }

    tracing::debug!(
        articles = graph.articles().len(),
        repos = graph.repos().len(),
        elapsed_secs = started.elapsed().as_secs_f64(),
        "dependency map complete"
    );
    Ok(MappedGraph {
        graph,
        lookup_failures: failures,
    })
}

fn parse_article(file: ArticleFile) -> ParsedArticle {
    let refs = extract_dependencies(&file.content)
        .into_iter()
        .filter_map(|declared| match declared.repo_ref() {
            Ok(repo_ref) => Some(repo_ref),
            Err(error) => {
                tracing::warn!(article = %file.name, %error, "skipping dependency");
                None
            }
        })
        .collect();
    let contributors = extract_contributors_usernames(&file.content);
    ParsedArticle {
        file,
        refs,
        contributors,
    }
}

/// One reference per repository, in first-declaration order.
fn distinct_repos(parsed: &[ParsedArticle]) -> Vec<RepoRef> {
    let mut seen = HashSet::new();
    let mut distinct = Vec::new();
    for repo_ref in parsed.iter().flat_map(|p| &p.refs) {
        if seen.insert(repo_key(&repo_ref.owner, &repo_ref.name)) {
            distinct.push(repo_ref.clone());
        }
    }
    distinct
}

async fn lookup_all(
    lookup: Arc<dyn ReleaseLookup>,
    repos: &[RepoRef],
    concurrency: usize,
) -> Vec<Result<Release, PortError>> {
    let semaphore = fan_out_limit(concurrency);
    let mut set = tokio::task::JoinSet::new();

    for (idx, repo_ref) in repos.iter().enumerate() {
        let lookup = Arc::clone(&lookup);
        let sem = Arc::clone(&semaphore);
        let owner = repo_ref.owner.clone();
        let name = repo_ref.name.clone();
        set.spawn(async move {
            let Ok(_permit) = sem.acquire().await else {
                return (idx, Err(PortError::Transport("lookup limiter closed".into())));
            };
            (idx, lookup.latest_release(&owner, &name).await)
        });
    }

    let mut results: Vec<Result<Release, PortError>> = repos
        .iter()
        .map(|_| Err(PortError::Transport("lookup task did not complete".into())))
        .collect();
    while let Some(res) = set.join_next().await {
        match res {
            Ok((idx, result)) => results[idx] = result,
            Err(e) => tracing::warn!(%e, "release lookup task failed"),
        }
    }
    results
}

/// Resolve an article's references against the graph, dropping repos whose
/// lookup failed and repeated declarations of the same repo.
fn resolve_article(graph: &DependencyGraph, parsed: ParsedArticle) -> Article {
    let mut dependencies: Vec<Dependency> = Vec::with_capacity(parsed.refs.len());
    for repo_ref in parsed.refs {
        let Some(id) = graph.repo_id(&repo_ref.owner, &repo_ref.name) else {
            continue;
        };
        if contains_repo(&dependencies, id) {
            tracing::debug!(article = %parsed.file.name, repo = %repo_ref.name, "duplicate dependency");
            continue;
        }
        dependencies.push(Dependency {
            repo: id,
            pinned_tag: repo_ref.pinned_tag,
        });
    }

    Article {
        filename: parsed.file.name,
        url: parsed.file.download_url,
        dependencies,
        contributors: parsed
            .contributors
            .into_iter()
            .map(GithubAccount::new)
            .collect(),
        last_modified_date: parsed.file.last_modified,
    }
}

fn contains_repo(dependencies: &[Dependency], id: RepoId) -> bool {
    dependencies.iter().any(|d| d.repo == id)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    struct Files(Vec<ArticleFile>);

    #[async_trait]
    impl WikiSource for Files {
        async fn list_articles(&self) -> Result<Vec<ArticleFile>, PortError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenWiki;

    #[async_trait]
    impl WikiSource for BrokenWiki {
        async fn list_articles(&self) -> Result<Vec<ArticleFile>, PortError> {
            Err(PortError::Unauthorized("bad token".into()))
        }
    }

    /// Answers from a table, counts calls, and tracks peak concurrency.
    #[derive(Default)]
    struct Releases {
        table: HashMap<String, String>,
        calls: Mutex<Vec<String>>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl Releases {
        fn with(entries: &[(&str, &str)]) -> Self {
            Self {
                table: entries
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl ReleaseLookup for Releases {
        async fn latest_release(&self, owner: &str, repo: &str) -> Result<Release, PortError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            let key = format!("{owner}/{repo}");
            self.calls.lock().unwrap().push(key.clone());
            let tag = self
                .table
                .get(&key)
                .ok_or_else(|| PortError::NotFound(key.clone()))?;
            Ok(Release {
                name: tag.clone(),
                tag: tag.clone(),
                url: format!("https://github.com/{key}/releases/tag/{tag}"),
                publish_date: Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()),
            })
        }
    }

    fn file(name: &str, front_matter: &str) -> ArticleFile {
        ArticleFile {
            name: name.into(),
            content: format!("---\n{front_matter}\n---\n\n# {name}\n"),
            download_url: format!("https://raw.githubusercontent.com/w/w/master/docs/en/{name}"),
            last_modified: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn maps_articles_with_resolved_dependencies() {
        let source = Files(vec![file(
            "sensor.md",
            "contributors: [alice, \"@bob\"]\ndependencies:\n  - https://github.com/airalab/robonomics/releases/tag/v1\n  - https://github.com/home-assistant/core",
        )]);
        let lookup = Arc::new(Releases::with(&[
            ("airalab/robonomics", "v2"),
            ("home-assistant/core", "2024.6"),
        ]));

        let mapped = map_dependencies(&source, lookup, LookupFailurePolicy::Skip, 4)
            .await
            .unwrap();
        let graph = &mapped.graph;
        assert!(mapped.lookup_failures.is_empty());
        assert_eq!(graph.articles().len(), 1);

        let article = &graph.articles()[0];
        assert_eq!(article.filename, "sensor.md");
        assert_eq!(article.contributor_usernames(), vec!["alice", "bob"]);
        assert!(article.url.ends_with("docs/en/sensor.md"));

        let deps: Vec<(&str, &str, Option<&str>)> = graph
            .dependencies_of(article)
            .map(|(d, r)| {
                (
                    r.name.as_str(),
                    r.latest_release.tag.as_str(),
                    d.pinned_tag.as_deref(),
                )
            })
            .collect();
        assert_eq!(
            deps,
            vec![("robonomics", "v2", Some("v1")), ("core", "2024.6", None)]
        );
        assert_eq!(graph.repos()[0].url, "https://github.com/airalab/robonomics");
    }

    #[tokio::test]
    async fn shared_repo_is_looked_up_once() {
        let source = Files(vec![
            file("a.md", "dependencies:\n  - https://github.com/airalab/robonomics"),
            file("b.md", "dependencies:\n  - https://github.com/AiraLab/Robonomics/tree/master"),
        ]);
        let lookup = Arc::new(Releases::with(&[("airalab/robonomics", "v2")]));

        let mapped = map_dependencies(
            &source,
            Arc::clone(&lookup) as Arc<dyn ReleaseLookup>,
            LookupFailurePolicy::Skip,
            4,
        )
        .await
        .unwrap();

        assert_eq!(lookup.calls.lock().unwrap().len(), 1);
        assert_eq!(mapped.graph.repos().len(), 1);
        for article in mapped.graph.articles() {
            assert_eq!(article.dependencies.len(), 1);
        }
    }

    #[tokio::test]
    async fn lookups_run_concurrently() {
        let source = Files(vec![file(
            "a.md",
            "dependencies:\n  - https://github.com/o/one\n  - https://github.com/o/two\n  - https://github.com/o/three",
        )]);
        let lookup = Arc::new(Releases::with(&[("o/one", "1"), ("o/two", "2"), ("o/three", "3")]));

        map_dependencies(
            &source,
            Arc::clone(&lookup) as Arc<dyn ReleaseLookup>,
            LookupFailurePolicy::Skip,
            0,
        )
        .await
        .unwrap();

        assert!(lookup.peak.load(Ordering::SeqCst) > 1);
    }

    #[tokio::test]
    async fn concurrency_cap_is_respected() {
        let source = Files(vec![file(
            "a.md",
            "dependencies:\n  - https://github.com/o/one\n  - https://github.com/o/two\n  - https://github.com/o/three",
        )]);
        let lookup = Arc::new(Releases::with(&[("o/one", "1"), ("o/two", "2"), ("o/three", "3")]));

        map_dependencies(
            &source,
            Arc::clone(&lookup) as Arc<dyn ReleaseLookup>,
            LookupFailurePolicy::Skip,
            1,
        )
        .await
        .unwrap();

        assert_eq!(lookup.peak.load(Ordering::SeqCst), 1);
        assert_eq!(lookup.calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn skip_policy_drops_failed_dependency() {
        let source = Files(vec![file(
            "y.md",
            "dependencies:\n  - https://github.com/o/missing\n  - https://github.com/o/present",
        )]);
        let lookup = Arc::new(Releases::with(&[("o/present", "v3")]));

        let mapped = map_dependencies(&source, lookup, LookupFailurePolicy::Skip, 4)
            .await
            .unwrap();

        assert_eq!(
            mapped.lookup_failures,
            vec![LookupFailure {
                owner: "o".into(),
                repo: "missing".into(),
                error: "not found: o/missing".into(),
            }]
        );
        let article = &mapped.graph.articles()[0];
        assert_eq!(article.dependencies.len(), 1);
        assert_eq!(mapped.graph.repo(article.dependencies[0].repo).name, "present");
    }

    #[tokio::test]
    async fn abort_policy_waits_for_siblings_then_fails() {
        let source = Files(vec![file(
            "y.md",
            "dependencies:\n  - https://github.com/o/missing\n  - https://github.com/o/present",
        )]);
        let lookup = Arc::new(Releases::with(&[("o/present", "v3")]));

        let err = map_dependencies(
            &source,
            Arc::clone(&lookup) as Arc<dyn ReleaseLookup>,
            LookupFailurePolicy::Abort,
            4,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, PipelineError::Lookup { ref failures } if failures.len() == 1));
        assert_eq!(lookup.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn malformed_declarations_do_not_drop_the_article() {
        let source = Files(vec![
            file("bad.md", "dependencies:\n  - not a url\n  - https://github.com/o/present"),
            file("plain.md", "title: no dependencies"),
        ]);
        let lookup = Arc::new(Releases::with(&[("o/present", "v3")]));

        let mapped = map_dependencies(&source, lookup, LookupFailurePolicy::Skip, 4)
            .await
            .unwrap();

        let articles = mapped.graph.articles();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].dependencies.len(), 1);
        assert!(articles[1].dependencies.is_empty());
    }

    #[tokio::test]
    async fn repeated_declaration_is_collapsed() {
        let source = Files(vec![file(
            "a.md",
            "dependencies:\n  - https://github.com/o/r/releases/tag/v1\n  - https://github.com/o/r",
        )]);
        let lookup = Arc::new(Releases::with(&[("o/r", "v2")]));

        let mapped = map_dependencies(&source, lookup, LookupFailurePolicy::Skip, 4)
            .await
            .unwrap();

        let deps = &mapped.graph.articles()[0].dependencies;
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].pinned_tag.as_deref(), Some("v1"));
    }

    #[tokio::test]
    async fn source_failure_is_fatal() {
        let lookup = Arc::new(Releases::default());
        let err = map_dependencies(&BrokenWiki, lookup, LookupFailurePolicy::Skip, 4)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Source(PortError::Unauthorized(_))));
    }
}
