//! YAML front-matter extraction.

use serde::Deserialize;
use serde_yaml::Value;

use crate::error::ParseError;
use crate::repo_ref::RepoRef;

/// Opening and closing fence of a front-matter block.
const FENCE: &str = "---";

/// Front-matter fields wikidrift cares about. Unknown keys are ignored.
///
/// Older articles list dependencies under `tools`; both keys are read and merged.
#[derive(Debug, Default, Deserialize)]
struct FrontMatter {
    #[serde(default)]
    contributors: Option<Value>,
    #[serde(default)]
    dependencies: Option<Value>,
    #[serde(default)]
    tools: Option<Value>,
}

/// A dependency as declared by an article: display name plus URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredDependency {
    pub name: String,
    pub url: String,
}

impl DeclaredDependency {
    /// Resolve the declared URL into an owner/repo reference.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidRepoUrl`] when the URL has no owner/repo path.
    pub fn repo_ref(&self) -> Result<RepoRef, ParseError> {
        RepoRef::parse(&self.url)
    }
}

/// Return the raw YAML between the leading `---` fences, if the content has one.
#[must_use]
fn split_front_matter(content: &str) -> Option<&str> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != FENCE {
        return None;
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == FENCE || trimmed == "..." {
            return Some(&content[start..offset]);
        }
        offset += line.len();
    }
    None
}

/// Parse the front-matter block of `content`.
///
/// Returns `Ok(None)` when the article has no front matter.
///
/// # Errors
///
/// Returns [`ParseError::InvalidYaml`] when the block is not valid YAML.
fn parse_front_matter(content: &str) -> Result<Option<FrontMatter>, ParseError> {
    let Some(raw) = split_front_matter(content) else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(Some(FrontMatter::default()));
    }
    serde_yaml::from_str(raw)
        .map(Some)
        .map_err(|e| ParseError::InvalidYaml(e.to_string()))
}

/// Declared dependencies in declaration order.
///
/// Invalid front matter yields an empty list; individual malformed entries are
/// skipped. Both are logged.
#[must_use]
pub fn extract_dependencies(content: &str) -> Vec<DeclaredDependency> {
    let front_matter = match parse_front_matter(content) {
        Ok(Some(fm)) => fm,
        Ok(None) => return Vec::new(),
        Err(error) => {
            tracing::warn!(%error, "skipping dependencies of article with invalid front matter");
            return Vec::new();
        }
    };

    let mut entries = declarations(front_matter.dependencies);
    entries.extend(declarations(front_matter.tools));

    let mut declared = Vec::with_capacity(entries.len());
    for entry in &entries {
        match declaration_from_value(entry) {
            Ok(mut deps) => declared.append(&mut deps),
            Err(error) => tracing::warn!(%error, "skipping dependency declaration"),
        }
    }
    declared
}

/// Contributor usernames in declaration order, without `@` prefixes or duplicates.
///
/// Accepts a YAML list or a single comma-separated string.
#[must_use]
pub fn extract_contributors_usernames(content: &str) -> Vec<String> {
    let front_matter = match parse_front_matter(content) {
        Ok(Some(fm)) => fm,
        Ok(None) => return Vec::new(),
        Err(error) => {
            tracing::warn!(%error, "skipping contributors of article with invalid front matter");
            return Vec::new();
        }
    };

    let raw: Vec<String> = match front_matter.contributors {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
        Some(other) => scalar_to_string(&other)
            .map(|s| s.split(',').map(str::to_string).collect())
            .unwrap_or_default(),
    };

    let mut usernames: Vec<String> = Vec::with_capacity(raw.len());
    for name in raw {
        let name = name.trim().trim_start_matches('@').trim();
        if name.is_empty() || usernames.iter().any(|u| u.eq_ignore_ascii_case(name)) {
            continue;
        }
        usernames.push(name.to_string());
    }
    usernames
}

fn declarations(value: Option<Value>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(items)) => items,
        Some(single) => vec![single],
    }
}

fn declaration_from_value(value: &Value) -> Result<Vec<DeclaredDependency>, ParseError> {
    match value {
        Value::String(text) => declaration_from_text(text).map(|d| vec![d]),
        Value::Mapping(map) => {
            if let Some(url) = map.get("url") {
                let url = scalar_to_string(url).ok_or_else(|| {
                    ParseError::MalformedDependency(format!("non-scalar url: {url:?}"))
                })?;
                let name = map.get("name").and_then(scalar_to_string);
                return Ok(vec![named(name, url.trim())?]);
            }
            // `- Name: url` shorthand, possibly several pairs in one mapping.
            map.iter()
                .map(|(key, url)| {
                    let name = scalar_to_string(key);
                    let url = scalar_to_string(url).ok_or_else(|| {
                        ParseError::MalformedDependency(format!("non-scalar url: {url:?}"))
                    })?;
                    named(name, url.trim())
                })
                .collect()
        }
        other => Err(ParseError::MalformedDependency(format!("{other:?}"))),
    }
}

/// Parse `"<url>"` or `"<name words> <url>"`.
fn declaration_from_text(text: &str) -> Result<DeclaredDependency, ParseError> {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    let url_pos = tokens
        .iter()
        .rposition(|t| t.starts_with("http://") || t.starts_with("https://"))
        .ok_or_else(|| ParseError::MalformedDependency(text.to_string()))?;
    let url = tokens.remove(url_pos);
    let name = (!tokens.is_empty()).then(|| tokens.join(" "));
    named(name, url)
}

fn named(name: Option<String>, url: &str) -> Result<DeclaredDependency, ParseError> {
    let name = match name.map(|n| n.trim().to_string()) {
        Some(n) if !n.is_empty() => n,
        _ => RepoRef::parse(url)?.name,
    };
    Ok(DeclaredDependency {
        name,
        url: url.to_string(),
    })
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
