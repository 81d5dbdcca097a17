//! Repository references parsed from declared dependency URLs.
//!
//! Declared URLs may point anywhere inside a repository
//! (`https://github.com/{owner}/{repo}/releases/tag/{tag}`, `/tree/main`, ...).
//! Path segments 3 and 4 are the owner and repository; a
//! `releases/tag/{tag}` suffix pins the release the article documents.

use crate::error::ParseError;

/// Owner/name pair with the canonical repo URL and an optional pinned tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
    /// First five `/`-separated segments of the declared URL.
    pub url: String,
    pub pinned_tag: Option<String>,
}

impl RepoRef {
    /// Parse a declared dependency URL.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidRepoUrl`] when the URL is not absolute
    /// or lacks an owner or repository segment.
    pub fn parse(url: &str) -> Result<Self, ParseError> {
        let trimmed = url.trim();
        let invalid = || ParseError::InvalidRepoUrl(trimmed.to_string());

        let (scheme, rest) = trimmed.split_once("://").ok_or_else(invalid)?;
        if scheme != "https" && scheme != "http" {
            return Err(invalid());
        }

        let rest = rest.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = rest.split('/').collect();
        let (host, owner, raw_name) = match segments.as_slice() {
            [host, owner, name, ..] if !host.is_empty() && !owner.is_empty() && !name.is_empty() => {
                (*host, *owner, *name)
            }
            _ => return Err(invalid()),
        };
        let name = raw_name.strip_suffix(".git").unwrap_or(raw_name);
        if name.is_empty() {
            return Err(invalid());
        }

        let pinned_tag = match segments.get(3..6) {
            Some(["releases", "tag", tag]) if !tag.is_empty() => Some((*tag).to_string()),
            _ => None,
        };

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
            url: format!("{scheme}://{host}/{owner}/{name}"),
            pinned_tag,
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("https://github.com/airalab/robonomics", "airalab", "robonomics", None)]
    #[case("https://github.com/airalab/robonomics/", "airalab", "robonomics", None)]
    #[case("https://github.com/airalab/robonomics.git", "airalab", "robonomics", None)]
    #[case(
        "https://github.com/airalab/robonomics/releases/tag/v2.6.0",
        "airalab",
        "robonomics",
        Some("v2.6.0")
    )]
    #[case("https://github.com/airalab/robonomics/tree/master/docs", "airalab", "robonomics", None)]
    #[case("https://github.com/airalab/robonomics?tab=readme", "airalab", "robonomics", None)]
    fn parses_repository_urls(
        #[case] url: &str,
        #[case] owner: &str,
        #[case] name: &str,
        #[case] tag: Option<&str>,
    ) {
        let parsed = RepoRef::parse(url).unwrap();
        assert_eq!(parsed.owner, owner);
        assert_eq!(parsed.name, name);
        assert_eq!(parsed.url, format!("https://github.com/{owner}/{name}"));
        assert_eq!(parsed.pinned_tag.as_deref(), tag);
    }

    #[rstest]
    #[case("github.com/airalab/robonomics")]
    #[case("ftp://github.com/airalab/robonomics")]
    #[case("https://github.com/airalab")]
    #[case("https://github.com//robonomics")]
    #[case("https://github.com/airalab/.git")]
    fn rejects_non_repository_urls(#[case] url: &str) {
        assert!(matches!(
            RepoRef::parse(url),
            Err(ParseError::InvalidRepoUrl(_))
        ));
    }
}
