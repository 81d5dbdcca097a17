use serde::{Deserialize, Serialize};

/// A contributor handle. Only used to address notifications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GithubAccount {
    pub username: String,
}

impl GithubAccount {
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    /// The `@username` form used in issue bodies.
    #[must_use]
    pub fn handle(&self) -> String {
        format!("@{}", self.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_prefixes_at_sign() {
        assert_eq!(GithubAccount::new("octocat").handle(), "@octocat");
    }
}
