//! Conflict identity.
//!
//! The hash is the primary key of a conflict in the ledger and must be stable
//! across runs and releases of this tool. Changing the input encoding would
//! re-report every known conflict.

use sha2::{Digest, Sha256};

/// Field separator fed to the digest between inputs.
const SEPARATOR: u8 = 0;

/// Deterministic hash of an article/dependency/release triple.
///
/// Returns the lowercase hex SHA-256 of `filename NUL repo NUL release`.
#[must_use]
pub fn conflict_hash(filename: &str, repo_name: &str, release_name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(filename.as_bytes());
    hasher.update([SEPARATOR]);
    hasher.update(repo_name.as_bytes());
    hasher.update([SEPARATOR]);
    hasher.update(release_name.as_bytes());
    hex::encode(hasher.finalize())
}

/// Diagnostic signature: `"<filename> -> <repo>@<release>"`.
#[must_use]
pub fn conflict_signature(filename: &str, repo_name: &str, release_name: &str) -> String {
    format!("{filename} -> {repo_name}@{release_name}")
}
