//! # drift-parser
//!
//! Front-matter and repository reference parsing for wikidrift.
//!
//! Articles declare their dependencies and contributors in a YAML front-matter
//! block delimited by `---` lines:
//!
//! ```text
//! ---
//! title: Connect a sensor
//! contributors: [alice, "@bob"]
//! dependencies:
//!   - name: Robonomics
//!     url: https://github.com/airalab/robonomics/releases/tag/v2.6.0
//!   - Substrate: https://github.com/paritytech/substrate
//!   - https://github.com/home-assistant/core
//! ---
//! ```
//!
//! Malformed declarations are skipped with a warning; they never abort the article.

mod error;
mod front_matter;
mod repo_ref;

pub use error::ParseError;
pub use front_matter::{DeclaredDependency, extract_contributors_usernames, extract_dependencies};
pub use repo_ref::RepoRef;
