//! # drift-config
//!
//! Layered configuration loading for wikidrift using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`WIKIDRIFT_*` prefix, `__` as separator)
//! 2. Project-level `.wikidrift/config.toml`
//! 3. User-level `~/.config/wikidrift/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `WIKIDRIFT_GITHUB__TOKEN` -> `github.token`,
//! `WIKIDRIFT_PIPELINE__LOOKUP_FAILURE` -> `pipeline.lookup_failure`, etc.
//!
//! ```no_run
//! use drift_config::DriftConfig;
//!
//! let config = DriftConfig::load_with_dotenv().expect("config");
//! if config.wiki.is_configured() {
//!     println!("Wiki: {}/{}", config.wiki.owner, config.wiki.repo);
//! }
//! ```

mod error;
mod github;
mod issues;
mod ledger;
mod pipeline;
mod wiki;

pub use error::ConfigError;
pub use github::GithubConfig;
pub use issues::IssuesConfig;
pub use ledger::LedgerConfig;
pub use pipeline::PipelineConfig;
pub use wiki::WikiConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project-local config file, relative to the working directory.
pub const LOCAL_CONFIG_PATH: &str = ".wikidrift/config.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DriftConfig {
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub wiki: WikiConfig,
    #[serde(default)]
    pub issues: IssuesConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl DriftConfig {
    /// Load configuration from TOML files and environment variables.
    ///
    /// Does not read `.env`; use [`Self::load_with_dotenv`] for that.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source is malformed or a value
    /// has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load `.env` from the working directory, then [`Self::load`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests and callers can layer extra providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(LOCAL_CONFIG_PATH);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("WIKIDRIFT_").split("__"))
    }

    /// Path to the user-global config file.
    #[must_use]
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("wikidrift").join("config.toml"))
    }

    /// Check the sections needed to read the wiki and detect conflicts.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotConfigured`] if the wiki location is missing, or
    /// [`ConfigError::InvalidValue`] for an empty extension.
    pub fn require_detect(&self) -> Result<(), ConfigError> {
        if !self.wiki.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "wiki".into(),
            });
        }
        if self.wiki.extension.trim_start_matches('.').is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "wiki.extension".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Check everything a full run needs. Dry runs never file issues, so
    /// they only need what detection needs.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotConfigured`] naming the first missing section.
    pub fn require_run(&self, dry_run: bool) -> Result<(), ConfigError> {
        self.require_detect()?;
        if dry_run {
            return Ok(());
        }
        if !self.issues.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "issues".into(),
            });
        }
        if !self.github.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "github".into(),
            });
        }
        Ok(())
    }
}
