use anyhow::Context;
use drift_config::DriftConfig;
use drift_db::Ledger;
use drift_github::{GithubClient, GithubWiki};

/// Loaded configuration plus constructors for the adapters commands need.
pub struct AppContext {
    pub config: DriftConfig,
}

impl AppContext {
    pub fn load() -> anyhow::Result<Self> {
        let config = DriftConfig::load_with_dotenv().context("failed to load configuration")?;
        if !config.github.is_configured() {
            tracing::debug!("no GitHub token configured, using anonymous access");
        }
        Ok(Self { config })
    }

    pub fn github(&self) -> GithubClient {
        GithubClient::new(&self.config.github)
    }

    pub fn wiki(&self, client: GithubClient) -> GithubWiki {
        GithubWiki::new(
            client,
            &self.config.wiki,
            self.config.pipeline.lookup_concurrency,
        )
    }

    pub async fn open_ledger(&self) -> anyhow::Result<Ledger> {
        let path = &self.config.ledger.path;
        Ledger::open_local(path)
            .await
            .with_context(|| format!("failed to open ledger at {path}"))
    }
}
