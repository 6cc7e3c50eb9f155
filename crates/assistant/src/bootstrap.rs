//! AppState construction shared by the `console` and `show` commands.

use std::sync::Arc;

use anyhow::Context;

use cs_domain::config::{AdvisorConfig, Config, ConfigSeverity};
use cs_load::{FileKvStore, KvStore, LoadRepository, LoadSession, MemoryKvStore};
use cs_providers::{AdvisoryOracle, FallbackOracle, GeminiOracle};

use crate::runtime::{Advisor, AdvisorSettings};
use crate::state::AppState;

/// Where load state lives for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    /// `storage.state_path` on disk.
    Persistent,
    /// In memory; nothing survives the process.
    Ephemeral,
}

/// Validate config, open the load session and start the advisor.
pub async fn build_app_state(config: Arc<Config>, mode: StorageMode) -> anyhow::Result<AppState> {
    check_config(&config)?;

    let session = open_session(&config, mode)?;
    let oracle = build_oracle(&config.advisor);
    let advisor = Advisor::spawn(
        oracle,
        session.subscribe(),
        AdvisorSettings::from_config(&config.advisor),
    );

    Ok(AppState {
        config,
        session,
        advisor,
    })
}

/// Log every config issue; fail when any of them is an error.
pub fn check_config(config: &Config) -> anyhow::Result<()> {
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    let errors = issues
        .iter()
        .filter(|i| i.severity == ConfigSeverity::Error)
        .count();
    if errors > 0 {
        anyhow::bail!("config validation failed with {errors} error(s)");
    }
    Ok(())
}

/// Open the key-value store and load the session from it.
pub fn open_session(config: &Config, mode: StorageMode) -> anyhow::Result<LoadSession> {
    let store: Arc<dyn KvStore> = match mode {
        StorageMode::Persistent => Arc::new(
            FileKvStore::new(&config.storage.state_path).with_context(|| {
                format!(
                    "initializing state store at {}",
                    config.storage.state_path.display()
                )
            })?,
        ),
        StorageMode::Ephemeral => {
            tracing::info!("ephemeral run, load state will not be saved");
            Arc::new(MemoryKvStore::new())
        }
    };

    let repo = LoadRepository::new(store);
    Ok(LoadSession::open(repo, config.load.default_capacity_kg))
}

/// The remote oracle when enabled and a key resolves; otherwise an oracle
/// that always defers to the local judgment.
pub fn build_oracle(cfg: &AdvisorConfig) -> Arc<dyn AdvisoryOracle> {
    if !cfg.enabled {
        tracing::info!("advisor disabled in config, using local judgment only");
        return Arc::new(FallbackOracle::new("advisor disabled in config"));
    }
    match GeminiOracle::from_config(cfg) {
        Ok(oracle) => {
            tracing::info!(model = %oracle.model(), "gemini advisor ready");
            Arc::new(oracle)
        }
        Err(e) => {
            tracing::warn!(error = %e, "gemini advisor unavailable, using local judgment only");
            Arc::new(FallbackOracle::new(e.to_string()))
        }
    }
}
