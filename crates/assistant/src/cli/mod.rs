pub mod commands;
pub mod config;
pub mod console;
pub mod render;
pub mod show;

use clap::{Parser, Subcommand};

use crate::bootstrap::StorageMode;

/// CargaSegura: van load calculator with safety advice.
#[derive(Debug, Parser)]
#[command(name = "cargasegura", version, about)]
pub struct Cli {
    /// Keep load state in memory only (nothing is read from or written to
    /// the state directory).
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    pub fn storage_mode(&self) -> StorageMode {
        if self.ephemeral {
            StorageMode::Ephemeral
        } else {
            StorageMode::Persistent
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive load console (default when no subcommand is given).
    Console,
    /// Print the saved load and its totals, then exit.
    Show {
        /// Output as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path in `CS_CONFIG` (or
/// `cargasegura.toml` by default). A missing file yields the defaults.
/// Returns the parsed config and the path that was used.
pub fn load_config() -> anyhow::Result<(cs_domain::config::Config, String)> {
    let config_path =
        std::env::var("CS_CONFIG").unwrap_or_else(|_| "cargasegura.toml".into());
    let config = load_config_from(&config_path)?;
    Ok((config, config_path))
}

pub fn load_config_from(config_path: &str) -> anyhow::Result<cs_domain::config::Config> {
    if !std::path::Path::new(config_path).exists() {
        return Ok(cs_domain::config::Config::default());
    }
    let raw = std::fs::read_to_string(config_path)
        .map_err(|e| anyhow::anyhow!("reading {config_path}: {e}"))?;
    toml::from_str(&raw).map_err(|e| anyhow::anyhow!("parsing {config_path}: {e}"))
}
