use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use cs_assistant::bootstrap;
use cs_assistant::cli::{Cli, Command, ConfigCommand};
use cs_domain::config::{LogFormat, ObservabilityConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mode = cli.storage_mode();

    match cli.command {
        // Default to the console when no subcommand is given.
        None | Some(Command::Console) => {
            let (config, _) = cs_assistant::cli::load_config()?;
            init_tracing(&config.observability);
            cs_assistant::cli::console::console(Arc::new(config), mode).await
        }
        Some(Command::Show { json }) => {
            let (config, _) = cs_assistant::cli::load_config()?;
            init_tracing(&config.observability);
            bootstrap::check_config(&config)?;
            let session = bootstrap::open_session(&config, mode)?;
            cs_assistant::cli::show::show(&session.snapshot(), json)
        }
        Some(Command::Config(ConfigCommand::Validate)) => {
            let (config, config_path) = cs_assistant::cli::load_config()?;
            let valid = cs_assistant::cli::config::validate(&config, &config_path);
            if !valid {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::Config(ConfigCommand::Show)) => {
            let (config, _) = cs_assistant::cli::load_config()?;
            cs_assistant::cli::config::show(&config)
        }
        Some(Command::Version) => {
            println!("cargasegura {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Initialize tracing on stderr so stdout stays clean for console output.
///
/// `RUST_LOG` wins over the configured filter.
fn init_tracing(obs: &ObservabilityConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(obs.default_filter()));

    match obs.log_format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Compact => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .compact()
                .init();
        }
    }
}
