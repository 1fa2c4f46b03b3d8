//! Binary entry point: load and validate config, then run the listener.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;

use zounce::config::{load_config, render_all, ConfigError};
use zounce::irc;
use zounce::lifecycle::{signals, Shutdown};
use zounce::net::{self, Listener, DEFAULT_MAX_CONNECTIONS};
use zounce::observability::init_logging;

#[derive(Parser)]
#[command(name = "zounce")]
#[command(about = "A certificate-authenticated IRC bouncer", long_about = None)]
struct Cli {
    /// Configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Server certificate presented to connecting clients (PEM).
    #[arg(long, default_value = "keys/zounce.crt")]
    cert: PathBuf,

    /// Private key for the server certificate (PEM).
    #[arg(long, default_value = "keys/zounce.key")]
    key: PathBuf,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    tracing::info!("zounce starting");

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(ConfigError::Invalid(violations)) => {
            for line in render_all(&violations) {
                tracing::error!("{line}");
            }
            return Err("configuration is invalid".into());
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!(
        title = %config.title,
        port = config.port,
        users = config.users.len(),
        "Configuration loaded"
    );

    if cli.check {
        return Ok(());
    }

    for (name, user) in &config.users {
        tracing::info!(user = %name, nick = %user.nick, "Welcome");
    }

    // One outbound session per (user, network). Sessions that fail stay
    // down until restart; reconnect handling is not implemented.
    for (name, user) in &config.users {
        for (label, network) in &user.networks {
            let user = user.clone();
            let name = name.clone();
            let label = label.clone();
            let network = network.clone();
            tokio::spawn(async move {
                if let Err(err) = irc::connect_network(&user, &label, &network).await {
                    tracing::warn!(
                        user = %name,
                        network = %label,
                        error = %err,
                        "Network session ended"
                    );
                }
            });
        }
    }

    let tls = net::server_config(&cli.cert, &cli.key, Path::new(&config.ca_path))?;
    let listener = Listener::bind(config.port, tls, DEFAULT_MAX_CONNECTIONS).await?;

    let shutdown = Arc::new(Shutdown::new());
    tokio::spawn({
        let shutdown = Arc::clone(&shutdown);
        async move {
            signals::trigger_on_ctrl_c(&shutdown).await;
        }
    });

    listener.run(&shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
