//! rental-admin: terminal console for the rental business
//!
//! Every console page is a subcommand; `watch` keeps the push channel open
//! and prints alerts as they arrive.
//!
//! ```bash
//! rental-admin login -u admin
//! rental-admin bookings list --search asha
//! rental-admin bookings cancel 665f1c... --reason "duplicate entry"
//! rental-admin report --status cancelled --dir ./reports
//! rental-admin watch
//! ```

use clap::Parser;
use rental_client::config::derive_push_url;
use rental_client::{AdminApp, ClientConfig};
use std::path::PathBuf;

mod cli;
mod commands;
mod render;

use cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rental_admin=info,rental_client=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let push_pinned = std::env::var_os("RENTAL_PUSH_URL").is_some();
    let config = apply_overrides(
        ClientConfig::from_env(),
        cli.api_url,
        cli.token_path,
        push_pinned,
    );

    let app = AdminApp::from_config(config)?;
    let result = commands::run(&app, cli.command).await;
    app.shutdown().await;

    if let Err(e) = &result {
        tracing::error!("Command failed: {e:#}");
    }
    result
}

/// Command line overrides on top of the environment. The push origin follows
/// `--api-url` unless it was configured explicitly.
fn apply_overrides(
    mut config: ClientConfig,
    api_url: Option<String>,
    token_path: Option<PathBuf>,
    push_pinned: bool,
) -> ClientConfig {
    if let Some(api) = api_url {
        if !push_pinned {
            config.push_url = derive_push_url(&api);
        }
        config.api_base_url = api;
    }
    if let Some(path) = token_path {
        config = config.with_token_path(path);
    }
    config
}
