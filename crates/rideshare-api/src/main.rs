//! rideshare API server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the JSON/XML API over HTTP.
//!
//! # Issuing a token
//!
//! Accounts carry no login endpoint; bearer tokens are minted out of band
//! with the configured secret:
//!
//! ```
//! cargo run -p rideshare-api --bin server -- --issue-token --subject 1 --role admin
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::Utc;
use clap::Parser;
use rideshare_api::{AppState, ServerConfig};
use rideshare_core::{model::Id, role::Role};
use rideshare_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Rideshare marketplace API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print a bearer token for `--subject` and `--role` and exit.
  #[arg(long, requires = "subject")]
  issue_token: bool,

  /// User id the token is issued for.
  #[arg(long)]
  subject: Option<Id>,

  /// Role the token carries.
  #[arg(long, default_value = "user")]
  role: Role,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config.clone()).required(false))
    .add_source(config::Environment::with_prefix("RIDESHARE"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Helper mode: mint a token and exit.
  if cli.issue_token {
    let subject = cli.subject.context("--issue-token needs --subject")?;
    println!("{}", server_cfg.decoder().issue(subject, cli.role, Utc::now()));
    return Ok(());
  }

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  // Build application state; rejects an inconsistent role table.
  let state = AppState::new(store, &server_cfg).context("invalid role configuration")?;

  let app = rideshare_api::router(state);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
