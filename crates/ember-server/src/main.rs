//! ember-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the platform API over HTTP. Two
//! background tasks run on intervals: the lifecycle purge sweep and the
//! daily quota replenishment.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::Context as _;
use chrono::Utc;
use clap::Parser;
use ember_core::{policy::PlatformPolicy, store::PlatformStore};
use ember_store_sqlite::SqliteStore;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Ember platform server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
struct ServerConfig {
  host:       String,
  port:       u16,
  store_path: PathBuf,
  /// Plan grants, trust weights, and lifecycle windows. Defaults apply
  /// field-by-field, so a config file can override just one knob.
  #[serde(default)]
  policy: PlatformPolicy,
  #[serde(default = "default_purge_interval_secs")]
  purge_interval_secs: u64,
  #[serde(default = "default_replenish_interval_secs")]
  replenish_interval_secs: u64,
}

fn default_purge_interval_secs() -> u64 { 3600 }

fn default_replenish_interval_secs() -> u64 { 3600 }

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
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("EMBER"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path, server_cfg.policy.clone())
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let store = Arc::new(store);

  spawn_purge_sweeper(
    Arc::clone(&store),
    Duration::from_secs(server_cfg.purge_interval_secs),
  );
  spawn_replenisher(
    Arc::clone(&store),
    Duration::from_secs(server_cfg.replenish_interval_secs),
  );

  let app = ember_api::api_router(store).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Periodically purge accounts whose deletion grace period has elapsed
/// and expire stale data exports.
fn spawn_purge_sweeper(store: Arc<SqliteStore>, period: Duration) {
  tokio::spawn(async move {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
      ticker.tick().await;
      match store.run_purge_sweep(Utc::now()).await {
        Ok(report) => {
          if !report.purged.is_empty() || report.exports_expired > 0 {
            tracing::info!(
              purged = report.purged.len(),
              expired = report.exports_expired,
              blocked = report.blocked.len(),
              "purge sweep finished"
            );
          }
        }
        Err(error) => tracing::error!(%error, "purge sweep failed"),
      }
    }
  });
}

/// Periodically top quota counters back up to their standing grants.
/// Replenishment is per-user idempotent, so a short interval is safe.
fn spawn_replenisher(store: Arc<SqliteStore>, period: Duration) {
  tokio::spawn(async move {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
      ticker.tick().await;
      match store.replenish_all(Utc::now()).await {
        Ok(0) => {}
        Ok(touched) => {
          tracing::info!(touched, "quota replenishment finished");
        }
        Err(error) => tracing::error!(%error, "quota replenishment failed"),
      }
    }
  });
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
