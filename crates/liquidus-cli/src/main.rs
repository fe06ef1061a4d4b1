//! `liquidus`: log drinks, review intake and serve the JSON API.
//!
//! # Usage
//!
//! ```
//! liquidus log 250 --type coffee
//! liquidus day --date 2024-03-04
//! liquidus serve --port 5240
//! ```
//!
//! Configuration is read from `liquidus.toml` (or `--config FILE`) and
//! `LIQUIDUS_*` environment variables.

mod commands;
mod health_file;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use health_file::JsonFileSource;
use liquidus_core::units::Units;
use liquidus_store_sqlite::SqliteStore;
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "liquidus", version, about = "Hydration tracker")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "liquidus.toml")]
  config: PathBuf,

  /// Store location; overrides `store_path` from the config file.
  #[arg(long, env = "LIQUIDUS_STORE_PATH")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Log a drink. Defaults to water, logged now.
  Log {
    amount: f64,
    /// Drink type name.
    #[arg(long = "type")]
    type_name: Option<String>,
    /// When the drink was had (RFC 3339).
    #[arg(long)]
    at: Option<DateTime<Utc>>,
  },
  /// Progress for a day (default today).
  Day {
    #[arg(long)]
    date: Option<String>,
  },
  /// Progress for the Sunday to Saturday week containing a day.
  Week {
    #[arg(long)]
    date: Option<String>,
  },
  /// List drinks of a day, newest first.
  Drinks {
    #[arg(long)]
    date: Option<String>,
    /// List the whole week instead.
    #[arg(long)]
    week: bool,
  },
  /// Remove a logged drink.
  Undo { record_id: Uuid },
  /// Set the daily goal, in the current units.
  Goal { amount: f64 },
  /// Switch display units, converting stored amounts.
  Units { units: Units },
  /// Manage drink types.
  #[command(subcommand)]
  Types(TypesCommand),
  /// Import water samples from a JSON health export.
  Sync {
    #[arg(long)]
    file: PathBuf,
  },
  /// Serve the JSON API under `/api`.
  Serve {
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
  },
}

#[derive(Subcommand)]
enum TypesCommand {
  List,
  Add { name: String },
  Enable { name: String },
  Disable { name: String },
  Delete { name: String },
}

// ─── Config file ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
struct CliConfig {
  store_path: PathBuf,
  host:       String,
  port:       u16,
}

fn load_config(path: &Path) -> anyhow::Result<CliConfig> {
  let settings = config::Config::builder()
    .set_default("store_path", "~/.local/share/liquidus/liquidus.db")?
    .set_default("host", "127.0.0.1")?
    .set_default("port", 5240)?
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("LIQUIDUS"))
    .build()
    .context("failed to read config file")?;

  settings
    .try_deserialize()
    .context("failed to deserialise configuration")
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = load_config(&cli.config)?;

  let store_path = expand_tilde(cli.store.as_deref().unwrap_or(&cfg.store_path));
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    tokio::fs::create_dir_all(parent)
      .await
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match cli.command {
    Command::Log { amount, type_name, at } => {
      commands::log(&store, amount, type_name.as_deref(), at).await?;
    }
    Command::Day { date } => {
      commands::day(&store, date.as_deref()).await?;
    }
    Command::Week { date } => {
      commands::week(&store, date.as_deref()).await?;
    }
    Command::Drinks { date, week } => {
      commands::drinks(&store, date.as_deref(), week).await?;
    }
    Command::Undo { record_id } => commands::undo(&store, record_id).await?,
    Command::Goal { amount } => commands::goal(&store, amount).await?,
    Command::Units { units } => commands::units(&store, units).await?,
    Command::Types(cmd) => match cmd {
      TypesCommand::List => commands::list_types(&store).await?,
      TypesCommand::Add { name } => {
        commands::add_type(&store, &name).await?;
      }
      TypesCommand::Enable { name } => {
        commands::set_type_enabled(&store, &name, true).await?;
      }
      TypesCommand::Disable { name } => {
        commands::set_type_enabled(&store, &name, false).await?;
      }
      TypesCommand::Delete { name } => commands::delete_type(&store, &name).await?,
    },
    Command::Sync { file } => {
      commands::sync(&store, &JsonFileSource::new(file)).await?;
    }
    Command::Serve { host, port } => {
      let address = format!(
        "{}:{}",
        host.unwrap_or(cfg.host),
        port.unwrap_or(cfg.port),
      );
      serve(store, &address).await?;
    }
  }

  Ok(())
}

async fn serve(store: SqliteStore, address: &str) -> anyhow::Result<()> {
  let app = axum::Router::new().nest("/api", liquidus_api::api_router(Arc::new(store)));

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(address)
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
