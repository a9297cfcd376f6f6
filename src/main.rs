mod app;
mod cache;
mod catalog;
mod commands;
mod config;
mod event;
mod logging;
mod query;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "bazar")]
#[command(about = "A terminal storefront for the Bazar Universal catalog")]
#[command(version)]
struct Args {
  /// Path to config file (default: ./bazar.yaml or $XDG_CONFIG_HOME/bazar/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// API deployment to use (overrides the build default)
  #[arg(short, long, value_enum)]
  mode: Option<config::BuildMode>,

  /// API base URL (overrides --mode)
  #[arg(long)]
  api_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let _log_guard = logging::init()?;

  // Load configuration, then apply command line overrides
  let mut config = config::Config::load(args.config.as_deref())?;
  if let Some(mode) = args.mode {
    config.api.mode = Some(mode);
  }
  if let Some(url) = args.api_url {
    config.api.base_url = Some(url);
  }

  let client = catalog::RemoteClient::from_config(&config.api)?;
  tracing::info!(base_url = client.base_url(), mode = ?config.api.mode(), "starting");

  let store = Arc::new(catalog::Repository::new(client));

  let mut app = app::App::new(config, store);
  app.run().await?;

  Ok(())
}
