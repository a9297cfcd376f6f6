use clap::ValueEnum;
use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const PRODUCTION_URL: &str = "https://api-bazar-universal-u1nf.onrender.com/api/v1";
const LOCAL_URL: &str = "http://localhost:8000/api/v1";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub api: ApiConfig,
  /// Custom title for header (defaults to the API host if not set)
  pub title: Option<String>,
}

/// Which deployment of the API to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
  /// Hosted API
  Production,
  /// API running on this machine
  Local,
}

impl BuildMode {
  /// Release builds talk to production, debug builds to a local API
  pub fn from_build() -> Self {
    if cfg!(debug_assertions) {
      BuildMode::Local
    } else {
      BuildMode::Production
    }
  }

  pub fn base_url(&self) -> &'static str {
    match self {
      BuildMode::Production => PRODUCTION_URL,
      BuildMode::Local => LOCAL_URL,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// Deployment to use; defaults to the build mode
  pub mode: Option<BuildMode>,
  /// Explicit base URL, wins over `mode`
  pub base_url: Option<String>,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
  10
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      mode: None,
      base_url: None,
      timeout_secs: default_timeout_secs(),
    }
  }
}

impl ApiConfig {
  pub fn mode(&self) -> BuildMode {
    self.mode.unwrap_or_else(BuildMode::from_build)
  }

  pub fn base_url(&self) -> String {
    self
      .base_url
      .clone()
      .unwrap_or_else(|| self.mode().base_url().to_string())
  }

  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided (must exist)
  /// 2. ./bazar.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/bazar/config.yaml
  ///
  /// With no file anywhere the defaults apply.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("bazar.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("bazar").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
    // An empty file is a valid, all-defaults config
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    serde_yaml::from_str(contents)
  }
}
