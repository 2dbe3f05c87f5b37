//! Optional TOML settings: a per-user file overlaid by `./.genscan.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-directory override file, looked up in the working directory.
pub const CWD_CONFIG_FILE: &str = ".genscan.toml";

/// Every key is optional; missing keys fall through to the next layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerConfig>,
    pub polling: Option<PollingConfig>,
    /// Only read by the TUI.
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub health_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PollingConfig {
    pub interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
    pub fps: Option<u32>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no platform config directory")]
    NoConfigDir,
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// A config section whose keys can be stacked, top layer first.
trait Layer: Sized {
    fn under(self, base: Self) -> Self;
}

impl Layer for ServerConfig {
    fn under(self, base: Self) -> Self {
        Self {
            url: self.url.or(base.url),
            request_timeout_secs: self.request_timeout_secs.or(base.request_timeout_secs),
            health_timeout_secs: self.health_timeout_secs.or(base.health_timeout_secs),
        }
    }
}

impl Layer for PollingConfig {
    fn under(self, base: Self) -> Self {
        Self {
            interval_secs: self.interval_secs.or(base.interval_secs),
        }
    }
}

impl Layer for DisplayConfig {
    fn under(self, base: Self) -> Self {
        Self {
            theme: self.theme.or(base.theme),
            fps: self.fps.or(base.fps),
        }
    }
}

fn stack<T: Layer>(base: Option<T>, top: Option<T>) -> Option<T> {
    match (base, top) {
        (Some(b), Some(t)) => Some(t.under(b)),
        (b, t) => t.or(b),
    }
}

/// `<config_dir>/genscan/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("genscan").join("config.toml"))
}

/// The platform file with `./.genscan.toml` on top. Missing files are empty layers.
pub fn load_config() -> ConfigFile {
    let platform = config_path()
        .and_then(|p| load_from_path(&p))
        .unwrap_or_default();
    let local = load_from_path(Path::new(CWD_CONFIG_FILE)).unwrap_or_default();
    merge(platform, local)
}

/// Read one file. `None` when it is missing or malformed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let text = std::fs::read_to_string(path).ok()?;
    toml::from_str(&text)
        .inspect_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file")
        })
        .ok()
}

/// Keys set in `overlay` win over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        server: stack(base.server, overlay.server),
        polling: stack(base.polling, overlay.polling),
        display: stack(base.display, overlay.display),
    }
}

/// Write to the platform config file and return where it went.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to_path(config, &path)?;
    Ok(path)
}

pub fn save_to_path(config: &ConfigFile, path: &Path) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    let text = toml::to_string_pretty(config)?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(io_err)?;
    }
    std::fs::write(path, text).map_err(io_err)
}
