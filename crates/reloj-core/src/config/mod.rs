mod defaults;


use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::RelojError;
use defaults::*;

/// Top-level Reloj configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub i18n: I18nConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where translation catalogs come from and which locale to prefer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct I18nConfig {
    /// Preferred locale (e.g. "es_ES"). `None` = ask the OS.
    #[serde(default)]
    pub language: Option<String>,
    /// Directory holding `<basename>_<locale>.ts` files.
    #[serde(default = "default_translations_dir")]
    pub translations_dir: String,
    /// File name prefix of the catalogs.
    #[serde(default = "default_basename")]
    pub basename: String,
    /// Consult the catalogs compiled into the binary after the directory.
    #[serde(default = "default_true")]
    pub use_bundled: bool,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            language: None,
            translations_dir: default_translations_dir(),
            basename: default_basename(),
            use_bundled: true,
        }
    }
}

impl I18nConfig {
    /// Translations directory with `~` expanded.
    pub fn translations_path(&self) -> PathBuf {
        PathBuf::from(shellexpand(&self.translations_dir))
    }
}

/// Logging configuration. `RUST_LOG` takes precedence over `level`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, RelojError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| RelojError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| RelojError::Config(format!("failed to parse config: {}", e)))?;

    Ok(config)
}
