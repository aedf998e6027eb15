//! Persisted generator defaults.
//!
//! Read once at startup from `config.toml` under the user's config directory
//! and passed to the questionnaire and the generator.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Directory name under the platform config directory.
pub const APP_DIR: &str = "minecraft-server-generator";

/// Defaults used when generating a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Initial value of the `rcon.password` question.
    #[serde(default = "default_rcon_password")]
    pub default_rcon_password: String,

    /// JVM heap size passed as both `-Xms` and `-Xmx` in the boot scripts.
    #[serde(default = "default_memory")]
    pub memory: String,
}

fn default_rcon_password() -> String {
    "defaultRconPassword".to_string()
}

fn default_memory() -> String {
    "2560M".to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_rcon_password: default_rcon_password(),
            memory: default_memory(),
        }
    }
}

/// `{config_dir}/minecraft-server-generator/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

/// Load the generator configuration from `path`.
///
/// - If the file does not exist, returns [`GeneratorConfig::default()`].
/// - If the file exists but cannot be read or parsed, logs a warning and returns the default.
pub async fn load_config(path: &Path) -> GeneratorConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return GeneratorConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return GeneratorConfig::default();
        }
    };

    match toml::from_str::<GeneratorConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            GeneratorConfig::default()
        }
    }
}
