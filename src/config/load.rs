use std::{env, path::Path, path::PathBuf};

use super::schema::Settings;
use crate::core::audio::Mp3Encoder;

/// Environment prefix; `TRACKSPLIT__BITRATE_KBPS=320` sets `bitrate_kbps`.
const ENV_PREFIX: &str = "TRACKSPLIT";

/// Overrides the config file location.
const CONFIG_PATH_VAR: &str = "TRACKSPLIT_CONFIG_PATH";

impl Settings {
    /// Load settings from environment and the default (optional) config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        Self::load_from(resolve_config_path().as_deref())
    }

    /// Load settings from environment and an optional config file.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(::config::File::from(path).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.output_dir.as_os_str().is_empty() {
            return Err("output_dir must not be empty".to_string());
        }
        Mp3Encoder::new(self.bitrate_kbps).map_err(|e| format!("bitrate_kbps: {e}"))?;
        Ok(())
    }
}

/// Resolve the config path from `TRACKSPLIT_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os(CONFIG_PATH_VAR) {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/tracksplit/config.toml`
/// or `~/.config/tracksplit/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("tracksplit").join("config.toml"))
}
