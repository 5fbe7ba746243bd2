use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::audio::audio::DEFAULT_PLAYER_BIN;

/// Optional JSON config. The original shipped two near-identical variants of
/// the whole widget, one with audio controls and one without; `enable_audio`
/// folds them into a single component.
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_enable_audio")]
    pub enable_audio: bool,
    #[serde(default)]
    pub log_file: Option<String>,
    #[serde(default = "default_player_bin")]
    pub player_bin: String,
}

fn default_enable_audio() -> bool {
    true
}

fn default_player_bin() -> String {
    DEFAULT_PLAYER_BIN.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable_audio: default_enable_audio(),
            log_file: None,
            player_bin: default_player_bin(),
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".config/sip_it/config.json")
    }

    /// Loads the config file, falling back to defaults when it is missing.
    /// A file that exists but does not parse is reported and ignored.
    pub fn load(path: Option<&str>) -> Self {
        let path = path.map(PathBuf::from).unwrap_or_else(Self::default_path);
        match fs::read_to_string(&path) {
            Ok(data) => match serde_json::from_str::<Self>(&data) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Failed to parse config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}
