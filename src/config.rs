//! TOML configuration for the headless host.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use log::{info, warn};

#[derive(Debug, Deserialize)]
pub struct HostConfig {
    #[serde(default)]
    pub host: HostSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HostSettings {
    /// Page fixture to load.
    #[serde(default = "default_page")]
    pub page: PathBuf,
    #[serde(default = "default_player")]
    pub player: String,
    #[serde(default = "default_player_args")]
    pub player_args: Vec<String>,
    /// Reload the page when the fixture changes on disk.
    #[serde(default = "default_watch")]
    pub watch: bool,
    /// Unix socket accepting the same commands as stdin.
    pub socket: Option<String>,
}

impl Default for HostSettings {
    fn default() -> Self {
        HostSettings {
            page: default_page(),
            player: default_player(),
            player_args: default_player_args(),
            watch: default_watch(),
            socket: None,
        }
    }
}

impl HostConfig {
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path).map_err(|e| format!("read {}: {e}", path.display()))?;
        toml::from_str(&content).map_err(|e| format!("parse {}: {e}", path.display()))
    }

    /// Load config with fallback chain:
    /// 1. $SOUND_BUTTON_CONFIG env var
    /// 2. ./sound-button.toml
    /// 3. Built-in defaults
    pub fn find_and_load() -> Self {
        let candidates: Vec<PathBuf> = vec![
            std::env::var("SOUND_BUTTON_CONFIG").ok().map(PathBuf::from),
            Some(PathBuf::from("sound-button.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();
        Self::first_loadable(&candidates)
    }

    fn first_loadable(candidates: &[PathBuf]) -> Self {
        for path in candidates {
            if path.exists() {
                match Self::load(path) {
                    Ok(config) => {
                        info!("Loaded host config from {}", path.display());
                        return config;
                    }
                    Err(e) => warn!("Failed to load {}: {e}", path.display()),
                }
            }
        }

        info!("Using built-in default host config");
        HostConfig {
            host: HostSettings::default(),
        }
    }
}

fn default_page() -> PathBuf { PathBuf::from("page.toml") }
fn default_player() -> String { "aplay".into() }
fn default_player_args() -> Vec<String> { vec!["-q".into()] }
fn default_watch() -> bool { true }
