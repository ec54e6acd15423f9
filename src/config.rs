//! Configuration management for bible-trilingual-rs.
//!
//! Loads config from YAML files in standard locations. The provider
//! credential normally comes from the environment rather than the file.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Fallback variable consulted when `api_key_env` is unset.
const LEGACY_API_KEY_ENV: &str = "API_KEY";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_key_env: String,
    pub content_model: String,
    pub speech_model: String,
    pub voice: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: String::new(),
            api_key_env: "GEMINI_API_KEY".into(),
            content_model: "gemini-2.5-flash".into(),
            speech_model: "gemini-2.5-flash-preview-tts".into(),
            voice: "Kore".into(),
            temperature: 0.1,
            timeout_secs: 60,
        }
    }
}

impl ProviderConfig {
    /// Fill an empty `api_key` from the environment.
    pub fn resolve_api_key(&mut self) {
        self.resolve_api_key_with(|name| std::env::var(name).ok());
    }

    fn resolve_api_key_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if !self.api_key.is_empty() {
            return;
        }
        let key = lookup(&self.api_key_env)
            .filter(|k| !k.is_empty())
            .or_else(|| lookup(LEGACY_API_KEY_ENV).filter(|k| !k.is_empty()));
        if let Some(key) = key {
            self.api_key = key;
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Output format of the speech endpoint. Fixed by the producer, not sniffed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 24000,
            channels: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub enabled: bool,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 8790,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub audio: AudioConfig,
    pub api: ApiConfig,
}

impl Config {
    /// Load configuration from YAML file.
    ///
    /// Searches standard locations if no path is provided:
    /// 1. ./config.yaml
    /// 2. ~/.config/bible-trilingual/config.yaml
    /// 3. /etc/bible-trilingual/config.yaml
    ///
    /// The API key is resolved from the environment afterwards.
    pub fn load(path: Option<&Path>) -> Self {
        let mut config = Self::load_file(path);
        config.provider.resolve_api_key();
        config
    }

    fn load_file(path: Option<&Path>) -> Self {
        let resolved = path.map(PathBuf::from).or_else(|| {
            let candidates = [
                std::env::current_dir().ok().map(|d| d.join("config.yaml")),
                dirs::home_dir().map(|h| h.join(".config/bible-trilingual/config.yaml")),
                Some(PathBuf::from("/etc/bible-trilingual/config.yaml")),
            ];
            candidates.into_iter().flatten().find(|p| p.exists())
        });

        let Some(config_path) = resolved else {
            info!("No config file found, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match Self::from_yaml(&contents) {
                Ok(config) => {
                    info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse {}: {e}, using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read {}: {e}, using defaults", config_path.display());
                Self::default()
            }
        }
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yml::Error> {
        serde_yml::from_str(contents)
    }
}
