use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Language
    pub language: String,
    pub locale_dir: Option<String>,

    // Devices
    pub default_device: Option<String>,
    /// Spoken name -> device or client name
    pub aliases: HashMap<String, String>,
    /// Minimum quick ratio for a spoken device name to count
    pub device_cutoff: u8,

    // Library
    pub library_path: String,

    // Meta
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            locale_dir: None,
            default_device: None,
            aliases: HashMap::new(),
            device_cutoff: 60,
            library_path: dirs::data_dir()
                .unwrap_or_default()
                .join("plexassist/library.json")
                .to_string_lossy()
                .to_string(),
            log_level: "INFO".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load config from `path`. A missing file yields defaults; an unreadable
    /// one is moved aside to `config.json.corrupt` first.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                let backup_path = path.with_extension("json.corrupt");
                if let Err(e) = std::fs::rename(path, &backup_path) {
                    tracing::warn!("⚠️ Could not back up corrupt config to {}: {}", backup_path.display(), e);
                }
                Ok(Self::default())
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn locale_dir(&self) -> Option<&Path> {
        self.locale_dir.as_deref().map(Path::new)
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("plexassist")
        .join("config.json")
}
