//! App settings with persistence
//!
//! Settings are saved to `~/.config/closet/settings.toml`. `CLOSET_API_URL`
//! overrides the API base URL and `CLOSET_DEMO=1` forces demo mode.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use closet_core::filters::LIST_PAGE_SIZE;
use closet_integration::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const ENV_API_URL: &str = "CLOSET_API_URL";
pub const ENV_DEMO: &str = "CLOSET_DEMO";

/// All app settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub api: ApiSettings,
    pub catalog: CatalogSettings,
    pub window: WindowSettings,
}

impl AppSettings {
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("closet"))
    }

    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found, writing defaults");
            let settings = Self::default();
            if let Err(e) = settings.save() {
                warn!("Failed to write default settings: {}", e);
            }
            return settings;
        }

        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                warn!("Failed to parse settings: {}, using defaults", e);
                Self::default()
            }),
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };

        let path = dir.join("settings.toml");
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            info!("API base URL from {}: {}", ENV_API_URL, url);
            self.api.base_url = url.trim().to_string();
        }
        if let Some(flag) = lookup(ENV_DEMO) {
            self.api.demo = matches!(flag.trim(), "1" | "true" | "yes");
        }
    }

    /// Settings from disk with the process environment applied
    pub fn from_environment() -> Self {
        let mut settings = Self::load();
        settings.apply_env(|key| std::env::var(key).ok());
        settings
    }
}

/// Where the catalog API lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Use the in-memory catalog instead of the server
    pub demo: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            demo: false,
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Browsing preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Owner to scope lists and new items to; unset shows every owner
    pub owner: Option<String>,
    /// Items fetched per list page
    pub page_size: u32,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            owner: None,
            page_size: LIST_PAGE_SIZE,
        }
    }
}

impl CatalogSettings {
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref().filter(|o| !o.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}
