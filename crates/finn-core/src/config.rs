use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

pub const DEFAULT_BACKEND_URL: &str = "https://finn-agent-709365199670.us-central1.run.app";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub backend_url: Option<String>,
    pub id_token: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    /// Persist a freshly issued identity token
    pub fn save_id_token(token: &str) -> Result<()> {
        let mut config = Self::load().unwrap_or_else(|_| Self::new());
        config.id_token = Some(token.to_string());
        config.save()
    }

    /// Forget the stored identity token (sign-out)
    pub fn clear_id_token() -> Result<()> {
        let mut config = Self::load().unwrap_or_else(|_| Self::new());
        config.id_token = None;
        config.save()
    }

    /// Backend base URL: env var first, then config, then the hosted default.
    /// Trailing slashes are dropped so paths can be appended directly.
    pub fn resolved_backend_url(&self) -> String {
        let url = std::env::var("FINN_BACKEND_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.backend_url.clone())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        url.trim().trim_end_matches('/').to_string()
    }

    /// Identity token: env var first, then config
    pub fn resolved_id_token(&self) -> Option<String> {
        std::env::var("FINN_ID_TOKEN")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.id_token.clone())
    }

    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("finn"))
    }

    fn get_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }
}
