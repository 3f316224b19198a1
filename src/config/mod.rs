use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::Settings;

pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn default_location() -> Result<Self> {
        let base = dirs::config_dir().ok_or_else(|| anyhow!("No config directory available"))?;
        Ok(ConfigStore {
            path: base.join("pickterm").join("config.json"),
        })
    }

    pub fn at(path: PathBuf) -> Self {
        ConfigStore { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parse {}", self.path.display()))
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, raw).with_context(|| format!("write {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_config_path() -> PathBuf {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("pickterm-test-{}-{now}", std::process::id()))
    }

    #[test]
    fn missing_file_loads_defaults() {
        let store = ConfigStore::at(temp_config_path().join("config.json"));
        let settings = store.load().expect("load");
        assert!(settings.server_url.is_none());
        assert!(settings.api_token.is_none());
    }

    #[test]
    fn settings_round_trip_through_disk() {
        let root = temp_config_path();
        let store = ConfigStore::at(root.join("config.json"));
        store
            .save(&Settings {
                server_url: Some("https://inventory.example.com".to_string()),
                api_token: Some("enc:a:b:c".to_string()),
            })
            .expect("save");

        let settings = store.load().expect("load");
        assert_eq!(
            settings.server_url.as_deref(),
            Some("https://inventory.example.com")
        );
        assert_eq!(settings.api_token.as_deref(), Some("enc:a:b:c"));

        std::fs::remove_dir_all(root).expect("cleanup");
    }
}
