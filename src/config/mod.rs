use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::errors::FunnelError;
use crate::utils::paths::{app_data_dir, config_file_in, ensure_dir};

const TMP_SUFFIX: &str = "tmp";

fn default_retention() -> usize {
    100
}

fn default_locale() -> String {
    "en-US".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Fallback campaign tag stamped onto records when no UTM campaign is
    /// supplied by the environment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,
    /// When set, submissions are stored as JSON files under this directory;
    /// when absent, the sink falls back to a log line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submissions_dir: Option<PathBuf>,
    /// Maximum stored submission files before the oldest are pruned.
    #[serde(default = "default_retention")]
    pub retention: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            campaign: None,
            submissions_dir: None,
            retention: default_retention(),
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, FunnelError> {
        Self::from_base(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, FunnelError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, FunnelError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config, FunnelError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), FunnelError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), FunnelError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_returns_defaults_when_missing() {
        let temp = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("manager");
        let config = manager.load().expect("load config");
        assert_eq!(config.locale, "en-US");
        assert!(config.submissions_dir.is_none());
        assert_eq!(config.retention, 100);
    }

    #[test]
    fn save_and_reload_roundtrip() {
        let temp = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("manager");
        let config = Config {
            locale: "en-GB".into(),
            campaign: Some("early-access".into()),
            submissions_dir: Some(temp.path().join("submissions")),
            retention: 10,
        };
        manager.save(&config).expect("save config");
        let reloaded = manager.load().expect("reload config");
        assert_eq!(reloaded.locale, "en-GB");
        assert_eq!(reloaded.campaign.as_deref(), Some("early-access"));
        assert_eq!(reloaded.retention, 10);
    }
}
