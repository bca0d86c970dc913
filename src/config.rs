use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::keyboard::layout::LayoutKind;
use crate::session::lesson::PassThreshold;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_layout")]
    pub layout: String,
    #[serde(default = "default_timer_secs")]
    pub timer_secs: u64,
    #[serde(default = "default_timed_mode")]
    pub timed_mode: bool,
    #[serde(default = "default_min_wpm")]
    pub min_wpm: u32,
    #[serde(default = "default_min_accuracy")]
    pub min_accuracy: u32,
    #[serde(default)]
    pub extra_prohibited_words: Vec<String>,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_layout() -> String {
    LayoutKind::Inscript.name().to_string()
}
fn default_timer_secs() -> u64 {
    60
}
fn default_timed_mode() -> bool {
    false
}
fn default_min_wpm() -> u32 {
    20
}
fn default_min_accuracy() -> u32 {
    90
}
fn default_theme() -> String {
    "default".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: default_layout(),
            timer_secs: default_timer_secs(),
            timed_mode: default_timed_mode(),
            min_wpm: default_min_wpm(),
            min_accuracy: default_min_accuracy(),
            extra_prohibited_words: Vec::new(),
            theme: default_theme(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("parsing config {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("devtype")
            .join("config.toml")
    }

    pub fn default_threshold(&self) -> PassThreshold {
        PassThreshold {
            min_wpm: self.min_wpm,
            min_accuracy: self.min_accuracy,
        }
    }

    pub fn layout_kind(&self) -> LayoutKind {
        LayoutKind::from_name(&self.layout).unwrap_or(LayoutKind::Inscript)
    }

    /// Reset an unknown layout name and clamp out-of-range values.
    /// Call after deserialization and after applying CLI overrides.
    pub fn normalize(&mut self) {
        match LayoutKind::from_name(&self.layout) {
            Some(kind) => self.layout = kind.name().to_string(),
            None => self.layout = default_layout(),
        }
        self.timer_secs = self.timer_secs.clamp(5, 3600);
        self.min_accuracy = self.min_accuracy.min(100);
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.layout, "inscript");
        assert_eq!(config.timer_secs, 60);
    }

    #[test]
    fn test_config_serde_partial_file() {
        let toml_str = r#"
timer_secs = 120
min_wpm = 35
extra_prohibited_words = ["lottery"]
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.timer_secs, 120);
        assert_eq!(config.min_wpm, 35);
        assert_eq!(config.extra_prohibited_words, vec!["lottery"]);
        // Untouched fields keep their defaults
        assert_eq!(config.min_accuracy, 90);
        assert!(!config.timed_mode);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.timed_mode = true;
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_loads_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_normalize_resets_unknown_layout() {
        let mut config = Config::default();
        config.layout = "remington".to_string();
        config.normalize();
        assert_eq!(config.layout, "inscript");

        config.layout = "InScript".to_string();
        config.normalize();
        assert_eq!(config.layout, "inscript");
    }

    #[test]
    fn test_normalize_clamps_values() {
        let mut config = Config::default();
        config.timer_secs = 0;
        config.min_accuracy = 150;
        config.normalize();
        assert_eq!(config.timer_secs, 5);
        assert_eq!(config.min_accuracy, 100);
    }

    #[test]
    fn test_default_threshold() {
        let config = Config::default();
        let t = config.default_threshold();
        assert_eq!(t.min_wpm, 20);
        assert_eq!(t.min_accuracy, 90);
    }
}
