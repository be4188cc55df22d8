use crate::backend::http::parse_base_url;
use crate::error::{NotezError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_FILE_EXT: &str = ".txt";
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Overrides where `config.json` lives.
pub const CONFIG_DIR_ENV: &str = "NOTEZ_CONFIG_DIR";
/// Overrides the configured service address for one run.
pub const API_URL_ENV: &str = "NOTEZ_API_URL";

/// Configuration for notez, stored in `<config dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotezConfig {
    /// Base address of the note storage service
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Extension of the temporary file handed to $EDITOR (e.g. ".txt", ".md")
    #[serde(default = "default_file_ext")]
    pub file_ext: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_file_ext() -> String {
    DEFAULT_FILE_EXT.to_string()
}

impl Default for NotezConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            file_ext: default_file_ext(),
        }
    }
}

/// Keys accepted by `notez config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    ApiUrl,
    FileExt,
}

impl ConfigKey {
    pub fn all() -> &'static [ConfigKey] {
        &[ConfigKey::ApiUrl, ConfigKey::FileExt]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::ApiUrl => "api-url",
            ConfigKey::FileExt => "file-ext",
        }
    }
}

impl FromStr for ConfigKey {
    type Err = NotezError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "api-url" => Ok(ConfigKey::ApiUrl),
            "file-ext" => Ok(ConfigKey::FileExt),
            other => Err(NotezError::Config(format!("Unknown config key: {}", other))),
        }
    }
}

impl NotezConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: NotezConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory, creating it if needed
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// Applies the environment and command-line overrides, flag last.
    pub fn with_overrides(mut self, env_url: Option<&str>, flag_url: Option<&str>) -> Result<Self> {
        if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
            self.set_api_url(url)?;
        }
        if let Some(url) = flag_url {
            self.set_api_url(url)?;
        }
        Ok(self)
    }

    pub fn get_file_ext(&self) -> &str {
        &self.file_ext
    }

    /// Set the file extension (normalizes to start with a dot)
    pub fn set_file_ext(&mut self, ext: &str) {
        if ext.starts_with('.') {
            self.file_ext = ext.to_string();
        } else {
            self.file_ext = format!(".{}", ext);
        }
    }

    pub fn get_api_url(&self) -> &str {
        &self.api_url
    }

    /// Set the service address. Must be an http(s) URL; a trailing slash is dropped.
    pub fn set_api_url(&mut self, url: &str) -> Result<()> {
        parse_base_url(url)?;
        self.api_url = url.trim().trim_end_matches('/').to_string();
        Ok(())
    }

    pub fn get(&self, key: ConfigKey) -> &str {
        match key {
            ConfigKey::ApiUrl => self.get_api_url(),
            ConfigKey::FileExt => self.get_file_ext(),
        }
    }

    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<()> {
        match key {
            ConfigKey::ApiUrl => self.set_api_url(value),
            ConfigKey::FileExt => {
                self.set_file_ext(value);
                Ok(())
            }
        }
    }
}

/// `$NOTEZ_CONFIG_DIR`, else the platform config directory.
pub fn default_config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    ProjectDirs::from("com", "notez", "notez")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| NotezError::Config("Could not determine config dir".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NotezConfig::default();
        assert_eq!(config.api_url, "http://127.0.0.1:8000");
        assert_eq!(config.file_ext, ".txt");
    }

    #[test]
    fn test_set_file_ext_without_dot() {
        let mut config = NotezConfig::default();
        config.set_file_ext("md");
        assert_eq!(config.file_ext, ".md");
        config.set_file_ext(".rs");
        assert_eq!(config.file_ext, ".rs");
    }

    #[test]
    fn test_set_api_url_trims_and_validates() {
        let mut config = NotezConfig::default();
        config.set_api_url("http://notes.local:9000/").unwrap();
        assert_eq!(config.api_url, "http://notes.local:9000");

        assert!(config.set_api_url("localhost:8000").is_err());
        assert_eq!(config.api_url, "http://notes.local:9000");
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = NotezConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config, NotezConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("nested");

        let mut config = NotezConfig::default();
        config.set(ConfigKey::ApiUrl, "https://notes.example.com").unwrap();
        config.set(ConfigKey::FileExt, "md").unwrap();
        config.save(&nested).unwrap();

        let loaded = NotezConfig::load(&nested).unwrap();
        assert_eq!(loaded.get(ConfigKey::ApiUrl), "https://notes.example.com");
        assert_eq!(loaded.get(ConfigKey::FileExt), ".md");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILENAME), r#"{"file_ext": ".md"}"#).unwrap();

        let config = NotezConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.file_ext, ".md");
    }

    #[test]
    fn test_override_precedence() {
        let base = NotezConfig::default();

        let from_env = base
            .clone()
            .with_overrides(Some("http://env:1"), None)
            .unwrap();
        assert_eq!(from_env.api_url, "http://env:1");

        let from_flag = base
            .clone()
            .with_overrides(Some("http://env:1"), Some("http://flag:2"))
            .unwrap();
        assert_eq!(from_flag.api_url, "http://flag:2");

        let blank_env = base.with_overrides(Some(""), None).unwrap();
        assert_eq!(blank_env.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_config_key_names() {
        for key in ConfigKey::all() {
            assert_eq!(key.name().parse::<ConfigKey>().unwrap(), *key);
        }
        assert!("editor".parse::<ConfigKey>().is_err());
    }
}
