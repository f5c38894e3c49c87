use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

const CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone)]
pub struct Config {
    config_dir: PathBuf,
    pub api_url: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Self::get_config_dir()?)
    }

    pub fn load_from(config_dir: impl Into<PathBuf>) -> Result<Self> {
        let config_dir = config_dir.into();
        fs::create_dir_all(&config_dir).context("Failed to create config directory")?;

        let api_url = read_table(&config_dir)?
            .get("api")
            .and_then(|v| v.get("url"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        Ok(Self {
            config_dir,
            api_url,
        })
    }

    pub fn get_config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join("tablectl"))
            .context("Failed to determine config directory")
    }

    /// Pick the base URL: explicit override, then the config file, then
    /// the default. The result has no trailing slash.
    pub fn resolve_api_url(&self, override_url: Option<&str>) -> Result<String> {
        let raw = override_url
            .or(self.api_url.as_deref())
            .unwrap_or(DEFAULT_API_URL);
        validate_url(raw)?;
        Ok(raw.trim_end_matches('/').to_string())
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        if key == "api.url" {
            validate_url(value)?;
        }

        let mut config = read_table(&self.config_dir)?;

        // Handle nested keys like "api.url"
        if let Some((section, subkey)) = key.split_once('.') {
            let section_map = config
                .entry(section.to_string())
                .or_insert_with(|| toml::Value::Table(toml::value::Table::new()))
                .as_table_mut()
                .context("Invalid config structure")?;

            section_map.insert(subkey.to_string(), toml::Value::String(value.to_string()));
        } else {
            config.insert(key.to_string(), toml::Value::String(value.to_string()));
        }

        let content = toml::to_string_pretty(&config).context("Failed to serialize config")?;
        fs::write(self.config_dir.join(CONFIG_FILE), content)
            .context("Failed to write config file")?;

        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let config = read_table(&self.config_dir)?;

        let value = match key.split_once('.') {
            Some((section, subkey)) => config
                .get(section)
                .and_then(|v| v.as_table())
                .and_then(|table| table.get(subkey)),
            None => config.get(key),
        };

        Ok(value.and_then(|v| v.as_str()).map(|s| s.to_string()))
    }
}

fn read_table(config_dir: &Path) -> Result<HashMap<String, toml::Value>> {
    let config_file = config_dir.join(CONFIG_FILE);
    if !config_file.exists() {
        return Ok(HashMap::new());
    }

    let content = fs::read_to_string(&config_file).context("Failed to read config file")?;
    toml::from_str(&content).context("Failed to parse config file")
}

fn validate_url(raw: &str) -> Result<()> {
    let url = Url::parse(raw).with_context(|| format!("Invalid API URL '{}'", raw))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("API URL must use http or https, got '{}'", url.scheme());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_config_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(dir.path()).unwrap();

        assert_eq!(config.api_url, None);
        assert_eq!(config.resolve_api_url(None).unwrap(), DEFAULT_API_URL);
    }

    #[test]
    fn set_then_load_api_url() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(dir.path()).unwrap();
        config.set("api.url", "http://db.internal:9000/").unwrap();

        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config.get("api.url").unwrap().as_deref(), Some("http://db.internal:9000/"));
        assert_eq!(config.resolve_api_url(None).unwrap(), "http://db.internal:9000");
    }

    #[test]
    fn override_beats_config_file() {
        let dir = TempDir::new().unwrap();
        Config::load_from(dir.path())
            .unwrap()
            .set("api.url", "http://from-file:1")
            .unwrap();

        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(
            config.resolve_api_url(Some("https://from-flag")).unwrap(),
            "https://from-flag"
        );
    }

    #[test]
    fn invalid_urls_are_rejected() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(dir.path()).unwrap();

        assert!(config.set("api.url", "not a url").is_err());
        assert!(config.resolve_api_url(Some("ftp://example.com")).is_err());
        assert_eq!(config.get("api.url").unwrap(), None);
    }

    #[test]
    fn malformed_file_is_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join(CONFIG_FILE);
        fs::write(&file, "[api\nurl = ").unwrap();

        let config = Config {
            config_dir: dir.path().to_path_buf(),
            api_url: None,
        };
        assert!(config.set("profile", "staging").is_err());
        assert!(Config::load_from(dir.path()).is_err());
        assert_eq!(fs::read_to_string(&file).unwrap(), "[api\nurl = ");
    }

    #[test]
    fn plain_keys_round_trip() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(dir.path()).unwrap();
        config.set("profile", "staging").unwrap();

        assert_eq!(config.get("profile").unwrap().as_deref(), Some("staging"));
        assert_eq!(config.get("missing").unwrap(), None);
    }
}
