use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the CRM contacts API
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Bearer token for the API, if the backend requires one
    #[serde(default)]
    pub token: Option<String>,
    /// Base URL used to build per-contact web links
    #[serde(default = "default_link_base")]
    pub link_base: String,
    /// Account whose contacts are listed by default (flags override this)
    #[serde(default)]
    pub account_id: Option<String>,
    /// Rows per page. Kept as the raw configured string; anything that does
    /// not parse as a positive integer falls back to the built-in default.
    #[serde(default)]
    pub page_size: Option<String>,
}

fn default_api_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_link_base() -> String {
    "https://crm.example.com".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token: None,
            link_base: default_link_base(),
            account_id: None,
            page_size: None,
        }
    }
}

impl Config {
    /// Load configuration from file or create the default one
    pub fn load_or_create(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
            let config: Config =
                toml::from_str(&content).with_context(|| "Failed to parse config file")?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save(config_path)?;
            Ok(config)
        }
    }

    /// Save configuration to file with secure permissions
    pub fn save(&self, config_path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        // 600: the file may hold an API token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(config_path)
                .with_context(|| format!("Failed to get file metadata: {:?}", config_path))?
                .permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(config_path, perms)
                .with_context(|| format!("Failed to set file permissions: {:?}", config_path))?;
        }

        Ok(())
    }
}

/// Default config file location (`~/.config/rolodex/config.toml`)
pub fn get_config_path() -> std::path::PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default())
        .join("rolodex")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:3000/api");
        assert!(config.account_id.is_none());
        assert!(config.page_size.is_none());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.account_id = Some("acct-42".to_string());
        config.page_size = Some("25".to_string());
        config.save(&config_path).unwrap();

        let loaded = Config::load_or_create(&config_path).unwrap();
        assert_eq!(loaded.account_id.as_deref(), Some("acct-42"));
        assert_eq!(loaded.page_size.as_deref(), Some("25"));
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let config = Config::load_or_create(&config_path).unwrap();
        assert!(config_path.exists());
        assert_eq!(config.api_url, Config::default().api_url);
    }

    #[test]
    fn test_page_size_survives_as_raw_string() {
        // Bad values are stored verbatim; coercion happens in the controller.
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "page_size = \"abc\"\n").unwrap();

        let loaded = Config::load_or_create(&config_path).unwrap();
        assert_eq!(loaded.page_size.as_deref(), Some("abc"));
    }
}
