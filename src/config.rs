//! Application configuration.
//!
//! Configuration is stored in `.folio/config.yaml` and includes:
//! - The base URL of the content API
//! - An optional bearer token
//! - The page size used by list views
//! - The endpoint shape of each record kind

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};
use crate::record::Kind;
use crate::remote::endpoints::{CreateShape, DeleteShape, Endpoints, ListShape, UpdateShape};

pub const CONFIG_DIR: &str = ".folio";
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the content API, e.g. `https://example.com`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Authentication
    #[serde(default)]
    pub auth: AuthConfig,

    /// Items per page in list views
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default)]
    pub publications: Endpoints,

    #[serde(default)]
    pub projects: Endpoints,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            auth: AuthConfig::default(),
            page_size: DEFAULT_PAGE_SIZE,
            publications: Endpoints::default(),
            projects: Endpoints::default(),
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Config {
    /// Path to the config file. `FOLIO_CONFIG` overrides the default location.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = env::var("FOLIO_CONFIG")
            && !path.is_empty()
        {
            return PathBuf::from(path);
        }
        PathBuf::from(CONFIG_DIR).join("config.yaml")
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(FolioError::Config(
                "page_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Base URL from `FOLIO_BASE_URL` or the config file
    pub fn base_url(&self) -> Result<String> {
        if let Ok(url) = env::var("FOLIO_BASE_URL")
            && !url.is_empty()
        {
            return Ok(url);
        }

        self.base_url.clone().ok_or_else(|| {
            FolioError::Config(
                "base_url not configured. Set FOLIO_BASE_URL or run: folio config set base_url <url>"
                    .to_string(),
            )
        })
    }

    /// Bearer token from `FOLIO_TOKEN` or the config file
    pub fn token(&self) -> Option<String> {
        if let Ok(token) = env::var("FOLIO_TOKEN")
            && !token.is_empty()
        {
            return Some(token);
        }

        self.auth.token.clone()
    }

    pub fn endpoints(&self, kind: Kind) -> Endpoints {
        match kind {
            Kind::Publications => self.publications,
            Kind::Projects => self.projects,
        }
    }

    /// Set a value by dotted key, e.g. `projects.delete path`
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "base_url" => {
                url::Url::parse(value).map_err(|e| {
                    FolioError::Config(format!("invalid base_url '{value}': {e}"))
                })?;
                self.base_url = Some(value.to_string());
            }
            "auth.token" => self.auth.token = Some(value.to_string()),
            "page_size" => {
                let size: usize = value.parse().map_err(|_| {
                    FolioError::Config(format!("page_size must be a number, got '{value}'"))
                })?;
                if size == 0 {
                    return Err(FolioError::Config(
                        "page_size must be at least 1".to_string(),
                    ));
                }
                self.page_size = size;
            }
            _ => {
                let (kind, field) = key.split_once('.').ok_or_else(|| unknown_key(key))?;
                let kind: Kind = kind.parse().map_err(|_| unknown_key(key))?;
                let endpoints = match kind {
                    Kind::Publications => &mut self.publications,
                    Kind::Projects => &mut self.projects,
                };
                set_endpoint(endpoints, field, value).map_err(|_| unknown_key(key))?;
            }
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> FolioError {
    FolioError::Config(format!(
        "invalid config key '{key}'. Valid keys: base_url, auth.token, page_size, \
         <kind>.list, <kind>.create, <kind>.delete, <kind>.update"
    ))
}

fn set_endpoint(endpoints: &mut Endpoints, field: &str, value: &str) -> Result<()> {
    let value = serde_yaml_ng::Value::String(value.to_string());
    match field {
        "list" => endpoints.list = serde_yaml_ng::from_value::<ListShape>(value)?,
        "create" => endpoints.create = serde_yaml_ng::from_value::<CreateShape>(value)?,
        "delete" => endpoints.delete = serde_yaml_ng::from_value::<DeleteShape>(value)?,
        "update" => endpoints.update = serde_yaml_ng::from_value::<UpdateShape>(value)?,
        _ => return Err(FolioError::Config(format!("unknown endpoint '{field}'"))),
    }
    Ok(())
}
