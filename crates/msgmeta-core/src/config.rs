//! Configuration for msgmeta processors.
//!
//! Loaded from YAML (`msgmeta.yml`). Every key is optional; defaults
//! describe the public pagure.io instance.

use crate::identity::DEFAULT_CACHE_CAPACITY;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("base_url must start with http:// or https://, got `{0}`")]
    InvalidBaseUrl(String),

    #[error("series_limit must be at least 2, got {0}")]
    InvalidSeriesLimit(usize),
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaConfig {
    /// Root URL of the forge web UI.
    pub base_url: String,

    /// Icon representing the forge itself.
    pub icon: String,

    /// Avatar URL construction.
    pub avatar: AvatarConfig,

    /// Email to account resolution.
    pub identity: IdentityConfig,

    /// Entries shown before a tag or field list collapses into `N others`.
    pub series_limit: usize,

    /// Template translations, keyed by the untranslated template.
    pub translations: HashMap<String, String>,
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://pagure.io".to_string(),
            icon: "https://apps.fedoraproject.org/packages/images/icons/package_128x128.png"
                .to_string(),
            avatar: AvatarConfig::default(),
            identity: IdentityConfig::default(),
            series_limit: 3,
            translations: HashMap::new(),
        }
    }
}

impl MetaConfig {
    /// Loads and validates configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_yaml(&content)
    }

    /// Parses and validates configuration from YAML text.
    pub fn parse_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.series_limit < 2 {
            return Err(ConfigError::InvalidSeriesLimit(self.series_limit));
        }
        Ok(())
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// How avatar URLs are built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    /// Libravatar-compatible service root.
    pub service: String,

    /// OpenID identity template; `{user}` is replaced by the account name.
    pub openid: String,

    /// Requested image size in pixels.
    pub size: u32,

    /// Fallback style when the service has no image.
    pub default: String,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            service: "https://seccdn.libravatar.org".to_string(),
            openid: "http://{user}.id.fedoraproject.org/".to_string(),
            size: 64,
            default: "retro".to_string(),
        }
    }
}

/// How commit emails map to accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Addresses at this domain resolve to their local part.
    pub email_domain: Option<String>,

    /// Explicit address to account mappings.
    pub emails: HashMap<String, String>,

    /// Email lookups remembered before the cache is reset.
    pub cache_capacity: usize,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            email_domain: Some("fedoraproject.org".to_string()),
            emails: HashMap::new(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}
