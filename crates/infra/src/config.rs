//! Listing configuration, loaded from the environment or a JSON document.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use facetry_catalog::CustomerGroupKey;
use facetry_listing::LoaderOptions;
use facetry_observability::LogFormat;

pub const ENV_FALLBACK_CUSTOMER_GROUP: &str = "FACETRY_FALLBACK_CUSTOMER_GROUP";
pub const ENV_UNBOUNDED_PRICE_TIER: &str = "FACETRY_UNBOUNDED_PRICE_TIER";
pub const ENV_MAX_GROUPS: &str = "FACETRY_MAX_GROUPS";
pub const ENV_LOG_FORMAT: &str = "FACETRY_LOG_FORMAT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("max_groups must be at least 1")]
    NoGroupsAllowed,

    #[error("invalid configuration document: {0}")]
    Document(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Customer group whose prices apply when a group has no own price.
    pub fallback_customer_group: CustomerGroupKey,
    /// Upper bound (`to`) marking the open-ended quantity tier of a price.
    pub unbounded_price_tier: String,
    /// Most configurator groups a product may have before it is skipped.
    pub max_groups: usize,
    pub log_format: LogFormat,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            fallback_customer_group: CustomerGroupKey::new("EK"),
            unbounded_price_tier: "beliebig".to_string(),
            max_groups: LoaderOptions::default().max_groups,
            log_format: LogFormat::default(),
        }
    }
}

impl ListingConfig {
    /// Reads `FACETRY_*` variables; unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`ListingConfig::from_env`], resolving variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_FALLBACK_CUSTOMER_GROUP) {
            config.fallback_customer_group = CustomerGroupKey::new(value.trim());
        }
        if let Some(value) = lookup(ENV_UNBOUNDED_PRICE_TIER) {
            config.unbounded_price_tier = value.trim().to_string();
        }
        if let Some(value) = lookup(ENV_MAX_GROUPS) {
            config.max_groups = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: ENV_MAX_GROUPS,
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup(ENV_LOG_FORMAT) {
            config.log_format = value.parse().map_err(|_| ConfigError::InvalidValue {
                var: ENV_LOG_FORMAT,
                value: value.clone(),
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parses a JSON document; missing fields keep their defaults.
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read listing config at {}", path.display()))?;
        let config = Self::from_json(&document)
            .with_context(|| format!("failed to parse listing config at {}", path.display()))?;
        tracing::debug!(path = %path.display(), max_groups = config.max_groups, "listing config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fallback_customer_group.as_str().is_empty() {
            return Err(ConfigError::Empty("fallback_customer_group"));
        }
        if self.unbounded_price_tier.is_empty() {
            return Err(ConfigError::Empty("unbounded_price_tier"));
        }
        if self.max_groups == 0 {
            return Err(ConfigError::NoGroupsAllowed);
        }
        Ok(())
    }

    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            max_groups: self.max_groups,
        }
    }

    /// Installs the process-wide subscriber in the configured format.
    pub fn init_logging(&self) {
        facetry_observability::init_with(self.log_format);
    }
}
