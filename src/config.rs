//! Display configuration and its loader.
//!
//! `DisplayConfig` is shared, read-only state for a render pass. It is
//! threaded explicitly into the layout derivation rather than read from
//! ambient context.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming a YAML file with display options.
pub const CONFIG_PATH_ENV: &str = "OPERATION_VIEW_CONFIG";

const PATH_IN_MIDDLE_PANEL: &str = "pathInMiddlePanel";
const SHOW_WEBHOOK_VERB: &str = "showWebhookVerb";

/// Rendering preferences that affect layout decisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayConfig {
    /// Move the endpoint summary from the side panel into the main column.
    pub path_in_middle_panel: bool,
    /// Append the uppercased HTTP verb to the "Webhook" badge.
    pub show_webhook_verb: bool,
}

impl DisplayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path_in_middle_panel(mut self, enabled: bool) -> Self {
        self.path_in_middle_panel = enabled;
        self
    }

    pub fn with_show_webhook_verb(mut self, enabled: bool) -> Self {
        self.show_webhook_verb = enabled;
        self
    }

    /// Parse options from YAML.
    ///
    /// Options this crate does not recognize are skipped with a warning so
    /// that a full renderer options file can be passed as-is.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        let mapping = match value {
            serde_yaml::Value::Mapping(mapping) => mapping,
            serde_yaml::Value::Null => return Ok(Self::default()),
            _ => return Err(ConfigError::NotAMapping),
        };

        let mut config = Self::default();
        for (key, value) in &mapping {
            let Some(key) = key.as_str() else {
                warn!("Ignoring non-string display option key: {:?}", key);
                continue;
            };
            match key {
                PATH_IN_MIDDLE_PANEL => {
                    config.path_in_middle_panel = expect_bool(PATH_IN_MIDDLE_PANEL, value)?;
                }
                SHOW_WEBHOOK_VERB => {
                    config.show_webhook_verb = expect_bool(SHOW_WEBHOOK_VERB, value)?;
                }
                other => warn!("Ignoring unrecognized display option '{}'", other),
            }
        }

        debug!(?config, "Parsed display config");
        Ok(config)
    }
}

fn expect_bool(option: &'static str, value: &serde_yaml::Value) -> Result<bool, ConfigError> {
    value
        .as_bool()
        .ok_or(ConfigError::NotABoolean { option })
}

/// Loads `DisplayConfig` from a YAML file.
#[derive(Debug, Clone, Default)]
pub struct DisplayConfigLoader {
    path: Option<PathBuf>,
}

impl DisplayConfigLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Create loader from `OPERATION_VIEW_CONFIG`, or one that yields defaults.
    pub fn from_env() -> Self {
        Self {
            path: std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Load the configuration. Without a path this yields the defaults.
    pub fn load(&self) -> Result<DisplayConfig, ConfigError> {
        let Some(path) = &self.path else {
            debug!("No display config path set, using defaults");
            return Ok(DisplayConfig::default());
        };

        info!("Loading display config from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        DisplayConfig::from_yaml_str(&content)
    }
}
