//! Configuration types for the blocker.
//!
//! [`PolicyConfig`] can be built directly in Rust, deserialized with serde,
//! or loaded from an untyped JSON/YAML document with [`PolicyConfig::from_value`]
//! and [`load_config`]. The untyped path reports which field has the wrong
//! shape instead of a generic deserializer message.

use crate::error::{ConfigError, Result};
use crate::presets::PresetCategory;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Status code used for blocked requests when none is configured.
pub const DEFAULT_STATUS_CODE: u16 = 403;

const FIELDS: &[&str] = &[
    "preset_categories",
    "custom_patterns",
    "exempt_path_patterns",
    "redirect_url",
    "status_code",
];

/// Blocking policy configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    /// Preset categories whose patterns are blocked
    pub preset_categories: Vec<PresetCategory>,

    /// Additional User-Agent patterns (case-insensitive regex)
    pub custom_patterns: Vec<String>,

    /// Request paths that are never blocked (case-insensitive regex)
    pub exempt_path_patterns: Vec<String>,

    /// Redirect blocked requests here instead of returning an error body
    pub redirect_url: Option<String>,

    /// Status code for blocked requests without a redirect
    pub status_code: u16,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            preset_categories: vec![],
            custom_patterns: vec![],
            exempt_path_patterns: vec![],
            redirect_url: None,
            status_code: DEFAULT_STATUS_CODE,
        }
    }
}

impl PolicyConfig {
    /// Build a config from an untyped document, checking the shape of each field.
    ///
    /// Absent and `null` fields take their defaults.
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = value.as_object().ok_or(ConfigError::NotAnObject)?;

        if let Some(unknown) = map.keys().find(|key| !FIELDS.contains(&key.as_str())) {
            return Err(ConfigError::UnknownField(unknown.clone()));
        }

        let preset_categories = string_list(map, "preset_categories", "an array of category names")?
            .iter()
            .map(|name| name.parse())
            .collect::<Result<Vec<PresetCategory>>>()?;

        let custom_patterns = string_list(map, "custom_patterns", "an array of pattern strings")?;
        let exempt_path_patterns =
            string_list(map, "exempt_path_patterns", "an array of pattern strings")?;

        let redirect_url = match field(map, "redirect_url") {
            None => None,
            Some(Value::String(url)) => Some(url.clone()),
            Some(_) => {
                return Err(ConfigError::InvalidField {
                    field: "redirect_url",
                    expected: "a string",
                })
            }
        };

        let status_code = match field(map, "status_code") {
            None => DEFAULT_STATUS_CODE,
            Some(code) if code.is_i64() || code.is_u64() => code
                .as_u64()
                .and_then(|n| u16::try_from(n).ok())
                .ok_or_else(|| ConfigError::InvalidStatusCode(code.to_string()))?,
            Some(_) => {
                return Err(ConfigError::InvalidField {
                    field: "status_code",
                    expected: "an integer",
                })
            }
        };

        Ok(Self {
            preset_categories,
            custom_patterns,
            exempt_path_patterns,
            redirect_url,
            status_code,
        })
    }

    /// Check the invariants that typed construction cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.preset_categories.is_empty() && self.custom_patterns.is_empty() {
            return Err(ConfigError::NoBlockPatterns);
        }

        if !(100..=999).contains(&self.status_code) {
            return Err(ConfigError::InvalidStatusCode(self.status_code.to_string()));
        }

        if let Some(url) = &self.redirect_url {
            if url.chars().any(|c| c.is_ascii_control() && c != '\t') {
                return Err(ConfigError::InvalidRedirectUrl(url.clone()));
            }
        }

        Ok(())
    }

    /// The redirect target, treating an empty string as unset.
    pub fn effective_redirect_url(&self) -> Option<&str> {
        self.redirect_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Load a config file. `.yaml`/`.yml` files are read as YAML, anything else as JSON.
pub fn load_config(path: &Path) -> Result<PolicyConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value = if path.extension().is_some_and(|e| e == "yaml" || e == "yml") {
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    } else {
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    };

    PolicyConfig::from_value(&value)
}

fn field<'a>(map: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    map.get(name).filter(|v| !v.is_null())
}

fn string_list(
    map: &Map<String, Value>,
    name: &'static str,
    expected: &'static str,
) -> Result<Vec<String>> {
    let invalid = || ConfigError::InvalidField {
        field: name,
        expected,
    };

    match field(map, name) {
        None => Ok(vec![]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
            .collect(),
        Some(_) => Err(invalid()),
    }
}
