//! Controls configuration.
//!
//! Mirrors the `controls` block of a mixer configuration: the class applied
//! to active controls and the data attributes commands are read from.
//!
//! # Example
//!
//! ```
//! use spark_controls::ControlsConfig;
//!
//! let config = ControlsConfig::from_json(r#"{ "activeClass": "is-on" }"#).unwrap();
//! assert_eq!(config.active_class, "is-on");
//! assert_eq!(config.attributes.filter, "data-filter");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default class applied to active controls.
pub const DEFAULT_ACTIVE_CLASS: &str = "mixitup-control-active";

/// Data attribute names commands are read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataAttributes {
    pub filter: String,
    pub sort: String,
    pub toggle: String,
}

impl Default for DataAttributes {
    fn default() -> Self {
        Self {
            filter: "data-filter".to_string(),
            sort: "data-sort".to_string(),
            toggle: "data-toggle".to_string(),
        }
    }
}

/// Configuration shared by every control in a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControlsConfig {
    /// Class used when no bound mixer can provide one.
    pub active_class: String,
    pub attributes: DataAttributes,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            active_class: DEFAULT_ACTIVE_CLASS.to_string(),
            attributes: DataAttributes::default(),
        }
    }
}

impl ControlsConfig {
    /// Parse and validate a JSON config. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject empty class and attribute names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.active_class.trim().is_empty() {
            return Err(ConfigError::EmptyActiveClass);
        }
        let attrs = &self.attributes;
        for (name, value) in [
            ("filter", &attrs.filter),
            ("sort", &attrs.sort),
            ("toggle", &attrs.toggle),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyAttribute(name));
            }
        }
        Ok(())
    }
}
