use serde::{Deserialize, Serialize};

use crate::error::{NavError, NavResult};

/// Line prefixes used when rendering file bodies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Prefix for every line of a file the patch does not touch.
    pub unchanged_margin: String,
    pub context_marker: String,
    pub added_marker: String,
    pub removed_marker: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            unchanged_margin: "  ".into(),
            context_marker: "  ".into(),
            added_marker: "+ ".into(),
            removed_marker: "- ".into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    pub render: RenderConfig,
}

impl NavigatorConfig {
    pub fn from_toml_str(text: &str) -> NavResult<Self> {
        toml::from_str(text).map_err(|e| NavError::Config(e.to_string()))
    }
}
