use crate::EngineResult;
use serde::{Deserialize, Serialize};

/// Defaults applied to newly created entities and exported archives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// A new product's prefix is this string followed by its id.
    pub new_product_prefix: String,
    /// A new attribute's label is this string, a space, and its id.
    pub new_attribute_label: String,
    /// `attributeType` of a new attribute.
    pub default_attribute_type: String,
    /// `version` written into exported archives.
    pub archive_version: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            new_product_prefix: "NEW_P".to_string(),
            new_attribute_label: "New Attr".to_string(),
            default_attribute_type: "string".to_string(),
            archive_version: prodcfg_store::archive::DEFAULT_VERSION.to_string(),
        }
    }
}

impl EngineConfig {
    /// Parses a configuration; keys that are absent keep their defaults.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
