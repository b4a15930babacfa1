//! Engine configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "quantity": { "default_thickness": 0.25 } }
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Quantity-set names matched by substring against property group names.
const QUANTITY_SET_PATTERNS: &[&str] = &[
    "Qto_WallBaseQuantities",
    "Qto_SlabBaseQuantities",
    "Qto_BeamBaseQuantities",
    "Qto_ColumnBaseQuantities",
    "Qto_DoorBaseQuantities",
    "Qto_WindowBaseQuantities",
    "Qto_CoveringBaseQuantities",
    "BaseQuantities",
];

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub quantity: QuantityConfig,
    pub normalizer: NormalizerConfig,
}

impl AnalysisConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let content = std::fs::read_to_string(path_ref).map_err(|source| ConfigError::FileRead {
            path: path_ref.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path_ref.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantityConfig {
    /// A property group is a quantity set when its name contains any of these.
    pub set_patterns: Vec<String>,
    /// Volume keys, highest priority first.
    pub volume_keys: Vec<String>,
    /// Area keys tried after the volume keys; their value is turned into a
    /// volume by multiplying with `default_thickness`.
    pub surface_area_keys: Vec<String>,
    pub default_thickness: f64,
}

impl Default for QuantityConfig {
    fn default() -> Self {
        Self {
            set_patterns: QUANTITY_SET_PATTERNS.iter().map(|p| (*p).to_string()).collect(),
            volume_keys: vec![
                "GrossVolume".to_string(),
                "NetVolume".to_string(),
                "Volume".to_string(),
            ],
            surface_area_keys: vec!["TotalSurfaceArea".to_string()],
            default_thickness: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// A mass-declared record whose "conversion factor to 1 kg" is below this
    /// is treated as volume-declared and rescaled by that factor.
    pub mislabel_threshold: f64,
    /// Memoize normalized records by id.
    pub cache: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            mislabel_threshold: 0.01,
            cache: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{ "quantity": { "default_thickness": 0.25 } }"#).unwrap();
        assert_eq!(config.quantity.default_thickness, 0.25);
        assert_eq!(config.quantity.volume_keys, QuantityConfig::default().volume_keys);
        assert_eq!(config.normalizer, NormalizerConfig::default());
    }

    #[test]
    fn empty_object_is_the_default_config() {
        let config: AnalysisConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }
}
