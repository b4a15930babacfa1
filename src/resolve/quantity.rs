//! Volume resolution for a single element.
//!
//! Fallback chain, first success wins:
//! 1. a volume key in a quantity set (or a surface area key, scaled by a
//!    fixed thickness)
//! 2. the product of the first Height, Width and Length values found in any
//!    property group
//! 3. zero
//!
//! Values are taken in the model's length unit; no unit conversion happens
//! here and volumes are never computed from geometry.

use crate::config::QuantityConfig;
use crate::model::{Element, ObjectGraph, PropertyGroups};
use serde::Serialize;
use tracing::debug;

/// Where a resolved volume came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VolumeSource {
    /// A declared volume quantity.
    Declared { group: String, key: String },
    /// Approximation: a surface area multiplied by a default thickness.
    SurfaceAreaApproximation {
        group: String,
        key: String,
        thickness: f64,
    },
    /// Height × Width × Length taken from property values.
    Dimensions {
        height: f64,
        width: f64,
        length: f64,
    },
    /// Nothing usable was found.
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeEstimate {
    pub value: f64,
    pub source: VolumeSource,
}

impl VolumeEstimate {
    fn none() -> Self {
        Self {
            value: 0.0,
            source: VolumeSource::None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuantityResolver {
    config: QuantityConfig,
}

impl QuantityResolver {
    #[must_use]
    pub fn new(config: QuantityConfig) -> Self {
        Self { config }
    }

    /// Representative volume of an element, `0.0` when none can be found.
    #[must_use]
    pub fn resolve_volume<G: ObjectGraph + ?Sized>(&self, graph: &G, element: &Element) -> f64 {
        self.estimate_volume(graph, element).value
    }

    /// Volume together with the step of the fallback chain that produced it.
    #[must_use]
    pub fn estimate_volume<G: ObjectGraph + ?Sized>(
        &self,
        graph: &G,
        element: &Element,
    ) -> VolumeEstimate {
        let Some(groups) = graph.property_groups(element) else {
            debug!(element = element.id, "no property groups, volume is zero");
            return VolumeEstimate::none();
        };

        let estimate = self
            .declared_volume(groups)
            .or_else(|| dimensional_volume(groups))
            .unwrap_or_else(VolumeEstimate::none);

        debug!(
            element = element.id,
            volume = estimate.value,
            source = ?estimate.source,
            "resolved element volume"
        );
        estimate
    }

    #[must_use]
    pub fn is_quantity_set(&self, group_name: &str) -> bool {
        self.config
            .set_patterns
            .iter()
            .any(|pattern| group_name.contains(pattern.as_str()))
    }

    fn declared_volume(&self, groups: &PropertyGroups) -> Option<VolumeEstimate> {
        let volume_keys = self.config.volume_keys.iter().map(|k| (k, false));
        let area_keys = self.config.surface_area_keys.iter().map(|k| (k, true));
        let keys: Vec<(&String, bool)> = volume_keys.chain(area_keys).collect();

        for (group_name, group) in groups.iter().filter(|(name, _)| self.is_quantity_set(name)) {
            for &(key, is_area) in &keys {
                let Some(value) = group.get(key.as_str()).and_then(|v| v.as_number()) else {
                    continue;
                };
                if value <= 0.0 {
                    continue;
                }

                if is_area {
                    let thickness = self.config.default_thickness;
                    return Some(VolumeEstimate {
                        value: value * thickness,
                        source: VolumeSource::SurfaceAreaApproximation {
                            group: group_name.clone(),
                            key: key.clone(),
                            thickness,
                        },
                    });
                }
                return Some(VolumeEstimate {
                    value,
                    source: VolumeSource::Declared {
                        group: group_name.clone(),
                        key: key.clone(),
                    },
                });
            }
        }

        None
    }
}

/// First numeric Height, Width and Length (substring, case-sensitive) across
/// all groups. A key matching several axes counts for the first unset one
/// in Height, Width, Length order.
fn dimensional_volume(groups: &PropertyGroups) -> Option<VolumeEstimate> {
    let mut height = None;
    let mut width = None;
    let mut length = None;

    for (key, value) in groups.values().flat_map(|group| group.iter()) {
        if key.contains("Height") && height.is_none() {
            height = value.as_number();
        } else if key.contains("Width") && width.is_none() {
            width = value.as_number();
        } else if key.contains("Length") && length.is_none() {
            length = value.as_number();
        }
    }

    match (height, width, length) {
        (Some(height), Some(width), Some(length))
            if height > 0.0 && width > 0.0 && length > 0.0 =>
        {
            Some(VolumeEstimate {
                value: height * width * length,
                source: VolumeSource::Dimensions {
                    height,
                    width,
                    length,
                },
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IfcModel, PropertyGroup, PropertyValue};
    use pretty_assertions::assert_eq;

    fn group(entries: &[(&str, PropertyValue)]) -> PropertyGroup {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    fn model_with(groups: Vec<(&str, PropertyGroup)>) -> (IfcModel, Element) {
        let mut model = IfcModel::default();
        let element = Element::new(1, "IFCWALL");
        model.add_element(element.clone());
        for (name, g) in groups {
            model.add_property_group(1, name, g);
        }
        (model, element)
    }

    #[test]
    fn gross_volume_wins_over_net_volume() {
        let (model, wall) = model_with(vec![(
            "Qto_WallBaseQuantities",
            group(&[
                ("NetVolume", PropertyValue::measure(2.0, "m3")),
                ("GrossVolume", PropertyValue::measure(2.4, "m3")),
            ]),
        )]);

        let estimate = QuantityResolver::default().estimate_volume(&model, &wall);
        assert_eq!(estimate.value, 2.4);
        assert_eq!(
            estimate.source,
            VolumeSource::Declared {
                group: "Qto_WallBaseQuantities".to_string(),
                key: "GrossVolume".to_string(),
            }
        );
    }

    #[test]
    fn bare_numbers_count_like_measures() {
        let (model, wall) = model_with(vec![(
            "BaseQuantities",
            group(&[("Volume", PropertyValue::Number(1.25))]),
        )]);
        assert_eq!(QuantityResolver::default().resolve_volume(&model, &wall), 1.25);
    }

    #[test]
    fn surface_area_is_scaled_by_default_thickness() {
        let (model, wall) = model_with(vec![(
            "Qto_CoveringBaseQuantities",
            group(&[("TotalSurfaceArea", PropertyValue::measure(10.0, "m2"))]),
        )]);

        let estimate = QuantityResolver::default().estimate_volume(&model, &wall);
        assert!((estimate.value - 2.0).abs() < 1e-12);
        assert!(matches!(
            estimate.source,
            VolumeSource::SurfaceAreaApproximation { thickness, .. } if thickness == 0.2
        ));
    }

    #[test]
    fn volumes_outside_quantity_sets_are_ignored() {
        let (model, wall) = model_with(vec![(
            "Pset_WallCommon",
            group(&[("NetVolume", PropertyValue::Number(3.0))]),
        )]);
        assert_eq!(QuantityResolver::default().resolve_volume(&model, &wall), 0.0);
    }

    #[test]
    fn zero_volume_falls_through_to_dimensions() {
        let (model, wall) = model_with(vec![
            (
                "Qto_WallBaseQuantities",
                group(&[("NetVolume", PropertyValue::measure(0.0, "m3"))]),
            ),
            (
                "Dimensions",
                group(&[
                    ("Height", PropertyValue::measure(3.0, "m")),
                    ("Width", PropertyValue::measure(0.25, "m")),
                    ("Length", PropertyValue::measure(4.0, "m")),
                ]),
            ),
        ]);

        let estimate = QuantityResolver::default().estimate_volume(&model, &wall);
        assert_eq!(estimate.value, 3.0);
        assert_eq!(
            estimate.source,
            VolumeSource::Dimensions {
                height: 3.0,
                width: 0.25,
                length: 4.0,
            }
        );
    }

    #[test]
    fn first_numeric_dimension_per_axis_wins() {
        let (model, wall) = model_with(vec![
            (
                "Pset_A",
                group(&[
                    ("Height", PropertyValue::Text("n/a".to_string())),
                    ("OverallHeight", PropertyValue::Number(2.0)),
                    ("Width", PropertyValue::Number(1.0)),
                ]),
            ),
            (
                "Pset_B",
                group(&[
                    ("Height", PropertyValue::Number(9.0)),
                    ("Length", PropertyValue::Number(5.0)),
                ]),
            ),
        ]);
        assert_eq!(QuantityResolver::default().resolve_volume(&model, &wall), 10.0);
    }

    #[test]
    fn missing_axis_yields_zero() {
        let (model, wall) = model_with(vec![(
            "Dimensions",
            group(&[
                ("Height", PropertyValue::Number(3.0)),
                ("Width", PropertyValue::Number(0.2)),
            ]),
        )]);

        let estimate = QuantityResolver::default().estimate_volume(&model, &wall);
        assert_eq!(estimate, VolumeEstimate::none());
    }

    #[test]
    fn quantity_set_patterns_are_configurable() {
        let config = QuantityConfig {
            set_patterns: vec!["Mengen".to_string()],
            ..QuantityConfig::default()
        };
        let (model, wall) = model_with(vec![
            ("Mengen", group(&[("Volume", PropertyValue::Number(0.8))])),
            ("BaseQuantities", group(&[("Volume", PropertyValue::Number(5.0))])),
        ]);
        assert_eq!(QuantityResolver::new(config).resolve_volume(&model, &wall), 0.8);
    }
}
