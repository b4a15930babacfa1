//! User-maintained JSON databases: an object keyed by record id.
//!
//! ```json
//! { "CONC_01": { "name": "Concrete C30/37", "density": 2400, "gwp": 0.1 } }
//! ```
//!
//! `gwp` is per `unit` (default `kg`); other units go through the same
//! declared-unit conversions as Ökobaudat records. The legacy KBOB object
//! format has this shape too and is read with the same rules.

use super::category::classify;
use super::okobaudat::{conversion_for, effective_density, parse_field, UnitInputs};
use super::record::{CanonicalRecord, DeclaredUnit, Provenance, RawValue, RejectReason, SourceSchema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomRecord {
    /// Taken from the key of the enclosing object.
    #[serde(skip)]
    pub id: String,
    pub name: Option<String>,
    pub category: Option<String>,
    pub density: Option<RawValue>,
    pub grammage: Option<RawValue>,
    pub gwp: Option<RawValue>,
    /// Older files store the impact factor under this name.
    pub carbon_per_unit: Option<RawValue>,
    pub penr: Option<RawValue>,
    pub ubp: Option<RawValue>,
    pub unit: Option<String>,
}

pub(crate) fn normalize(
    record: &CustomRecord,
    mislabel_threshold: f64,
) -> Result<CanonicalRecord, RejectReason> {
    let id = record.id.trim();
    if id.is_empty() {
        return Err(RejectReason::MissingId);
    }
    let name = record
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(id);

    let raw_value = match (&record.gwp, &record.carbon_per_unit) {
        (Some(gwp), _) => parse_field(Some(gwp), "gwp")?,
        (None, legacy) => parse_field(legacy.as_ref(), "carbon_per_unit")?,
    }
    .unwrap_or(0.0);
    let density = parse_field(record.density.as_ref(), "density")?;
    let inputs = UnitInputs {
        grammage: parse_field(record.grammage.as_ref(), "grammage")?,
        density,
        ..UnitInputs::default()
    };

    let declared_unit = DeclaredUnit::parse(record.unit.as_deref().unwrap_or("kg"));
    let conversion = conversion_for(&declared_unit, inputs, mislabel_threshold);
    let category = record
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map_or_else(|| classify(&[], name).to_string(), str::to_string);

    Ok(CanonicalRecord {
        id: id.to_string(),
        name: name.to_string(),
        category,
        density: effective_density(&conversion, density),
        impact_per_kg: conversion.apply(raw_value),
        penre_per_kg: parse_field(record.penr.as_ref(), "penr")?.and_then(|v| conversion.apply(v)),
        ubp_per_kg: parse_field(record.ubp.as_ref(), "ubp")?.and_then(|v| conversion.apply(v)),
        provenance: Provenance {
            schema: SourceSchema::Custom,
            declared_unit,
            raw_value,
            reference_flow_amount: None,
            note: conversion.describe(),
            conversion,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Conversion;
    use pretty_assertions::assert_eq;

    fn record(id: &str, json: &str) -> CustomRecord {
        let mut record: CustomRecord = serde_json::from_str(json).unwrap();
        record.id = id.to_string();
        record
    }

    #[test]
    fn per_kg_entries_keep_their_values() {
        let raw = record(
            "STEEL",
            r#"{"name": "Reinforcing steel", "category": "Metal", "density": 7850, "gwp": 0.75}"#,
        );
        let canonical = normalize(&raw, 0.01).unwrap();
        assert_eq!(canonical.id, "STEEL");
        assert_eq!(canonical.category, "Metal");
        assert_eq!(canonical.density, Some(7850.0));
        assert_eq!(canonical.impact_per_kg, Some(0.75));
        assert_eq!(canonical.provenance.conversion, Conversion::Identity);
    }

    #[test]
    fn legacy_carbon_field_and_name_fallbacks() {
        let raw = record("timber_glulam", r#"{"carbon_per_unit": "0,5"}"#);
        let canonical = normalize(&raw, 0.01).unwrap();
        assert_eq!(canonical.name, "timber_glulam");
        assert_eq!(canonical.category, "Wood");
        assert_eq!(canonical.impact_per_kg, Some(0.5));
    }

    #[test]
    fn volumetric_entries_are_converted_with_their_density() {
        let raw = record(
            "SCREED",
            r#"{"name": "Screed", "density": 2000, "gwp": 300, "unit": "m3"}"#,
        );
        assert_eq!(normalize(&raw, 0.01).unwrap().impact_per_kg, Some(0.15));
    }
}
