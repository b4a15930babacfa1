//! Ökobaudat EPD data (Schema B).
//!
//! Impact values are given per declared unit, which may be a mass, an area
//! or a volume. The declared unit picks the conversion:
//!
//! | unit  | condition                              | conversion              |
//! |-------|----------------------------------------|-------------------------|
//! | kg    | conversion factor to 1 kg < threshold  | × factor (mislabelled)  |
//! | kg    | otherwise                              | identity                |
//! | m²    | grammage known                         | ÷ grammage              |
//! | m³    | density known                          | ÷ density               |
//! | m³    | mass flow property known               | ÷ mass (approximation)  |
//! | other | or any missing input above             | unresolved              |

use super::category::classify;
use super::record::{
    CanonicalRecord, Conversion, DeclaredUnit, Provenance, RawValue, RejectReason, SourceSchema,
};
use serde::{Deserialize, Serialize};

/// Flattened EPD fragment as returned by the Ökobaudat API or read from an
/// export row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OkobaudatRecord {
    pub uuid: String,
    pub name: Option<String>,
    pub declared_unit: String,
    pub reference_flow_amount: Option<RawValue>,
    pub gwp: Option<RawValue>,
    pub penre: Option<RawValue>,
    pub density: Option<RawValue>,
    pub grammage: Option<RawValue>,
    pub conversion_factor_to_kg: Option<RawValue>,
    pub mass_flow_property: Option<RawValue>,
    /// Classification path, top level first.
    pub classification: Vec<String>,
}

/// Inputs the declared-unit decision table can draw on.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct UnitInputs {
    pub conversion_factor_to_kg: Option<f64>,
    pub grammage: Option<f64>,
    pub density: Option<f64>,
    pub mass_flow: Option<f64>,
}

/// Pick the conversion from a value per `unit` to a value per kilogram.
pub(crate) fn conversion_for(
    unit: &DeclaredUnit,
    inputs: UnitInputs,
    mislabel_threshold: f64,
) -> Conversion {
    let positive = |value: Option<f64>| value.filter(|v| *v > 0.0);

    match unit {
        DeclaredUnit::Kilogram => match positive(inputs.conversion_factor_to_kg) {
            Some(factor) if factor < mislabel_threshold => Conversion::MislabeledMass { factor },
            _ => Conversion::Identity,
        },
        DeclaredUnit::SquareMetre => match positive(inputs.grammage) {
            Some(grammage) => Conversion::AreaByGrammage { grammage },
            None => Conversion::Unresolved {
                reason: "declared per m² but no grammage is given".to_string(),
            },
        },
        DeclaredUnit::CubicMetre => {
            match (positive(inputs.density), positive(inputs.mass_flow)) {
                (Some(density), _) => Conversion::VolumeByDensity { density },
                (None, Some(mass)) => Conversion::VolumeByMassFlow { mass },
                (None, None) => Conversion::Unresolved {
                    reason: "declared per m³ but neither density nor mass is given".to_string(),
                },
            }
        }
        DeclaredUnit::Other(_) => Conversion::Unresolved {
            reason: format!("unsupported declared unit '{unit}'"),
        },
    }
}

/// Density to carry on the canonical record: the declared density, or the
/// mass flow value when the conversion used it in its place.
pub(crate) fn effective_density(conversion: &Conversion, density: Option<f64>) -> Option<f64> {
    match conversion {
        Conversion::VolumeByMassFlow { mass } => Some(*mass),
        _ => density.filter(|d| *d > 0.0),
    }
}

pub(crate) fn parse_field(
    value: Option<&RawValue>,
    field: &str,
) -> Result<Option<f64>, RejectReason> {
    match value {
        Some(raw) => raw.parse().map_err(|value| RejectReason::InvalidNumber {
            field: field.to_string(),
            value,
        }),
        None => Ok(None),
    }
}

pub(crate) fn normalize(
    record: &OkobaudatRecord,
    mislabel_threshold: f64,
) -> Result<CanonicalRecord, RejectReason> {
    let uuid = record.uuid.trim();
    if uuid.is_empty() {
        return Err(RejectReason::MissingId);
    }
    let name = record
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or(RejectReason::MissingName)?;

    let declared_gwp = parse_field(record.gwp.as_ref(), "gwp")?.unwrap_or(0.0);
    let penre = parse_field(record.penre.as_ref(), "penre")?;
    let inputs = UnitInputs {
        conversion_factor_to_kg: parse_field(
            record.conversion_factor_to_kg.as_ref(),
            "conversionFactorToKg",
        )?,
        grammage: parse_field(record.grammage.as_ref(), "grammage")?,
        density: parse_field(record.density.as_ref(), "density")?,
        mass_flow: parse_field(record.mass_flow_property.as_ref(), "massFlowProperty")?,
    };

    // Values are quoted per reference flow; bring them to one declared unit.
    let reference_amount = parse_field(record.reference_flow_amount.as_ref(), "referenceFlowAmount")?
        .filter(|amount| *amount > 0.0 && *amount != 1.0);
    let per_unit = |value: f64| reference_amount.map_or(value, |amount| value / amount);

    let declared_unit = DeclaredUnit::parse(&record.declared_unit);
    let conversion = conversion_for(&declared_unit, inputs, mislabel_threshold);

    let mut note = conversion.describe();
    if let Some(amount) = reference_amount {
        note = format!("per reference flow of {amount} {declared_unit}, rescaled; {note}");
    }

    Ok(CanonicalRecord {
        id: format!("OKOBAU_{uuid}"),
        name: name.to_string(),
        category: classify(&record.classification, name).to_string(),
        density: effective_density(&conversion, inputs.density),
        impact_per_kg: conversion.apply(per_unit(declared_gwp)),
        penre_per_kg: penre.and_then(|value| conversion.apply(per_unit(value))),
        ubp_per_kg: None,
        provenance: Provenance {
            schema: SourceSchema::Okobaudat,
            declared_unit,
            raw_value: declared_gwp,
            reference_flow_amount: reference_amount,
            conversion,
            note,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const THRESHOLD: f64 = 0.01;

    fn record(unit: &str, gwp: f64) -> OkobaudatRecord {
        OkobaudatRecord {
            uuid: "a1b2".to_string(),
            name: Some("Transportbeton C30/37".to_string()),
            declared_unit: unit.to_string(),
            gwp: Some(gwp.into()),
            ..OkobaudatRecord::default()
        }
    }

    #[test]
    fn volume_record_is_divided_by_density() {
        let mut raw = record("m3", 240.0);
        raw.density = Some(2400.0.into());

        let canonical = normalize(&raw, THRESHOLD).unwrap();
        assert_eq!(canonical.impact_per_kg, Some(0.1));
        assert_eq!(canonical.density, Some(2400.0));
        assert_eq!(canonical.id, "OKOBAU_a1b2");
        assert_eq!(canonical.category, "Concrete");
    }

    #[test]
    fn area_record_without_grammage_is_unresolved() {
        let canonical = normalize(&record("m2", 5.0), THRESHOLD).unwrap();

        assert_eq!(canonical.impact_per_kg, None);
        assert!(canonical.is_unresolved());
        assert_eq!(canonical.provenance.raw_value, 5.0);
        assert_eq!(canonical.provenance.declared_unit, DeclaredUnit::SquareMetre);
        assert!(canonical.provenance.note.starts_with("UNRESOLVED"));
    }

    #[test]
    fn area_record_is_divided_by_grammage() {
        let mut raw = record("m2", 5.0);
        raw.grammage = Some(RawValue::Text("12,5".to_string()));
        assert_eq!(normalize(&raw, THRESHOLD).unwrap().impact_per_kg, Some(0.4));
    }

    #[test]
    fn mass_record_is_used_as_is() {
        let mut raw = record("kg", 0.173);
        raw.conversion_factor_to_kg = Some(1.0.into());
        let canonical = normalize(&raw, THRESHOLD).unwrap();
        assert_eq!(canonical.impact_per_kg, Some(0.173));
        assert_eq!(canonical.provenance.conversion, Conversion::Identity);
    }

    #[test]
    fn tiny_conversion_factor_marks_a_mislabelled_mass_unit() {
        let mut raw = record("kg", 240.0);
        raw.conversion_factor_to_kg = Some(0.0005.into());
        let canonical = normalize(&raw, THRESHOLD).unwrap();
        assert_eq!(canonical.impact_per_kg, Some(240.0 * 0.0005));
        assert_eq!(
            canonical.provenance.conversion,
            Conversion::MislabeledMass { factor: 0.0005 }
        );
    }

    #[test]
    fn mass_flow_stands_in_for_missing_density() {
        let mut raw = record("m³", 300.0);
        raw.mass_flow_property = Some(1500.0.into());
        let canonical = normalize(&raw, THRESHOLD).unwrap();

        assert_eq!(canonical.impact_per_kg, Some(0.2));
        assert_eq!(canonical.density, Some(1500.0));
        assert!(canonical.provenance.conversion.is_approximation());
        assert!(canonical.provenance.note.starts_with("APPROXIMATION"));
    }

    #[test]
    fn unknown_unit_keeps_the_raw_value_for_review() {
        let canonical = normalize(&record("Stück", 12.0), THRESHOLD).unwrap();
        assert_eq!(canonical.impact_per_kg, None);
        assert_eq!(canonical.provenance.raw_value, 12.0);
        assert_eq!(
            canonical.provenance.declared_unit,
            DeclaredUnit::Other("Stück".to_string())
        );
    }

    #[test]
    fn reference_flow_amount_is_divided_out_first() {
        let mut raw = record("kg", 50.0);
        raw.reference_flow_amount = Some(1000.0.into());
        let canonical = normalize(&raw, THRESHOLD).unwrap();
        assert_eq!(canonical.impact_per_kg, Some(0.05));
    }

    #[test]
    fn provenance_keeps_the_value_as_quoted_per_reference_flow() {
        let mut raw = record("kg", 50.0);
        raw.reference_flow_amount = Some(1000.0.into());
        let provenance = normalize(&raw, THRESHOLD).unwrap().provenance;
        assert_eq!(provenance.raw_value, 50.0);
        assert_eq!(provenance.reference_flow_amount, Some(1000.0));
        assert_eq!(
            provenance.note,
            "per reference flow of 1000 kg, rescaled; declared per kg, used as is"
        );
    }

    #[test]
    fn unparseable_numbers_reject_the_record() {
        let mut raw = record("m3", 240.0);
        raw.density = Some(RawValue::Text("dicht".to_string()));
        assert_eq!(
            normalize(&raw, THRESHOLD),
            Err(RejectReason::InvalidNumber {
                field: "density".to_string(),
                value: "dicht".to_string(),
            })
        );
    }

    #[test]
    fn reads_api_json_in_camel_case() {
        let raw: OkobaudatRecord = serde_json::from_str(
            r#"{"uuid": "u-1", "name": "Gipskartonplatte", "declaredUnit": "m2",
                "gwp": 2.1, "grammage": 10.5, "classification": ["Mineralische Baustoffe", "Gips"]}"#,
        )
        .unwrap();
        let canonical = normalize(&raw, THRESHOLD).unwrap();
        assert_eq!(canonical.category, "Mortar/Plaster");
        assert_eq!(canonical.impact_per_kg, Some(0.2));
    }
}
