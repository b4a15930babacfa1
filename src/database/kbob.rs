//! KBOB indicator list (Schema A).
//!
//! Impact values are already per kilogram. Density comes from `kg/unit`,
//! or the mean of `min density` and `max density` when that is missing.

use super::category::kbob_category;
use super::record::{
    CanonicalRecord, Conversion, DeclaredUnit, Provenance, RawValue, RejectReason, SourceSchema,
};
use serde::{Deserialize, Serialize};

/// Characters that only show up in KBOB names through broken encodings.
const CORRUPTION_CHARS: &[char] = &['¤', '¶', '`', '^'];
const CORRUPTION_PATTERNS: &[&str] = &["*a", "+I", "\\+I"];
/// Share of control or corruption characters above which a name is rejected.
const CORRUPTION_RATIO: f64 = 0.2;
/// Id group assumed when the id has no leading number.
const UNNUMBERED_GROUP: f64 = 99.0;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KbobRecord {
    #[serde(rename = "KBOB_ID", default)]
    pub id: Option<RawValue>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "GWP", default)]
    pub gwp: Option<RawValue>,
    #[serde(rename = "PENRE", default)]
    pub penre: Option<RawValue>,
    #[serde(rename = "UBP", default)]
    pub ubp: Option<RawValue>,
    #[serde(rename = "kg/unit", default)]
    pub kg_per_unit: Option<RawValue>,
    #[serde(rename = "min density", default)]
    pub min_density: Option<RawValue>,
    #[serde(rename = "max density", default)]
    pub max_density: Option<RawValue>,
}

impl KbobRecord {
    /// The KBOB id as written in the list, e.g. `01.002.01`.
    #[must_use]
    pub fn source_id(&self) -> Option<String> {
        let id = self.id.as_ref()?.to_string();
        let id = id.trim();
        (!id.is_empty()).then(|| id.to_string())
    }

    /// Leading numeric group of the id, used for the category ranges.
    fn category_number(&self) -> Option<f64> {
        let number = match self.id.as_ref()? {
            RawValue::Number(value) => Some(*value),
            RawValue::Text(text) => text.trim().split('.').next()?.parse().ok(),
        };
        number.filter(|value: &f64| value.is_finite())
    }

    fn density(&self) -> Option<f64> {
        let direct = self
            .kg_per_unit
            .as_ref()
            .and_then(RawValue::lenient)
            .filter(|d| *d > 0.0);
        direct.or_else(|| {
            let min = self.min_density.as_ref()?.lenient()?;
            let max = self.max_density.as_ref()?.lenient()?;
            Some((min + max) / 2.0).filter(|d| *d > 0.0)
        })
    }
}

/// Reject names that are empty, too short, mostly garbage or letterless.
pub fn validate_name(name: &str) -> Result<(), RejectReason> {
    let length = name.chars().count();
    if length < 2 {
        return Err(RejectReason::NameTooShort);
    }

    let garbage = name
        .chars()
        .filter(|c| (*c as u32) < 32 || CORRUPTION_CHARS.contains(c))
        .count();
    let garbage_share = garbage as f64 / length as f64;
    if garbage_share > CORRUPTION_RATIO {
        return Err(RejectReason::CorruptedName);
    }
    if CORRUPTION_PATTERNS.iter().any(|p| name.contains(p)) {
        return Err(RejectReason::CorruptedName);
    }
    if !name.chars().any(char::is_alphabetic) {
        return Err(RejectReason::NameWithoutLetters);
    }
    Ok(())
}

pub(crate) fn normalize(record: &KbobRecord) -> Result<CanonicalRecord, RejectReason> {
    let source_id = record.source_id().ok_or(RejectReason::MissingId)?;
    let name = record
        .name
        .clone()
        .unwrap_or_else(|| format!("Material {source_id}"));
    validate_name(&name)?;

    let gwp = match &record.gwp {
        Some(value) => value.parse().map_err(|value| RejectReason::InvalidNumber {
            field: "GWP".to_string(),
            value,
        })?,
        None => None,
    }
    .unwrap_or(0.0);

    let category = record
        .category_number()
        .map_or_else(|| kbob_category(UNNUMBERED_GROUP), kbob_category)
        .to_string();

    Ok(CanonicalRecord {
        id: format!("KBOB_{source_id}"),
        name,
        category,
        density: record.density(),
        impact_per_kg: Some(gwp),
        penre_per_kg: record.penre.as_ref().and_then(RawValue::lenient),
        ubp_per_kg: record.ubp.as_ref().and_then(RawValue::lenient),
        provenance: Provenance {
            schema: SourceSchema::Kbob,
            declared_unit: DeclaredUnit::Kilogram,
            raw_value: gwp,
            reference_flow_amount: None,
            conversion: Conversion::Identity,
            note: "KBOB indicators are declared per kg".to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(json: &str) -> KbobRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn reads_list_entries_with_mixed_value_types() {
        let record = parse(
            r#"{"KBOB_ID": "01.002", "Name": "Hochbaubeton", "GWP": 0.0991,
                "PENRE": "0,74", "UBP": "-", "kg/unit": 2400}"#,
        );
        let canonical = normalize(&record).unwrap();

        assert_eq!(canonical.id, "KBOB_01.002");
        assert_eq!(canonical.category, "Concrete");
        assert_eq!(canonical.density, Some(2400.0));
        assert_eq!(canonical.impact_per_kg, Some(0.0991));
        assert_eq!(canonical.penre_per_kg, Some(0.74));
        assert_eq!(canonical.ubp_per_kg, None);
        assert_eq!(canonical.provenance.conversion, Conversion::Identity);
    }

    #[test]
    fn density_falls_back_to_min_max_mean() {
        let record = parse(
            r#"{"KBOB_ID": 10.01, "Name": "Glaswolle", "GWP": 1.1,
                "kg/unit": "-", "min density": 20, "max density": 40}"#,
        );
        let canonical = normalize(&record).unwrap();
        assert_eq!(canonical.density, Some(30.0));
        assert_eq!(canonical.category, "Insulation");
    }

    #[test]
    fn corrupted_names_are_rejected() {
        assert_eq!(validate_name(""), Err(RejectReason::NameTooShort));
        assert_eq!(validate_name("X"), Err(RejectReason::NameTooShort));
        assert_eq!(validate_name("¤¶`^ab"), Err(RejectReason::CorruptedName));
        assert_eq!(validate_name("Beton *a"), Err(RejectReason::CorruptedName));
        assert_eq!(validate_name("Stahl +I 12"), Err(RejectReason::CorruptedName));
        assert_eq!(validate_name("12.5 / 3"), Err(RejectReason::NameWithoutLetters));
        assert_eq!(validate_name("Stahl, verzinkt"), Ok(()));
    }

    #[test]
    fn unparseable_gwp_rejects_but_missing_gwp_is_zero() {
        let broken = parse(r#"{"KBOB_ID": 6.01, "Name": "Stahlblech", "GWP": "abc"}"#);
        assert_eq!(
            normalize(&broken),
            Err(RejectReason::InvalidNumber {
                field: "GWP".to_string(),
                value: "abc".to_string(),
            })
        );

        let empty = parse(r#"{"KBOB_ID": 6.01, "Name": "Stahlblech"}"#);
        assert_eq!(normalize(&empty).unwrap().impact_per_kg, Some(0.0));
    }

    #[test]
    fn records_without_id_are_rejected() {
        let record = parse(r#"{"Name": "Beton"}"#);
        assert_eq!(normalize(&record), Err(RejectReason::MissingId));
    }

    #[test]
    fn non_numeric_id_falls_into_the_last_range() {
        let record = parse(r#"{"KBOB_ID": "X-1", "Name": "Sondermaterial", "GWP": 1.0}"#);
        assert_eq!(normalize(&record).unwrap().category, "Kitchen/Interior");
    }

    #[test]
    fn non_finite_gwp_rejects_the_record() {
        let record = parse(
            r#"{"KBOB_ID": "01.002", "Name": "Beton", "GWP": "NaN", "kg/unit": 2400}"#,
        );
        assert_eq!(
            normalize(&record),
            Err(RejectReason::InvalidNumber {
                field: "GWP".to_string(),
                value: "NaN".to_string(),
            })
        );
    }
}
