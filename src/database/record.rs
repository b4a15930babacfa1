//! Raw and canonical environmental-impact records.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::{CustomRecord, KbobRecord, OkobaudatRecord};

/// A numeric field as external databases write it: a JSON number or text
/// such as `"2400"`, `"0,105"` or the placeholder `"-"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// `Ok(None)` for placeholders (`-`, empty text), `Err` with the
    /// offending text when it is not a finite number. Decimal commas are
    /// accepted; `NaN` and infinities are not.
    pub fn parse(&self) -> Result<Option<f64>, String> {
        match self {
            RawValue::Number(value) if value.is_finite() => Ok(Some(*value)),
            RawValue::Number(value) => Err(value.to_string()),
            RawValue::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() || trimmed == "-" {
                    return Ok(None);
                }
                trimmed
                    .replace(',', ".")
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .map(Some)
                    .ok_or_else(|| trimmed.to_string())
            }
        }
    }

    /// Like [`RawValue::parse`], but unparseable text counts as absent.
    #[must_use]
    pub fn lenient(&self) -> Option<f64> {
        self.parse().ok().flatten()
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Number(value) => write!(f, "{value}"),
            RawValue::Text(text) => f.write_str(text),
        }
    }
}

/// Which conversion table a raw record is normalized with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceSchema {
    /// KBOB indicator list: values already per kilogram.
    Kbob,
    /// Ökobaudat EPD data: values per declared unit.
    Okobaudat,
    /// User-maintained JSON database.
    Custom,
}

impl fmt::Display for SourceSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceSchema::Kbob => "KBOB",
            SourceSchema::Okobaudat => "Ökobaudat",
            SourceSchema::Custom => "custom",
        })
    }
}

/// A record as fetched from a database source, tagged with its schema.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    Kbob(KbobRecord),
    Okobaudat(OkobaudatRecord),
    Custom(CustomRecord),
}

impl RawRecord {
    #[must_use]
    pub fn schema(&self) -> SourceSchema {
        match self {
            RawRecord::Kbob(_) => SourceSchema::Kbob,
            RawRecord::Okobaudat(_) => SourceSchema::Okobaudat,
            RawRecord::Custom(_) => SourceSchema::Custom,
        }
    }

    /// Canonical id the record is stored under once normalized.
    #[must_use]
    pub fn canonical_id(&self) -> Option<String> {
        match self {
            RawRecord::Kbob(record) => record.source_id().map(|id| format!("KBOB_{id}")),
            RawRecord::Okobaudat(record) => {
                let uuid = record.uuid.trim();
                (!uuid.is_empty()).then(|| format!("OKOBAU_{uuid}"))
            }
            RawRecord::Custom(record) => {
                let id = record.id.trim();
                (!id.is_empty()).then(|| id.to_string())
            }
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            RawRecord::Kbob(record) => record.name.as_deref(),
            RawRecord::Okobaudat(record) => record.name.as_deref(),
            RawRecord::Custom(record) => record.name.as_deref(),
        }
    }
}

/// Reference unit a raw impact value is expressed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclaredUnit {
    Kilogram,
    SquareMetre,
    CubicMetre,
    Other(String),
}

impl DeclaredUnit {
    #[must_use]
    pub fn parse(unit: &str) -> Self {
        let normalized = unit.trim().to_lowercase();
        match normalized.as_str() {
            "kg" | "1 kg" | "kilogram" => DeclaredUnit::Kilogram,
            "m2" | "m²" | "m^2" | "qm" | "1 m2" | "1 m²" => DeclaredUnit::SquareMetre,
            "m3" | "m³" | "m^3" | "cbm" | "1 m3" | "1 m³" => DeclaredUnit::CubicMetre,
            _ => DeclaredUnit::Other(unit.trim().to_string()),
        }
    }
}

impl fmt::Display for DeclaredUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredUnit::Kilogram => f.write_str("kg"),
            DeclaredUnit::SquareMetre => f.write_str("m²"),
            DeclaredUnit::CubicMetre => f.write_str("m³"),
            DeclaredUnit::Other(unit) if unit.is_empty() => f.write_str("unspecified"),
            DeclaredUnit::Other(unit) => f.write_str(unit),
        }
    }
}

/// The path taken from a declared-unit value to a per-kilogram value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Conversion {
    /// Already per kilogram.
    Identity,
    /// Declared per kg but carrying a tiny "conversion factor to 1 kg":
    /// the value is really per volume and is multiplied by the factor.
    MislabeledMass { factor: f64 },
    /// Per m², divided by mass per area.
    AreaByGrammage { grammage: f64 },
    /// Per m³, divided by density.
    VolumeByDensity { density: f64 },
    /// Approximation: per m³ with no density, the mass flow property is
    /// taken as kilograms per declared unit.
    VolumeByMassFlow { mass: f64 },
    /// No per-kilogram value can be derived; needs manual review.
    Unresolved { reason: String },
}

impl Conversion {
    /// Apply the conversion to a value per declared unit.
    #[must_use]
    pub fn apply(&self, value: f64) -> Option<f64> {
        match self {
            Conversion::Identity => Some(value),
            Conversion::MislabeledMass { factor } => Some(value * factor),
            Conversion::AreaByGrammage { grammage } => Some(value / grammage),
            Conversion::VolumeByDensity { density } => Some(value / density),
            Conversion::VolumeByMassFlow { mass } => Some(value / mass),
            Conversion::Unresolved { .. } => None,
        }
    }

    #[must_use]
    pub fn is_approximation(&self) -> bool {
        matches!(self, Conversion::VolumeByMassFlow { .. })
    }

    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Conversion::Identity => "declared per kg, used as is".to_string(),
            Conversion::MislabeledMass { factor } => {
                format!("declared per kg but conversion factor {factor} marks it volumetric; multiplied by {factor}")
            }
            Conversion::AreaByGrammage { grammage } => {
                format!("declared per m², divided by grammage {grammage} kg/m²")
            }
            Conversion::VolumeByDensity { density } => {
                format!("declared per m³, divided by density {density} kg/m³")
            }
            Conversion::VolumeByMassFlow { mass } => format!(
                "APPROXIMATION: declared per m³ without density, mass flow {mass} kg used as density"
            ),
            Conversion::Unresolved { reason } => format!("UNRESOLVED: {reason}"),
        }
    }
}

/// Where a canonical value came from, kept for auditing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Provenance {
    pub schema: SourceSchema,
    pub declared_unit: DeclaredUnit,
    /// Impact value as given by the source, per reference flow.
    pub raw_value: f64,
    /// Amount of the declared unit the source quotes values for, when not 1.
    pub reference_flow_amount: Option<f64>,
    pub conversion: Conversion,
    pub note: String,
}

/// A database entry expressed per kilogram of material.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRecord {
    pub id: String,
    pub name: String,
    pub category: String,
    /// kg/m³
    pub density: Option<f64>,
    /// kg CO₂-eq per kg. `None` when the conversion is unresolved.
    pub impact_per_kg: Option<f64>,
    /// Non-renewable primary energy per kg.
    pub penre_per_kg: Option<f64>,
    /// Swiss eco-points per kg.
    pub ubp_per_kg: Option<f64>,
    pub provenance: Provenance,
}

impl CanonicalRecord {
    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        self.impact_per_kg.is_none()
    }
}

/// Why a raw record was excluded from the canonical set.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    #[error("record has no id")]
    MissingId,
    #[error("record has no name")]
    MissingName,
    #[error("name is shorter than two characters")]
    NameTooShort,
    #[error("name looks corrupted")]
    CorruptedName,
    #[error("name contains no letters")]
    NameWithoutLetters,
    #[error("{field} is not a number: '{value}'")]
    InvalidNumber { field: String, value: String },
}

/// A raw record that normalization skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    /// Canonical id when one could be derived, otherwise the record name.
    pub record: String,
    pub schema: SourceSchema,
    pub reason: RejectReason,
}
