use indexmap::IndexMap;
use serde::Serialize;

/// A property or quantity value: a bare number, a number with its unit, or
/// a non-numeric value that never takes part in quantity resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Number(f64),
    Measure { value: f64, unit: String },
    Text(String),
    Boolean(bool),
}

impl PropertyValue {
    #[must_use]
    pub fn measure(value: f64, unit: impl Into<String>) -> Self {
        PropertyValue::Measure {
            value,
            unit: unit.into(),
        }
    }

    /// Numeric component; the unit is ignored.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(value) | PropertyValue::Measure { value, .. } => Some(*value),
            PropertyValue::Text(_) | PropertyValue::Boolean(_) => None,
        }
    }
}

/// Key → value entries of one property set or quantity set.
pub type PropertyGroup = IndexMap<String, PropertyValue>;

/// Group name → group, in the order the groups were attached.
pub type PropertyGroups = IndexMap<String, PropertyGroup>;
