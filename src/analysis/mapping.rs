//! Material name → canonical record id.

use crate::database::CanonicalDatabase;
use crate::error::MappingError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Term groups tried when a material name finds nothing by itself. A group
/// applies when the lower-cased name contains any of its terms; its terms
/// are then searched in order.
const SYNONYMS: &[&[&str]] = &[
    &["concrete", "beton"],
    &["steel", "stahl", "metal"],
    &["concrete", "reinforced"],
    &["timber", "wood", "holz"],
    &["glass", "glas"],
    &["gypsum", "plaster", "gips"],
    &["brick", "masonry", "ziegel"],
    &["insulation", "dämmung"],
    &["aluminum", "aluminium"],
];

/// User mapping from model material names to database record ids.
///
/// Many names may point at one record. A name with an empty id is treated
/// as unmapped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mapping {
    entries: IndexMap<String, String>,
}

impl Mapping {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, material: impl Into<String>, record_id: impl Into<String>) {
        self.entries.insert(material.into(), record_id.into());
    }

    /// The record id for `material`, if it is mapped to a non-empty id.
    #[must_use]
    pub fn get(&self, material: &str) -> Option<&str> {
        self.entries
            .get(material)
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
    }

    #[must_use]
    pub fn is_mapped(&self, material: &str) -> bool {
        self.get(material).is_some()
    }

    /// Mapped pairs in insertion order, skipping empty ids.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(material, id)| (material.as_str(), id.trim()))
            .filter(|(_, id)| !id.is_empty())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn from_json(json: &str) -> Result<Self, MappingError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MappingError> {
        let path_ref = path.as_ref();
        let content =
            std::fs::read_to_string(path_ref).map_err(|source| MappingError::FileRead {
                path: path_ref.to_path_buf(),
                source,
            })?;
        Self::from_json(&content)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), MappingError> {
        let path_ref = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path_ref, json).map_err(|source| MappingError::FileWrite {
            path: path_ref.to_path_buf(),
            source,
        })
    }
}

/// What [`auto_map`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AutoMapSummary {
    /// Newly mapped `(material, record id)` pairs.
    pub mapped: Vec<(String, String)>,
    pub already_mapped: usize,
    pub unmatched: Vec<String>,
}

/// First record found for `material`: by its own name, then by synonyms.
fn find_record<'d>(material: &str, database: &'d CanonicalDatabase) -> Option<&'d str> {
    let direct = database
        .search(material)
        .first()
        .copied()
        .map(|record| record.id.as_str());
    if direct.is_some() {
        return direct;
    }

    let lower = material.to_lowercase();
    SYNONYMS
        .iter()
        .filter(|terms| terms.iter().any(|term| lower.contains(term)))
        .flat_map(|terms| terms.iter())
        .find_map(|term| {
            database
                .search(term)
                .first()
                .copied()
                .map(|record| record.id.as_str())
        })
}

/// Map every unmapped material name that a database search can place.
/// Names that are already mapped are left alone.
pub fn auto_map<'a, I>(
    materials: I,
    database: &CanonicalDatabase,
    mapping: &mut Mapping,
) -> AutoMapSummary
where
    I: IntoIterator<Item = &'a str>,
{
    let mut summary = AutoMapSummary::default();

    for material in materials {
        if mapping.is_mapped(material) {
            summary.already_mapped += 1;
            continue;
        }
        match find_record(material, database) {
            Some(id) => {
                debug!(material, record = id, "auto-mapped material");
                mapping.insert(material, id);
                summary.mapped.push((material.to_string(), id.to_string()));
            }
            None => summary.unmatched.push(material.to_string()),
        }
    }

    info!(
        mapped = summary.mapped.len(),
        already_mapped = summary.already_mapped,
        unmatched = summary.unmatched.len(),
        "auto-mapping complete"
    );
    summary
}
