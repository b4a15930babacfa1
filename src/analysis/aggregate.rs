//! Carbon aggregation: mass and impact per mapped material.

use super::Mapping;
use crate::database::{CanonicalDatabase, CanonicalRecord};
use crate::model::ObjectGraph;
use crate::resolve::{
    elements_for_material, resolve_materials_with_counts, MaterialUsage, QuantityResolver,
    VolumeSource,
};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

/// How a material's totals came about. Every status other than `Computed`
/// leaves `total_impact` at zero for a reason the caller can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    Computed,
    /// The record has no density, so volume cannot become mass.
    MissingDensity,
    /// The record's impact factor is zero.
    ZeroImpactFactor,
    /// The record's unit conversion is unresolved; counted as zero impact.
    UnresolvedConversion,
}

impl ResultStatus {
    fn of(record: &CanonicalRecord) -> Self {
        match (record.impact_per_kg, record.density) {
            (None, _) => ResultStatus::UnresolvedConversion,
            (Some(_), None) => ResultStatus::MissingDensity,
            (Some(_), Some(density)) if density == 0.0 => ResultStatus::MissingDensity,
            (Some(impact), Some(_)) if impact == 0.0 => ResultStatus::ZeroImpactFactor,
            (Some(_), Some(_)) => ResultStatus::Computed,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ResultStatus::Computed => "computed",
            ResultStatus::MissingDensity => "missing density",
            ResultStatus::ZeroImpactFactor => "zero impact factor",
            ResultStatus::UnresolvedConversion => "unresolved conversion",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementContribution {
    pub element_id: u64,
    pub global_id: String,
    pub name: String,
    pub entity_type: String,
    pub volume: f64,
    pub source: VolumeSource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialResult {
    pub material: String,
    pub record_id: String,
    pub record_name: String,
    pub category: String,
    /// kg/m³, zero when the record has none.
    pub density: f64,
    /// kg CO₂-eq/kg, zero when the conversion is unresolved.
    pub impact_per_kg: f64,
    pub element_count: usize,
    pub elements_with_volume: usize,
    /// m³
    pub total_volume: f64,
    /// kg
    pub total_mass: f64,
    /// kg CO₂-eq
    pub total_impact: f64,
    /// MJ, when the record carries non-renewable primary energy.
    pub total_penre: Option<f64>,
    /// Eco-points, when the record carries them.
    pub total_ubp: Option<f64>,
    pub status: ResultStatus,
    pub contributions: Vec<ElementContribution>,
}

impl MaterialResult {
    /// Elements counted but without any volume.
    #[must_use]
    pub fn elements_without_volume(&self) -> usize {
        self.element_count - self.elements_with_volume
    }
}

/// A mapping entry whose record id is not in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedMapping {
    pub material: String,
    pub record_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregationReport {
    /// Keyed by material name, in mapping order.
    pub results: IndexMap<String, MaterialResult>,
    pub unresolved_mappings: Vec<UnresolvedMapping>,
    /// Model materials with no record id, most used first.
    pub unmapped_materials: Vec<MaterialUsage>,
}

impl AggregationReport {
    /// Results by total impact, highest first.
    #[must_use]
    pub fn ranked(&self) -> Vec<&MaterialResult> {
        let mut ranked: Vec<&MaterialResult> = self.results.values().collect();
        ranked.sort_by(|a, b| b.total_impact.total_cmp(&a.total_impact));
        ranked
    }

    #[must_use]
    pub fn total_impact(&self) -> f64 {
        self.results.values().map(|r| r.total_impact).sum()
    }

    #[must_use]
    pub fn total_mass(&self) -> f64 {
        self.results.values().map(|r| r.total_mass).sum()
    }
}

/// Accumulate volume, mass and impact for every mapped material.
///
/// Materials whose record id is missing from `database` are reported in
/// `unresolved_mappings` and left out of `results`. Nothing here fails: a
/// bad record or a volumeless element only ever contributes zero.
pub fn aggregate<G: ObjectGraph + ?Sized>(
    graph: &G,
    mapping: &Mapping,
    database: &CanonicalDatabase,
    quantities: &QuantityResolver,
) -> AggregationReport {
    let mut report = AggregationReport::default();

    for (material, record_id) in mapping.iter() {
        let Some(record) = database.get(record_id) else {
            warn!(material, record_id, "mapped record is not in the database");
            report.unresolved_mappings.push(UnresolvedMapping {
                material: material.to_string(),
                record_id: record_id.to_string(),
            });
            continue;
        };

        let result = aggregate_material(graph, material, record, quantities);
        debug!(
            material,
            record_id,
            elements = result.element_count,
            with_volume = result.elements_with_volume,
            volume = result.total_volume,
            mass = result.total_mass,
            impact = result.total_impact,
            status = result.status.label(),
            "aggregated material"
        );
        report.results.insert(material.to_string(), result);
    }

    report.unmapped_materials = resolve_materials_with_counts(graph)
        .into_iter()
        .filter(|usage| !mapping.is_mapped(&usage.name))
        .collect();

    info!(
        materials = report.results.len(),
        unresolved = report.unresolved_mappings.len(),
        unmapped = report.unmapped_materials.len(),
        total_impact = report.total_impact(),
        "aggregation complete"
    );
    report
}

fn aggregate_material<G: ObjectGraph + ?Sized>(
    graph: &G,
    material: &str,
    record: &CanonicalRecord,
    quantities: &QuantityResolver,
) -> MaterialResult {
    let mut contributions = Vec::new();
    let mut total_volume = 0.0;
    let mut elements_with_volume = 0;

    for element in elements_for_material(graph, material) {
        let estimate = quantities.estimate_volume(graph, element);
        total_volume += estimate.value;
        if estimate.value > 0.0 {
            elements_with_volume += 1;
        }
        contributions.push(ElementContribution {
            element_id: element.id,
            global_id: element.global_id.clone(),
            name: element.label(),
            entity_type: element.entity_type.clone(),
            volume: estimate.value,
            source: estimate.source,
        });
    }

    let density = record.density.unwrap_or(0.0);
    let impact_per_kg = record.impact_per_kg.unwrap_or(0.0);
    let total_mass = total_volume * density;

    MaterialResult {
        material: material.to_string(),
        record_id: record.id.clone(),
        record_name: record.name.clone(),
        category: record.category.clone(),
        density,
        impact_per_kg,
        element_count: contributions.len(),
        elements_with_volume,
        total_volume,
        total_mass,
        total_impact: total_mass * impact_per_kg,
        total_penre: record.penre_per_kg.map(|penre| total_mass * penre),
        total_ubp: record.ubp_per_kg.map(|ubp| total_mass * ubp),
        status: ResultStatus::of(record),
        contributions,
    }
}
