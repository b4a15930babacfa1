//! Material resolution: which material names an element is made of.

use crate::model::{
    Element, Material, MaterialAssociation, MaterialConstituentSet, MaterialLayerSet,
    MaterialProfileSet, ObjectGraph,
};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// A material name and the number of elements that use it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterialUsage {
    pub name: String,
    pub element_count: usize,
}

/// Material names of one association, deduplicated, in traversal order.
///
/// An association without any named material yields an empty list.
#[must_use]
pub fn resolve_association(association: &MaterialAssociation) -> Vec<String> {
    let mut names = IndexSet::new();
    collect_names(association, &mut names);
    names.into_iter().collect()
}

/// Material names of an element across all of its associations,
/// deduplicated per element, in first-seen order.
#[must_use]
pub fn resolve<G: ObjectGraph + ?Sized>(graph: &G, element: &Element) -> Vec<String> {
    let mut names = IndexSet::new();
    for association in graph.material_associations(element) {
        collect_names(association, &mut names);
    }
    names.into_iter().collect()
}

/// Every element whose resolved names contain `name`, in enumeration order.
///
/// This is a full scan on every call; there is no persistent index.
#[must_use]
pub fn elements_for_material<'g, G: ObjectGraph + ?Sized>(
    graph: &'g G,
    name: &str,
) -> Vec<&'g Element> {
    graph
        .list_elements()
        .iter()
        .filter(|element| resolve(graph, element).iter().any(|n| n == name))
        .collect()
}

/// All materials used in the model with their element counts, most used
/// first. Each element counts once per material; equal counts keep
/// first-seen order.
#[must_use]
pub fn resolve_materials_with_counts<G: ObjectGraph + ?Sized>(graph: &G) -> Vec<MaterialUsage> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();

    for element in graph.list_elements() {
        for name in resolve(graph, element) {
            *counts.entry(name).or_insert(0) += 1;
        }
    }

    let mut usages: Vec<MaterialUsage> = counts
        .into_iter()
        .map(|(name, element_count)| MaterialUsage {
            name,
            element_count,
        })
        .collect();
    usages.sort_by(|a, b| b.element_count.cmp(&a.element_count));
    usages
}

fn collect_names(association: &MaterialAssociation, names: &mut IndexSet<String>) {
    match association {
        MaterialAssociation::Simple(material) => push_name(Some(material), names),
        MaterialAssociation::LayeredSet(set) | MaterialAssociation::LayeredSetUsage(set) => {
            collect_layer_set(set, names);
        }
        MaterialAssociation::List(materials) => {
            for material in materials {
                push_name(Some(material), names);
            }
        }
        MaterialAssociation::ConstituentSet(set) => collect_constituent_set(set, names),
        MaterialAssociation::ProfileSet(set) | MaterialAssociation::ProfileSetUsage(set) => {
            collect_profile_set(set, names);
        }
    }
}

fn collect_layer_set(set: &MaterialLayerSet, names: &mut IndexSet<String>) {
    for layer in &set.layers {
        push_name(layer.material.as_ref(), names);
    }
}

fn collect_constituent_set(set: &MaterialConstituentSet, names: &mut IndexSet<String>) {
    for constituent in &set.constituents {
        push_name(constituent.material.as_ref(), names);
    }
}

fn collect_profile_set(set: &MaterialProfileSet, names: &mut IndexSet<String>) {
    for profile in &set.profiles {
        push_name(profile.material.as_ref(), names);
    }
}

fn push_name(material: Option<&Material>, names: &mut IndexSet<String>) {
    if let Some(name) = material.and_then(Material::name) {
        if !names.contains(name) {
            names.insert(name.to_string());
        }
    }
}
