use super::{Element, MaterialAssociation, PropertyGroup, PropertyGroups};
use std::collections::HashMap;

/// Read access to a building model.
///
/// The engines only ever borrow a graph; they never mutate it and keep no
/// reference to it between calls.
pub trait ObjectGraph {
    /// All elements, in the graph's native enumeration order.
    fn list_elements(&self) -> &[Element];

    fn material_associations(&self, element: &Element) -> &[MaterialAssociation];

    fn property_groups(&self, element: &Element) -> Option<&PropertyGroups>;
}

/// In-memory building model produced by the IFC reader.
#[derive(Debug, Default)]
pub struct IfcModel {
    pub name: String,
    pub schema: String,
    pub file_path: String,
    elements: Vec<Element>,
    associations: HashMap<u64, Vec<MaterialAssociation>>, // element_id → associations
    properties: HashMap<u64, PropertyGroups>,              // element_id → groups
}

impl IfcModel {
    #[must_use]
    pub fn new(name: String, schema: String, file_path: String) -> Self {
        Self {
            name,
            schema,
            file_path,
            ..Self::default()
        }
    }

    pub fn add_element(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn associate_material(&mut self, element_id: u64, association: MaterialAssociation) {
        self.associations
            .entry(element_id)
            .or_default()
            .push(association);
    }

    /// Attach a property group; a group with the same name is merged into,
    /// later keys winning.
    pub fn add_property_group(
        &mut self,
        element_id: u64,
        group_name: impl Into<String>,
        group: PropertyGroup,
    ) {
        self.properties
            .entry(element_id)
            .or_default()
            .entry(group_name.into())
            .or_default()
            .extend(group);
    }

    #[must_use]
    pub fn element(&self, id: u64) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    #[must_use]
    pub fn total_elements(&self) -> usize {
        self.elements.len()
    }
}

impl ObjectGraph for IfcModel {
    fn list_elements(&self) -> &[Element] {
        &self.elements
    }

    fn material_associations(&self, element: &Element) -> &[MaterialAssociation] {
        self.associations
            .get(&element.id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn property_groups(&self, element: &Element) -> Option<&PropertyGroups> {
        self.properties.get(&element.id)
    }
}
