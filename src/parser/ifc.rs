use crate::error::ParseError;
use crate::model::{
    Element, IfcModel, Material, MaterialAssociation, MaterialConstituent, MaterialConstituentSet,
    MaterialLayer, MaterialLayerSet, MaterialProfile, MaterialProfileSet, PropertyGroup,
    PropertyGroups, PropertyValue,
};
use crate::parser::step::{StepEntity, StepFile, StepValue};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

// Physical element entities (IFC2X3 and IFC4). Openings and virtual elements
// are left out: they carry quantities but no material.
const ELEMENT_ENTITIES: &[&str] = &[
    "IFCWALL",
    "IFCWALLSTANDARDCASE",
    "IFCWALLELEMENTEDCASE",
    "IFCSLAB",
    "IFCSLABSTANDARDCASE",
    "IFCSLABELEMENTEDCASE",
    "IFCBEAM",
    "IFCBEAMSTANDARDCASE",
    "IFCCOLUMN",
    "IFCCOLUMNSTANDARDCASE",
    "IFCMEMBER",
    "IFCMEMBERSTANDARDCASE",
    "IFCPLATE",
    "IFCPLATESTANDARDCASE",
    "IFCFOOTING",
    "IFCPILE",
    "IFCROOF",
    "IFCSTAIR",
    "IFCSTAIRFLIGHT",
    "IFCRAMP",
    "IFCRAMPFLIGHT",
    "IFCRAILING",
    "IFCCOVERING",
    "IFCCURTAINWALL",
    "IFCCHIMNEY",
    "IFCSHADINGDEVICE",
    "IFCDOOR",
    "IFCDOORSTANDARDCASE",
    "IFCWINDOW",
    "IFCWINDOWSTANDARDCASE",
    "IFCBUILDINGELEMENTPROXY",
    "IFCBUILDINGELEMENTPART",
    "IFCELEMENTASSEMBLY",
    "IFCREINFORCINGBAR",
    "IFCREINFORCINGMESH",
    "IFCTENDON",
    "IFCDISCRETEACCESSORY",
    "IFCMECHANICALFASTENER",
    "IFCFURNISHINGELEMENT",
    "IFCFURNITURE",
    "IFCSYSTEMFURNITUREELEMENT",
    "IFCFLOWTERMINAL",
    "IFCFLOWSEGMENT",
    "IFCFLOWFITTING",
    "IFCSANITARYTERMINAL",
    "IFCPIPESEGMENT",
    "IFCPIPEFITTING",
    "IFCDUCTSEGMENT",
    "IFCDUCTFITTING",
    "IFCCIVILELEMENT",
    "IFCGEOGRAPHICELEMENT",
    "IFCTRANSPORTELEMENT",
];

// Quantity entity → unit implied when the quantity has no explicit unit
const QUANTITY_UNITS: &[(&str, &str)] = &[
    ("IFCQUANTITYLENGTH", "m"),
    ("IFCQUANTITYAREA", "m2"),
    ("IFCQUANTITYVOLUME", "m3"),
    ("IFCQUANTITYWEIGHT", "kg"),
    ("IFCQUANTITYCOUNT", ""),
    ("IFCQUANTITYTIME", "s"),
];

/// Parses an IFC file into an object graph of elements, material
/// associations and property groups.
///
/// Supports both IFC2x3 and IFC4 schemas. Extracts:
/// - Project metadata (name, schema version)
/// - Physical elements with GlobalId, name and type object
/// - Material associations in all seven shapes (type materials are inherited
///   by elements without their own)
/// - Property sets and element quantity sets
///
/// # Errors
///
/// Returns [`ParseError::FileRead`] if the file cannot be read.
/// Returns [`ParseError::InvalidStep`] if the STEP format is malformed.
///
/// # Example
///
/// ```no_run
/// use ifc_lca::model::ObjectGraph;
/// use ifc_lca::parser::parse_ifc_file;
///
/// let model = parse_ifc_file("model.ifc")?;
/// println!("{}: {} elements", model.name, model.list_elements().len());
/// # Ok::<(), ifc_lca::error::ParseError>(())
/// ```
pub fn parse_ifc_file<P: AsRef<Path>>(path: P) -> Result<IfcModel, ParseError> {
    let content = std::fs::read_to_string(&path).map_err(|source| ParseError::FileRead {
        path: path.as_ref().to_path_buf(),
        source,
    })?;

    parse_ifc_str(&content, &path.as_ref().to_string_lossy())
}

/// Parses IFC content already held in memory. `file_path` is only recorded
/// on the model.
pub fn parse_ifc_str(content: &str, file_path: &str) -> Result<IfcModel, ParseError> {
    let step_file = StepFile::parse(content)?;

    let project_name = extract_project_name(&step_file);
    let mut model = IfcModel::new(project_name, step_file.schema.clone(), file_path.to_string());

    let element_to_type = extract_type_relationships(&step_file);
    let object_materials = extract_material_associations(&step_file);
    let mut object_properties = extract_property_sets(&step_file, &element_to_type);

    for entity in step_file
        .entities
        .values()
        .filter(|e| ELEMENT_ENTITIES.contains(&e.entity_type.as_str()))
    {
        let mut element = Element::new(entity.id, entity.entity_type.clone())
            .with_global_id(entity.string_at(0).unwrap_or_default());
        if let Some(name) = entity.string_at(2) {
            element = element.with_name(name);
        }
        element.type_id = element_to_type.get(&entity.id).copied();

        // Own associations first, else the type object's
        let associations = object_materials
            .get(&entity.id)
            .filter(|list| !list.is_empty())
            .or_else(|| {
                element
                    .type_id
                    .and_then(|type_id| object_materials.get(&type_id))
            });
        for association in associations.into_iter().flatten() {
            debug!(element = entity.id, kind = association.kind(), "material association");
            model.associate_material(entity.id, association.clone());
        }

        // Type groups first so the occurrence's own values override them
        let type_groups = element
            .type_id
            .and_then(|type_id| object_properties.get(&type_id))
            .cloned();
        let own_groups = object_properties.remove(&entity.id);
        for (name, group) in type_groups.into_iter().chain(own_groups).flatten() {
            model.add_property_group(entity.id, name, group);
        }

        model.add_element(element);
    }

    info!(
        project = %model.name,
        schema = %model.schema,
        elements = model.total_elements(),
        "parsed IFC model"
    );

    Ok(model)
}

fn extract_project_name(step_file: &StepFile) -> String {
    step_file
        .get_entities_by_type("IFCPROJECT")
        .first()
        .and_then(|e| e.string_at(2))
        .map_or_else(|| "Unknown Project".to_string(), str::to_string)
}

/// Instance → type object, from IFCRELDEFINESBYTYPE.
fn extract_type_relationships(step_file: &StepFile) -> HashMap<u64, u64> {
    let mut instance_to_type = HashMap::new();

    for rel in step_file.get_entities_by_type("IFCRELDEFINESBYTYPE") {
        // Index 4 = RelatedObjects, Index 5 = RelatingType
        if let Some(type_id) = rel.reference_at(5) {
            for instance_id in rel.references_at(4) {
                instance_to_type.insert(instance_id, type_id);
            }
        }
    }

    instance_to_type
}

/// Object (element or type) → associations, from IFCRELASSOCIATESMATERIAL.
fn extract_material_associations(step_file: &StepFile) -> HashMap<u64, Vec<MaterialAssociation>> {
    let mut reader = MaterialReader::new(step_file);
    let mut object_materials: HashMap<u64, Vec<MaterialAssociation>> = HashMap::new();

    for rel in step_file.get_entities_by_type("IFCRELASSOCIATESMATERIAL") {
        // Index 4 = RelatedObjects, Index 5 = RelatingMaterial
        let Some(material_id) = rel.reference_at(5) else {
            continue;
        };
        let Some(association) = reader.association(material_id) else {
            continue;
        };
        for object_id in rel.references_at(4) {
            object_materials
                .entry(object_id)
                .or_default()
                .push(association.clone());
        }
    }

    object_materials
}

/// Builds [`MaterialAssociation`]s from material entities. Sets are shared
/// between every association (and usage) that references them.
struct MaterialReader<'a> {
    step_file: &'a StepFile,
    layer_sets: HashMap<u64, Arc<MaterialLayerSet>>,
    constituent_sets: HashMap<u64, Arc<MaterialConstituentSet>>,
    profile_sets: HashMap<u64, Arc<MaterialProfileSet>>,
}

impl<'a> MaterialReader<'a> {
    fn new(step_file: &'a StepFile) -> Self {
        Self {
            step_file,
            layer_sets: HashMap::new(),
            constituent_sets: HashMap::new(),
            profile_sets: HashMap::new(),
        }
    }

    fn association(&mut self, id: u64) -> Option<MaterialAssociation> {
        let step_file = self.step_file;
        let entity = step_file.get_entity(id)?;

        let association = match entity.entity_type.as_str() {
            "IFCMATERIAL" => Some(MaterialAssociation::Simple(self.material(id)?)),
            "IFCMATERIALLAYERSET" => self.layer_set(id).map(MaterialAssociation::LayeredSet),
            "IFCMATERIALLAYERSETUSAGE" => entity
                .reference_at(0)
                .and_then(|set_id| self.layer_set(set_id))
                .map(MaterialAssociation::LayeredSetUsage),
            "IFCMATERIALLIST" => Some(MaterialAssociation::List(
                entity
                    .references_at(0)
                    .into_iter()
                    .filter_map(|m| self.material(m))
                    .collect(),
            )),
            "IFCMATERIALCONSTITUENTSET" => self
                .constituent_set(id)
                .map(MaterialAssociation::ConstituentSet),
            "IFCMATERIALPROFILESET" => self.profile_set(id).map(MaterialAssociation::ProfileSet),
            "IFCMATERIALPROFILESETUSAGE" | "IFCMATERIALPROFILESETUSAGETAPERING" => entity
                .reference_at(0)
                .and_then(|set_id| self.profile_set(set_id))
                .map(MaterialAssociation::ProfileSetUsage),
            _ => None,
        };

        if association.is_none() {
            debug!(
                id,
                entity_type = %entity.entity_type,
                "skipping unsupported or dangling material association"
            );
        }
        association
    }

    fn material(&self, id: u64) -> Option<Material> {
        let entity = self.entity_of_type(id, "IFCMATERIAL")?;
        Some(Material {
            name: entity.string_at(0).map(str::to_string),
            category: entity.string_at(2).map(str::to_string),
        })
    }

    fn layer_set(&mut self, id: u64) -> Option<Arc<MaterialLayerSet>> {
        if let Some(set) = self.layer_sets.get(&id) {
            return Some(Arc::clone(set));
        }
        let entity = self.entity_of_type(id, "IFCMATERIALLAYERSET")?;

        let layers = entity
            .references_at(0)
            .into_iter()
            .filter_map(|layer_id| self.entity_of_type(layer_id, "IFCMATERIALLAYER"))
            .map(|layer| MaterialLayer {
                material: layer.reference_at(0).and_then(|m| self.material(m)),
                thickness: layer.number_at(1).unwrap_or(0.0),
            })
            .collect();

        let set = Arc::new(MaterialLayerSet {
            name: entity.string_at(1).map(str::to_string),
            layers,
        });
        self.layer_sets.insert(id, Arc::clone(&set));
        Some(set)
    }

    fn constituent_set(&mut self, id: u64) -> Option<Arc<MaterialConstituentSet>> {
        if let Some(set) = self.constituent_sets.get(&id) {
            return Some(Arc::clone(set));
        }
        let entity = self.entity_of_type(id, "IFCMATERIALCONSTITUENTSET")?;

        let constituents = entity
            .references_at(2)
            .into_iter()
            .filter_map(|c| self.entity_of_type(c, "IFCMATERIALCONSTITUENT"))
            .map(|constituent| MaterialConstituent {
                name: constituent.string_at(0).map(str::to_string),
                material: constituent.reference_at(2).and_then(|m| self.material(m)),
                fraction: constituent.number_at(3),
            })
            .collect();

        let set = Arc::new(MaterialConstituentSet {
            name: entity.string_at(0).map(str::to_string),
            constituents,
        });
        self.constituent_sets.insert(id, Arc::clone(&set));
        Some(set)
    }

    fn profile_set(&mut self, id: u64) -> Option<Arc<MaterialProfileSet>> {
        if let Some(set) = self.profile_sets.get(&id) {
            return Some(Arc::clone(set));
        }
        let entity = self.entity_of_type(id, "IFCMATERIALPROFILESET")?;

        let profiles = entity
            .references_at(2)
            .into_iter()
            .filter_map(|p| self.entity_of_type(p, "IFCMATERIALPROFILE"))
            .map(|profile| MaterialProfile {
                name: profile.string_at(0).map(str::to_string),
                material: profile.reference_at(2).and_then(|m| self.material(m)),
                // IfcProfileDef: index 1 = ProfileName
                profile: profile
                    .reference_at(3)
                    .and_then(|def| self.step_file.get_entity(def))
                    .and_then(|def| def.string_at(1))
                    .map(str::to_string),
            })
            .collect();

        let set = Arc::new(MaterialProfileSet {
            name: entity.string_at(0).map(str::to_string),
            profiles,
        });
        self.profile_sets.insert(id, Arc::clone(&set));
        Some(set)
    }

    fn entity_of_type(&self, id: u64, entity_type: &str) -> Option<&'a StepEntity> {
        let step_file: &'a StepFile = self.step_file;
        step_file
            .get_entity(id)
            .filter(|e| e.entity_type == entity_type)
    }
}

/// Object → property groups, from property sets and element quantities
/// linked through IFCRELDEFINESBYPROPERTIES.
fn extract_property_sets(
    step_file: &StepFile,
    element_to_type: &HashMap<u64, u64>,
) -> HashMap<u64, PropertyGroups> {
    // Build definition id -> (name, group) map
    let mut definitions: HashMap<u64, (String, PropertyGroup)> = HashMap::new();

    for pset in step_file.get_entities_by_type("IFCPROPERTYSET") {
        let name = pset.string_at(2).unwrap_or_default().to_string();
        let mut group = PropertyGroup::new();

        for prop in pset
            .references_at(4)
            .into_iter()
            .filter_map(|id| step_file.get_entity(id))
            .filter(|p| p.entity_type == "IFCPROPERTYSINGLEVALUE")
        {
            let Some(prop_name) = prop.string_at(0).filter(|n| !n.is_empty()) else {
                continue;
            };
            let unit = prop.reference_at(3).and_then(|u| unit_label(step_file, u));
            if let Some(value) = prop
                .values
                .get(2)
                .and_then(|v| property_value(v, unit))
            {
                group.insert(prop_name.to_string(), value);
            }
        }

        definitions.insert(pset.id, (name, group));
    }

    for qset in step_file.get_entities_by_type("IFCELEMENTQUANTITY") {
        let name = qset.string_at(2).unwrap_or_default().to_string();
        let mut group = PropertyGroup::new();

        for quantity in qset
            .references_at(5)
            .into_iter()
            .filter_map(|id| step_file.get_entity(id))
        {
            let Some(default_unit) = QUANTITY_UNITS
                .iter()
                .find(|(entity, _)| *entity == quantity.entity_type)
                .map(|(_, unit)| *unit)
            else {
                continue;
            };
            let (Some(quantity_name), Some(value)) = (quantity.string_at(0), quantity.number_at(3))
            else {
                continue;
            };
            let unit = quantity
                .reference_at(2)
                .and_then(|u| unit_label(step_file, u))
                .unwrap_or_else(|| default_unit.to_string());
            group.insert(quantity_name.to_string(), PropertyValue::measure(value, unit));
        }

        definitions.insert(qset.id, (name, group));
    }

    // Link definitions to objects
    let mut object_properties: HashMap<u64, PropertyGroups> = HashMap::new();
    for rel in step_file.get_entities_by_type("IFCRELDEFINESBYPROPERTIES") {
        // Index 4 = RelatedObjects, Index 5 = RelatingPropertyDefinition
        let Some((name, group)) = rel.reference_at(5).and_then(|id| definitions.get(&id)) else {
            continue;
        };
        for object_id in rel.references_at(4) {
            object_properties
                .entry(object_id)
                .or_default()
                .entry(name.clone())
                .or_default()
                .extend(group.clone());
        }
    }

    // Type objects also list their sets directly
    let mut type_ids: Vec<u64> = element_to_type.values().copied().collect();
    type_ids.sort_unstable();
    type_ids.dedup();
    for type_entity in type_ids.into_iter().filter_map(|id| step_file.get_entity(id)) {
        // Index 5 = HasPropertySets
        for (name, group) in type_entity
            .references_at(5)
            .into_iter()
            .filter_map(|id| definitions.get(&id))
        {
            object_properties
                .entry(type_entity.id)
                .or_default()
                .entry(name.clone())
                .or_default()
                .extend(group.clone());
        }
    }

    object_properties
}

fn property_value(value: &StepValue, unit: Option<String>) -> Option<PropertyValue> {
    match value {
        StepValue::Real(_) | StepValue::Integer(_) => {
            let number = value.as_number()?;
            Some(match unit {
                Some(unit) => PropertyValue::measure(number, unit),
                None => PropertyValue::Number(number),
            })
        }
        StepValue::String(s) | StepValue::Enum(s) => Some(PropertyValue::Text(s.clone())),
        StepValue::Boolean(b) => Some(PropertyValue::Boolean(*b)),
        StepValue::Reference(_) | StepValue::List(_) | StepValue::Null | StepValue::Derived => {
            None
        }
    }
}

/// Readable unit name for IFCSIUNIT (prefix + name, e.g. `MILLIMETRE`) or
/// the Name of any other unit entity.
fn unit_label(step_file: &StepFile, id: u64) -> Option<String> {
    let unit = step_file.get_entity(id)?;
    if unit.entity_type == "IFCSIUNIT" {
        // Index 2 = Prefix, Index 3 = Name
        let prefix = match unit.values.get(2) {
            Some(StepValue::Enum(p)) => p.as_str(),
            _ => "",
        };
        return match unit.values.get(3) {
            Some(StepValue::Enum(name)) => Some(format!("{prefix}{name}")),
            _ => None,
        };
    }
    unit.string_at(1).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ObjectGraph;
    use pretty_assertions::assert_eq;

    const MODEL: &str = "ISO-10303-21;
HEADER;
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCPROJECT('0YvctVUKr0kugbFTf53O9L',$,'Test Project',$,$,$,$,$,$);
#10=IFCMATERIAL('Concrete',$,'Concrete');
#11=IFCMATERIAL('Insulation',$,$);
#12=IFCMATERIALLAYER(#10,0.2,$,$,$,$,$);
#13=IFCMATERIALLAYER(#11,0.1,$,$,$,$,$);
#14=IFCMATERIALLAYER(#10,0.05,$,$,$,$,$);
#15=IFCMATERIALLAYERSET((#12,#13,#14),'Exterior Wall',$);
#16=IFCMATERIALLAYERSETUSAGE(#15,.AXIS2.,.POSITIVE.,0.,$);
#20=IFCWALL('3vB2YO$MX4xv5uCqZZG05x',$,'Wall 1',$,$,$,$,$,.STANDARD.);
#21=IFCRELASSOCIATESMATERIAL('1',$,$,$,(#20),#16);
#30=IFCQUANTITYVOLUME('NetVolume',$,$,4.5,$);
#31=IFCQUANTITYLENGTH('Length',$,$,10.,$);
#32=IFCELEMENTQUANTITY('2',$,'Qto_WallBaseQuantities',$,$,(#30,#31));
#33=IFCRELDEFINESBYPROPERTIES('3',$,$,$,(#20),#32);
#34=IFCPROPERTYSINGLEVALUE('IsExternal',$,IFCBOOLEAN(.T.),$);
#35=IFCPROPERTYSINGLEVALUE('Reference',$,IFCIDENTIFIER('EW-01'),$);
#36=IFCPROPERTYSET('4',$,'Pset_WallCommon',$,(#34,#35));
#37=IFCRELDEFINESBYPROPERTIES('5',$,$,$,(#20),#36);
#40=IFCMATERIAL('Steel',$,$);
#41=IFCCOLUMNTYPE('6',$,'HEB 200',$,$,$,$,$,$,.COLUMN.);
#42=IFCRELASSOCIATESMATERIAL('7',$,$,$,(#41),#40);
#43=IFCCOLUMN('8',$,'Column 1',$,$,$,$,$,$);
#44=IFCRELDEFINESBYTYPE('9',$,$,$,(#43),#41);
ENDSEC;
END-ISO-10303-21;
";

    #[test]
    fn reads_project_and_elements_in_file_order() {
        let model = parse_ifc_str(MODEL, "test.ifc").unwrap();
        assert_eq!(model.name, "Test Project");
        assert_eq!(model.schema, "IFC4");
        let ids: Vec<u64> = model.list_elements().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![20, 43]);
    }

    #[test]
    fn layer_set_usage_points_at_its_layer_set() {
        let model = parse_ifc_str(MODEL, "test.ifc").unwrap();
        let wall = model.element(20).unwrap();
        let associations = model.material_associations(wall);
        assert_eq!(associations.len(), 1);

        let MaterialAssociation::LayeredSetUsage(set) = &associations[0] else {
            panic!("expected a layer set usage, got {:?}", associations[0]);
        };
        assert_eq!(set.name.as_deref(), Some("Exterior Wall"));
        assert_eq!(set.layers.len(), 3);
        assert_eq!(set.layers[1].thickness, 0.1);
    }

    #[test]
    fn elements_inherit_type_materials() {
        let model = parse_ifc_str(MODEL, "test.ifc").unwrap();
        let column = model.element(43).unwrap();
        assert_eq!(column.type_id, Some(41));
        assert_eq!(
            model.material_associations(column),
            &[MaterialAssociation::Simple(Material::named("Steel"))]
        );
    }

    #[test]
    fn quantities_carry_implied_units_and_properties_keep_text() {
        let model = parse_ifc_str(MODEL, "test.ifc").unwrap();
        let wall = model.element(20).unwrap();
        let groups = model.property_groups(wall).unwrap();

        let qto = &groups["Qto_WallBaseQuantities"];
        assert_eq!(qto["NetVolume"], PropertyValue::measure(4.5, "m3"));
        assert_eq!(qto["Length"], PropertyValue::measure(10.0, "m"));

        let pset = &groups["Pset_WallCommon"];
        assert_eq!(pset["IsExternal"], PropertyValue::Boolean(true));
        assert_eq!(pset["Reference"], PropertyValue::Text("EW-01".to_string()));
    }

    #[test]
    fn elements_inherit_type_property_sets_under_their_own() {
        let content = "ISO-10303-21;
HEADER;
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCPROJECT('0YvctVUKr0kugbFTf53O9L',$,'Typed Columns',$,$,$,$,$,$);
#10=IFCPROPERTYSINGLEVALUE('Height',$,IFCLENGTHMEASURE(3.),$);
#11=IFCPROPERTYSINGLEVALUE('Width',$,IFCLENGTHMEASURE(0.2),$);
#12=IFCPROPERTYSET('1',$,'Dimensions',$,(#10,#11));
#13=IFCQUANTITYVOLUME('NetVolume',$,$,0.16,$);
#14=IFCELEMENTQUANTITY('2',$,'Qto_ColumnBaseQuantities',$,$,(#13));
#20=IFCCOLUMNTYPE('3',$,'Precast 200',$,$,(#12),$,$,$,.COLUMN.);
#21=IFCRELDEFINESBYPROPERTIES('4',$,$,$,(#20),#14);
#30=IFCCOLUMN('5',$,'Column A',$,$,$,$,$,$);
#31=IFCCOLUMN('6',$,'Column B',$,$,$,$,$,$);
#32=IFCRELDEFINESBYTYPE('7',$,$,$,(#30,#31),#20);
#40=IFCPROPERTYSINGLEVALUE('Height',$,IFCLENGTHMEASURE(4.),$);
#41=IFCPROPERTYSET('8',$,'Dimensions',$,(#40));
#42=IFCRELDEFINESBYPROPERTIES('9',$,$,$,(#31),#41);
ENDSEC;
END-ISO-10303-21;
";
        let model = parse_ifc_str(content, "typed.ifc").unwrap();
        let column = model.element(30).unwrap();
        assert_eq!((column.global_id.as_str(), column.label()), ("5", "Column A".to_string()));

        let plain = model.property_groups(model.element(30).unwrap()).unwrap();
        assert_eq!(plain["Dimensions"]["Height"], PropertyValue::Number(3.0));
        assert_eq!(
            plain["Qto_ColumnBaseQuantities"]["NetVolume"],
            PropertyValue::measure(0.16, "m3")
        );

        let overridden = model.property_groups(model.element(31).unwrap()).unwrap();
        assert_eq!(overridden["Dimensions"]["Height"], PropertyValue::Number(4.0));
        assert_eq!(overridden["Dimensions"]["Width"], PropertyValue::Number(0.2));
    }
}
