//! Material association shapes.
//!
//! A building element links to its materials through one of seven shapes.
//! They form a closed sum type so every consumer matches all of them; the
//! two usage variants hold a shared handle to exactly one underlying set and
//! therefore can never point at another usage.

use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Material {
    pub name: Option<String>,
    pub category: Option<String>,
}

impl Material {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            category: None,
        }
    }

    /// The material name when present and non-empty.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaterialLayer {
    pub material: Option<Material>,
    pub thickness: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaterialLayerSet {
    pub name: Option<String>,
    pub layers: Vec<MaterialLayer>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaterialConstituent {
    pub name: Option<String>,
    pub material: Option<Material>,
    pub fraction: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaterialConstituentSet {
    pub name: Option<String>,
    pub constituents: Vec<MaterialConstituent>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaterialProfile {
    pub name: Option<String>,
    pub material: Option<Material>,
    /// Name of the cross-section profile, if the file gives one.
    pub profile: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaterialProfileSet {
    pub name: Option<String>,
    pub profiles: Vec<MaterialProfile>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MaterialAssociation {
    Simple(Material),
    LayeredSet(Arc<MaterialLayerSet>),
    LayeredSetUsage(Arc<MaterialLayerSet>),
    List(Vec<Material>),
    ConstituentSet(Arc<MaterialConstituentSet>),
    ProfileSet(Arc<MaterialProfileSet>),
    ProfileSetUsage(Arc<MaterialProfileSet>),
}

impl MaterialAssociation {
    /// IFC entity name of the shape, for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            MaterialAssociation::Simple(_) => "IfcMaterial",
            MaterialAssociation::LayeredSet(_) => "IfcMaterialLayerSet",
            MaterialAssociation::LayeredSetUsage(_) => "IfcMaterialLayerSetUsage",
            MaterialAssociation::List(_) => "IfcMaterialList",
            MaterialAssociation::ConstituentSet(_) => "IfcMaterialConstituentSet",
            MaterialAssociation::ProfileSet(_) => "IfcMaterialProfileSet",
            MaterialAssociation::ProfileSetUsage(_) => "IfcMaterialProfileSetUsage",
        }
    }
}
