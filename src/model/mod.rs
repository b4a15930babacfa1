pub mod element;
pub mod graph;
pub mod material;
pub mod property;

pub use element::Element;
pub use graph::{IfcModel, ObjectGraph};
pub use material::{
    Material, MaterialAssociation, MaterialConstituent, MaterialConstituentSet, MaterialLayer,
    MaterialLayerSet, MaterialProfile, MaterialProfileSet,
};
pub use property::{PropertyGroup, PropertyGroups, PropertyValue};
