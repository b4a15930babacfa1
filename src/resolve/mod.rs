pub mod material;
pub mod quantity;

pub use material::{
    elements_for_material, resolve, resolve_association, resolve_materials_with_counts,
    MaterialUsage,
};
pub use quantity::{QuantityResolver, VolumeEstimate, VolumeSource};
