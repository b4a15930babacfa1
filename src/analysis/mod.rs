pub mod aggregate;
pub mod mapping;
pub mod summary;

pub use aggregate::{
    aggregate, AggregationReport, ElementContribution, MaterialResult, ResultStatus,
    UnresolvedMapping,
};
pub use mapping::{auto_map, AutoMapSummary, Mapping};
pub use summary::{format_impact, format_summary};
