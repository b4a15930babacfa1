//! # IFC LCA
//!
//! Embodied-carbon estimates for IFC building models.
//!
//! ## Pipeline
//!
//! - Parse an IFC file into an object graph (IFC2x3 and IFC4 schemas)
//! - Resolve each element's materials and volume
//! - Normalize environmental impact databases (KBOB, ÖKOBAUDAT, custom)
//!   to impact per kilogram
//! - Map material names to database records and aggregate mass and impact
//! - Report as text, CSV, JSON or in a terminal browser
//!
//! ## Example
//!
//! ```no_run
//! use ifc_lca::analysis::{aggregate, format_summary, Mapping};
//! use ifc_lca::config::NormalizerConfig;
//! use ifc_lca::database::{load_database, DatabaseKind};
//! use ifc_lca::parser::parse_ifc_file;
//! use ifc_lca::resolve::QuantityResolver;
//!
//! let model = parse_ifc_file("model.ifc").expect("Failed to parse");
//! let database = load_database(DatabaseKind::Kbob, "kbob.json", None, &NormalizerConfig::default())
//!     .expect("Failed to load database");
//! let mapping = Mapping::load("mapping.json").expect("Failed to load mapping");
//!
//! let report = aggregate(&model, &mapping, &database, &QuantityResolver::default());
//! println!("{}", format_summary(&report));
//! ```

pub mod analysis;
pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod model;
pub mod parser;
pub mod resolve;
pub mod ui;
