//! Environmental impact databases.
//!
//! Sources fetch schema-tagged raw records; the [`RecordNormalizer`] turns
//! them into [`CanonicalRecord`]s expressed per kilogram of material.

pub mod category;
pub mod custom;
pub mod kbob;
pub mod normalizer;
pub mod okobaudat;
pub mod record;
pub mod source;

pub use crate::error::DatabaseError;
pub use custom::CustomRecord;
pub use kbob::KbobRecord;
pub use normalizer::{normalize_record, CanonicalDatabase, RecordNormalizer};
pub use okobaudat::OkobaudatRecord;
pub use record::{
    CanonicalRecord, Conversion, DeclaredUnit, Provenance, RawRecord, RawValue, RejectReason,
    Rejection, SourceSchema,
};
pub use source::{
    CustomJsonSource, DatabaseKind, DatabaseSource, KbobJsonSource, OkobaudatApiSource,
    OkobaudatCsvSource,
};

use crate::config::NormalizerConfig;
use std::path::Path;
use tracing::info;

/// Read a database file of the given kind and normalize it.
pub fn load_database<P: AsRef<Path>>(
    kind: DatabaseKind,
    path: P,
    query: Option<&str>,
    config: &NormalizerConfig,
) -> Result<CanonicalDatabase, DatabaseError> {
    let path = path.as_ref();
    let raw = kind.open(path).fetch_raw_records(query)?;
    info!(path = %path.display(), %kind, fetched = raw.len(), "read impact database");
    Ok(RecordNormalizer::new(config.clone()).normalize_database(&raw))
}
