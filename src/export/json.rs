use crate::analysis::{AggregationReport, Mapping};
use crate::error::{ExportError, MappingError};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// The whole report, contributions included, as pretty JSON.
pub fn export_json<P: AsRef<Path>>(
    report: &AggregationReport,
    path: P,
) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let json = serde_json::to_string_pretty(report)?;

    let mut file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    file.write_all(json.as_bytes())
        .map_err(|e| ExportError::WriteError {
            message: e.to_string(),
        })?;

    Ok(())
}

pub fn save_mapping<P: AsRef<Path>>(mapping: &Mapping, path: P) -> Result<(), MappingError> {
    mapping.save(path)
}
