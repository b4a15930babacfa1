use crate::analysis::AggregationReport;
use crate::error::ExportError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const HEADER: [&str; 9] = [
    "Material",
    "Record ID",
    "Record Name",
    "Elements",
    "Elements With Volume",
    "Volume m3",
    "Mass kg",
    "Impact kg CO2-eq",
    "Status",
];

/// One row per aggregated material, highest impact first.
pub fn export_csv<P: AsRef<Path>>(report: &AggregationReport, path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    write_csv(report, file)
}

fn write_csv<W: Write>(report: &AggregationReport, out: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(out);

    writer.write_record(HEADER)?;

    for result in report.ranked() {
        writer.write_record([
            result.material.clone(),
            result.record_id.clone(),
            result.record_name.clone(),
            result.element_count.to_string(),
            result.elements_with_volume.to_string(),
            format!("{:.3}", result.total_volume),
            format!("{:.1}", result.total_mass),
            format!("{:.2}", result.total_impact),
            result.status.label().to_string(),
        ])?;
    }

    writer.flush().map_err(|e| ExportError::WriteError {
        message: e.to_string(),
    })?;

    Ok(())
}
