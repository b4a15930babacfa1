//! Database sources: where raw records come from.

use super::{CustomRecord, KbobRecord, OkobaudatRecord, RawRecord, RawValue};
use crate::error::DatabaseError;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// A provider of schema-tagged raw records.
pub trait DatabaseSource {
    /// Fetch all records, or only those whose name contains `query`
    /// (case-insensitive).
    fn fetch_raw_records(&self, query: Option<&str>) -> Result<Vec<RawRecord>, DatabaseError>;
}

/// Which reader to use for a database file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseKind {
    Kbob,
    Okobaudat,
    OkobaudatCsv,
    Custom,
}

impl DatabaseKind {
    #[must_use]
    pub fn open(self, path: impl Into<PathBuf>) -> Box<dyn DatabaseSource> {
        let path = path.into();
        match self {
            DatabaseKind::Kbob => Box::new(KbobJsonSource::new(path)),
            DatabaseKind::Okobaudat => Box::new(OkobaudatApiSource::new(path)),
            DatabaseKind::OkobaudatCsv => Box::new(OkobaudatCsvSource::new(path)),
            DatabaseKind::Custom => Box::new(CustomJsonSource::new(path)),
        }
    }
}

impl FromStr for DatabaseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kbob" => Ok(DatabaseKind::Kbob),
            "okobaudat" | "oekobaudat" | "ökobaudat" => Ok(DatabaseKind::Okobaudat),
            "okobaudat-csv" | "oekobaudat-csv" => Ok(DatabaseKind::OkobaudatCsv),
            "custom" => Ok(DatabaseKind::Custom),
            other => Err(format!(
                "unknown database schema '{other}' (expected kbob, okobaudat, okobaudat-csv or custom)"
            )),
        }
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DatabaseKind::Kbob => "kbob",
            DatabaseKind::Okobaudat => "okobaudat",
            DatabaseKind::OkobaudatCsv => "okobaudat-csv",
            DatabaseKind::Custom => "custom",
        })
    }
}

fn read_file(path: &Path) -> Result<String, DatabaseError> {
    std::fs::read_to_string(path).map_err(|source| DatabaseError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

fn json_error(path: &Path) -> impl FnOnce(serde_json::Error) -> DatabaseError + '_ {
    move |source| DatabaseError::Json {
        path: path.to_path_buf(),
        source,
    }
}

fn matches_query(record: &RawRecord, query: Option<&str>) -> bool {
    let Some(query) = query.map(str::to_lowercase).filter(|q| !q.is_empty()) else {
        return true;
    };
    record
        .name()
        .is_some_and(|name| name.to_lowercase().contains(&query))
}

fn filter_records(records: Vec<RawRecord>, query: Option<&str>) -> Vec<RawRecord> {
    records
        .into_iter()
        .filter(|record| matches_query(record, query))
        .collect()
}

fn custom_records(entries: IndexMap<String, CustomRecord>) -> Vec<RawRecord> {
    entries
        .into_iter()
        .map(|(id, mut record)| {
            record.id = id;
            RawRecord::Custom(record)
        })
        .collect()
}

/// The KBOB indicator list as JSON: an array of entries, or the older
/// object keyed by material id.
#[derive(Debug, Clone)]
pub struct KbobJsonSource {
    path: PathBuf,
}

impl KbobJsonSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DatabaseSource for KbobJsonSource {
    fn fetch_raw_records(&self, query: Option<&str>) -> Result<Vec<RawRecord>, DatabaseError> {
        let content = read_file(&self.path)?;
        let document: serde_json::Value =
            serde_json::from_str(&content).map_err(json_error(&self.path))?;

        let records = match document {
            serde_json::Value::Array(_) => {
                let entries: Vec<KbobRecord> =
                    serde_json::from_value(document).map_err(json_error(&self.path))?;
                entries.into_iter().map(RawRecord::Kbob).collect()
            }
            serde_json::Value::Object(_) => {
                debug!(path = %self.path.display(), "reading legacy keyed KBOB format");
                let entries: IndexMap<String, CustomRecord> =
                    serde_json::from_value(document).map_err(json_error(&self.path))?;
                custom_records(entries)
            }
            _ => {
                return Err(DatabaseError::Layout {
                    path: self.path.clone(),
                    message: "expected an array of KBOB entries or an object keyed by id"
                        .to_string(),
                })
            }
        };

        Ok(filter_records(records, query))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPage {
    data: Vec<OkobaudatRecord>,
    total_count: Option<usize>,
    start_index: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiDocument {
    Pages(Vec<ApiPage>),
    Page(ApiPage),
}

/// Saved Ökobaudat API responses: one page, or an array of pages.
#[derive(Debug, Clone)]
pub struct OkobaudatApiSource {
    path: PathBuf,
}

impl OkobaudatApiSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DatabaseSource for OkobaudatApiSource {
    fn fetch_raw_records(&self, query: Option<&str>) -> Result<Vec<RawRecord>, DatabaseError> {
        let content = read_file(&self.path)?;
        let value: serde_json::Value =
            serde_json::from_str(&content).map_err(json_error(&self.path))?;
        let layout_error = |message: String| DatabaseError::Layout {
            path: self.path.clone(),
            message,
        };
        let document: ApiDocument = serde_json::from_value(value).map_err(|_| {
            layout_error(
                "expected an API response with a \"data\" array, or an array of them"
                    .to_string(),
            )
        })?;
        let mut pages = match document {
            ApiDocument::Pages(pages) => pages,
            ApiDocument::Page(page) => vec![page],
        };
        if pages.is_empty() {
            return Err(layout_error("no API response pages".to_string()));
        }
        pages.sort_by_key(|page| page.start_index.unwrap_or(0));

        let total_count = pages.iter().filter_map(|page| page.total_count).max();
        let records: Vec<RawRecord> = pages
            .into_iter()
            .flat_map(|page| page.data)
            .map(RawRecord::Okobaudat)
            .collect();

        if let Some(total) = total_count.filter(|total| *total > records.len()) {
            warn!(
                path = %self.path.display(),
                fetched = records.len(),
                total,
                "saved API responses do not cover every page"
            );
        }

        Ok(filter_records(records, query))
    }
}

/// One row of the semicolon-separated Ökobaudat export.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "UUID", alias = "ID", default)]
    uuid: Option<String>,
    #[serde(rename = "Name_de", alias = "Name", default)]
    name: Option<String>,
    #[serde(rename = "Kategorie", alias = "Category", default)]
    category: Option<String>,
    #[serde(rename = "Bezugseinheit", alias = "Unit", default)]
    unit: Option<String>,
    #[serde(rename = "Bezugsgröße", alias = "RefQuantity", default)]
    reference_quantity: Option<String>,
    #[serde(rename = "Rohdichte", alias = "Density", default)]
    density: Option<String>,
    #[serde(rename = "Flächengewicht", alias = "Grammage", default)]
    grammage: Option<String>,
    #[serde(rename = "GWP-total", alias = "GWP100", default)]
    gwp: Option<String>,
    #[serde(rename = "PENRT", alias = "PENR", default)]
    penre: Option<String>,
}

impl CsvRow {
    fn into_record(self) -> OkobaudatRecord {
        let value = |cell: Option<String>| {
            cell.filter(|text| !text.trim().is_empty())
                .map(RawValue::Text)
        };
        OkobaudatRecord {
            uuid: self.uuid.unwrap_or_default(),
            name: self.name,
            // Exports without a unit column are per kilogram.
            declared_unit: self.unit.unwrap_or_else(|| "kg".to_string()),
            reference_flow_amount: value(self.reference_quantity),
            gwp: value(self.gwp),
            penre: value(self.penre),
            density: value(self.density),
            grammage: value(self.grammage),
            conversion_factor_to_kg: None,
            mass_flow_property: None,
            classification: self
                .category
                .map(|path| {
                    path.split(['/', '>'])
                        .map(str::trim)
                        .filter(|level| !level.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

/// Ökobaudat CSV export (`;` separated, decimal commas).
#[derive(Debug, Clone)]
pub struct OkobaudatCsvSource {
    path: PathBuf,
}

impl OkobaudatCsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DatabaseSource for OkobaudatCsvSource {
    fn fetch_raw_records(&self, query: Option<&str>) -> Result<Vec<RawRecord>, DatabaseError> {
        let content = read_file(&self.path)?;
        let csv_error = |source| DatabaseError::Csv {
            path: self.path.clone(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.trim_start_matches('\u{feff}').as_bytes());

        let mut records = Vec::new();
        for row in reader.deserialize::<CsvRow>() {
            records.push(RawRecord::Okobaudat(row.map_err(csv_error)?.into_record()));
        }

        Ok(filter_records(records, query))
    }
}

/// A custom JSON database keyed by record id.
#[derive(Debug, Clone)]
pub struct CustomJsonSource {
    path: PathBuf,
}

impl CustomJsonSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DatabaseSource for CustomJsonSource {
    fn fetch_raw_records(&self, query: Option<&str>) -> Result<Vec<RawRecord>, DatabaseError> {
        let content = read_file(&self.path)?;
        let entries: IndexMap<String, CustomRecord> =
            serde_json::from_str(&content).map_err(json_error(&self.path))?;
        Ok(filter_records(custom_records(entries), query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("ifc-lca-{}-{name}", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    fn names(records: &[RawRecord]) -> Vec<&str> {
        records.iter().filter_map(RawRecord::name).collect()
    }

    #[test]
    fn kbob_array_and_legacy_object_are_both_read() {
        let array = temp_file(
            "kbob-array.json",
            r#"[{"KBOB_ID": 1.01, "Name": "Magerbeton", "GWP": 0.06},
                {"KBOB_ID": 6.01, "Name": "Stahlblech", "GWP": 2.1}]"#,
        );
        let records = KbobJsonSource::new(&array).fetch_raw_records(None).unwrap();
        assert_eq!(names(&records), vec!["Magerbeton", "Stahlblech"]);
        assert!(matches!(records[0], RawRecord::Kbob(_)));

        let legacy = temp_file(
            "kbob-legacy.json",
            r#"{"KBOB_1": {"name": "Beton", "gwp": 0.1, "density": 2400}}"#,
        );
        let records = KbobJsonSource::new(&legacy).fetch_raw_records(None).unwrap();
        assert_eq!(records[0].canonical_id().as_deref(), Some("KBOB_1"));

        std::fs::remove_file(array).unwrap();
        std::fs::remove_file(legacy).unwrap();
    }

    #[test]
    fn query_filters_by_name_case_insensitively() {
        let path = temp_file(
            "kbob-query.json",
            r#"[{"KBOB_ID": 1.01, "Name": "Magerbeton"}, {"KBOB_ID": 6.01, "Name": "Stahlblech"}]"#,
        );
        let records = KbobJsonSource::new(&path)
            .fetch_raw_records(Some("BETON"))
            .unwrap();
        assert_eq!(names(&records), vec!["Magerbeton"]);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn api_pages_are_concatenated_in_index_order() {
        let path = temp_file(
            "okobau-pages.json",
            r#"[{"startIndex": 1, "totalCount": 2, "data": [{"uuid": "b", "name": "Ziegel"}]},
                {"startIndex": 0, "totalCount": 2, "data": [{"uuid": "a", "name": "Beton"}]}]"#,
        );
        let records = OkobaudatApiSource::new(&path).fetch_raw_records(None).unwrap();
        assert_eq!(names(&records), vec!["Beton", "Ziegel"]);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn api_files_without_pages_are_layout_errors() {
        for (name, content) in [
            (
                "okobau-bare.json",
                r#"[{"uuid": "a", "name": "Beton", "declaredUnit": "kg", "gwp": 0.1}]"#,
            ),
            ("okobau-foreign.json", r#"{"foo": 1}"#),
            ("okobau-empty.json", "[]"),
        ] {
            let path = temp_file(name, content);
            let result = OkobaudatApiSource::new(&path).fetch_raw_records(None);
            std::fs::remove_file(&path).unwrap();
            assert!(
                matches!(result, Err(DatabaseError::Layout { .. })),
                "{name}: {result:?}"
            );
        }
    }

    #[test]
    fn csv_export_rows_become_okobaudat_records() {
        let path = temp_file(
            "okobau.csv",
            "UUID;Name_de;Kategorie;Bezugseinheit;Bezugsgröße;Rohdichte;GWP-total\n\
             u-1;Transportbeton;Mineralische Baustoffe / Beton;m3;1;2400;240\n\
             u-2;Kalkputz;Putze;kg;1;;0,2\n",
        );
        let records = OkobaudatCsvSource::new(&path).fetch_raw_records(None).unwrap();
        let RawRecord::Okobaudat(concrete) = &records[0] else {
            panic!("expected an Ökobaudat record");
        };
        assert_eq!(concrete.uuid, "u-1");
        assert_eq!(concrete.declared_unit, "m3");
        assert_eq!(
            concrete.classification,
            vec!["Mineralische Baustoffe".to_string(), "Beton".to_string()]
        );
        assert_eq!(concrete.density, Some(RawValue::Text("2400".to_string())));

        let RawRecord::Okobaudat(plaster) = &records[1] else {
            panic!("expected an Ökobaudat record");
        };
        assert_eq!(plaster.density, None);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn schema_names_parse() {
        assert_eq!("KBOB".parse(), Ok(DatabaseKind::Kbob));
        assert_eq!("okobaudat-csv".parse(), Ok(DatabaseKind::OkobaudatCsv));
        assert!("ecoinvent".parse::<DatabaseKind>().is_err());
    }
}
