use super::record::{CanonicalRecord, RawRecord, Rejection};
use super::{custom, kbob, okobaudat};
use crate::config::NormalizerConfig;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Normalize one raw record into per-kilogram terms.
///
/// Pure: the same record always yields the same outcome.
pub fn normalize_record(
    raw: &RawRecord,
    config: &NormalizerConfig,
) -> Result<CanonicalRecord, Rejection> {
    let outcome = match raw {
        RawRecord::Kbob(record) => kbob::normalize(record),
        RawRecord::Okobaudat(record) => okobaudat::normalize(record, config.mislabel_threshold),
        RawRecord::Custom(record) => custom::normalize(record, config.mislabel_threshold),
    };

    outcome.map_err(|reason| Rejection {
        record: raw
            .canonical_id()
            .or_else(|| raw.name().map(str::to_string))
            .unwrap_or_else(|| "<anonymous>".to_string()),
        schema: raw.schema(),
        reason,
    })
}

type Outcome = Result<CanonicalRecord, Rejection>;

/// Record normalizer with an optional memo keyed by record id.
///
/// A memo entry is only reused for an identical raw record, so a hit
/// returns exactly what a miss would compute.
#[derive(Debug, Default)]
pub struct RecordNormalizer {
    config: NormalizerConfig,
    memo: HashMap<String, (RawRecord, Outcome)>,
}

impl RecordNormalizer {
    #[must_use]
    pub fn new(config: NormalizerConfig) -> Self {
        Self {
            config,
            memo: HashMap::new(),
        }
    }

    pub fn normalize(&mut self, raw: &RawRecord) -> Outcome {
        let key = if self.config.cache {
            raw.canonical_id()
        } else {
            None
        };

        if let Some((cached_raw, outcome)) = key.as_ref().and_then(|k| self.memo.get(k)) {
            if cached_raw == raw {
                return outcome.clone();
            }
        }

        let outcome = normalize_record(raw, &self.config);
        if let Some(key) = key {
            self.memo.insert(key, (raw.clone(), outcome.clone()));
        }
        outcome
    }

    /// Normalize a batch into a database. Rejected records are logged and
    /// counted; a later record with an id already present replaces it.
    pub fn normalize_database(&mut self, records: &[RawRecord]) -> CanonicalDatabase {
        let mut database = CanonicalDatabase::default();

        for raw in records {
            match self.normalize(raw) {
                Ok(record) => {
                    if record.is_unresolved() {
                        warn!(
                            id = %record.id,
                            unit = %record.provenance.declared_unit,
                            "{}",
                            record.provenance.note
                        );
                    }
                    if database.records.contains_key(&record.id) {
                        debug!(id = %record.id, "duplicate record id, keeping the later entry");
                    }
                    database.insert(record);
                }
                Err(rejection) => {
                    debug!(
                        record = %rejection.record,
                        reason = %rejection.reason,
                        "skipping malformed record"
                    );
                    database.skipped.push(rejection);
                }
            }
        }

        info!(
            records = database.len(),
            skipped = database.skipped.len(),
            unresolved = database.unresolved_ids().len(),
            "normalized impact database"
        );
        database
    }

    #[must_use]
    pub fn cached(&self) -> usize {
        self.memo.len()
    }
}

/// Canonical records by id, in source order, plus what was skipped.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CanonicalDatabase {
    records: IndexMap<String, CanonicalRecord>,
    skipped: Vec<Rejection>,
}

impl CanonicalDatabase {
    pub fn insert(&mut self, record: CanonicalRecord) {
        self.records.insert(record.id.clone(), record);
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CanonicalRecord> {
        self.records.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn records(&self) -> impl Iterator<Item = &CanonicalRecord> {
        self.records.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn skipped(&self) -> &[Rejection] {
        &self.skipped
    }

    /// Ids of records whose conversion needs manual review.
    #[must_use]
    pub fn unresolved_ids(&self) -> Vec<&str> {
        self.records
            .values()
            .filter(|record| record.is_unresolved())
            .map(|record| record.id.as_str())
            .collect()
    }

    /// Records whose name or category contains `query`, sorted by name.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&CanonicalRecord> {
        let query = query.to_lowercase();
        let mut hits: Vec<&CanonicalRecord> = self
            .records
            .values()
            .filter(|record| {
                record.name.to_lowercase().contains(&query)
                    || record.category.to_lowercase().contains(&query)
            })
            .collect();
        hits.sort_by(|a, b| a.name.cmp(&b.name));
        hits
    }

    /// All records sorted by category, then name.
    #[must_use]
    pub fn records_by_category(&self) -> Vec<&CanonicalRecord> {
        let mut sorted: Vec<&CanonicalRecord> = self.records.values().collect();
        sorted.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
        sorted
    }
}
