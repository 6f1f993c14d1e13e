use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::types::{PatientRecord, EXPECTED_HEADERS, KEY_HEADER};
use crate::{RecordStore, StoreError, WriteOutcome};

/// Offline record store: the fallback dataset when spreadsheet credentials
/// are missing, and the test double everywhere else.
pub struct MemoryStore {
    records: RwLock<HashMap<String, PatientRecord>>,
}

impl MemoryStore {
    pub fn empty() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Seeded with the canonical demo patient.
    pub fn with_sample_data() -> Self {
        let mut record = PatientRecord::default();
        record.set("abha_id", "12345678901233");
        record.set("full_name", "Pashwiwi Sharma");
        record.set("Age", "22");
        record.set("weight_kg", "64");
        record.set(
            "reason_for_visit",
            "Allergy on right hand, with severe pain and fatigue",
        );
        record.set("allergies", "Pollen");
        record.set("Medication", "None");
        record.set("symptoms_description", "Unsure of cause, itchy rash");
        record.set(
            "Summary",
            "Patient presents with an acute allergic reaction on the right hand.",
        );

        let store = Self::empty();
        store.insert(record);
        store
    }

    pub fn insert(&self, record: PatientRecord) {
        self.records
            .write()
            .insert(record.abha_id().to_string(), record);
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch(&self, abha_id: &str) -> Result<Option<PatientRecord>, StoreError> {
        Ok(self.records.read().get(abha_id.trim()).cloned())
    }

    async fn write_fields(
        &self,
        abha_id: &str,
        fields: &[(String, String)],
    ) -> Result<WriteOutcome, StoreError> {
        let mut records = self.records.write();
        let Some(record) = records.get_mut(abha_id.trim()) else {
            return Ok(WriteOutcome::default());
        };

        let mut outcome = WriteOutcome::default();
        for (header, value) in fields {
            if header == KEY_HEADER || !EXPECTED_HEADERS.contains(&header.as_str()) {
                tracing::warn!(header = %header, "unknown column, skipping");
                outcome.skipped_headers.push(header.clone());
                continue;
            }
            record.set(header, value.clone());
            outcome.updated_cells += 1;
        }
        Ok(outcome)
    }

    fn is_live(&self) -> bool {
        false
    }
}
