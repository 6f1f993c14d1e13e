use std::collections::HashMap;

use async_trait::async_trait;
use mediscribe_foundation::RecordsSettings;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{PatientRecord, KEY_HEADER};
use crate::{RecordStore, StoreError, WriteOutcome};

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Deserialize)]
struct ValueRange {
    values: Option<Vec<Vec<Value>>>,
}

#[derive(Serialize)]
struct BatchUpdateRequest {
    #[serde(rename = "valueInputOption")]
    value_input_option: &'static str,
    data: Vec<RangeWrite>,
}

#[derive(Serialize)]
struct RangeWrite {
    range: String,
    values: Vec<Vec<String>>,
}

/// Spreadsheet-backed record store over the Sheets v4 values API.
///
/// Columns are resolved against the live header row on every write, so the
/// sheet can be reordered without corrupting records.
#[derive(Debug)]
pub struct SheetStore {
    client: reqwest::Client,
    base_url: String,
    token: String,
    spreadsheet_id: String,
    worksheet: String,
}

impl SheetStore {
    pub fn new(settings: &RecordsSettings) -> Result<Self, StoreError> {
        let token = settings
            .api_token
            .clone()
            .ok_or_else(|| StoreError::Disabled("spreadsheet API token not configured".into()))?;
        let spreadsheet_id = settings
            .spreadsheet_id
            .clone()
            .ok_or_else(|| StoreError::Disabled("spreadsheet id not configured".into()))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            token,
            spreadsheet_id,
            worksheet: settings.worksheet.clone(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_all_rows(&self) -> Result<Vec<Vec<String>>, StoreError> {
        let url = format!(
            "{}/{}/values/{}",
            self.base_url, self.spreadsheet_id, self.worksheet
        );
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?;
        let range: ValueRange = response.json().await?;

        Ok(range
            .values
            .unwrap_or_default()
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }
}

#[async_trait]
impl RecordStore for SheetStore {
    async fn fetch(&self, abha_id: &str) -> Result<Option<PatientRecord>, StoreError> {
        let rows = self.fetch_all_rows().await?;
        Ok(find_record(&rows, abha_id))
    }

    async fn write_fields(
        &self,
        abha_id: &str,
        fields: &[(String, String)],
    ) -> Result<WriteOutcome, StoreError> {
        let rows = self.fetch_all_rows().await?;
        let Some((headers, row_number)) = locate_row(&rows, abha_id) else {
            tracing::warn!(abha_id = %abha_id, "record not found, skipping sheet update");
            return Ok(WriteOutcome::default());
        };

        let (writes, skipped) = build_updates(&headers, row_number, &self.worksheet, fields);
        for header in &skipped {
            tracing::warn!(header = %header, "column not present in sheet, skipping");
        }
        if writes.is_empty() {
            return Ok(WriteOutcome {
                updated_cells: 0,
                skipped_headers: skipped,
            });
        }

        let updated_cells = writes.len();
        let body = BatchUpdateRequest {
            value_input_option: "RAW",
            data: writes,
        };
        let url = format!(
            "{}/{}/values:batchUpdate",
            self.base_url, self.spreadsheet_id
        );
        self.client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        tracing::info!(abha_id = %abha_id, cells = updated_cells, "sheet row updated");
        Ok(WriteOutcome {
            updated_cells,
            skipped_headers: skipped,
        })
    }

    fn is_live(&self) -> bool {
        true
    }
}

fn cell_to_string(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Row lookup by key column. Returns the record assembled from the live
/// header row.
fn find_record(rows: &[Vec<String>], abha_id: &str) -> Option<PatientRecord> {
    let headers = rows.first()?;
    let key_col = headers.iter().position(|h| h == KEY_HEADER)?;
    let needle = abha_id.trim();

    for row in rows.iter().skip(1) {
        if row.get(key_col).map(|v| v.trim()) == Some(needle) {
            let mut fields = HashMap::new();
            for (i, header) in headers.iter().enumerate() {
                fields.insert(
                    header.clone(),
                    row.get(i).cloned().unwrap_or_default(),
                );
            }
            return Some(PatientRecord::from_fields(fields));
        }
    }
    None
}

/// Headers plus the 1-based sheet row number holding the key.
fn locate_row(rows: &[Vec<String>], abha_id: &str) -> Option<(Vec<String>, usize)> {
    let headers = rows.first()?.clone();
    let key_col = headers.iter().position(|h| h == KEY_HEADER)?;
    let needle = abha_id.trim();

    rows.iter()
        .enumerate()
        .skip(1)
        .find(|(_, row)| row.get(key_col).map(|v| v.trim()) == Some(needle))
        .map(|(i, _)| (headers, i + 1))
}

/// Placeholder values never overwrite real cells.
fn writable(value: &str) -> bool {
    !value.trim().is_empty() && !value.contains("Pending") && !value.contains("Failed")
}

fn build_updates(
    headers: &[String],
    row_number: usize,
    worksheet: &str,
    fields: &[(String, String)],
) -> (Vec<RangeWrite>, Vec<String>) {
    let mut writes = Vec::new();
    let mut skipped = Vec::new();

    for (header, value) in fields {
        if !writable(value) {
            continue;
        }
        match headers.iter().position(|h| h == header) {
            Some(col) => writes.push(RangeWrite {
                range: format!("{}!{}{}", worksheet, column_letter(col + 1), row_number),
                values: vec![vec![value.clone()]],
            }),
            None => skipped.push(header.clone()),
        }
    }
    (writes, skipped)
}

/// 1-based column index -> A1 letters (1 -> A, 27 -> AA).
fn column_letter(mut index: usize) -> String {
    let mut letters = Vec::new();
    while index > 0 {
        let rem = (index - 1) % 26;
        letters.push(b'A' + rem as u8);
        index = (index - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> Vec<Vec<String>> {
        vec![
            vec!["abha_id", "full_name", "executive_summary"]
                .into_iter()
                .map(String::from)
                .collect(),
            vec!["111", "First Patient", ""]
                .into_iter()
                .map(String::from)
                .collect(),
            vec!["222", "Second Patient", "old report"]
                .into_iter()
                .map(String::from)
                .collect(),
        ]
    }

    #[test]
    fn column_letters() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(15), "O");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
        assert_eq!(column_letter(52), "AZ");
    }

    #[test]
    fn find_record_matches_trimmed_key() {
        let record = find_record(&sheet(), " 222 ").unwrap();
        assert_eq!(record.get("full_name"), Some("Second Patient"));
        assert!(find_record(&sheet(), "999").is_none());
    }

    #[test]
    fn locate_row_returns_sheet_row_numbers() {
        let (_, row) = locate_row(&sheet(), "111").unwrap();
        assert_eq!(row, 2);
        let (_, row) = locate_row(&sheet(), "222").unwrap();
        assert_eq!(row, 3);
    }

    #[test]
    fn updates_map_headers_to_a1_ranges() {
        let (headers, row) = locate_row(&sheet(), "222").unwrap();
        let (writes, skipped) = build_updates(
            &headers,
            row,
            "PatientData",
            &[
                ("executive_summary".to_string(), "new report".to_string()),
                ("image1_summary".to_string(), "film ok".to_string()),
                ("executive_summary".to_string(), "Analysis Failed".to_string()),
            ],
        );

        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].range, "PatientData!C3");
        assert_eq!(writes[0].values, vec![vec!["new report".to_string()]]);
        assert_eq!(skipped, vec!["image1_summary".to_string()]);
    }

    #[test]
    fn placeholder_values_are_not_written() {
        assert!(!writable(""));
        assert!(!writable("Analysis Pending..."));
        assert!(!writable("### Analysis Failed"));
        assert!(writable("real content"));
    }

    #[test]
    fn missing_credentials_disable_store() {
        let err = SheetStore::new(&RecordsSettings::default()).unwrap_err();
        assert!(matches!(err, StoreError::Disabled(_)));
    }

    #[test]
    fn numeric_cells_stringify() {
        assert_eq!(cell_to_string(serde_json::json!(42)), "42");
        assert_eq!(cell_to_string(serde_json::json!("x")), "x");
    }
}
