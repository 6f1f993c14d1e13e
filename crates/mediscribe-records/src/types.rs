use std::collections::HashMap;

/// Spreadsheet column the record key lives in.
pub const KEY_HEADER: &str = "abha_id";

/// Bounded number of per-image analysis slots in a record.
pub const MAX_IMAGE_SLOTS: usize = 5;

/// The reserved header set, in canonical sheet order. Casing matches the
/// live sheet and is intentionally inconsistent.
pub const EXPECTED_HEADERS: [&str; 15] = [
    "abha_id",
    "full_name",
    "Age",
    "weight_kg",
    "reason_for_visit",
    "allergies",
    "Medication",
    "symptoms_description",
    "Summary",
    "image1_summary",
    "image2_summary",
    "image3_summary",
    "image4_summary",
    "image5_summary",
    "executive_summary",
];

const DEMOGRAPHIC_HEADERS: [&str; 6] = [
    "abha_id",
    "full_name",
    "Age",
    "weight_kg",
    "reason_for_visit",
    "symptoms_description",
];

const HISTORY_HEADERS: [&str; 3] = ["allergies", "Medication", "Summary"];

/// 1-based slot index -> header name (`image1_summary` ..).
pub fn image_slot_header(slot: usize) -> String {
    format!("image{slot}_summary")
}

/// One patient row, header name -> cell value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientRecord {
    fields: HashMap<String, String>,
}

impl PatientRecord {
    pub fn from_fields(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields.get(header).map(|s| s.as_str())
    }

    pub fn abha_id(&self) -> &str {
        self.get(KEY_HEADER).unwrap_or_default()
    }

    pub fn set(&mut self, header: &str, value: impl Into<String>) {
        self.fields.insert(header.to_string(), value.into());
    }

    fn display_value(&self, header: &str) -> &str {
        match self.get(header) {
            Some(v) if !v.trim().is_empty() => v,
            _ => "N/A",
        }
    }

    /// Demographics block rendered for the UI and for report synthesis.
    pub fn demographics_markdown(&self) -> String {
        DEMOGRAPHIC_HEADERS
            .iter()
            .map(|h| format!("**{}:** {}", title_case(h), self.display_value(h)))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// History block: allergies, medication, and the prior visit summary.
    pub fn history_markdown(&self) -> String {
        HISTORY_HEADERS
            .iter()
            .map(|h| {
                let value = self.display_value(h);
                if *h == "Summary" && value != "N/A" {
                    format!("**{}:**\n\n{}", title_case(h), value)
                } else {
                    format!("**{}:** {}", title_case(h), value)
                }
            })
            .collect::<Vec<_>>()
            .join("\n\n---\n\n")
    }
}

/// `reason_for_visit` -> `Reason For Visit`.
fn title_case(header: &str) -> String {
    header
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
