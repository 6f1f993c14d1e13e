use regex::Regex;

/// Narrow seam for pulling one field out of free-form model text: the
/// first capture group of `pattern`, trimmed, or the whole match when the
/// pattern has no groups. Invalid patterns yield `None`.
pub fn extract_field(text: &str, pattern: &str) -> Option<String> {
    let re = Regex::new(pattern).ok()?;
    let captures = re.captures(text)?;
    let m = captures.get(1).or_else(|| captures.get(0))?;
    let value = m.as_str().trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// The structured fields the PDF image sections need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisDigest {
    pub patient: String,
    pub document_type: String,
    pub key_findings: String,
}

const PATIENT_PATTERN: &str = r"Name:\s*\[([^\]]+)\]";
const DOCUMENT_TYPE_PATTERN: &str = r"(?i)Document Type[^:\n]*:\s*([^\n]+)";
const KEY_FINDINGS_PATTERN: &str = r"(?si)\*\*Key Findings\*\*:?\s*\n(.*?)(?:\n\n|\n\d\.|\z)";

/// Best-effort digest of one analysis text. Every miss degrades to a
/// human-readable placeholder; model output drifts and the PDF must not.
pub fn digest_analysis(text: &str) -> AnalysisDigest {
    AnalysisDigest {
        patient: extract_field(text, PATIENT_PATTERN)
            .unwrap_or_else(|| "Patient information not found".to_string()),
        document_type: extract_field(text, DOCUMENT_TYPE_PATTERN)
            .unwrap_or_else(|| "Document type not specified".to_string()),
        key_findings: extract_field(text, KEY_FINDINGS_PATTERN)
            .unwrap_or_else(|| "No specific findings".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "A. Patient Information\nName: [Jane Doe]\nAge/Sex: [38F]\n\n\
Document Type: Lab Report\n\n1. **Image Type & Region**\nChest X-ray\n\n\
2. **Key Findings**\nClear lung fields.\nNo effusion.\n\n3. **Diagnostic Assessment**\nNormal.";

    #[test]
    fn extracts_capture_group() {
        assert_eq!(
            extract_field(SAMPLE, r"Name:\s*\[([^\]]+)\]").as_deref(),
            Some("Jane Doe")
        );
    }

    #[test]
    fn whole_match_when_no_group() {
        assert_eq!(
            extract_field("status: ok", r"ok").as_deref(),
            Some("ok")
        );
    }

    #[test]
    fn invalid_pattern_is_none() {
        assert_eq!(extract_field(SAMPLE, r"(["), None);
    }

    #[test]
    fn no_match_is_none() {
        assert_eq!(extract_field(SAMPLE, r"MRN:\s*(\d+)"), None);
    }

    #[test]
    fn digest_pulls_all_three_fields() {
        let digest = digest_analysis(SAMPLE);
        assert_eq!(digest.patient, "Jane Doe");
        assert_eq!(digest.document_type, "Lab Report");
        assert_eq!(digest.key_findings, "Clear lung fields.\nNo effusion.");
    }

    #[test]
    fn digest_degrades_to_placeholders() {
        let digest = digest_analysis("nothing recognizable here");
        assert_eq!(digest.patient, "Patient information not found");
        assert_eq!(digest.document_type, "Document type not specified");
        assert_eq!(digest.key_findings, "No specific findings");
    }
}
