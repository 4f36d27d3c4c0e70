//! The row shape written to the submissions table.

use serde::{Deserialize, Serialize};

/// One lead submission as stored remotely.
///
/// Field names on the wire follow the hosted table's column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRow {
    /// Contact number in canonical international form.
    #[serde(rename = "whatsapp_number")]
    pub contact_number: String,
    /// Business category.
    pub domain: String,
    /// Platform labels; serialized as an empty array when none were chosen.
    pub platforms: Vec<String>,
    /// Free-text description of the lead's main problem.
    #[serde(rename = "primary_pain_point")]
    pub pain_point: String,
    /// Whether the lead agreed to marketing contact.
    pub marketing_consent: bool,
    /// Anonymized identity of the submitting network origin.
    #[serde(rename = "iphash")]
    pub identity_hash: String,
    /// Tag identifying the client surface that produced the row.
    #[serde(rename = "source")]
    pub origin: String,
    /// Content fingerprint; unique across the table.
    #[serde(rename = "submission_hash")]
    pub content_hash: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_table_column_names() {
        let row = SubmissionRow {
            contact_number: "+919876543210".to_owned(),
            domain: "Jewelry & Accessories".to_owned(),
            platforms: vec![],
            pain_point: "I spend 3 hours daily answering price questions".to_owned(),
            marketing_consent: true,
            identity_hash: "abc".to_owned(),
            origin: "landing_v1".to_owned(),
            content_hash: "xyz".to_owned(),
        };

        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["whatsapp_number"], "+919876543210");
        assert_eq!(value["primary_pain_point"], row.pain_point.as_str());
        assert_eq!(value["iphash"], "abc");
        assert_eq!(value["source"], "landing_v1");
        assert_eq!(value["submission_hash"], "xyz");
        assert_eq!(value["platforms"], serde_json::json!([]));
        assert!(value.get("contact_number").is_none());
    }
}
