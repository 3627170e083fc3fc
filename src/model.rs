//! Wire and storage shapes for analysis results.
//!
//! Labels keep the analysis service's own PascalCase field names so responses
//! mirror what the service reports. The record uses one serde shape for both
//! the JSON response and the DynamoDB item, which means a record listed later
//! is exactly what was persisted.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Label {
    pub name: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModerationLabel {
    pub name: String,
    pub parent_name: String,
    pub confidence: f32,
}

/// One analysis of a stored object, keyed by that object's storage key.
/// Written once, never mutated; last write wins on key collision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub key: String,
    pub timestamp: String,
    pub labels: Vec<Label>,
    pub moderation: Vec<ModerationLabel>,
}

/// Human-readable summary: every label name lower-cased, comma-joined.
pub fn describe(labels: &[Label]) -> String {
    let names: Vec<String> = labels.iter().map(|l| l.name.to_lowercase()).collect();
    format!("На изображении: {}.", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(name: &str, confidence: f32) -> Label {
        Label {
            name: name.to_owned(),
            confidence,
        }
    }

    fn sample_record() -> AnalysisRecord {
        AnalysisRecord {
            key: "uploads/1700000000_cat.jpg".to_owned(),
            timestamp: "2024-11-14T22:13:20+00:00".to_owned(),
            labels: vec![label("Cat", 98.7), label("Pet", 91.2)],
            moderation: vec![ModerationLabel {
                name: "Suggestive".to_owned(),
                parent_name: "".to_owned(),
                confidence: 60.5,
            }],
        }
    }

    #[test]
    fn description_lowercases_and_joins_names() {
        let labels = vec![label("Cat", 98.7), label("Dog", 88.1)];
        assert_eq!(describe(&labels), "На изображении: cat, dog.");
    }

    #[test]
    fn description_of_no_labels_is_the_bare_template() {
        assert_eq!(describe(&[]), "На изображении: .");
    }

    #[test]
    fn record_serializes_with_wire_field_names() {
        let json = serde_json::to_value(sample_record()).unwrap();
        assert_eq!(json["key"], "uploads/1700000000_cat.jpg");
        assert_eq!(json["timestamp"], "2024-11-14T22:13:20+00:00");
        assert_eq!(json["labels"][0]["Name"], "Cat");
        assert_eq!(json["moderation"][0]["ParentName"], "");
    }

    #[test]
    fn record_survives_a_dynamo_item_round_trip() {
        let record = sample_record();
        let item: serde_dynamo::Item = serde_dynamo::to_item(&record).unwrap();
        let back: AnalysisRecord = serde_dynamo::from_item(item).unwrap();
        assert_eq!(back, record);
    }
}
