//! The answer pipeline: combine retrieved documents, synthesize an answer,
//! and assemble a cited response card.

mod assemble;
mod combine;
mod router;
mod synthesize;

pub use assemble::{
    append_timestamp_param, assemble_card, normalize_publish_date, timestamp_to_seconds,
    PublishDate,
};
pub use combine::{combine_documents, CombinedDocuments};
pub use router::{AnswerEngine, AnswerOutcome, ResponseMode};
pub use synthesize::{transform_query_for_date, Synthesizer};

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Card type tag for multi-section cited answers.
pub const CARD_TYPE_IN_DEPTH: &str = "in_depth";
/// Card type tag for the advertised single-paragraph summary mode.
pub const CARD_TYPE_GENERAL: &str = "general";

/// One answer paragraph in a response card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// The paragraph text.
    pub response: String,
}

/// Display metadata for one cited document.
///
/// Fields are emitted only when present, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    #[serde(rename = "Title", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "Published", skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(rename = "URL", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "Video timestamp", skip_serializing_if = "Option::is_none")]
    pub video_timestamp: Option<String>,
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Page Number", skip_serializing_if = "Option::is_none")]
    pub page_number: Option<i64>,
}

impl Citation {
    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.published.is_none()
            && self.url.is_none()
            && self.video_timestamp.is_none()
            && self.name.is_none()
            && self.page_number.is_none()
    }
}

/// The response envelope returned to the caller, one per query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseCard {
    /// Which route produced this card.
    pub card_type: String,
    /// Answer paragraphs, in model output order.
    pub responses: Vec<Section>,
    /// Citations for the documents the paragraphs were paired with.
    pub citations: Vec<Citation>,
}

impl ResponseCard {
    /// Serialize the card to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// All paragraph texts joined with single spaces.
    ///
    /// This is the flat "actual output" form the evaluation harness scores.
    pub fn joined_responses(&self) -> String {
        self.responses
            .iter()
            .map(|s| s.response.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_citation_field_order_is_fixed() {
        let citation = Citation {
            title: Some("Budget Hearing".to_string()),
            published: Some("03/04/2024".to_string()),
            url: Some("https://example.com?t=42s".to_string()),
            video_timestamp: Some("0:00:42".to_string()),
            name: Some("minutes-3-4-2024.pdf".to_string()),
            page_number: Some(2),
        };

        let json = serde_json::to_string(&citation).unwrap();
        let title_pos = json.find("Title").unwrap();
        let published_pos = json.find("Published").unwrap();
        let url_pos = json.find("URL").unwrap();
        let ts_pos = json.find("Video timestamp").unwrap();
        let name_pos = json.find("\"Name\"").unwrap();
        let page_pos = json.find("Page Number").unwrap();

        assert!(title_pos < published_pos);
        assert!(published_pos < url_pos);
        assert!(url_pos < ts_pos);
        assert!(ts_pos < name_pos);
        assert!(name_pos < page_pos);
    }

    #[test]
    fn test_absent_citation_fields_are_omitted() {
        let citation = Citation {
            title: Some("Only Title".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_string(&citation).unwrap();
        assert_eq!(json, r#"{"Title":"Only Title"}"#);
    }

    #[test]
    fn test_card_serializes_expected_shape() {
        let card = ResponseCard {
            card_type: CARD_TYPE_IN_DEPTH.to_string(),
            responses: vec![Section {
                response: "The council voted to defer.".to_string(),
            }],
            citations: vec![],
        };

        let json = card.to_json().unwrap();
        assert!(json.contains(r#""card_type":"in_depth""#));
        assert!(json.contains(r#""responses":[{"response":"The council voted to defer."}]"#));
        assert!(json.contains(r#""citations":[]"#));
    }

    #[test]
    fn test_joined_responses() {
        let card = ResponseCard {
            card_type: CARD_TYPE_IN_DEPTH.to_string(),
            responses: vec![
                Section {
                    response: "First.".to_string(),
                },
                Section {
                    response: "Second.".to_string(),
                },
            ],
            citations: vec![],
        };
        assert_eq!(card.joined_responses(), "First. Second.");
    }
}
