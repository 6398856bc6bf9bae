//! Assembling the model's raw text into a cited response card.
//!
//! The model is asked for one paragraph per document, separated by blank
//! lines. Paragraph i is paired with document i of the combined list; every
//! field lookup bounds-checks independently, so the responses and citations
//! lists can end up with different lengths when the model emits more or
//! fewer paragraphs than documents were retrieved. That behavior is kept
//! as-is.

use super::{Citation, ResponseCard, Section, CARD_TYPE_IN_DEPTH};
use crate::vector_store::Document;
use chrono::NaiveDate;
use std::path::Path;
use url::Url;

/// Marker stored in place of a publish date that could not be parsed.
const INVALID_DATE_MARKER: &str = "Invalid date format";

/// Sentinel upstream ingests write when a video timestamp is unknown.
const TIMESTAMP_NOT_AVAILABLE: &str = "timestamp not available";

/// Outcome of normalizing a publish-date string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishDate {
    /// Parsed into (or already in) slash format.
    Formatted(String),
    /// Input matched no known format; displays as a fixed marker.
    Unparseable,
}

impl std::fmt::Display for PublishDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PublishDate::Formatted(s) => write!(f, "{}", s),
            PublishDate::Unparseable => write!(f, "{}", INVALID_DATE_MARKER),
        }
    }
}

/// Normalize a publish date from "M-D-YYYY" or "MM-DD-YYYY" to "MM/DD/YYYY".
///
/// Input that already contains a slash passes through unchanged. Anything
/// unparseable degrades to `PublishDate::Unparseable`; bad source metadata
/// must never abort a query.
pub fn normalize_publish_date(raw: &str) -> PublishDate {
    if raw.contains('/') {
        return PublishDate::Formatted(raw.to_string());
    }

    match NaiveDate::parse_from_str(raw, "%m-%d-%Y") {
        Ok(date) => PublishDate::Formatted(date.format("%m/%d/%Y").to_string()),
        Err(_) => PublishDate::Unparseable,
    }
}

/// Convert the start of a timestamp ("H:M:S" or "H:M", optionally followed
/// by a "-"-separated range end) into an offset in seconds.
///
/// Returns `None` for the not-available sentinel and for anything that does
/// not parse.
pub fn timestamp_to_seconds(timestamp: &str) -> Option<u64> {
    if timestamp.contains(TIMESTAMP_NOT_AVAILABLE) {
        return None;
    }

    let start = timestamp.split('-').next().unwrap_or(timestamp);
    let parts: Option<Vec<u64>> = start
        .split(':')
        .map(|p| p.trim().parse::<u64>().ok())
        .collect();

    match parts?.as_slice() {
        [h, m, s] => Some(h * 3600 + m * 60 + s),
        [h, m] => Some(h * 3600 + m * 60),
        _ => None,
    }
}

/// Append a `t=<seconds>s` query parameter for deep-linking into video.
///
/// Uses `&` when the URL already carries a query string, `?` otherwise.
pub fn append_timestamp_param(url: &str, seconds: u64) -> String {
    let has_query = Url::parse(url)
        .map(|parsed| parsed.query().is_some())
        .unwrap_or_else(|_| url.contains('?'));

    let separator = if has_query { '&' } else { '?' };
    format!("{}{}t={}s", url, separator, seconds)
}

/// File-name portion of a source path, for display.
fn source_display_name(source: &str) -> String {
    Path::new(source)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.to_string())
}

/// Split the raw model output into paragraphs and pair each with the
/// positionally corresponding document's metadata, building one card.
///
/// With no documents at all, only the first paragraph is kept and nothing
/// is cited.
pub fn assemble_card(raw_response: &str, documents: &[Document]) -> ResponseCard {
    let paragraphs: Vec<&str> = raw_response.split("\n\n").collect();

    let mut responses = Vec::new();
    let mut citations = Vec::new();

    if documents.is_empty() {
        if let Some(first) = paragraphs.first() {
            responses.push(Section {
                response: (*first).to_string(),
            });
        }
    } else {
        for (i, paragraph) in paragraphs.iter().enumerate() {
            let meta = documents.get(i).map(|d| &d.metadata);

            let title = meta.and_then(|m| m.title.clone().or_else(|| m.source.clone()));
            let name = meta.and_then(|m| m.source.as_deref().map(source_display_name));
            let page_number = meta.and_then(|m| m.page_number);
            let published = meta.and_then(|m| {
                m.publish_date
                    .as_deref()
                    .map(|d| normalize_publish_date(d).to_string())
            });
            let video_timestamp = meta.and_then(|m| m.timestamp.clone());

            let mut url = meta.and_then(|m| m.url.clone());
            if let (Some(u), Some(ts)) = (&url, &video_timestamp) {
                if let Some(seconds) = timestamp_to_seconds(ts) {
                    url = Some(append_timestamp_param(u, seconds));
                }
            }

            if !paragraph.is_empty() {
                responses.push(Section {
                    response: (*paragraph).to_string(),
                });
            }

            let citation = Citation {
                title,
                published,
                url,
                video_timestamp,
                name,
                page_number,
            };
            if !citation.is_empty() {
                citations.push(citation);
            }
        }
    }

    ResponseCard {
        card_type: CARD_TYPE_IN_DEPTH.to_string(),
        responses,
        citations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::DocumentMetadata;

    fn doc_with(metadata: DocumentMetadata) -> Document {
        Document::new("content".to_string(), metadata, vec![])
    }

    #[test]
    fn test_date_conversion() {
        assert_eq!(
            normalize_publish_date("3-4-2024").to_string(),
            "03/04/2024"
        );
        assert_eq!(
            normalize_publish_date("03-04-2024").to_string(),
            "03/04/2024"
        );
        assert_eq!(
            normalize_publish_date("03/04/2024").to_string(),
            "03/04/2024"
        );
        assert_eq!(
            normalize_publish_date("not-a-date").to_string(),
            "Invalid date format"
        );
    }

    #[test]
    fn test_timestamp_to_seconds() {
        assert_eq!(timestamp_to_seconds("1:02:03-1:05:00"), Some(3723));
        assert_eq!(timestamp_to_seconds("1:02:03"), Some(3723));
        assert_eq!(timestamp_to_seconds("1:02"), Some(3720));
        assert_eq!(timestamp_to_seconds("timestamp not available"), None);
        assert_eq!(timestamp_to_seconds("garbled"), None);
        assert_eq!(timestamp_to_seconds("1:2:3:4"), None);
    }

    #[test]
    fn test_url_augmentation() {
        assert_eq!(
            append_timestamp_param("https://example.com/watch", 42),
            "https://example.com/watch?t=42s"
        );
        assert_eq!(
            append_timestamp_param("https://example.com/watch?x=1", 42),
            "https://example.com/watch?x=1&t=42s"
        );
    }

    #[test]
    fn test_title_only_document_cites_exactly_title() {
        let docs = vec![doc_with(DocumentMetadata {
            title: Some("Ordinance 29-1".to_string()),
            ..Default::default()
        })];

        let card = assemble_card("The ordinance passed.", &docs);

        assert_eq!(card.citations.len(), 1);
        let json = serde_json::to_string(&card.citations[0]).unwrap();
        assert_eq!(json, r#"{"Title":"Ordinance 29-1"}"#);
    }

    #[test]
    fn test_fewer_paragraphs_than_documents_truncates() {
        let docs: Vec<Document> = (0..3)
            .map(|i| {
                doc_with(DocumentMetadata {
                    title: Some(format!("Doc {}", i)),
                    ..Default::default()
                })
            })
            .collect();

        let card = assemble_card("First paragraph.\n\nSecond paragraph.", &docs);

        assert_eq!(card.responses.len(), 2);
        assert!(card.citations.len() <= 2);
        assert_eq!(card.citations[0].title.as_deref(), Some("Doc 0"));
        assert_eq!(card.citations[1].title.as_deref(), Some("Doc 1"));
    }

    #[test]
    fn test_more_paragraphs_than_documents_keeps_uncited_paragraphs() {
        let docs = vec![doc_with(DocumentMetadata {
            title: Some("Doc 0".to_string()),
            ..Default::default()
        })];

        let card = assemble_card("One.\n\nTwo.\n\nThree.", &docs);

        // Excess paragraphs survive as sections; only the paired document
        // produces a citation, so the two lists desynchronize.
        assert_eq!(card.responses.len(), 3);
        assert_eq!(card.citations.len(), 1);
    }

    #[test]
    fn test_zero_documents_keeps_first_paragraph_only() {
        let card = assemble_card("Lead paragraph.\n\nTrailing paragraph.", &[]);

        assert_eq!(card.responses.len(), 1);
        assert_eq!(card.responses[0].response, "Lead paragraph.");
        assert!(card.citations.is_empty());
        assert_eq!(card.card_type, "in_depth");
    }

    #[test]
    fn test_citation_url_gets_deep_link() {
        let docs = vec![doc_with(DocumentMetadata {
            url: Some("https://youtu.be/xyz".to_string()),
            timestamp: Some("0:00:42-0:01:00".to_string()),
            ..Default::default()
        })];

        let card = assemble_card("A paragraph.", &docs);

        assert_eq!(
            card.citations[0].url.as_deref(),
            Some("https://youtu.be/xyz?t=42s")
        );
        assert_eq!(
            card.citations[0].video_timestamp.as_deref(),
            Some("0:00:42-0:01:00")
        );
    }

    #[test]
    fn test_unavailable_timestamp_leaves_url_untouched() {
        let docs = vec![doc_with(DocumentMetadata {
            url: Some("https://youtu.be/xyz".to_string()),
            timestamp: Some("timestamp not available".to_string()),
            ..Default::default()
        })];

        let card = assemble_card("A paragraph.", &docs);

        assert_eq!(card.citations[0].url.as_deref(), Some("https://youtu.be/xyz"));
    }

    #[test]
    fn test_source_produces_name_and_title_fallback() {
        let docs = vec![doc_with(DocumentMetadata {
            source: Some("archive/minutes/minutes-3-4-2024.pdf".to_string()),
            ..Default::default()
        })];

        let card = assemble_card("A paragraph.", &docs);

        let citation = &card.citations[0];
        assert_eq!(citation.name.as_deref(), Some("minutes-3-4-2024.pdf"));
        // With no title recorded, the source path stands in for it.
        assert_eq!(
            citation.title.as_deref(),
            Some("archive/minutes/minutes-3-4-2024.pdf")
        );
    }

    #[test]
    fn test_unparseable_date_is_stored_as_marker() {
        let docs = vec![doc_with(DocumentMetadata {
            title: Some("Doc".to_string()),
            publish_date: Some("sometime in spring".to_string()),
            ..Default::default()
        })];

        let card = assemble_card("A paragraph.", &docs);

        assert_eq!(
            card.citations[0].published.as_deref(),
            Some("Invalid date format")
        );
    }
}
