//! Combining multi-corpus retrieval results into one prompt-ready block.

use crate::retrieval::{ranking, RetrievedDocuments};
use crate::vector_store::Document;

/// Flattened view of retrieval results across all corpora.
#[derive(Debug, Clone)]
pub struct CombinedDocuments {
    /// All document contents joined with double line breaks, in
    /// (corpus order, normalized rank) sequence.
    pub text: String,
    /// The documents in exactly the order their content appears in `text`.
    ///
    /// Paragraph i of the model output is later paired with `documents[i]`;
    /// nothing but position ties a paragraph to its document.
    pub documents: Vec<Document>,
}

/// Merge per-corpus results into one text block plus the ordered document list.
///
/// Each corpus's list is re-sorted on its own score scale first; corpora are
/// then concatenated in their fixed combine order.
pub fn combine_documents(retrieved: RetrievedDocuments) -> CombinedDocuments {
    let mut contents = Vec::new();
    let mut documents = Vec::new();

    for (_, docs) in retrieved {
        for scored in ranking::normalize_ranking(docs) {
            contents.push(scored.document.content.clone());
            documents.push(scored.document);
        }
    }

    CombinedDocuments {
        text: contents.join("\n\n"),
        documents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Corpus;
    use crate::vector_store::{DocumentMetadata, ScoredDocument};

    fn scored(content: &str, score: f32) -> ScoredDocument {
        ScoredDocument {
            document: Document::new(content.to_string(), DocumentMetadata::default(), vec![]),
            score,
        }
    }

    #[test]
    fn test_combines_in_corpus_then_rank_order() {
        let retrieved = vec![
            (
                Corpus::Minutes,
                vec![scored("minutes low", 0.1), scored("minutes high", 0.9)],
            ),
            (Corpus::Committees, vec![]),
            (Corpus::Pdfs, vec![scored("pdf", 0.5)]),
            (Corpus::Press, vec![]),
            (Corpus::News, vec![]),
        ];

        let combined = combine_documents(retrieved);

        assert_eq!(combined.text, "minutes high\n\nminutes low\n\npdf");
        let order: Vec<&str> = combined
            .documents
            .iter()
            .map(|d| d.content.as_str())
            .collect();
        assert_eq!(order, vec!["minutes high", "minutes low", "pdf"]);
    }

    #[test]
    fn test_empty_retrieval_combines_to_nothing() {
        let retrieved: RetrievedDocuments =
            Corpus::ALL.iter().map(|c| (*c, Vec::new())).collect();
        let combined = combine_documents(retrieved);
        assert!(combined.text.is_empty());
        assert!(combined.documents.is_empty());
    }
}
