//! Per-corpus ranking normalization.
//!
//! Scores from heterogeneous corpora live on different scales, so documents
//! are never ranked across corpora. Instead each corpus's list is re-sorted
//! on its own scale before the lists are concatenated in corpus order.

use crate::vector_store::ScoredDocument;

/// Re-sort one corpus's retrieval results by score, best match first.
pub fn normalize_ranking(mut docs: Vec<ScoredDocument>) -> Vec<ScoredDocument> {
    docs.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    docs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::{Document, DocumentMetadata};

    fn scored(content: &str, score: f32) -> ScoredDocument {
        ScoredDocument {
            document: Document::new(content.to_string(), DocumentMetadata::default(), vec![]),
            score,
        }
    }

    #[test]
    fn test_sorts_best_first() {
        let docs = vec![scored("b", 0.2), scored("a", 0.9), scored("c", 0.5)];
        let ranked = normalize_ranking(docs);

        let order: Vec<&str> = ranked.iter().map(|d| d.document.content.as_str()).collect();
        assert_eq!(order, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_empty_list_is_fine() {
        assert!(normalize_ranking(Vec::new()).is_empty());
    }
}
