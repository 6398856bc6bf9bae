//! Vector store abstraction for Gavel.
//!
//! Each corpus is backed by its own store; the trait is the contract the
//! retrieval layer depends on.

mod memory;
mod sqlite;

pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Descriptive metadata carried by a stored document.
///
/// Every field is optional. Citation assembly omits absent fields rather
/// than substituting placeholder text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Path of the file the text was extracted from.
    pub source: Option<String>,
    /// Document or meeting title.
    pub title: Option<String>,
    /// Publish date as recorded upstream ("M-D-YYYY" or "MM-DD-YYYY").
    pub publish_date: Option<String>,
    /// Video timestamp, either "H:M:S" or a "H:M:S-H:M:S" range.
    pub timestamp: Option<String>,
    /// Link to the source video or page.
    pub url: Option<String>,
    /// Page number within the source PDF.
    pub page_number: Option<i64>,
}

/// A unit of retrievable text stored in a corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID.
    pub id: Uuid,
    /// Text content of this document.
    pub content: String,
    /// Citation metadata.
    pub metadata: DocumentMetadata,
    /// Embedding vector.
    pub embedding: Vec<f32>,
    /// When this document was indexed.
    pub indexed_at: DateTime<Utc>,
}

impl Document {
    /// Create a new document.
    pub fn new(content: String, metadata: DocumentMetadata, embedding: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            metadata,
            embedding,
            indexed_at: Utc::now(),
        }
    }
}

/// A retrieved document paired with its similarity score.
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    /// The matched document.
    pub document: Document,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Trait for vector store implementations backing a corpus.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Store a document with its embedding.
    async fn upsert(&self, doc: &Document) -> Result<()>;

    /// Bulk upsert documents.
    async fn upsert_batch(&self, docs: &[Document]) -> Result<usize>;

    /// Return the `k` documents most similar to the query embedding,
    /// best match first.
    async fn similarity_search(
        &self,
        query_embedding: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredDocument>>;

    /// Get total document count.
    async fn document_count(&self) -> Result<usize>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_metadata_defaults_to_empty() {
        let meta = DocumentMetadata::default();
        assert!(meta.source.is_none());
        assert!(meta.title.is_none());
        assert!(meta.page_number.is_none());
    }
}
