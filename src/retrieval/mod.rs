//! Parallel multi-corpus retrieval.
//!
//! A single query fans out into one similarity search per corpus. The
//! searches run concurrently; the first store failure aborts the whole
//! query, so callers never see partial results.

pub mod ranking;

use crate::corpus::Corpus;
use crate::embedding::Embedder;
use crate::error::{GavelError, Result};
use crate::vector_store::{ScoredDocument, VectorStore};
use futures::future;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Per-corpus ranked retrieval results, in corpus combine order.
pub type RetrievedDocuments = Vec<(Corpus, Vec<ScoredDocument>)>;

/// Issues similarity searches against all five corpora for a query.
pub struct CorpusRetriever {
    stores: BTreeMap<Corpus, Arc<dyn VectorStore>>,
    embedder: Arc<dyn Embedder>,
}

impl CorpusRetriever {
    /// Create a retriever over the given per-corpus stores.
    pub fn new(stores: BTreeMap<Corpus, Arc<dyn VectorStore>>, embedder: Arc<dyn Embedder>) -> Self {
        Self { stores, embedder }
    }

    /// Retrieve the top `k` documents from every corpus for a query.
    ///
    /// The query is embedded once, then each corpus is searched as its own
    /// concurrent task. There is no retry and no per-search timeout beyond
    /// the HTTP client's; any search error propagates and cancels the
    /// remaining in-flight searches.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<RetrievedDocuments> {
        let query_embedding = self.embedder.embed(query).await?;

        let mut searches = Vec::with_capacity(Corpus::ALL.len());
        for corpus in Corpus::ALL {
            let store = self.stores.get(&corpus).cloned().ok_or_else(|| {
                GavelError::Retrieval(format!("No store configured for corpus: {}", corpus))
            })?;
            let embedding = query_embedding.clone();
            searches.push(async move {
                let docs = store.similarity_search(&embedding, k).await?;
                Ok::<_, GavelError>((corpus, docs))
            });
        }

        let retrieved = future::try_join_all(searches).await?;

        debug!(
            "Retrieved {} documents across {} corpora",
            retrieved.iter().map(|(_, docs)| docs.len()).sum::<usize>(),
            retrieved.len()
        );

        Ok(retrieved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::{Document, DocumentMetadata, MemoryVectorStore};
    use async_trait::async_trait;

    struct FixedEmbedder;

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    struct FailingStore;

    #[async_trait]
    impl VectorStore for FailingStore {
        async fn upsert(&self, _doc: &Document) -> Result<()> {
            Ok(())
        }

        async fn upsert_batch(&self, _docs: &[Document]) -> Result<usize> {
            Ok(0)
        }

        async fn similarity_search(&self, _q: &[f32], _k: usize) -> Result<Vec<ScoredDocument>> {
            Err(GavelError::VectorStore("index unavailable".to_string()))
        }

        async fn document_count(&self) -> Result<usize> {
            Ok(0)
        }
    }

    fn stores_with(
        corpus: Corpus,
        store: Arc<dyn VectorStore>,
    ) -> BTreeMap<Corpus, Arc<dyn VectorStore>> {
        let mut stores: BTreeMap<Corpus, Arc<dyn VectorStore>> = BTreeMap::new();
        for c in Corpus::ALL {
            if c == corpus {
                stores.insert(c, store.clone());
            } else {
                stores.insert(c, Arc::new(MemoryVectorStore::new()));
            }
        }
        stores
    }

    #[tokio::test]
    async fn test_retrieve_preserves_corpus_order() {
        let minutes = MemoryVectorStore::new();
        minutes
            .upsert(&Document::new(
                "regular meeting minutes".to_string(),
                DocumentMetadata::default(),
                vec![1.0, 0.0],
            ))
            .await
            .unwrap();

        let stores = stores_with(Corpus::Minutes, Arc::new(minutes));
        let retriever = CorpusRetriever::new(stores, Arc::new(FixedEmbedder));

        let retrieved = retriever.retrieve("what happened", 5).await.unwrap();
        assert_eq!(retrieved.len(), 5);
        assert_eq!(retrieved[0].0, Corpus::Minutes);
        assert_eq!(retrieved[0].1.len(), 1);
        assert_eq!(retrieved[4].0, Corpus::News);
        assert!(retrieved[4].1.is_empty());
    }

    #[tokio::test]
    async fn test_one_failing_corpus_aborts_query() {
        let stores = stores_with(Corpus::Pdfs, Arc::new(FailingStore));
        let retriever = CorpusRetriever::new(stores, Arc::new(FixedEmbedder));

        let err = retriever.retrieve("anything", 5).await.unwrap_err();
        assert!(err.to_string().contains("index unavailable"));
    }

    #[tokio::test]
    async fn test_missing_store_is_an_error() {
        let mut stores: BTreeMap<Corpus, Arc<dyn VectorStore>> = BTreeMap::new();
        stores.insert(Corpus::Minutes, Arc::new(MemoryVectorStore::new()));

        let retriever = CorpusRetriever::new(stores, Arc::new(FixedEmbedder));
        let err = retriever.retrieve("anything", 5).await.unwrap_err();
        assert!(err.to_string().contains("No store configured"));
    }
}
