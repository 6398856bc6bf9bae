//! SQLite-based vector store implementation.
//!
//! Uses SQLite with cosine similarity computed in Rust. Each corpus gets its
//! own database file; corpora are small enough that a full scan per query is
//! acceptable. For much larger corpora, consider the sqlite-vec extension or
//! a dedicated vector database.

use super::{cosine_similarity, Document, DocumentMetadata, ScoredDocument, VectorStore};
use crate::error::{GavelError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    id TEXT PRIMARY KEY,
    content TEXT NOT NULL,
    source TEXT,
    title TEXT,
    publish_date TEXT,
    timestamp TEXT,
    url TEXT,
    page_number INTEGER,
    embedding BLOB NOT NULL,
    indexed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_documents_indexed_at ON documents(indexed_at);
"#;

/// SQLite-based vector store for one corpus.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
}

impl SqliteVectorStore {
    /// Open (or create) a corpus database at the given path.
    #[instrument(skip_all)]
    pub fn open(path: &Path) -> Result<Self> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrent performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Opened corpus store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Serialize embedding to bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }

    fn row_to_document(row: &rusqlite::Row<'_>) -> rusqlite::Result<Document> {
        let id_str: String = row.get(0)?;
        let embedding_bytes: Vec<u8> = row.get(8)?;
        let indexed_at_str: String = row.get(9)?;

        Ok(Document {
            id: uuid::Uuid::parse_str(&id_str).unwrap_or_default(),
            content: row.get(1)?,
            metadata: DocumentMetadata {
                source: row.get(2)?,
                title: row.get(3)?,
                publish_date: row.get(4)?,
                timestamp: row.get(5)?,
                url: row.get(6)?,
                page_number: row.get(7)?,
            },
            embedding: Self::bytes_to_embedding(&embedding_bytes),
            indexed_at: DateTime::parse_from_rfc3339(&indexed_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }

    fn insert_document(tx: &Connection, doc: &Document) -> Result<()> {
        let embedding_bytes = Self::embedding_to_bytes(&doc.embedding);

        tx.execute(
            r#"
            INSERT OR REPLACE INTO documents
            (id, content, source, title, publish_date, timestamp, url, page_number,
             embedding, indexed_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                doc.id.to_string(),
                doc.content,
                doc.metadata.source,
                doc.metadata.title,
                doc.metadata.publish_date,
                doc.metadata.timestamp,
                doc.metadata.url,
                doc.metadata.page_number,
                embedding_bytes,
                doc.indexed_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    #[instrument(skip(self, doc))]
    async fn upsert(&self, doc: &Document) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| GavelError::VectorStore(format!("Failed to acquire lock: {}", e)))?;

        Self::insert_document(&conn, doc)?;

        debug!("Upserted document {}", doc.id);
        Ok(())
    }

    #[instrument(skip(self, docs))]
    async fn upsert_batch(&self, docs: &[Document]) -> Result<usize> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| GavelError::VectorStore(format!("Failed to acquire lock: {}", e)))?;

        let tx = conn.unchecked_transaction()?;
        for doc in docs {
            Self::insert_document(&tx, doc)?;
        }
        tx.commit()?;

        info!("Batch upserted {} documents", docs.len());
        Ok(docs.len())
    }

    #[instrument(skip(self, query_embedding))]
    async fn similarity_search(
        &self,
        query_embedding: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredDocument>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| GavelError::VectorStore(format!("Failed to acquire lock: {}", e)))?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, content, source, title, publish_date, timestamp, url, page_number,
                   embedding, indexed_at
            FROM documents
            "#,
        )?;

        let docs = stmt.query_map([], Self::row_to_document)?;

        let mut results: Vec<ScoredDocument> = docs
            .filter_map(|doc_result| doc_result.ok())
            .map(|doc| {
                let score = cosine_similarity(query_embedding, &doc.embedding);
                ScoredDocument {
                    document: doc,
                    score,
                }
            })
            .collect();

        // Sort by score descending
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(k);

        debug!("Found {} matching documents", results.len());
        Ok(results)
    }

    async fn document_count(&self) -> Result<usize> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| GavelError::VectorStore(format!("Failed to acquire lock: {}", e)))?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(content: &str, title: Option<&str>, embedding: Vec<f32>) -> Document {
        Document::new(
            content.to_string(),
            DocumentMetadata {
                title: title.map(String::from),
                ..Default::default()
            },
            embedding,
        )
    }

    #[tokio::test]
    async fn test_upsert_and_search() {
        let store = SqliteVectorStore::in_memory().unwrap();

        store
            .upsert_batch(&[
                doc("budget hearing", Some("Budget"), vec![1.0, 0.0, 0.0]),
                doc("zoning appeal", Some("Zoning"), vec![0.0, 1.0, 0.0]),
            ])
            .await
            .unwrap();

        assert_eq!(store.document_count().await.unwrap(), 2);

        let results = store.similarity_search(&[1.0, 0.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].document.metadata.title.as_deref(), Some("Budget"));
        assert!(results[0].score > results[1].score);

        let top = store.similarity_search(&[0.0, 1.0, 0.0], 1).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].document.metadata.title.as_deref(), Some("Zoning"));
    }

    #[tokio::test]
    async fn test_metadata_survives_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteVectorStore::open(&dir.path().join("press.db")).unwrap();

        let mut d = doc("press release text", Some("Release"), vec![0.5, 0.5]);
        d.metadata.source = Some("data/press/release-12.pdf".to_string());
        d.metadata.publish_date = Some("3-4-2024".to_string());
        d.metadata.timestamp = Some("1:02:03".to_string());
        d.metadata.url = Some("https://example.com/watch?v=abc".to_string());
        d.metadata.page_number = Some(4);

        store.upsert(&d).await.unwrap();

        let results = store.similarity_search(&[0.5, 0.5], 1).await.unwrap();
        let meta = &results[0].document.metadata;
        assert_eq!(meta.source.as_deref(), Some("data/press/release-12.pdf"));
        assert_eq!(meta.publish_date.as_deref(), Some("3-4-2024"));
        assert_eq!(meta.timestamp.as_deref(), Some("1:02:03"));
        assert_eq!(meta.page_number, Some(4));
    }
}
