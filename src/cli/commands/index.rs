//! Index command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::corpus::Corpus;
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::vector_store::{Document, DocumentMetadata, SqliteVectorStore, VectorStore};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Documents embedded per API round trip during ingest.
const EMBED_CHUNK: usize = 50;

/// One document as written by the upstream scrapers.
#[derive(Debug, Deserialize)]
struct IndexRecord {
    content: String,
    #[serde(flatten)]
    metadata: DocumentMetadata,
}

/// Run the index command.
pub async fn run_index(corpus: &str, file: &Path, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Index) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let corpus: Corpus = corpus.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let mut records = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: IndexRecord = serde_json::from_str(line)
            .with_context(|| format!("Invalid record on line {}", line_no + 1))?;
        records.push(record);
    }

    if records.is_empty() {
        Output::warning("No documents found in input file.");
        return Ok(());
    }

    Output::info(&format!(
        "Indexing {} documents into '{}'",
        records.len(),
        corpus
    ));

    let embedder = OpenAIEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    );
    let store = SqliteVectorStore::open(&settings.corpus_db_path(corpus))?;

    let pb = Output::progress_bar(records.len() as u64, "Embedding and indexing...");

    let mut indexed = 0;
    for chunk in records.chunks(EMBED_CHUNK) {
        let texts: Vec<String> = chunk.iter().map(|r| r.content.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;

        let documents: Vec<Document> = chunk
            .iter()
            .zip(embeddings)
            .map(|(record, embedding)| {
                Document::new(record.content.clone(), record.metadata.clone(), embedding)
            })
            .collect();

        indexed += store.upsert_batch(&documents).await?;
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    Output::success(&format!("Indexed {} documents into '{}'", indexed, corpus));

    Ok(())
}
