//! Gavel - Cited Q&A over City Council Proceedings
//!
//! Gavel answers natural-language questions about New Orleans City Council
//! proceedings, with citations back to the records that support each part of
//! the answer.
//!
//! # Overview
//!
//! Gavel allows you to:
//! - Ask questions across five corpora of council records (minutes, committee
//!   transcripts, PDFs, press materials, news) in a single query
//! - Get multi-paragraph answers with per-paragraph citations, including
//!   deep links into meeting video
//! - Ingest new documents into any corpus from JSONL files
//! - Evaluate answer quality against a battery of LLM-judged metrics
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt template management
//! - `corpus` - The five fixed document corpora
//! - `embedding` - Embedding generation
//! - `vector_store` - Vector database abstraction, one store per corpus
//! - `retrieval` - Parallel multi-corpus similarity search
//! - `answer` - Document combining, answer synthesis, citation assembly
//! - `eval` - Evaluation harness and metric battery
//!
//! # Example
//!
//! ```rust,no_run
//! use gavel::answer::{AnswerEngine, ResponseMode};
//! use gavel::config::Settings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let engine = AnswerEngine::from_settings(&settings)?;
//!
//!     let outcome = engine
//!         .answer("What did the council decide about short-term rentals?", ResponseMode::InDepth, 5)
//!         .await?;
//!     println!("{}", outcome.card.to_json()?);
//!
//!     Ok(())
//! }
//! ```

pub mod answer;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod eval;
pub mod openai;
pub mod retrieval;
pub mod vector_store;

pub use error::{GavelError, Result};
