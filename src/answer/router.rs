//! Query routing and pipeline coordination.

use super::{assemble_card, combine_documents, Synthesizer};
use super::{ResponseCard, CARD_TYPE_GENERAL, CARD_TYPE_IN_DEPTH};
use crate::config::{Prompts, Settings};
use crate::corpus::Corpus;
use crate::embedding::OpenAIEmbedder;
use crate::error::{GavelError, Result};
use crate::retrieval::CorpusRetriever;
use crate::vector_store::{SqliteVectorStore, VectorStore};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;

/// Response strategies a caller may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Multi-section cited answers. The only implemented strategy.
    InDepth,
    /// Advertised single-paragraph summaries; requesting it is an error.
    General,
}

impl ResponseMode {
    /// Wire tag for this mode.
    pub fn tag(&self) -> &'static str {
        match self {
            ResponseMode::InDepth => CARD_TYPE_IN_DEPTH,
            ResponseMode::General => CARD_TYPE_GENERAL,
        }
    }
}

impl std::fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl std::str::FromStr for ResponseMode {
    type Err = GavelError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            CARD_TYPE_IN_DEPTH => Ok(ResponseMode::InDepth),
            CARD_TYPE_GENERAL => Ok(ResponseMode::General),
            other => Err(GavelError::UnsupportedMode {
                expected: CARD_TYPE_IN_DEPTH.to_string(),
                received: other.to_string(),
            }),
        }
    }
}

/// A response card plus the combined retrieval context that produced it.
#[derive(Debug, Clone)]
pub struct AnswerOutcome {
    /// The card returned to the caller.
    pub card: ResponseCard,
    /// The combined document text the model saw (evaluation keeps this as
    /// retrieval context).
    pub context: String,
}

/// The full question answering pipeline: retrieve, combine, synthesize,
/// assemble.
pub struct AnswerEngine {
    retriever: CorpusRetriever,
    synthesizer: Synthesizer,
}

impl AnswerEngine {
    /// Create an engine from already-built components.
    pub fn new(retriever: CorpusRetriever, synthesizer: Synthesizer) -> Self {
        Self {
            retriever,
            synthesizer,
        }
    }

    /// Build an engine from settings: one SQLite store per corpus, an
    /// OpenAI embedder, and the configured answer model.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let embedder = Arc::new(OpenAIEmbedder::with_config(
            &settings.embedding.model,
            settings.embedding.dimensions as usize,
        ));

        let mut stores: BTreeMap<Corpus, Arc<dyn VectorStore>> = BTreeMap::new();
        for corpus in Corpus::ALL {
            let store = SqliteVectorStore::open(&settings.corpus_db_path(corpus))?;
            stores.insert(corpus, Arc::new(store));
        }

        let retriever = CorpusRetriever::new(stores, embedder);
        let synthesizer = Synthesizer::new(&settings.answer.model, prompts);

        Ok(Self::new(retriever, synthesizer))
    }

    /// The synthesizer, exposed for hyperparameter logging.
    pub fn synthesizer(&self) -> &Synthesizer {
        &self.synthesizer
    }

    /// Dispatch a query to the pipeline for the requested mode.
    ///
    /// Only `ResponseMode::InDepth` is routable; any other mode fails
    /// immediately, naming the supported value.
    #[instrument(skip(self), fields(query = %query, mode = %mode))]
    pub async fn answer(
        &self,
        query: &str,
        mode: ResponseMode,
        k: usize,
    ) -> Result<AnswerOutcome> {
        match mode {
            ResponseMode::InDepth => self.answer_in_depth(query, k).await,
            other => Err(GavelError::UnsupportedMode {
                expected: CARD_TYPE_IN_DEPTH.to_string(),
                received: other.tag().to_string(),
            }),
        }
    }

    /// The in-depth pipeline: fan out retrieval, combine, synthesize once,
    /// assemble the cited card.
    async fn answer_in_depth(&self, query: &str, k: usize) -> Result<AnswerOutcome> {
        let retrieved = self.retriever.retrieve(query, k).await?;
        let combined = combine_documents(retrieved);

        let raw = self.synthesizer.synthesize(query, &combined.text).await?;
        let card = assemble_card(&raw, &combined.documents);

        Ok(AnswerOutcome {
            card,
            context: combined.text,
        })
    }
}
