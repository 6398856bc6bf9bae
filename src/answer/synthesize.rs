//! Answer synthesis via a single chat completion.

use crate::config::Prompts;
use crate::error::{GavelError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Renders the in-depth prompt and invokes the chat model once.
///
/// The raw completion text is returned untouched; the assembler downstream
/// assumes the requested paragraph formatting without verifying it.
pub struct Synthesizer {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    prompts: Prompts,
}

impl Synthesizer {
    /// Create a new synthesizer for the given chat model.
    pub fn new(model: &str, prompts: Prompts) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
            prompts,
        }
    }

    /// The chat model in use.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The raw in-depth prompt template (logged with evaluation runs).
    pub fn template(&self) -> &str {
        &self.prompts.answer.indepth
    }

    /// Generate the raw in-depth answer text for a query over the combined
    /// document block. One request, no retry, no streaming.
    #[instrument(skip(self, docs_text), fields(query = %query))]
    pub async fn synthesize(&self, query: &str, docs_text: &str) -> Result<String> {
        info!("Performing in-depth answer query");

        let mut vars = HashMap::new();
        vars.insert("question".to_string(), query.to_string());
        vars.insert("docs".to_string(), docs_text.to_string());

        let prompt = self
            .prompts
            .render_with_custom(&self.prompts.answer.indepth, &vars);

        let messages: Vec<ChatCompletionRequestMessage> =
            vec![ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| GavelError::Synthesis(e.to_string()))?
                .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .build()
            .map_err(|e| GavelError::Synthesis(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| GavelError::OpenAI(format!("Failed to generate response: {}", e)))?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| GavelError::Synthesis("Empty response from model".to_string()))?
            .clone();

        debug!("Model returned {} characters", answer.len());
        Ok(answer)
    }
}

/// Append a note steering the model to sort documents by publish date.
///
/// Used for queries about a specific time period; the note rides along
/// inside the `{{question}}` slot of the prompt.
pub fn transform_query_for_date(query: &str) -> String {
    format!(
        "{}(SYSTEM NOTE: this query related to a specific time period, therefore, \
         you should sort the documents by the publish dates to best answer the query)",
        query
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_query_for_date_appends_note() {
        let transformed = transform_query_for_date("What changed in March?");
        assert!(transformed.starts_with("What changed in March?"));
        assert!(transformed.contains("sort the documents by the publish dates"));
    }

    #[test]
    fn test_synthesizer_exposes_hyperparameters() {
        let synth = Synthesizer::new("gpt-4-1106-preview", Prompts::default());
        assert_eq!(synth.model(), "gpt-4-1106-preview");
        assert!(synth.template().contains("{{docs}}"));
    }
}
