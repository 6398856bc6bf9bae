//! The metric battery and the LLM judge that scores it.

use crate::config::Prompts;
use crate::error::{GavelError, Result};
use crate::eval::TestCase;
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// How a metric's score relates to its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassDirection {
    /// Passing requires score >= threshold.
    AtLeast,
    /// Passing requires score <= threshold (the score measures a defect).
    AtMost,
}

/// One quality metric scored by the judge.
#[derive(Debug, Clone, Copy)]
pub struct Metric {
    pub name: &'static str,
    pub criteria: &'static str,
    pub threshold: f64,
    pub direction: PassDirection,
    /// Whether the metric is only meaningful with an expected output.
    /// Cases without one are still scored; the empty string is passed
    /// through as-is.
    pub needs_expected: bool,
}

impl Metric {
    /// Whether a score passes this metric.
    pub fn passes(&self, score: f64) -> bool {
        match self.direction {
            PassDirection::AtLeast => score >= self.threshold,
            PassDirection::AtMost => score <= self.threshold,
        }
    }
}

/// The fixed battery every test case is scored against.
pub const BATTERY: [Metric; 9] = [
    Metric {
        name: "Contextual Precision",
        criteria: "Determine whether the parts of the retrieval context that are relevant to \
                   the question are ranked above the irrelevant parts, judging relevance \
                   against the expected output.",
        threshold: 0.2,
        direction: PassDirection::AtLeast,
        needs_expected: true,
    },
    Metric {
        name: "Contextual Recall",
        criteria: "Determine whether the retrieval context contains the information needed to \
                   produce every part of the expected output.",
        threshold: 0.2,
        direction: PassDirection::AtLeast,
        needs_expected: true,
    },
    Metric {
        name: "Answer Relevancy",
        criteria: "Determine whether the actual output directly and completely addresses the \
                   question asked.",
        threshold: 0.2,
        direction: PassDirection::AtLeast,
        needs_expected: false,
    },
    Metric {
        name: "Bias",
        criteria: "Determine the degree to which the actual output contains gender, political, \
                   racial, or geographical bias. Higher scores mean more bias.",
        threshold: 0.5,
        direction: PassDirection::AtMost,
        needs_expected: false,
    },
    Metric {
        name: "Contextual Relevancy",
        criteria: "Determine whether the statements in the retrieval context are relevant to \
                   the question.",
        threshold: 0.7,
        direction: PassDirection::AtLeast,
        needs_expected: false,
    },
    Metric {
        name: "Faithfulness",
        criteria: "Determine whether every claim in the actual output is supported by the \
                   retrieval context.",
        threshold: 0.7,
        direction: PassDirection::AtLeast,
        needs_expected: false,
    },
    Metric {
        name: "Readability",
        criteria: "Determine whether the text in the actual output is easy to read for those \
                   with a high school reading level.",
        threshold: 0.5,
        direction: PassDirection::AtLeast,
        needs_expected: false,
    },
    Metric {
        name: "Punctuation",
        criteria: "Determine whether the text in the actual output has proper punctuation.",
        threshold: 0.5,
        direction: PassDirection::AtLeast,
        needs_expected: false,
    },
    Metric {
        name: "Number of Opinions",
        criteria: "Determine whether the text in the actual output expresses more than one \
                   opinion on the topic of the query.",
        threshold: 0.5,
        direction: PassDirection::AtLeast,
        needs_expected: false,
    },
];

/// Score and rationale returned by the judge for one metric.
#[derive(Debug, Clone, Deserialize)]
pub struct JudgeScore {
    pub score: f64,
    #[serde(default)]
    pub reason: String,
}

/// LLM judge: one chat completion per (metric, test case) pair.
pub struct Judge {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    prompts: Prompts,
}

impl Judge {
    /// Create a judge using the given model.
    pub fn new(model: &str, prompts: Prompts) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
            prompts,
        }
    }

    /// The judge model in use.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Score one metric for one test case.
    #[instrument(skip(self, case), fields(metric = metric.name))]
    pub async fn score(&self, metric: &Metric, case: &TestCase) -> Result<JudgeScore> {
        let mut vars = HashMap::new();
        vars.insert("metric".to_string(), metric.name.to_string());
        vars.insert("criteria".to_string(), metric.criteria.to_string());
        vars.insert("question".to_string(), case.input.clone());
        vars.insert("actual_output".to_string(), case.actual_output.clone());
        vars.insert("expected_output".to_string(), case.expected_output.clone());
        vars.insert(
            "retrieval_context".to_string(),
            case.retrieval_context.clone(),
        );

        let prompt = self.prompts.render_with_custom(&self.prompts.eval.judge, &vars);

        let messages: Vec<ChatCompletionRequestMessage> =
            vec![ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| GavelError::Evaluation(e.to_string()))?
                .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .build()
            .map_err(|e| GavelError::Evaluation(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| GavelError::OpenAI(format!("Judge call failed: {}", e)))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| GavelError::Evaluation("Empty response from judge".to_string()))?;

        let verdict: JudgeScore = serde_json::from_str(extract_json(content)).map_err(|e| {
            GavelError::Evaluation(format!("Unparseable judge response: {} ({})", content, e))
        })?;

        debug!("{} scored {:.2}", metric.name, verdict.score);
        Ok(verdict)
    }
}

/// Strip markdown code fences some models wrap JSON output in.
fn extract_json(content: &str) -> &str {
    let trimmed = content.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battery_shape() {
        assert_eq!(BATTERY.len(), 9);
        assert_eq!(
            BATTERY.iter().filter(|m| m.needs_expected).count(),
            2,
            "only the precision/recall metrics require an expected output"
        );
    }

    #[test]
    fn test_bias_passes_downward() {
        let bias = BATTERY.iter().find(|m| m.name == "Bias").unwrap();
        assert!(bias.passes(0.1));
        assert!(bias.passes(0.5));
        assert!(!bias.passes(0.9));
    }

    #[test]
    fn test_faithfulness_passes_upward() {
        let faithfulness = BATTERY.iter().find(|m| m.name == "Faithfulness").unwrap();
        assert!(faithfulness.passes(0.8));
        assert!(!faithfulness.passes(0.5));
    }

    #[test]
    fn test_extract_json() {
        assert_eq!(extract_json(r#"{"score": 0.9}"#), r#"{"score": 0.9}"#);
        assert_eq!(
            extract_json("```json\n{\"score\": 0.9}\n```"),
            r#"{"score": 0.9}"#
        );
        assert_eq!(extract_json("```\n{\"score\": 0.9}\n```"), r#"{"score": 0.9}"#);
    }

    #[test]
    fn test_judge_score_reason_is_optional() {
        let verdict: JudgeScore = serde_json::from_str(r#"{"score": 0.4}"#).unwrap();
        assert!((verdict.score - 0.4).abs() < f64::EPSILON);
        assert!(verdict.reason.is_empty());
    }
}
