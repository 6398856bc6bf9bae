//! Prompt templates for Gavel.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub answer: AnswerPrompts,
    pub eval: EvalPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompts for answer synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerPrompts {
    /// Template for in-depth answers. Rendered with {{question}} and {{docs}}.
    pub indepth: String,
}

impl Default for AnswerPrompts {
    fn default() -> Self {
        Self {
            indepth: r#"### Response Guidelines
Your primary task is to answer the specific question: '{{question}}'. Extract and include information from the New Orleans city council documents provided that is directly relevant to this question. Refrain from including any additional analysis, context, or details that do not contribute to a concise and direct answer to the question.

### Additional Guidelines
Follow the guidelines below if they assist in providing a more clear answer to {{question}}
If relevant, extract the key points, decisions, and actions discussed during the city council meetings relevant to {{question}};
highlight any immediate shortcomings, mistakes, or negative actions by the city council relevant to {{question}};
elaborate on the implications and broader societal or community impacts of the identified issues relevant to {{question}};
investigate any underlying biases or assumptions present in the city council's discourse or actions relevant to {{question}}.
If not relevant to the question, answer the question without expanding on these points.

### Relevance Evaluation
When analyzing documents, critically assess whether each piece of information improves the response's relevance and accuracy. Include information only if it directly answers or is essential to understanding the context of the question. Disregard information that is tangential or unrelated.

### Bias Guidelines
Be mindful of biases in the document corpus. Prioritize and analyze documents that are most likely to contain direct and relevant information to the question. Avoid including details from documents that do not substantively contribute to a focused and accurate response.

### Additional Instructions
If your response includes technical or uncommon terms related to city council that may not be widely understood, provide a brief definition for those terms at the end of your response. Ensure each definition is on a new line, formatted as follows:

Definitions:

Word: Definition
Word: Definition
Word: Definition

The final output should be in paragraph form without any formatting, such as prefixing your points with "a.", "b.", or "c.", "-", or "1."
The final output should not include any reference to the model's active sorting by date.
The final output should not include any reference to the publish date. For example, all references to "(published on mm/dd/yyyy)" should be omitted.

### Documents to Analyze
{{docs}}"#
                .to_string(),
        }
    }
}

/// Prompts for the evaluation judge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalPrompts {
    /// Template for scoring one metric on one test case. Rendered with
    /// {{metric}}, {{criteria}}, {{question}}, {{actual_output}},
    /// {{expected_output}}, and {{retrieval_context}}.
    pub judge: String,
}

impl Default for EvalPrompts {
    fn default() -> Self {
        Self {
            judge: r#"You are an evaluation judge for a question answering system over New Orleans city council records. Score one metric for one test case.

Metric: {{metric}}
Criteria: {{criteria}}

Question:
{{question}}

Actual output:
{{actual_output}}

Expected output (may be empty when none was provided):
{{expected_output}}

Retrieval context:
{{retrieval_context}}

Score the test case against the criteria on a scale from 0.0 to 1.0. Base the score only on the material above. Respond with a single JSON object and nothing else:

{"score": <float between 0.0 and 1.0>, "reason": "<one sentence>"}"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            // Load answer prompts if file exists
            let answer_path = custom_path.join("answer.toml");
            if answer_path.exists() {
                let content = std::fs::read_to_string(&answer_path)?;
                prompts.answer = toml::from_str(&content)?;
            }

            // Load eval prompts if file exists
            let eval_path = custom_path.join("eval.toml");
            if eval_path.exists() {
                let content = std::fs::read_to_string(&eval_path)?;
                prompts.eval = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.answer.indepth.contains("{{question}}"));
        assert!(prompts.answer.indepth.contains("{{docs}}"));
        assert!(prompts.eval.judge.contains("{{criteria}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = std::collections::HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_provided_vars_override_custom() {
        let mut prompts = Prompts::default();
        prompts
            .variables
            .insert("city".to_string(), "Baton Rouge".to_string());

        let mut vars = std::collections::HashMap::new();
        vars.insert("city".to_string(), "New Orleans".to_string());

        let result = prompts.render_with_custom("Council of {{city}}", &vars);
        assert_eq!(result, "Council of New Orleans");
    }
}
