//! Ask command implementation.

use crate::answer::{transform_query_for_date, AnswerEngine, ResponseMode};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    mode: &str,
    k: Option<usize>,
    dated: bool,
    json: bool,
    settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Ask) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let mode: ResponseMode = mode.parse()?;
    let k = k.unwrap_or(settings.answer.k_per_corpus);

    let question = if dated {
        transform_query_for_date(question)
    } else {
        question.to_string()
    };

    let engine = AnswerEngine::from_settings(&settings)?;

    let spinner = Output::spinner("Searching council records...");

    match engine.answer(&question, mode, k).await {
        Ok(outcome) => {
            spinner.finish_and_clear();

            if json {
                println!("{}", outcome.card.to_json()?);
                return Ok(());
            }

            for section in &outcome.card.responses {
                println!("\n{}", section.response);
            }

            if !outcome.card.citations.is_empty() {
                Output::header("Citations");
                for citation in &outcome.card.citations {
                    Output::citation(citation);
                }
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
