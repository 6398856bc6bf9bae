//! Evaluate command implementation.

use crate::answer::AnswerEngine;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::error::GavelError;
use crate::eval::{self, Evaluator, Judge, RunLog, RunRecord};
use anyhow::Result;
use chrono::Utc;
use std::path::Path;

/// Run the evaluate command.
pub async fn run_evaluate(file: &Path, k: Option<usize>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Evaluate) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let queries = eval::load_queries(file)?;
    if queries.is_empty() {
        Output::warning("No queries found in input file.");
        return Ok(());
    }

    let k = k.unwrap_or(settings.eval.k_per_corpus);

    let engine = AnswerEngine::from_settings(&settings)?;
    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;
    let judge = Judge::new(&settings.eval.judge_model, prompts);
    let evaluator = Evaluator::new(engine, judge, k);

    // Hyperparameters are logged once per run for cross-run comparison.
    let run_log = RunLog::new(settings.eval_runs_path());
    run_log.record(&RunRecord {
        recorded_at: Utc::now(),
        model: evaluator.engine().synthesizer().model().to_string(),
        prompt_template: evaluator.engine().synthesizer().template().to_string(),
        k,
    })?;

    Output::info(&format!(
        "Running {} queries (k={} per corpus, judge: {})",
        queries.len(),
        k,
        settings.eval.judge_model
    ));

    let reports = evaluator.run(&queries).await?;

    let mut failed = 0;
    for report in &reports {
        Output::header(&report.input);
        for metric in &report.metrics {
            Output::metric(
                &metric.name,
                metric.score,
                metric.threshold,
                metric.passed,
                &metric.reason,
            );
        }
        if !report.passed {
            failed += 1;
        }
    }

    println!();
    if failed == 0 {
        Output::success(&format!("All {} test cases passed.", reports.len()));
        Ok(())
    } else {
        Output::error(&format!("{} of {} test cases failed.", failed, reports.len()));
        Err(GavelError::Evaluation(format!(
            "{} of {} test cases failed",
            failed,
            reports.len()
        ))
        .into())
    }
}
