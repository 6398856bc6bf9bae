//! Evaluation harness for the answer pipeline.
//!
//! Runs queries from a tab-separated file through the same pipeline users
//! hit, then scores every answer against the metric battery with an LLM
//! judge. Records are either a bare query or `query<TAB>expected_output`;
//! queries without an expected output still run the full battery, with the
//! empty string passed through to metrics that want one.

mod metrics;
mod runlog;

pub use metrics::{Judge, JudgeScore, Metric, PassDirection, BATTERY};
pub use runlog::{RunLog, RunRecord};

use crate::answer::{AnswerEngine, ResponseMode};
use crate::error::{GavelError, Result};
use std::path::Path;
use tracing::{info, instrument, warn};

/// One labeled example run through the pipeline.
#[derive(Debug, Clone)]
pub struct TestCase {
    /// The query.
    pub input: String,
    /// All answer paragraphs joined into one string.
    pub actual_output: String,
    /// The expected answer; empty when none was supplied.
    pub expected_output: String,
    /// The combined document text the model saw.
    pub retrieval_context: String,
}

/// One record of the evaluation query file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalQuery {
    pub query: String,
    pub expected_output: String,
}

/// Load evaluation queries from a tab-separated file.
///
/// The header row is skipped. A missing file is a fatal input error that
/// names the path.
pub fn load_queries(path: &Path) -> Result<Vec<EvalQuery>> {
    if !path.exists() {
        return Err(GavelError::InvalidInput(format!(
            "Query file not found: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)?;

    let mut queries = Vec::new();
    for line in content.lines().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.splitn(2, '\t');
        let query = parts.next().unwrap_or_default().to_string();
        let expected_output = parts.next().unwrap_or("").to_string();
        queries.push(EvalQuery {
            query,
            expected_output,
        });
    }

    Ok(queries)
}

/// Result of scoring one metric on one test case.
#[derive(Debug, Clone)]
pub struct MetricResult {
    pub name: String,
    pub score: f64,
    pub threshold: f64,
    pub passed: bool,
    pub reason: String,
}

/// Scored results for one test case.
#[derive(Debug, Clone)]
pub struct CaseReport {
    pub input: String,
    pub metrics: Vec<MetricResult>,
    pub passed: bool,
}

/// Drives evaluation runs: answers each query, then scores it.
pub struct Evaluator {
    engine: AnswerEngine,
    judge: Judge,
    k: usize,
}

impl Evaluator {
    /// Create an evaluator around an engine and a judge.
    pub fn new(engine: AnswerEngine, judge: Judge, k: usize) -> Self {
        Self { engine, judge, k }
    }

    /// The documents-per-corpus setting used for every query in the run.
    pub fn k(&self) -> usize {
        self.k
    }

    /// The engine under evaluation.
    pub fn engine(&self) -> &AnswerEngine {
        &self.engine
    }

    /// Run every query through the pipeline and score it.
    ///
    /// Queries run sequentially; a metric failure (or a judge error) fails
    /// that case only. A pipeline failure, by contrast, aborts the whole
    /// run, since every later case would hit the same broken dependency.
    #[instrument(skip(self, queries), fields(count = queries.len()))]
    pub async fn run(&self, queries: &[EvalQuery]) -> Result<Vec<CaseReport>> {
        let mut reports = Vec::with_capacity(queries.len());

        for (i, query) in queries.iter().enumerate() {
            info!("Evaluating query {}/{}: {}", i + 1, queries.len(), query.query);

            let case = self.build_test_case(query).await?;
            reports.push(self.score_case(&case).await);
        }

        Ok(reports)
    }

    /// Answer one query and package the result for scoring.
    pub async fn build_test_case(&self, query: &EvalQuery) -> Result<TestCase> {
        let outcome = self
            .engine
            .answer(&query.query, ResponseMode::InDepth, self.k)
            .await?;

        Ok(TestCase {
            input: query.query.clone(),
            actual_output: outcome.card.joined_responses(),
            expected_output: query.expected_output.clone(),
            retrieval_context: outcome.context,
        })
    }

    /// Score one test case against the whole battery.
    ///
    /// Judge errors mark the affected metric as failed instead of
    /// propagating, keeping test cases isolated from each other.
    pub async fn score_case(&self, case: &TestCase) -> CaseReport {
        let mut results = Vec::with_capacity(BATTERY.len());

        for metric in &BATTERY {
            let result = match self.judge.score(metric, case).await {
                Ok(verdict) => MetricResult {
                    name: metric.name.to_string(),
                    score: verdict.score,
                    threshold: metric.threshold,
                    passed: metric.passes(verdict.score),
                    reason: verdict.reason,
                },
                Err(e) => {
                    warn!("Judge failed on {}: {}", metric.name, e);
                    MetricResult {
                        name: metric.name.to_string(),
                        score: 0.0,
                        threshold: metric.threshold,
                        passed: false,
                        reason: format!("judge call failed: {}", e),
                    }
                }
            };
            results.push(result);
        }

        CaseReport {
            input: case.input.clone(),
            passed: results.iter().all(|r| r.passed),
            metrics: results,
        }
    }
}
