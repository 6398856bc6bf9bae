//! Append-only registry of evaluation runs.
//!
//! Hyperparameters are recorded once per run so results can be compared
//! across prompt and model changes. The registry is write-only; nothing in
//! the pipeline reads it back.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Hyperparameters of one evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub recorded_at: DateTime<Utc>,
    /// Chat model that produced the answers.
    pub model: String,
    /// The full in-depth prompt template in use.
    pub prompt_template: String,
    /// Documents retrieved per corpus.
    pub k: usize,
}

/// JSONL-backed run registry.
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    /// Create a registry handle for the given file.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append one record.
    pub fn record(&self, record: &RunRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let line = serde_json::to_string(record)?;
        writeln!(file, "{}", line)?;

        info!("Logged run hyperparameters to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_append() {
        let dir = tempfile::tempdir().unwrap();
        let log = RunLog::new(dir.path().join("runs").join("eval_runs.jsonl"));

        let record = RunRecord {
            recorded_at: Utc::now(),
            model: "gpt-4-1106-preview".to_string(),
            prompt_template: "### Response Guidelines...".to_string(),
            k: 5,
        };

        log.record(&record).unwrap();
        log.record(&record).unwrap();

        let content = std::fs::read_to_string(dir.path().join("runs").join("eval_runs.jsonl")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: RunRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed.k, 5);
        assert_eq!(parsed.model, "gpt-4-1106-preview");
    }
}
