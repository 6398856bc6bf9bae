//! Configuration settings for Gavel.

use crate::corpus::Corpus;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub embedding: EmbeddingSettings,
    pub corpora: CorporaSettings,
    pub answer: AnswerSettings,
    pub server: ServerSettings,
    pub eval: EvalSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.gavel".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding provider (openai).
    pub provider: String,
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
        }
    }
}

/// Corpus storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorporaSettings {
    /// Directory holding one SQLite database per corpus.
    pub dir: String,
}

impl Default for CorporaSettings {
    fn default() -> Self {
        Self {
            dir: "~/.gavel/corpora".to_string(),
        }
    }
}

/// Answer generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerSettings {
    /// Chat model used to synthesize answers.
    pub model: String,
    /// Documents retrieved per corpus for each query.
    pub k_per_corpus: usize,
}

impl Default for AnswerSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4-1106-preview".to_string(),
            k_per_corpus: 5,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Evaluation harness settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalSettings {
    /// Model used to judge responses against the metric battery.
    pub judge_model: String,
    /// Documents retrieved per corpus during evaluation runs.
    pub k_per_corpus: usize,
    /// File the hyperparameters of each run are appended to,
    /// relative to the data directory.
    pub runs_file: String,
}

impl Default for EvalSettings {
    fn default() -> Self {
        Self {
            judge_model: "gpt-3.5-turbo-1106".to_string(),
            k_per_corpus: 5,
            runs_file: "eval_runs.jsonl".to_string(),
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::GavelError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gavel")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded corpora directory path.
    pub fn corpora_dir(&self) -> PathBuf {
        Self::expand_path(&self.corpora.dir)
    }

    /// Path of the SQLite database backing a corpus.
    pub fn corpus_db_path(&self, corpus: Corpus) -> PathBuf {
        self.corpora_dir().join(corpus.db_file())
    }

    /// Path of the evaluation run registry.
    pub fn eval_runs_path(&self) -> PathBuf {
        self.data_dir().join(&self.eval.runs_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.answer.k_per_corpus, 5);
        assert_eq!(settings.eval.judge_model, "gpt-3.5-turbo-1106");
    }

    #[test]
    fn test_corpus_db_paths_are_distinct() {
        let settings = Settings::default();
        let minutes = settings.corpus_db_path(Corpus::Minutes);
        let news = settings.corpus_db_path(Corpus::News);
        assert_ne!(minutes, news);
        assert!(minutes.ends_with("minutes.db"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [answer]
            model = "gpt-4o"
            "#,
        )
        .unwrap();
        assert_eq!(settings.answer.model, "gpt-4o");
        assert_eq!(settings.answer.k_per_corpus, 5);
        assert_eq!(settings.embedding.dimensions, 1536);
    }
}
