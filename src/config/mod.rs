//! Configuration module for Gavel.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AnswerPrompts, EvalPrompts, Prompts};
pub use settings::{
    AnswerSettings, CorporaSettings, EmbeddingSettings, EvalSettings, GeneralSettings,
    PromptSettings, ServerSettings, Settings,
};
