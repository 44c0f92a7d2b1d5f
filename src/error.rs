//! Error handling and custom error types
//!
//! Provides unified error handling across the studio using thiserror.

use std::fmt;
use thiserror::Error;

/// One failed attempt against a candidate text-generation model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelAttempt {
    pub model: String,
    pub reason: String,
}

impl fmt::Display for ModelAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.model, self.reason)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI provider error: {0}")]
    AiProvider(String),

    #[error("Image service error (status {status}): {body}")]
    ImageService { status: u16, body: String },

    #[error(
        "ERROR: All AI models are busy or unavailable. Please check your API key. (tried {})",
        format_attempts(.attempts)
    )]
    AllModelsUnavailable { attempts: Vec<ModelAttempt> },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

fn format_attempts(attempts: &[ModelAttempt]) -> String {
    attempts
        .iter()
        .map(|a| a.model.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, Error>;
