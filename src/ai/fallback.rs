//! Ordered model fallback: try each candidate until one succeeds.

use crate::error::ModelAttempt;
use crate::{Error, Result};
use std::future::Future;

#[derive(Debug, Clone)]
pub struct ModelFallback {
    models: Vec<String>,
}

impl ModelFallback {
    pub fn new(models: Vec<String>) -> Result<Self> {
        let models: Vec<String> = models
            .into_iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();

        if models.is_empty() {
            return Err(Error::Config(
                "at least one candidate model is required".to_string(),
            ));
        }
        Ok(Self { models })
    }

    pub fn single(model: impl Into<String>) -> Result<Self> {
        Self::new(vec![model.into()])
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    fn failure_suffix(&self, index: usize) -> &'static str {
        if index + 1 < self.models.len() {
            ". Trying next candidate..."
        } else {
            ""
        }
    }

    /// Run `attempt` against each model in order and return the first success.
    ///
    /// With a single candidate its error is returned as-is. With several, the
    /// exhausted list becomes [`Error::AllModelsUnavailable`].
    pub async fn run<T, F, Fut>(&self, mut attempt: F) -> Result<T>
    where
        F: FnMut(&str) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempts = Vec::with_capacity(self.models.len());
        let mut last_error = None;

        for (index, model) in self.models.iter().enumerate() {
            match attempt(model.as_str()).await {
                Ok(value) => {
                    if !attempts.is_empty() {
                        tracing::info!(
                            "Model {} succeeded after {} failed attempt(s)",
                            model,
                            attempts.len()
                        );
                    }
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!("Model {} failed: {}{}", model, e, self.failure_suffix(index));
                    attempts.push(ModelAttempt {
                        model: model.clone(),
                        reason: e.to_string(),
                    });
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if self.models.len() == 1 => Err(e),
            _ => {
                tracing::error!("All {} candidate models failed", attempts.len());
                Err(Error::AllModelsUnavailable { attempts })
            }
        }
    }
}
