use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, Part};
use crate::ai::{ModelFallback, PromptSynthesizer};
use crate::models::{ApiKey, CulturalContextRequest};
use crate::{prompts, Error, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Turns a cultural context into an image-generation prompt, walking an
/// ordered list of Gemini models until one answers.
pub struct GeminiPromptClient {
    http: GeminiHttpClient,
    fallback: ModelFallback,
}

impl GeminiPromptClient {
    pub fn new(fallback: ModelFallback, timeout: Option<Duration>) -> Self {
        Self::new_with_client(fallback, timeout, reqwest::Client::new())
    }

    pub fn new_with_client(
        fallback: ModelFallback,
        timeout: Option<Duration>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(timeout, client),
            fallback,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    pub fn models(&self) -> &[String] {
        self.fallback.models()
    }

    async fn generate_with_model(
        &self,
        model: &str,
        api_key: &ApiKey,
        request: &GenerateContentRequest,
    ) -> Result<String> {
        let response: GenerateContentResponse =
            self.http.generate_content(model, api_key, request).await?;

        response
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| Error::AiProvider("No text in Gemini response".to_string()))
    }
}

#[async_trait]
impl PromptSynthesizer for GeminiPromptClient {
    async fn synthesize_prompt(
        &self,
        request: &CulturalContextRequest,
        api_key: &ApiKey,
    ) -> Result<String> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompts::cultural_portrait(request)),
                }],
            }],
        };

        self.fallback
            .run(|model| {
                let model = model.to_string();
                let body = &body;
                async move { self.generate_with_model(&model, api_key, body).await }
            })
            .await
    }
}
