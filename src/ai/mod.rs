//! AI service integration for prompt and image synthesis
//!
//! Provides interfaces to Gemini's `generateContent` API for turning a
//! cultural context into an image prompt, and to the Hugging Face Inference
//! API for turning that prompt into a picture. Keys are passed into every
//! call; clients hold no credentials.

pub mod fallback;
pub mod gemini;
pub mod huggingface;
pub mod mime;
pub mod mock;

pub use fallback::ModelFallback;
pub use gemini::GeminiPromptClient;
pub use huggingface::HuggingFaceImageClient;
pub use mock::{MockImageClient, MockPromptClient};

use crate::models::{ApiKey, CulturalContextRequest, GeneratedImage};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait PromptSynthesizer: Send + Sync {
    async fn synthesize_prompt(
        &self,
        request: &CulturalContextRequest,
        api_key: &ApiKey,
    ) -> Result<String>;
}

#[async_trait]
pub trait ImageSynthesizer: Send + Sync {
    async fn synthesize_image(&self, prompt: &str, api_key: &ApiKey) -> Result<GeneratedImage>;
}
