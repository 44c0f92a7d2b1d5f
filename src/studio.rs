//! Orchestration of one "generate photo" action: cultural context in,
//! synthesized prompt and picture out.

use crate::ai::{
    GeminiPromptClient, HuggingFaceImageClient, ImageSynthesizer, ModelFallback,
    PromptSynthesizer,
};
use crate::models::{Config, Credentials, CulturalContextRequest, GeneratedImage};
use crate::Result;
use tracing::{error, info, warn};

/// Result of a single action, ready to be rendered by a front end.
#[derive(Debug)]
pub enum StudioOutcome {
    /// A key was missing; nothing was sent anywhere.
    MissingCredentials { missing: Vec<&'static str> },
    /// The text service failed; no image was requested.
    PromptFailed { message: String },
    /// A prompt was obtained but the image service failed.
    ImageFailed { prompt: String, message: String },
    Rendered {
        prompt: String,
        image: GeneratedImage,
        caption: String,
    },
}

impl StudioOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StudioOutcome::Rendered { .. })
    }

    pub fn prompt(&self) -> Option<&str> {
        match self {
            StudioOutcome::ImageFailed { prompt, .. } | StudioOutcome::Rendered { prompt, .. } => {
                Some(prompt)
            }
            _ => None,
        }
    }

    /// The status, warning or error line shown to the user.
    pub fn status_message(&self) -> String {
        match self {
            StudioOutcome::MissingCredentials { missing } => {
                format!("Please enter your API keys! Missing: {}", missing.join(", "))
            }
            StudioOutcome::PromptFailed { message } => message.clone(),
            StudioOutcome::ImageFailed { message, .. } => {
                format!("Image generation failed: {}", message)
            }
            StudioOutcome::Rendered { caption, .. } => format!("Photo ready: {}", caption),
        }
    }
}

/// Injectable service bundle used to construct [`Studio`] in tests/harnesses.
pub struct StudioServices {
    pub prompt: Box<dyn PromptSynthesizer>,
    pub image: Box<dyn ImageSynthesizer>,
}

/// Runs the linear prompt-then-image flow. Holds no per-session state, so one
/// instance can serve concurrent sessions with different credentials.
pub struct Studio {
    prompt: Box<dyn PromptSynthesizer>,
    image: Box<dyn ImageSynthesizer>,
}

impl Studio {
    pub fn with_services(services: StudioServices) -> Self {
        Self {
            prompt: services.prompt,
            image: services.image,
        }
    }

    /// Build the live Gemini + Hugging Face studio from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        // Reuse one HTTP connection pool across both clients.
        let http_client = reqwest::Client::new();

        let fallback = ModelFallback::new(config.gemini_models.clone())?;
        info!(
            "Prompt provider: Gemini (models: {})",
            fallback.models().join(", ")
        );
        let prompt = GeminiPromptClient::new_with_client(
            fallback,
            config.prompt_timeout,
            http_client.clone(),
        )
        .with_base_url(config.gemini_base_url.clone());

        info!("Image provider: Hugging Face ({})", config.hf_image_url);
        let image = HuggingFaceImageClient::new_with_client(
            config.hf_image_url.clone(),
            config.image_timeout,
            http_client,
        );

        Ok(Self::with_services(StudioServices {
            prompt: Box::new(prompt),
            image: Box::new(image),
        }))
    }

    /// `Ok(None)` when the Gemini key is absent: not configured, not a failure.
    pub async fn synthesize_prompt(
        &self,
        request: &CulturalContextRequest,
        credentials: &Credentials,
    ) -> Result<Option<String>> {
        let Some(api_key) = credentials.gemini.as_ref() else {
            return Ok(None);
        };

        info!(
            "Consulting cultural expert for {} in {}",
            request.occasion(),
            request.country()
        );
        self.prompt
            .synthesize_prompt(request, api_key)
            .await
            .map(Some)
    }

    /// `Ok(None)` when the Hugging Face token is absent.
    pub async fn synthesize_image(
        &self,
        prompt: &str,
        credentials: &Credentials,
    ) -> Result<Option<GeneratedImage>> {
        let Some(api_key) = credentials.huggingface.as_ref() else {
            return Ok(None);
        };

        info!("Developing photo...");
        self.image.synthesize_image(prompt, api_key).await.map(Some)
    }

    /// The single trigger action.
    pub async fn generate(
        &self,
        request: &CulturalContextRequest,
        credentials: &Credentials,
    ) -> StudioOutcome {
        let missing = credentials.missing();
        if !missing.is_empty() {
            warn!("Missing credentials: {}", missing.join(", "));
            return StudioOutcome::MissingCredentials { missing };
        }

        let prompt = match self.synthesize_prompt(request, credentials).await {
            Ok(Some(prompt)) => prompt,
            Ok(None) => {
                return StudioOutcome::MissingCredentials {
                    missing: credentials.missing(),
                }
            }
            Err(e) => {
                error!("Prompt synthesis failed: {}", e);
                return StudioOutcome::PromptFailed {
                    message: e.to_string(),
                };
            }
        };
        info!("Context found! Generating image...");

        match self.synthesize_image(&prompt, credentials).await {
            Ok(Some(image)) => {
                info!(
                    "Received {} bytes of {}",
                    image.data.len(),
                    image.mime_type
                );
                StudioOutcome::Rendered {
                    prompt,
                    image,
                    caption: request.caption(),
                }
            }
            Ok(None) => StudioOutcome::MissingCredentials {
                missing: credentials.missing(),
            },
            Err(e) => {
                error!("Image synthesis failed: {}", e);
                StudioOutcome::ImageFailed {
                    prompt,
                    message: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{MockImageClient, MockPromptClient};
    use crate::models::Gender;
    use pretty_assertions::assert_eq;

    fn request() -> CulturalContextRequest {
        CulturalContextRequest::new("Japan", "Wedding", 25, Gender::Male, "").unwrap()
    }

    fn keys() -> Credentials {
        Credentials::new(Some("gemini-key".to_string()), Some("hf-key".to_string()))
    }

    fn build(prompt: MockPromptClient, image: MockImageClient) -> Studio {
        Studio::with_services(StudioServices {
            prompt: Box::new(prompt),
            image: Box::new(image),
        })
    }

    #[tokio::test]
    async fn test_generate_renders_prompt_and_image() {
        let prompt = MockPromptClient::new()
            .with_prompt_response("Groom in montsuki at a Shinto shrine".to_string());
        let image = MockImageClient::new().with_image_response(vec![0xFF, 0xD8, 0xFF, 0xE0]);
        let image_probe = image.clone();

        let outcome = build(prompt, image).generate(&request(), &keys()).await;

        match outcome {
            StudioOutcome::Rendered {
                prompt,
                image,
                caption,
            } => {
                assert_eq!(prompt, "Groom in montsuki at a Shinto shrine");
                assert_eq!(image.mime_type, "image/jpeg");
                assert_eq!(caption, "Wedding in Japan");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(
            image_probe.received_prompts(),
            vec!["Groom in montsuki at a Shinto shrine"]
        );
    }

    #[test]
    fn test_missing_keys_make_no_calls() {
        let prompt = MockPromptClient::new();
        let image = MockImageClient::new();
        let (prompt_probe, image_probe) = (prompt.clone(), image.clone());
        let studio = build(prompt, image);

        let outcome = tokio_test::block_on(studio.generate(&request(), &Credentials::default()));

        assert!(matches!(
            outcome,
            StudioOutcome::MissingCredentials { ref missing } if missing.len() == 2
        ));
        assert!(outcome.status_message().contains("API keys"));
        assert!(outcome.prompt().is_none());
        assert_eq!(prompt_probe.get_call_count(), 0);
        assert_eq!(image_probe.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_image_key_blocks_before_any_call() {
        let prompt = MockPromptClient::new();
        let image = MockImageClient::new();
        let (prompt_probe, image_probe) = (prompt.clone(), image.clone());
        let studio = build(prompt, image);

        let creds = Credentials::new(Some("gemini-key".to_string()), None);
        let outcome = studio.generate(&request(), &creds).await;

        assert!(outcome.status_message().contains("Hugging Face token"));
        assert_eq!(prompt_probe.get_call_count(), 0);
        assert_eq!(image_probe.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_prompt_failure_skips_image_call() {
        let prompt = MockPromptClient::new().with_failure("quota exceeded".to_string());
        let image = MockImageClient::new();
        let image_probe = image.clone();

        let outcome = build(prompt, image).generate(&request(), &keys()).await;

        assert!(matches!(outcome, StudioOutcome::PromptFailed { .. }));
        assert!(outcome.status_message().contains("quota exceeded"));
        assert_eq!(image_probe.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_image_failure_surfaces_body_and_keeps_prompt() {
        let prompt = MockPromptClient::new().with_prompt_response("scene".to_string());
        let image = MockImageClient::new().with_failure("Model is currently loading".to_string());

        let outcome = build(prompt, image).generate(&request(), &keys()).await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.prompt(), Some("scene"));
        assert!(outcome
            .status_message()
            .contains("Model is currently loading"));
    }

    #[tokio::test]
    async fn test_synthesize_steps_return_none_without_keys() {
        let prompt = MockPromptClient::new();
        let image = MockImageClient::new();
        let (prompt_probe, image_probe) = (prompt.clone(), image.clone());
        let studio = build(prompt, image);

        let creds = Credentials::default();
        assert!(studio
            .synthesize_prompt(&request(), &creds)
            .await
            .unwrap()
            .is_none());
        assert!(studio
            .synthesize_image("scene", &creds)
            .await
            .unwrap()
            .is_none());
        assert_eq!(prompt_probe.get_call_count(), 0);
        assert_eq!(image_probe.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_from_config_rejects_empty_model_list() {
        let config = Config {
            gemini_models: vec![],
            ..Config::default()
        };
        assert!(Studio::from_config(&config).is_err());
    }
}
