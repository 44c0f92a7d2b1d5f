use super::{ImageSynthesizer, PromptSynthesizer};
use crate::models::{ApiKey, CulturalContextRequest, GeneratedImage};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// A scripted reply: either a value or a failure message.
#[derive(Debug, Clone)]
enum Scripted<T> {
    Ok(T),
    Fail(String),
}

#[derive(Clone, Default)]
pub struct MockPromptClient {
    responses: Arc<Mutex<Vec<Scripted<String>>>>,
    call_count: Arc<Mutex<usize>>,
    seen_keys: Arc<Mutex<Vec<String>>>,
}

impl MockPromptClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prompt_response(self, response: String) -> Self {
        self.responses.lock().unwrap().push(Scripted::Ok(response));
        self
    }

    pub fn with_failure(self, message: String) -> Self {
        self.responses.lock().unwrap().push(Scripted::Fail(message));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn seen_keys(&self) -> Vec<String> {
        self.seen_keys.lock().unwrap().clone()
    }
}

#[async_trait]
impl PromptSynthesizer for MockPromptClient {
    async fn synthesize_prompt(
        &self,
        request: &CulturalContextRequest,
        api_key: &ApiKey,
    ) -> Result<String> {
        let count = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            *count
        };
        self.seen_keys
            .lock()
            .unwrap()
            .push(api_key.expose().to_string());

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Default mock response
            return Ok(format!(
                "A photorealistic portrait of a {} year old {} at a {} in {}",
                request.age(),
                request.gender(),
                request.occasion(),
                request.country()
            ));
        }

        match &responses[(count - 1) % responses.len()] {
            Scripted::Ok(text) => Ok(text.clone()),
            Scripted::Fail(message) => Err(Error::AiProvider(message.clone())),
        }
    }
}

#[derive(Clone, Default)]
pub struct MockImageClient {
    responses: Arc<Mutex<Vec<Scripted<Vec<u8>>>>>,
    call_count: Arc<Mutex<usize>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockImageClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image_response(self, response: Vec<u8>) -> Self {
        self.responses.lock().unwrap().push(Scripted::Ok(response));
        self
    }

    /// Script a non-200 reply carrying `body`.
    pub fn with_failure(self, body: String) -> Self {
        self.responses.lock().unwrap().push(Scripted::Fail(body));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn received_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageSynthesizer for MockImageClient {
    async fn synthesize_image(&self, prompt: &str, _api_key: &ApiKey) -> Result<GeneratedImage> {
        let count = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            *count
        };
        self.prompts.lock().unwrap().push(prompt.to_string());

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Return a tiny valid PNG as default
            return Ok(GeneratedImage::new(vec![
                0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
                0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR chunk
                0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1 pixel
                0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49,
                0x44, 0x41, // IDAT chunk
                0x54, 0x08, 0x99, 0x63, 0xF8, 0xCF, 0xC0, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0xE2,
                0x25, 0x00, 0xBC, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, // IEND chunk
                0x44, 0xAE, 0x42, 0x60, 0x82,
            ]));
        }

        match &responses[(count - 1) % responses.len()] {
            Scripted::Ok(bytes) => Ok(GeneratedImage::new(bytes.clone())),
            Scripted::Fail(body) => Err(Error::ImageService {
                status: 503,
                body: body.clone(),
            }),
        }
    }
}
