use crate::ai::ImageSynthesizer;
use crate::models::{ApiKey, GeneratedImage, DEFAULT_HF_IMAGE_URL};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

/// Text-to-image client for a Hugging Face Inference API endpoint.
pub struct HuggingFaceImageClient {
    client: Client,
    endpoint: String,
    timeout: Option<Duration>,
}

impl HuggingFaceImageClient {
    pub fn new(endpoint: String, timeout: Option<Duration>) -> Self {
        Self::new_with_client(endpoint, timeout, Client::new())
    }

    pub fn new_with_client(endpoint: String, timeout: Option<Duration>, client: Client) -> Self {
        Self {
            client,
            endpoint,
            timeout,
        }
    }
}

impl Default for HuggingFaceImageClient {
    fn default() -> Self {
        Self::new(DEFAULT_HF_IMAGE_URL.to_string(), None)
    }
}

#[async_trait]
impl ImageSynthesizer for HuggingFaceImageClient {
    async fn synthesize_image(&self, prompt: &str, api_key: &ApiKey) -> Result<GeneratedImage> {
        tracing::debug!("Sending text-to-image request to {}", self.endpoint);

        let mut builder = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key.expose())
            .json(&InferenceRequest { inputs: prompt });
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!("Failed to send request to Hugging Face: {}", e);
            e
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await?;
            tracing::error!("Hugging Face API error (status {}): {}", status, body);
            return Err(Error::ImageService {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            tracing::error!("Hugging Face returned an empty image body");
            return Err(Error::ImageService {
                status: status.as_u16(),
                body: "empty image body".to_string(),
            });
        }
        let image = GeneratedImage::new(bytes.to_vec());
        tracing::debug!(
            "Hugging Face returned {} bytes ({})",
            image.data.len(),
            image.mime_type
        );
        Ok(image)
    }
}
