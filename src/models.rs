//! Data models and structures
//!
//! Defines the per-request values flowing through the studio (cultural
//! context, generated images, credentials) and the environment configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const MIN_AGE: u8 = 18;
pub const MAX_AGE: u8 = 80;

pub const DEFAULT_GEMINI_MODELS: &[&str] =
    &["gemini-1.5-flash", "gemini-pro", "gemini-1.5-pro-latest"];
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_HF_IMAGE_URL: &str =
    "https://api-inference.huggingface.co/models/stabilityai/stable-diffusion-xl-base-1.0";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Male,
    Female,
    NonBinary,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::NonBinary => "Non-binary",
        };
        f.write_str(label)
    }
}

/// The cultural context steering prompt generation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CulturalContextRequest {
    country: String,
    occasion: String,
    age: u8,
    gender: Gender,
    description: String,
}

impl CulturalContextRequest {
    /// Build a request, rejecting ages outside `[MIN_AGE, MAX_AGE]`.
    ///
    /// Text fields are kept verbatim; nothing is trimmed or escaped.
    pub fn new(
        country: impl Into<String>,
        occasion: impl Into<String>,
        age: u8,
        gender: Gender,
        description: impl Into<String>,
    ) -> Result<Self> {
        if !(MIN_AGE..=MAX_AGE).contains(&age) {
            return Err(Error::InvalidInput(format!(
                "age {} is outside the supported range {}-{}",
                age, MIN_AGE, MAX_AGE
            )));
        }

        Ok(Self {
            country: country.into(),
            occasion: occasion.into(),
            age,
            gender,
            description: description.into(),
        })
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn occasion(&self) -> &str {
        &self.occasion
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Caption shown under the rendered picture.
    pub fn caption(&self) -> String {
        format!("{} in {}", self.occasion, self.country)
    }
}

/// Raw encoded image bytes as returned by the inference service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub data: Vec<u8>,
    pub mime_type: &'static str,
}

impl GeneratedImage {
    pub fn new(data: Vec<u8>) -> Self {
        let mime_type = crate::ai::mime::detect_image_mime(&data);
        Self { data, mime_type }
    }

    pub fn extension(&self) -> &'static str {
        crate::ai::mime::extension_for_mime(self.mime_type)
    }
}

/// Opaque API key. Blank strings never make it into one.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` for absent or blank keys.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Per-session keys for both services.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub gemini: Option<ApiKey>,
    pub huggingface: Option<ApiKey>,
}

impl Credentials {
    pub fn new(gemini: Option<String>, huggingface: Option<String>) -> Self {
        Self {
            gemini: gemini.and_then(ApiKey::new),
            huggingface: huggingface.and_then(ApiKey::new),
        }
    }

    /// Human-readable names of the keys that are not present.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.gemini.is_none() {
            missing.push("Gemini API key");
        }
        if self.huggingface.is_none() {
            missing.push("Hugging Face token");
        }
        missing
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub hf_token: Option<String>,
    pub gemini_models: Vec<String>,
    pub gemini_base_url: String,
    pub hf_image_url: String,
    pub prompt_timeout: Option<Duration>,
    pub image_timeout: Option<Duration>,
    pub output_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            hf_token: None,
            gemini_models: DEFAULT_GEMINI_MODELS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            hf_image_url: DEFAULT_HF_IMAGE_URL.to_string(),
            prompt_timeout: None,
            image_timeout: None,
            output_dir: "output".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let gemini_models = match lookup("GEMINI_MODELS") {
            Some(raw) => parse_model_list(&raw)?,
            None => defaults.gemini_models,
        };

        Ok(Self {
            gemini_api_key: lookup("GEMINI_API_KEY"),
            hf_token: lookup("HF_TOKEN"),
            gemini_models,
            gemini_base_url: lookup("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            hf_image_url: lookup("HF_IMAGE_URL").unwrap_or(defaults.hf_image_url),
            prompt_timeout: parse_timeout("PROMPT_TIMEOUT_SECS", lookup("PROMPT_TIMEOUT_SECS"))?,
            image_timeout: parse_timeout("IMAGE_TIMEOUT_SECS", lookup("IMAGE_TIMEOUT_SECS"))?,
            output_dir: lookup("OUTPUT_DIR").unwrap_or(defaults.output_dir),
        })
    }
}

fn parse_model_list(raw: &str) -> Result<Vec<String>> {
    let models: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect();

    if models.is_empty() {
        return Err(Error::Config(
            "GEMINI_MODELS must name at least one model".to_string(),
        ));
    }
    Ok(models)
}

fn parse_timeout(name: &str, raw: Option<String>) -> Result<Option<Duration>> {
    match raw {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| {
                Error::Config(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    name, value
                ))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_request_rejects_out_of_range_age() {
        assert!(CulturalContextRequest::new("Japan", "Wedding", 17, Gender::Male, "").is_err());
        assert!(CulturalContextRequest::new("Japan", "Wedding", 81, Gender::Male, "").is_err());
        assert!(CulturalContextRequest::new("Japan", "Wedding", 18, Gender::Male, "").is_ok());
        assert!(CulturalContextRequest::new("Japan", "Wedding", 80, Gender::Male, "").is_ok());
    }

    #[test]
    fn test_request_keeps_fields_verbatim() {
        let request =
            CulturalContextRequest::new("  Côte d'Ivoire ", "<Harvest>", 40, Gender::Female, "")
                .unwrap();
        assert_eq!(request.country(), "  Côte d'Ivoire ");
        assert_eq!(request.occasion(), "<Harvest>");
    }

    #[test]
    fn test_caption() {
        let request =
            CulturalContextRequest::new("Japan", "Wedding", 25, Gender::Male, "").unwrap();
        assert_eq!(request.caption(), "Wedding in Japan");
    }

    #[test]
    fn test_gender_display() {
        assert_eq!(Gender::NonBinary.to_string(), "Non-binary");
        assert_eq!(Gender::Female.to_string(), "Female");
    }

    #[test]
    fn test_blank_api_key_is_absent() {
        assert!(ApiKey::new("").is_none());
        assert!(ApiKey::new("   ").is_none());
        assert_eq!(ApiKey::new("abc").unwrap().expose(), "abc");
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let key = ApiKey::new("super-secret").unwrap();
        assert!(!format!("{:?}", key).contains("super-secret"));
    }

    #[test]
    fn test_credentials_missing() {
        let creds = Credentials::new(Some("g".to_string()), Some(String::new()));
        assert_eq!(creds.missing(), vec!["Hugging Face token"]);

        let creds = Credentials::default();
        assert_eq!(creds.missing().len(), 2);
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.gemini_models.len(), 3);
        assert_eq!(config.gemini_models[0], "gemini-1.5-flash");
        assert_eq!(config.hf_image_url, DEFAULT_HF_IMAGE_URL);
        assert!(config.prompt_timeout.is_none());
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.output_dir, "output");
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_MODELS", "gemini-2.0-flash , gemini-pro,"),
            ("GEMINI_API_KEY", "g-key"),
            ("IMAGE_TIMEOUT_SECS", "90"),
        ]))
        .unwrap();
        assert_eq!(config.gemini_models, vec!["gemini-2.0-flash", "gemini-pro"]);
        assert_eq!(config.gemini_api_key.as_deref(), Some("g-key"));
        assert_eq!(config.image_timeout, Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_config_rejects_empty_model_list() {
        let err = Config::from_lookup(lookup_from(&[("GEMINI_MODELS", " , ")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_config_rejects_bad_timeout() {
        let err =
            Config::from_lookup(lookup_from(&[("PROMPT_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
