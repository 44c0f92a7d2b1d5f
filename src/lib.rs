//! LocalLens: Cultural AI Studio
//!
//! Turns a cultural context (country, occasion, age, gender, description) into
//! a photorealistic portrait: a Gemini model writes the image prompt, then a
//! Hugging Face text-to-image endpoint paints it.

pub mod ai;
pub mod error;
pub mod models;
pub mod output;
pub mod prompts;
pub mod studio;

pub use error::{Error, Result};
