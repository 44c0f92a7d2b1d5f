pub mod client;
pub mod prompt;
pub mod types;

pub use client::GeminiHttpClient;
pub use prompt::GeminiPromptClient;
