use anyhow::Result;
use clap::Parser;
use locallens::models::{Config, Credentials, CulturalContextRequest, Gender, MAX_AGE, MIN_AGE};
use locallens::output;
use locallens::studio::{Studio, StudioOutcome};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "locallens")]
#[command(about = "Generate a culturally grounded portrait from a short description")]
struct CliArgs {
    #[arg(long, default_value = "Japan")]
    country: String,

    #[arg(long, default_value = "Wedding")]
    occasion: String,

    #[arg(long, default_value_t = 25, value_parser = parse_age)]
    age: u8,

    #[arg(long, value_enum, default_value_t = Gender::Male)]
    gender: Gender,

    /// Free-text details to weave into the prompt.
    #[arg(long, default_value = "")]
    description: String,

    /// Gemini API key (falls back to GEMINI_API_KEY).
    #[arg(long)]
    gemini_api_key: Option<String>,

    /// Hugging Face token (falls back to HF_TOKEN).
    #[arg(long)]
    hf_token: Option<String>,

    /// Where rendered images are written (falls back to OUTPUT_DIR).
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Stop after the prompt has been synthesized.
    #[arg(long)]
    prompt_only: bool,
}

fn parse_age(input: &str) -> std::result::Result<u8, String> {
    let age: u8 = input
        .parse()
        .map_err(|_| format!("Invalid age '{}'. Expected a whole number", input))?;
    if (MIN_AGE..=MAX_AGE).contains(&age) {
        Ok(age)
    } else {
        Err(format!("Age must be between {} and {}", MIN_AGE, MAX_AGE))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "locallens=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();
    let config = Config::from_env()?;

    let credentials = Credentials::new(
        args.gemini_api_key.clone().or(config.gemini_api_key.clone()),
        args.hf_token.clone().or(config.hf_token.clone()),
    );
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output_dir));

    let request = CulturalContextRequest::new(
        args.country,
        args.occasion,
        args.age,
        args.gender,
        args.description,
    )?;

    let studio = Studio::from_config(&config)?;

    if args.prompt_only {
        return match studio.synthesize_prompt(&request, &credentials).await {
            Ok(Some(prompt)) => {
                println!("{}", prompt);
                Ok(())
            }
            Ok(None) => {
                warn!("Please enter your Gemini API key!");
                std::process::exit(1);
            }
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        };
    }

    let outcome = studio.generate(&request, &credentials).await;
    match &outcome {
        StudioOutcome::Rendered {
            prompt,
            image,
            caption,
        } => {
            println!("{}", outcome.status_message());
            println!("\nPrompt:\n{}\n", prompt);
            let path = output::save_image(&output_dir, &request, image)?;
            println!("{} -> {}", caption, path.display());
            info!("Generation completed successfully");
            Ok(())
        }
        StudioOutcome::MissingCredentials { .. } => {
            warn!("{}", outcome.status_message());
            std::process::exit(1);
        }
        StudioOutcome::PromptFailed { .. } | StudioOutcome::ImageFailed { .. } => {
            if let Some(prompt) = outcome.prompt() {
                println!("\nPrompt:\n{}\n", prompt);
            }
            error!("{}", outcome.status_message());
            std::process::exit(1);
        }
    }
}
