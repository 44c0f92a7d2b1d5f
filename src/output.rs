//! Writing rendered pictures to disk.

use crate::models::{CulturalContextRequest, GeneratedImage};
use crate::Result;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Save `image` under `output_dir` and return the written path.
///
/// Files are named `<date>_<occasion>_<country>_<uuid>.<ext>`.
pub fn save_image(
    output_dir: &Path,
    request: &CulturalContextRequest,
    image: &GeneratedImage,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;

    let file_name = format!(
        "{}_{}_{}_{}.{}",
        Local::now().format("%Y-%m-%d"),
        slug(request.occasion()),
        slug(request.country()),
        Uuid::new_v4(),
        image.extension()
    );
    let path = output_dir.join(file_name);
    fs::write(&path, &image.data)?;
    tracing::info!("Saved image locally at: {}", path.display());
    Ok(path)
}

fn slug(text: &str) -> String {
    let slug = text
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}
