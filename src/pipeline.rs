//! Prompt → generated image → watermark → stored image.

use reqwest::Client;
use tracing::{info, instrument};

use crate::config::RelayConfig;
use crate::constants::{PROMPT_MARKER, PROMPT_MARKER_ERROR, SAMPLE_PROMPTS};
use crate::error::RelayError;
use crate::generator::{download, request_generation};
use crate::storage::{ImageId, ImageStore};
use crate::watermark::{apply_watermark, ensure_font, load_font};

/// Picks the prompt for a request: a random sample when none was given,
/// otherwise the caller's text as long as it carries the marker.
pub fn resolve_prompt(text: Option<&str>) -> Result<String, RelayError> {
    match text.filter(|text| !text.is_empty()) {
        None => {
            let index = rand::random_range(0..SAMPLE_PROMPTS.len());
            Ok(SAMPLE_PROMPTS[index].to_string())
        }
        Some(text) if text.to_lowercase().contains(PROMPT_MARKER) => Ok(text.to_string()),
        Some(_) => Err(RelayError::InvalidPrompt(PROMPT_MARKER_ERROR.to_string())),
    }
}

/// Runs one generation end to end and returns the new image's identifier.
///
/// Nothing is written to the store unless every earlier step succeeded.
#[instrument(skip_all)]
pub(crate) async fn generate_and_store(
    client: &Client,
    config: &RelayConfig,
    store: &ImageStore,
    prompt: &str,
) -> Result<ImageId, RelayError> {
    info!("requesting {prompt}");
    let output_url = request_generation(client, &config.api_url, &config.api_key, prompt).await?;
    let image_bytes = download(client, &output_url).await?;

    ensure_font(client, &config.font_url, &config.font_path).await?;
    let font = load_font(&config.font_path).await?;
    let watermarked = tokio::task::spawn_blocking(move || apply_watermark(&image_bytes, &font))
        .await
        .map_err(|err| RelayError::InternalServerError(err.to_string()))??;

    let id = ImageId::mint();
    let path = store.save(&id, &watermarked).await?;
    info!("Stored {} at {}", id, path.display());
    Ok(id)
}
