//! Calls to the text-to-image API and the download of its output.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error};

use crate::constants::{GENERATED_HEIGHT, GENERATED_WIDTH, GENERATOR_VERSION};
use crate::error::RelayError;

#[derive(Deserialize, Debug)]
struct GenerationResponse {
    #[serde(default)]
    output_url: Option<String>,
}

/// Asks the upstream API for an image and returns where it put the result.
pub(crate) async fn request_generation(
    client: &Client,
    api_url: &str,
    api_key: &str,
    prompt: &str,
) -> Result<String, RelayError> {
    let width = GENERATED_WIDTH.to_string();
    let height = GENERATED_HEIGHT.to_string();
    let form = [
        ("text", prompt),
        ("image_generator_version", GENERATOR_VERSION),
        ("width", width.as_str()),
        ("height", height.as_str()),
    ];

    let resp = client
        .post(api_url)
        .header("api-key", api_key)
        .form(&form)
        .send()
        .await
        .map_err(|err| {
            error!("Request to {api_url} failed: {err}");
            RelayError::Upstream("Failed to reach image generation API".to_string())
        })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(RelayError::Upstream(format!(
            "Failed to generate image, status code: {}",
            status.as_u16()
        )));
    }

    let missing_url =
        || RelayError::Upstream("Failed to retrieve image URL from API response".to_string());
    let parsed: GenerationResponse = resp.json().await.map_err(|err| {
        debug!("Unreadable generation response: {err}");
        missing_url()
    })?;

    parsed
        .output_url
        .filter(|url| !url.is_empty())
        .ok_or_else(missing_url)
}

/// Fetches the generated image bytes.
pub(crate) async fn download(client: &Client, url: &str) -> Result<Vec<u8>, RelayError> {
    let resp = client.get(url).send().await.map_err(|err| {
        error!("Download of {url} failed: {err}");
        RelayError::Upstream("Failed to download image".to_string())
    })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(RelayError::Upstream(format!(
            "Failed to download image, status code: {}",
            status.as_u16()
        )));
    }

    let bytes = resp.bytes().await.map_err(|err| {
        error!("Reading {url} failed: {err}");
        RelayError::Upstream("Failed to download image".to_string())
    })?;
    Ok(bytes.to_vec())
}
