//! Shared constants for the relay
//!

use image::Rgb;

/// Extension appended to every stored image identifier.
pub const IMAGE_EXTENSION: &str = "jpg";

/// Word every caller-supplied prompt has to contain, compared case-insensitively.
pub const PROMPT_MARKER: &str = "racknerd";

/// Error body returned when a prompt lacks [`PROMPT_MARKER`].
pub const PROMPT_MARKER_ERROR: &str = "The text must include the word 'racknerd'";

/// Prompts used when the caller didn't send one. Every entry contains the marker.
pub const SAMPLE_PROMPTS: [&str; 10] = [
    "server rack with racknerd text",
    "racknerd engineer",
    "racknerd text on a computer memory stick",
    "racknerd datacenter",
    "racknerd hosting server",
    "racknerd hosting a giveaway",
    "racknerd server in a racknerd datacenter, racknerd branded",
    "racknerd branded CPU",
    "computer with 'Racknerd' text on it",
    "a beautiful image featuring racknerd branding",
];

/// Generator mode requested from the upstream API.
pub const GENERATOR_VERSION: &str = "hd";

/// Requested image width, in pixels.
pub const GENERATED_WIDTH: u32 = 720;

/// Requested image height, in pixels.
pub const GENERATED_HEIGHT: u32 = 720;

/// Caption drawn onto every stored image.
pub const WATERMARK_TEXT: &str =
    "made possible by @DeadlyChemist | @dustinc, please upgrade racknerd-1fc9ea 23.94.217.1";

/// Caption font size before scaling.
pub const WATERMARK_BASE_FONT_SIZE: f32 = 40.0;

/// Scale applied to [`WATERMARK_BASE_FONT_SIZE`].
pub const WATERMARK_SCALE_FACTOR: f32 = 0.40;

/// Distance between the caption and the bottom-right corner, in pixels.
pub const WATERMARK_MARGIN: u32 = 10;

/// Caption fill colour.
pub const WATERMARK_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Cache-Control value for stored images; identifiers are never reused.
pub const IMAGE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Font fetched on first use when the cached copy is missing.
pub const DEFAULT_FONT_URL: &str =
    "https://github.com/matomo-org/travis-scripts/raw/master/fonts/Arial.ttf";

/// Upstream text-to-image endpoint.
pub const DEFAULT_API_URL: &str = "https://api.deepai.org/api/text2img";

/// Public origin used when building embed snippets.
pub const DEFAULT_PUBLIC_BASE_URL: &str = "https://racknerd.thechemicalworkshop.com";

/// Returns the caption size in pixels, truncated like an integer point size.
pub fn watermark_font_size() -> f32 {
    (WATERMARK_BASE_FONT_SIZE * WATERMARK_SCALE_FACTOR).trunc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_carry_the_marker() {
        for prompt in SAMPLE_PROMPTS {
            assert!(
                prompt.to_lowercase().contains(PROMPT_MARKER),
                "{prompt} is missing the marker"
            );
        }
    }

    #[test]
    fn font_size_is_scaled() {
        assert_eq!(watermark_font_size(), 16.0);
    }
}
