//! Watermark rendering.
//!
//! The caption font is cached on disk and fetched on first use. Glyphs are
//! laid out with `ab_glyph`, measured by their combined ink box and blended
//! straight into the RGB canvas.

use std::io::ErrorKind;
use std::path::Path;

use ab_glyph::{Font, FontVec, OutlinedGlyph, PxScale, Rect, ScaleFont, point};
use image::{Rgb, RgbImage};
use reqwest::Client;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::constants::{WATERMARK_COLOR, WATERMARK_MARGIN, WATERMARK_TEXT, watermark_font_size};
use crate::error::RelayError;

const FONT_ERROR: &str = "Error loading the font";

fn font_error(detail: impl std::fmt::Display) -> RelayError {
    error!("{FONT_ERROR}: {detail}");
    RelayError::Render(FONT_ERROR.to_string())
}

/// Downloads the font unless a cached copy already exists.
///
/// The download lands in a temporary file next to `font_path` and is renamed
/// into place, so racing first calls never expose a half-written font.
pub(crate) async fn ensure_font(
    client: &Client,
    font_url: &str,
    font_path: &Path,
) -> Result<(), RelayError> {
    if tokio::fs::try_exists(font_path).await.map_err(font_error)? {
        return Ok(());
    }

    info!("Font not found, downloading from {font_url}");
    let resp = client.get(font_url).send().await.map_err(font_error)?;
    let status = resp.status();
    if !status.is_success() {
        return Err(font_error(format!("font download returned {status}")));
    }
    let bytes = resp.bytes().await.map_err(font_error)?;

    if let Some(parent) = font_path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await.map_err(font_error)?;
    }
    let mut partial = font_path.as_os_str().to_owned();
    partial.push(format!(".{}.part", Uuid::new_v4()));
    tokio::fs::write(&partial, &bytes).await.map_err(font_error)?;
    if let Err(err) = tokio::fs::rename(&partial, font_path).await {
        if let Err(cleanup) = tokio::fs::remove_file(&partial).await
            && cleanup.kind() != ErrorKind::NotFound
        {
            warn!("Failed to remove partial font {}: {}", Path::new(&partial).display(), cleanup);
        }
        return Err(font_error(err));
    }
    info!("Font downloaded successfully.");
    Ok(())
}

/// Reads and parses the cached font.
pub(crate) async fn load_font(font_path: &Path) -> Result<FontVec, RelayError> {
    let data = tokio::fs::read(font_path).await.map_err(font_error)?;
    FontVec::try_from_vec(data).map_err(font_error)
}

/// Glyphs of one line of text, positioned with the baseline at the ascent.
fn layout<F: Font>(font: &F, text: &str, size: f32) -> (Vec<OutlinedGlyph>, Option<Rect>) {
    let scale = PxScale::from(size);
    let scaled = font.as_scaled(scale);

    let mut cursor_x = 0.0f32;
    let mut prev_glyph = None;
    let mut glyphs = Vec::new();
    let mut ink: Option<Rect> = None;

    for c in text.chars() {
        let glyph_id = scaled.glyph_id(c);
        if let Some(prev) = prev_glyph {
            cursor_x += scaled.kern(prev, glyph_id);
        }
        let glyph = glyph_id.with_scale_and_position(scale, point(cursor_x, scaled.ascent()));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            ink = Some(match ink {
                Some(current) => Rect {
                    min: point(current.min.x.min(bounds.min.x), current.min.y.min(bounds.min.y)),
                    max: point(current.max.x.max(bounds.max.x), current.max.y.max(bounds.max.y)),
                },
                None => bounds,
            });
            glyphs.push(outlined);
        }
        cursor_x += scaled.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    (glyphs, ink)
}

/// Width and height of the text's ink box, in pixels.
pub fn measure_text<F: Font>(font: &F, text: &str, size: f32) -> (u32, u32) {
    match layout(font, text, size).1 {
        Some(ink) => (ink.width().ceil() as u32, ink.height().ceil() as u32),
        None => (0, 0),
    }
}

/// Top-left corner for a box of `text_size` inset `margin` from the bottom-right corner.
pub fn bottom_right_anchor(canvas: (u32, u32), text_size: (u32, u32), margin: u32) -> (u32, u32) {
    (
        canvas.0.saturating_sub(text_size.0).saturating_sub(margin),
        canvas.1.saturating_sub(text_size.1).saturating_sub(margin),
    )
}

/// Draws `text` so its ink box sits `margin` pixels in from the bottom-right corner.
pub fn draw_caption<F: Font>(
    canvas: &mut RgbImage,
    font: &F,
    text: &str,
    size: f32,
    color: Rgb<u8>,
    margin: u32,
) {
    let (glyphs, ink) = layout(font, text, size);
    let Some(ink) = ink else {
        return;
    };
    let text_size = (ink.width().ceil() as u32, ink.height().ceil() as u32);
    let (left, top) = bottom_right_anchor(canvas.dimensions(), text_size, margin);
    let offset_x = left as f32 - ink.min.x;
    let offset_y = top as f32 - ink.min.y;
    let (width, height) = canvas.dimensions();

    for glyph in glyphs {
        let bounds = glyph.px_bounds();
        glyph.draw(|gx, gy, coverage| {
            let x = (bounds.min.x + offset_x) as i64 + i64::from(gx);
            let y = (bounds.min.y + offset_y) as i64 + i64::from(gy);
            if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
                return;
            }
            let pixel = canvas.get_pixel_mut(x as u32, y as u32);
            *pixel = blend(*pixel, color, coverage);
        });
    }
}

fn blend(bottom: Rgb<u8>, top: Rgb<u8>, coverage: f32) -> Rgb<u8> {
    let alpha = coverage.clamp(0.0, 1.0);
    let mix = |t: u8, b: u8| -> u8 {
        (f32::from(t) * alpha + f32::from(b) * (1.0 - alpha)).round() as u8
    };
    Rgb([
        mix(top[0], bottom[0]),
        mix(top[1], bottom[1]),
        mix(top[2], bottom[2]),
    ])
}

/// Decodes `bytes`, stamps the caption on it and re-encodes it as JPEG.
pub(crate) fn apply_watermark<F: Font>(bytes: &[u8], font: &F) -> Result<Vec<u8>, RelayError> {
    let decoded = image::load_from_memory(bytes).map_err(|err| {
        debug!("Failed to decode image: {}", err);
        RelayError::Render("Failed to decode generated image".to_string())
    })?;
    let mut canvas = decoded.to_rgb8();
    draw_caption(
        &mut canvas,
        font,
        WATERMARK_TEXT,
        watermark_font_size(),
        WATERMARK_COLOR,
        WATERMARK_MARGIN,
    );

    let mut output = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new(&mut output);
    encoder
        .encode_image(&canvas)
        .map_err(|err| RelayError::InternalServerError(err.to_string()))?;
    Ok(output)
}
