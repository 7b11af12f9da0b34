//! CLI parser
use clap::Parser;
use std::num::NonZeroU16;
use std::path::PathBuf;

use crate::constants::{DEFAULT_API_URL, DEFAULT_FONT_URL, DEFAULT_PUBLIC_BASE_URL};

#[derive(Parser, Debug)]
/// CLI Options
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "RELAY_DEBUG")]
    /// Enable debug logging. Env: RELAY_DEBUG
    pub debug: bool,
    #[clap(long, short, default_value = "9030", env = "RELAY_PORT")]
    /// http listener, defaults to `9030`.
    /// Env: RELAY_PORT
    pub port: NonZeroU16,
    #[clap(long, short, default_value = "0.0.0.0", env = "RELAY_LISTEN_ADDRESS")]
    /// Listen address, defaults to `0.0.0.0`.
    /// Env: RELAY_LISTEN_ADDRESS
    pub listen_address: String,

    #[clap(long, short, default_value = "./images", env = "RELAY_IMAGE_DIR")]
    /// Directory holding the generated images, created if missing.
    /// Env: RELAY_IMAGE_DIR
    pub image_dir: PathBuf,

    #[clap(long, default_value = "./Arial.ttf", env = "RELAY_FONT_PATH")]
    /// Where the watermark font is cached.
    /// Env: RELAY_FONT_PATH
    pub font_path: PathBuf,
    #[clap(long, default_value = DEFAULT_FONT_URL, env = "RELAY_FONT_URL")]
    /// Where the watermark font is downloaded from when the cache is empty.
    /// Env: RELAY_FONT_URL
    pub font_url: String,

    #[clap(long, default_value = DEFAULT_API_URL, env = "RELAY_API_URL")]
    /// Text-to-image endpoint.
    /// Env: RELAY_API_URL
    pub api_url: String,
    #[clap(long, env = "RELAY_API_KEY", hide_env_values = true)]
    /// Key sent in the `api-key` header.
    /// Env: RELAY_API_KEY
    pub api_key: String,

    #[clap(long, default_value = DEFAULT_PUBLIC_BASE_URL, env = "RELAY_PUBLIC_BASE_URL")]
    /// Public origin used in embed snippets, eg `https://racknerd.thechemicalworkshop.com`.
    /// Env: RELAY_PUBLIC_BASE_URL
    pub public_base_url: String,
}
