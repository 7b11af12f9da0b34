//! Config handling

use std::path::PathBuf;

use tracing::log::LevelFilter;
use url::Url;

use crate::cli::CliOptions;

/// Sets up logging based on the debug flag
pub fn setup_logging(debug: bool) -> Result<(), Box<std::io::Error>> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut logger = simple_logger::SimpleLogger::new().with_level(level);
    if !debug {
        logger = logger
            .with_module_level("tracing", LevelFilter::Warn)
            .with_module_level("rustls", LevelFilter::Info)
            .with_module_level("hyper_util", LevelFilter::Info)
            .with_module_level("reqwest", LevelFilter::Info)
            .with_module_level("h2", LevelFilter::Info);
    }
    logger.init().map_err(|err| {
        eprintln!("Failed to initialize logger: {}", err);
        Box::new(std::io::Error::other(err))
    })
}

/// Runtime settings threaded into the web state.
#[derive(Clone, Debug)]
pub struct RelayConfig {
    /// Storage root for generated images.
    pub image_dir: PathBuf,
    /// Cached font location.
    pub font_path: PathBuf,
    /// Font download location.
    pub font_url: String,
    /// Text-to-image endpoint.
    pub api_url: String,
    /// Upstream API key.
    pub api_key: String,
    /// Public origin for embed snippets, without a trailing slash.
    pub public_base_url: String,
}

impl RelayConfig {
    /// Builds the config from the parsed CLI, rejecting a malformed public base URL.
    pub fn from_cli(cli: &CliOptions) -> Result<Self, url::ParseError> {
        Url::parse(&cli.public_base_url)?;
        Ok(Self {
            image_dir: cli.image_dir.clone(),
            font_path: cli.font_path.clone(),
            font_url: cli.font_url.clone(),
            api_url: cli.api_url.clone(),
            api_key: cli.api_key.clone(),
            public_base_url: cli.public_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Markdown snippet pointing at the public URL of a stored image.
    pub fn embed_snippet(&self, image_id: &str) -> String {
        format!("![]({}/image/{} \"\")", self.public_base_url, image_id)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn cli_defaults_build_a_config() {
        let cli = CliOptions::try_parse_from(["racknerd-relay", "--api-key", "secret"])
            .expect("parse cli");
        let config = RelayConfig::from_cli(&cli).expect("valid config");
        assert_eq!(config.image_dir, PathBuf::from("./images"));
        assert_eq!(config.api_key, "secret");
        assert_eq!(
            config.embed_snippet("abc-123"),
            "![](https://racknerd.thechemicalworkshop.com/image/abc-123 \"\")"
        );
    }

    #[test]
    fn trailing_slash_is_dropped_from_base_url() {
        let cli = CliOptions::try_parse_from([
            "racknerd-relay",
            "--api-key",
            "secret",
            "--public-base-url",
            "https://example.org/",
        ])
        .expect("parse cli");
        let config = RelayConfig::from_cli(&cli).expect("valid config");
        assert_eq!(config.public_base_url, "https://example.org");
    }

    #[test]
    fn malformed_base_url_is_rejected() {
        let cli = CliOptions::try_parse_from([
            "racknerd-relay",
            "--api-key",
            "secret",
            "--public-base-url",
            "not a url",
        ])
        .expect("parse cli");
        assert!(RelayConfig::from_cli(&cli).is_err());
    }
}
