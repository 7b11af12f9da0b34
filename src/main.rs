use clap::Parser;
use racknerd_relay::config::{RelayConfig, setup_logging};
use tracing::error;

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = racknerd_relay::cli::CliOptions::parse();

    if setup_logging(cli.debug).is_err() {
        return;
    }

    let config = match RelayConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            error!("Invalid public base URL {}: {}", cli.public_base_url, err);
            return;
        }
    };

    if let Err(err) =
        racknerd_relay::web::setup_server(&cli.listen_address, cli.port, config).await
    {
        error!("Application error: {}", err);
    }
}
