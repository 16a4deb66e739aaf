// Entrypoint: set up logging, load config, build the HTTP client and hand
// everything to the menu loop.

use glucose_relay::{api::ApiClient, config::Config, relay::Relay, ui::main_menu};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they do not mix with the prompts.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;
    info!(
        analysis = %config.endpoints.analysis,
        slots = %config.endpoints.slots,
        confirm = %config.endpoints.confirm,
        "loaded configuration"
    );

    let api = ApiClient::new(config.timeout)?;
    let relay = Relay::new(api, &config);

    // Blocks until the user exits.
    main_menu(relay)?;
    Ok(())
}
