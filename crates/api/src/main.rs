use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use mfg_dash_api::cli::{self, Cli, Context};
use mfg_dash_api::config::Config;
use mfg_dash_api::logging::init_logging;
use mfg_dash_api::view::ViewScope;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load()?;
    init_logging(&config.logging);

    info!(base_url = %config.api.base_url, "mfg-dash v{}", env!("CARGO_PKG_VERSION"));

    let context = Context::open(config)?;
    let scope = ViewScope::new(context.session.client());

    // Ctrl-C aborts whatever the command still has in flight
    let cancel = scope.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    match cli::run(&context, &scope, cli.command).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            anyhow::bail!(e.user_message())
        }
    }
}
