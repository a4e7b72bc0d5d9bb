pub use self::error::{Error, Result};
mod error;

use std::time::Duration;

use clap::Parser;
use cli::{Cli, Commands};
use taskboard_client::{ApiClient, ClientConfig};

mod cli;
mod commands;
mod logging;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = Cli::parse();
    logging::init(args.verbose);

    if let Err(e) = run(args).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Cli) -> Result<()> {
    // No session or API needed.
    if let Commands::Version = args.command {
        commands::print_version();
        return Ok(());
    }

    let client = ApiClient::new(&config(&args)?)?;
    commands::dispatch(&client, args.command).await
}

/// Environment first, flags on top.
fn config(args: &Cli) -> Result<ClientConfig> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &args.api_url {
        config.base_url = url.clone();
    }
    if let Some(path) = &args.session_file {
        config.session_file = Some(path.clone());
    }
    if let Some(secs) = args.timeout_secs {
        config.request_timeout = Some(Duration::from_secs(secs));
    }
    if config.session_file.is_none() {
        return Err(Error::Custom(
            "no data directory for the session file; set TASKBOARD_SESSION_FILE".into(),
        ));
    }
    Ok(config)
}
