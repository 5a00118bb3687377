use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use promptpay::config::{Config, CurrencyPolicy};
use promptpay::server::PromptPayServer;
use anyhow::Result;
use tokio::signal;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Host address to bind to (overrides HTTP_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides HTTP_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Reject currencies the scheme cannot encode instead of omitting them
    #[arg(long)]
    strict_currency: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .init();

    let mut config = Config::from_env()?;
    if let Some(host) = args.host {
        config.http_host = host;
    }
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if args.strict_currency {
        config.scheme.currency_policy = CurrencyPolicy::Strict;
    }

    info!("Starting PromptPay server...");

    let server = PromptPayServer::new(config)?;

    // Wait for shutdown signal
    tokio::select! {
        result = server.run() => result?,
        _ = signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
