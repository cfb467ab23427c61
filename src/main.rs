//! rsvp-extract server and one-shot CLI
//!
//! Logs go to stderr; `extract` prints the result JSON to stdout.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rsvp_extract::{ExtractionRequest, Extractor, ServerConfig};
use tracing_subscriber::EnvFilter;

/// Article page used by `extract` when no URL is given
const DEFAULT_EXTRACT_URL: &str = "https://en.wikipedia.org/wiki/Batman_Returns";

/// Article extraction service for the RSVP reader
#[derive(Parser, Debug)]
#[command(name = "rsvp-extract")]
#[command(version)]
#[command(about = "Fetch a web page and return its article as plain text")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Port to listen on (overrides RSVP_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides RSVP_HOST)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Path to Chrome/Chromium executable (overrides RSVP_CHROME_PATH)
        #[arg(long)]
        chrome_path: Option<String>,
    },

    /// Extract one URL and print the result as JSON
    Extract {
        /// Page to extract
        url: Option<String>,

        /// Path to Chrome/Chromium executable (overrides RSVP_CHROME_PATH)
        #[arg(long)]
        chrome_path: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = ServerConfig::from_env().context("Failed to load configuration")?;

    match cli.command {
        Command::Serve {
            port,
            host,
            chrome_path,
        } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(host) = host {
                config.host = host;
            }
            if chrome_path.is_some() {
                config.chrome_path = chrome_path;
            }

            tracing::info!(
                "{} v{} starting on {}",
                rsvp_extract::NAME,
                rsvp_extract::VERSION,
                config.bind_address()
            );

            let extractor = Extractor::from_config(config.extractor_config())
                .context("Failed to build extractor")?;
            rsvp_extract::server::serve(config, Arc::new(extractor))
                .await
                .context("Server error")?;
        }
        Command::Extract { url, chrome_path } => {
            if chrome_path.is_some() {
                config.chrome_path = chrome_path;
            }

            let raw = url.unwrap_or_else(|| DEFAULT_EXTRACT_URL.to_string());
            let request = ExtractionRequest::parse(&raw)
                .map_err(|reason| anyhow::anyhow!("Invalid URL: {}", reason))?;

            let extractor = Extractor::from_config(config.extractor_config())
                .context("Failed to build extractor")?;
            let result = extractor.run(&request.url).await;

            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
