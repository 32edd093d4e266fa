use clap::Parser;
use log::{error, info};
use server::ServerConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Server IP address to bind to
    #[clap(short = 'H', long, default_value = "0.0.0.0")]
    host: String,
    /// Server port to listen on
    #[clap(short, long, default_value = "8080")]
    port: u16,
    /// Seconds per round; the hint is revealed halfway through
    #[clap(short, long, default_value = "30")]
    round_secs: u64,
    /// JSON file with the puzzle catalogue, replacing the built-in one
    #[clap(long)]
    puzzles: Option<PathBuf>,
    /// Seed for reproducible puzzle selection
    #[clap(long)]
    seed: Option<u64>,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        ServerConfig {
            host: args.host,
            port: args.port,
            round_interval: Duration::from_secs(args.round_secs),
            puzzles_path: args.puzzles,
            seed: args.seed,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from(Args::parse());
    let (_addr, server) = server::start(config).await?;

    tokio::select! {
        result = server => {
            match result {
                Ok(Ok(())) => info!("Server stopped"),
                Ok(Err(e)) => {
                    error!("{}", e);
                    return Err(e.into());
                }
                Err(e) => {
                    error!("Server task panicked: {}", e);
                    return Err(e.into());
                }
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
