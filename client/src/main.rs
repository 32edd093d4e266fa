use clap::Parser;
use client::Client;
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// WebSocket endpoint of the server
    #[arg(short = 's', long, default_value = "ws://127.0.0.1:8080/ws")]
    server: String,

    /// Name other players see, and the identity your score is kept under
    #[arg(short = 'n', long)]
    name: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    info!("Connecting to {} as {}", args.server, args.name);
    info!("Type a guess and press Enter; Ctrl+D to leave");

    Client::new(&args.server, &args.name).await?.run().await
}
