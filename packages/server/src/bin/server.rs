//! Huddle group coordinator.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin huddle-server
//! cargo run --bin huddle-server -- --host 127.0.0.1 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;
use huddle_server::{domain::Lobby, infrastructure::repository::InMemoryLobbyRepository, ui::Server};
use huddle_shared::{logger::setup_logger, time::SystemClock};
use tokio::sync::Mutex;

#[derive(Parser, Debug)]
#[command(name = "huddle-server")]
#[command(about = "Connection and group-lifecycle coordinator", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HUDDLE_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "3000")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // 1. Repository (in-memory lobby behind a single lock)
    let lobby = Arc::new(Mutex::new(Lobby::new(Arc::new(SystemClock))));
    let repository = Arc::new(InMemoryLobbyRepository::new(lobby));

    // 2. UseCases and server
    let server = Server::with_repository(repository);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
