//! Huddle CLI client.
//!
//! Registers with the coordinator using an identity derived from the profile,
//! then lets the user request and cancel groups while printing group events.
//! Reconnects automatically (at most 3 attempts, 2 seconds apart).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin huddle-client -- --first-name Ada --last-name Lovelace --age 36 --sex female
//! cargo run --bin huddle-client -- -u ws://127.0.0.1:3000/ws -f Alan -l Turing -a 41 -s male
//! ```

use clap::Parser;

use huddle_client::{
    identity::{Profile, Sex},
    runner::run_client,
};
use huddle_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "huddle-client")]
#[command(about = "Huddle client: request a group chat and wait for a match", long_about = None)]
struct Args {
    /// Coordinator WebSocket URL
    #[arg(
        short = 'u',
        long,
        env = "HUDDLE_WS_URL",
        default_value = "ws://127.0.0.1:3000/ws"
    )]
    url: String,

    #[arg(short = 'f', long)]
    first_name: String,

    #[arg(short = 'l', long)]
    last_name: String,

    #[arg(short = 'a', long)]
    age: u32,

    #[arg(short = 's', long, value_enum)]
    sex: Sex,

    /// Primary photo payload (usually base64)
    #[arg(long, default_value = "")]
    photo_data: String,

    /// Additional photo payloads, may be repeated
    #[arg(long = "additional-photo")]
    additional_photo_data: Vec<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let profile = Profile {
        first_name: args.first_name,
        last_name: args.last_name,
        age: args.age,
        sex: args.sex,
        photo_data: args.photo_data,
        additional_photo_data: (!args.additional_photo_data.is_empty())
            .then_some(args.additional_photo_data),
    };

    if let Err(e) = run_client(args.url, profile).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
