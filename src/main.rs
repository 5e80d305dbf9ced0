//! relaybot - Telegram relay between users and admins with an AI stand-in.

use clap::Parser;
use std::process::ExitCode;

use relaybot::{logging, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is normal in hosted deployments.
    let _ = dotenvy::dotenv();

    // Parse command line arguments
    let args = Commands::parse();

    // Initialize logging
    let _guard = match logging::init(&args.settings.log_dir()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Run the command
    match args.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
