//! Demo bot binary. Loads `.env`, parses the CLI, and runs long polling.

mod cli;
mod handlers;

use anyhow::Result;
use botkit_core::init_tracing;
use botkit_telegram::{build_gateway, run_polling, TelegramConfig};
use clap::Parser;
use payment::PaymentClient;
use tracing::info;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token, allow } => {
            let config = TelegramConfig::load(token)?;
            init_tracing(config.log_file.as_deref())?;
            info!(log_file = ?config.log_file, "telegram-simple-bot starting");

            let gateway = build_gateway(&config)?;
            let payments = PaymentClient::new(
                gateway.clone(),
                config.payment_token.clone().unwrap_or_default(),
                config.payment_with_fiscal,
            );
            let chain = handlers::build_chain(payments, allow);
            run_polling(&config, gateway, chain).await
        }
    }
}
