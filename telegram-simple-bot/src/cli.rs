//! CLI parser.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "telegram-simple-bot")]
#[command(about = "Demo Telegram bot built on botkit", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
        /// Only answer these user ids (comma separated). Everyone is answered when empty.
        #[arg(long, value_delimiter = ',')]
        allow: Vec<i64>,
    },
}
