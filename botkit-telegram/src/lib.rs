//! # botkit-telegram
//!
//! Telegram transport for botkit: [`TelegramGateway`] implements [`botkit_core::Gateway`] on top of
//! teloxide, [`TelegramConfig`] loads settings from env, [`run_polling`] drives a
//! [`bot_runtime::Client`] until the update stream ends. Updates received through a webhook are
//! fed in with [`dispatch_update`], which converts them with [`raw_update`].

mod adapters;
mod config;
mod gateway;
mod runner;

pub use adapters::raw_update;
pub use config::TelegramConfig;
pub use gateway::TelegramGateway;
pub use runner::{build_gateway, dispatch_update, run_polling};
