//! Long-polling runner: wires a [`TelegramGateway`] and a handler chain into a
//! [`bot_runtime::Client`] and listens until the update stream ends. [`dispatch_update`] is the
//! entry point for updates that arrive some other way (webhooks, teloxide's `Dispatcher`).

use std::sync::Arc;

use anyhow::Result;
use bot_runtime::{Client, Dispatch};
use handler_chain::HandlerChain;
use tracing::{info, instrument};

use crate::adapters::raw_update;
use crate::config::TelegramConfig;
use crate::gateway::TelegramGateway;

/// Validates the config and builds the gateway, honouring a custom API URL.
pub fn build_gateway(config: &TelegramConfig) -> Result<Arc<TelegramGateway>> {
    config.validate()?;
    let mut gateway = TelegramGateway::new(config.bot_token.clone());
    if let Some(url) = config.api_url()? {
        info!(api_url = %url, "Using custom Telegram API URL");
        gateway = gateway.with_api_url(url);
    }
    Ok(Arc::new(gateway))
}

/// Runs the bot on `gateway`. Payments are enabled when the config carries a provider token.
#[instrument(skip_all)]
pub async fn run_polling(
    config: &TelegramConfig,
    gateway: Arc<TelegramGateway>,
    chain: HandlerChain,
) -> Result<()> {
    let mut client = Client::new(gateway, chain).with_poll_timeout(config.poll_timeout_secs);
    if let Some(token) = &config.payment_token {
        client = client.with_payments(token.clone(), config.payment_with_fiscal);
        info!(fiscal = config.payment_with_fiscal, "Payments enabled");
    }

    info!(poll_timeout_secs = config.poll_timeout_secs, "Bot started");
    Arc::new(client).listen().await?;
    info!("Bot stopped");
    Ok(())
}

/// Classifies and dispatches one teloxide update through `client`. Fails only when the update
/// cannot be re-encoded into the raw model.
pub async fn dispatch_update(
    client: &Client,
    update: &teloxide::types::Update,
) -> botkit_core::Result<Dispatch> {
    let raw = raw_update(update)?;
    Ok(client.process_update(raw).await)
}
