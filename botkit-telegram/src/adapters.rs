//! Adapter from teloxide updates to [`RawUpdate`], for callers that receive updates through
//! teloxide's own dispatching (webhooks, `Dispatcher`) instead of [`crate::TelegramGateway`].

use botkit_core::{RawUpdate, Result};

/// Re-encodes a teloxide update as Bot API JSON and decodes it into the raw model.
pub fn raw_update(update: &teloxide::types::Update) -> Result<RawUpdate> {
    let value = serde_json::to_value(update)?;
    Ok(serde_json::from_value(value)?)
}
