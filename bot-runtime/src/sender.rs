//! Emits [`OutgoingMessage`]s through the gateway and keeps per-user state in step.

use std::sync::Arc;

use botkit_core::{BotError, Gateway, OutgoingKind, OutgoingMessage, Result};
use tracing::{debug, instrument};

use crate::state::{LastMessageCache, WaitState};

#[derive(Clone)]
pub struct Sender {
    gateway: Arc<dyn Gateway>,
    wait: WaitState,
    last: LastMessageCache,
}

impl Sender {
    pub fn new(gateway: Arc<dyn Gateway>, wait: WaitState, last: LastMessageCache) -> Self {
        Self {
            gateway,
            wait,
            last,
        }
    }

    /// Registers the message's wait descriptor (before any platform call), then creates, edits or
    /// deletes. A successful create records the platform id and, unless it carried a file,
    /// becomes the user's last message. Gateway errors are returned unchanged.
    #[instrument(skip(self, message), fields(user_id = message.user_id, chat_id = message.chat_id, kind = ?message.kind))]
    pub async fn send(&self, message: &mut OutgoingMessage) -> Result<()> {
        if let Some(wait) = &message.wait {
            self.wait.set(message.user_id, wait.clone());
        }

        match message.kind {
            OutgoingKind::Delete => {
                let target = target_id(message)?;
                self.gateway.delete_message(message.chat_id, target).await
            }
            OutgoingKind::Edit => {
                let target = target_id(message)?;
                message.id = self.gateway.edit_message(message, target).await?;
                Ok(())
            }
            OutgoingKind::Create => {
                message.id = self.gateway.send_message(message).await?;
                debug!(message_id = message.id, "message created");
                if message.file.is_none() {
                    self.last.store(message.user_id, message.clone());
                }
                Ok(())
            }
        }
    }
}

fn target_id(message: &OutgoingMessage) -> Result<i32> {
    message.reply_message_id.ok_or_else(|| {
        BotError::InvalidMessage(format!("{:?} requires a target message id", message.kind))
    })
}
