//! Turns one [`RawUpdate`] into exactly one [`IncomingMessage`].
//!
//! Precedence: callback query, then pre-checkout query, then plain message. A plain message is a
//! command, else an awaited response, else a successful-payment notice, else text. Classification
//! never fails: missing optional fields leave zero values behind.

use std::sync::Arc;

use botkit_core::{
    looks_like_command, Callback, Gateway, IncomingKind, IncomingMessage, PaymentInfo,
    RawCallbackQuery, RawMessage, RawPreCheckoutQuery, RawUpdate, ENTITY_MENTION,
};
use chrono::Utc;
use tracing::{debug, warn};

use crate::state::{LastMessageCache, WaitState};

/// Classifies updates against the shared wait state and last-message cache.
#[derive(Clone)]
pub struct Classifier {
    gateway: Arc<dyn Gateway>,
    wait: WaitState,
    last: LastMessageCache,
}

impl Classifier {
    pub fn new(gateway: Arc<dyn Gateway>, wait: WaitState, last: LastMessageCache) -> Self {
        Self {
            gateway,
            wait,
            last,
        }
    }

    pub async fn classify(&self, update: &RawUpdate) -> IncomingMessage {
        let mut msg = if let Some(query) = &update.callback_query {
            self.from_callback(query)
        } else if let Some(query) = &update.pre_checkout_query {
            self.from_checkout(query)
        } else if let Some(message) = &update.message {
            self.from_message(message).await
        } else {
            debug!(update_id = update.update_id, "update has no supported payload");
            IncomingMessage::default()
        };
        msg.received_at = Utc::now();

        self.attach_last_message(&mut msg);
        msg
    }

    fn from_callback(&self, query: &RawCallbackQuery) -> IncomingMessage {
        let origin = query.message.as_ref();
        IncomingMessage {
            id: origin.map(|m| m.message_id).unwrap_or(0),
            user_id: query.from.id,
            kind: IncomingKind::Callback,
            login: query.from.login(),
            user_name: query.from.display_name(),
            chat_id: origin.map(RawMessage::chat_id).unwrap_or(0),
            text: origin.map(RawMessage::text_trimmed).unwrap_or_default(),
            callback: Some(Callback::parse(query.data.as_deref().unwrap_or_default())),
            ..Default::default()
        }
    }

    fn from_checkout(&self, query: &RawPreCheckoutQuery) -> IncomingMessage {
        // A checkout interrupts whatever reply we were waiting for.
        self.wait.clear(query.from.id);

        IncomingMessage {
            user_id: query.from.id,
            kind: IncomingKind::PaymentCheckout,
            login: query.from.login(),
            user_name: query.from.display_name(),
            payment: Some(PaymentInfo {
                checkout_id: query.id.clone(),
                amount: query.total_amount,
                currency: query.currency.clone(),
                email: query
                    .order_info
                    .as_ref()
                    .and_then(|o| o.email.clone())
                    .unwrap_or_default(),
                payload: query.invoice_payload.clone(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    async fn from_message(&self, message: &RawMessage) -> IncomingMessage {
        let user_id = message.from.as_ref().map(|u| u.id).unwrap_or(0);
        let text = message.text_trimmed();

        let mut msg = IncomingMessage {
            id: message.message_id,
            user_id,
            login: message.from.as_ref().map(|u| u.login()).unwrap_or_default(),
            user_name: message
                .from
                .as_ref()
                .map(|u| u.display_name())
                .unwrap_or_default(),
            chat_id: message.chat_id(),
            ..Default::default()
        };

        if let Some(file_id) = message.file_id() {
            msg.file_id = Some(file_id.to_string());
            msg.file_url = match self.gateway.file_url(file_id).await {
                Ok(url) => url,
                Err(e) => {
                    warn!(error = %e, user_id, file_id, "file url lookup failed");
                    String::new()
                }
            };
        }

        if looks_like_command(&text) {
            msg.kind = IncomingKind::Command;
            self.wait.clear(user_id);
        } else if let Some(wait) = self.wait.take(user_id) {
            msg.kind = IncomingKind::Response;
            msg.callback = Some(Callback::new(wait.kind, mention(message), wait.value));
        } else if let Some(charge) = &message.successful_payment {
            msg.kind = IncomingKind::PaymentCharge;
            msg.payment = Some(PaymentInfo {
                telegram_charge_id: charge.telegram_payment_charge_id.clone(),
                provider_charge_id: charge.provider_payment_charge_id.clone(),
                amount: charge.total_amount,
                currency: charge.currency.clone(),
                payload: charge.invoice_payload.clone(),
                ..Default::default()
            });
        } else {
            msg.kind = IncomingKind::Text;
        }

        msg.text = text;
        msg
    }

    /// Attaches the last message we sent this user; payment updates without a chat borrow its chat.
    fn attach_last_message(&self, msg: &mut IncomingMessage) {
        if msg.user_id == 0 {
            return;
        }
        if let Some(last) = self.last.get(msg.user_id) {
            if msg.is_payment() && msg.chat_id == 0 {
                msg.chat_id = last.chat_id;
            }
            msg.last_message = Some(last);
        }
    }
}

/// The mentioned login when the message leads with an `@mention` entity, else empty.
fn mention(message: &RawMessage) -> String {
    let text = message.text_trimmed();
    let leads_with_mention = message
        .entities
        .first()
        .map(|e| e.kind == ENTITY_MENTION)
        .unwrap_or(false);
    if text.is_empty() || !leads_with_mention {
        return String::new();
    }
    text.replacen('@', "", 1)
}
