//! Routing table: one handler per command name plus single-slot handlers per message kind.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use botkit_core::{normalize_command, IncomingKind, IncomingMessage, OutgoingMessage};
use tracing::debug;

use crate::handler::Handler;

/// Single-slot routes. Commands are routed through the command map instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Callback,
    /// Plain text and awaited responses.
    Message,
    PaymentCheckout,
    PaymentCharge,
    Default,
}

impl Slot {
    /// Slot serving `kind`; `None` for commands.
    pub fn for_kind(kind: IncomingKind) -> Option<Slot> {
        match kind {
            IncomingKind::Command => None,
            IncomingKind::Callback => Some(Slot::Callback),
            IncomingKind::Text | IncomingKind::Response => Some(Slot::Message),
            IncomingKind::PaymentCheckout => Some(Slot::PaymentCheckout),
            IncomingKind::PaymentCharge => Some(Slot::PaymentCharge),
            IncomingKind::Unknown => Some(Slot::Default),
        }
    }
}

/// Maps a classified message to exactly one handler. An empty slot is legal and yields no output.
#[derive(Clone, Default)]
pub struct HandlerTable {
    commands: HashMap<String, Arc<dyn Handler>>,
    slots: HashMap<Slot, Arc<dyn Handler>>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a command. Case-insensitive; a leading `/` is optional.
    pub fn on_command(mut self, name: &str, handler: Arc<dyn Handler>) -> Self {
        self.commands.insert(normalize_command(name), handler);
        self
    }

    pub fn on_callback(self, handler: Arc<dyn Handler>) -> Self {
        self.on(Slot::Callback, handler)
    }

    pub fn on_message(self, handler: Arc<dyn Handler>) -> Self {
        self.on(Slot::Message, handler)
    }

    pub fn on_payment(self, checkout: Arc<dyn Handler>, charge: Arc<dyn Handler>) -> Self {
        self.on(Slot::PaymentCheckout, checkout)
            .on(Slot::PaymentCharge, charge)
    }

    pub fn on_default(self, handler: Arc<dyn Handler>) -> Self {
        self.on(Slot::Default, handler)
    }

    pub fn on(mut self, slot: Slot, handler: Arc<dyn Handler>) -> Self {
        self.slots.insert(slot, handler);
        self
    }

    /// Handler that `message` would be routed to, if any.
    pub fn route(&self, message: &IncomingMessage) -> Option<&Arc<dyn Handler>> {
        match Slot::for_kind(message.kind) {
            None => self.commands.get(&message.command_name()),
            Some(slot) => self.slots.get(&slot),
        }
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.commands.contains_key(&normalize_command(name))
    }
}

#[async_trait]
impl Handler for HandlerTable {
    async fn handle(&self, message: &IncomingMessage) -> Vec<OutgoingMessage> {
        match self.route(message) {
            Some(handler) => handler.handle(message).await,
            None => {
                debug!(
                    user_id = message.user_id,
                    kind = %message.kind,
                    text = %message.text,
                    "no handler registered, message dropped"
                );
                Vec::new()
            }
        }
    }
}
