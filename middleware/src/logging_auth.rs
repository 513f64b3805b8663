//! Middleware for logging and optional auth (allowlist).

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use botkit_core::{IncomingMessage, OutgoingMessage};
use handler_chain::{Handler, Middleware};
use tracing::{debug, warn};

/// Logs each incoming message before routing and every outgoing message after it.
pub struct LoggingMiddleware;

struct Logged {
    next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for Logged {
    async fn handle(&self, message: &IncomingMessage) -> Vec<OutgoingMessage> {
        if let Some(callback) = &message.callback {
            debug!(
                user_id = message.user_id,
                callback = %callback.kind,
                value = %callback.value,
                message = %message.text,
                "incoming callback"
            );
        } else if let Some(payment) = &message.payment {
            debug!(
                user_id = message.user_id,
                checkout_id = %payment.checkout_id,
                amount = payment.amount,
                "incoming payment"
            );
        } else {
            debug!(
                user_id = message.user_id,
                kind = %message.kind,
                message = %message.text,
                "incoming message"
            );
        }

        let out = self.next.handle(message).await;

        for m in &out {
            debug!(user_id = m.user_id, kind = ?m.kind, msg = %m.text, "outgoing message");
        }
        out
    }
}

impl Middleware for LoggingMiddleware {
    fn wrap(&self, next: Arc<dyn Handler>) -> Arc<dyn Handler> {
        Arc::new(Logged { next })
    }
}

/// Drops messages from users outside the allowlist; they get no answer.
pub struct AuthMiddleware {
    allowed_users: Arc<HashSet<i64>>,
}

impl AuthMiddleware {
    /// Creates a middleware that lets through only the given user ids.
    pub fn new(allowed_users: Vec<i64>) -> Self {
        Self {
            allowed_users: Arc::new(allowed_users.into_iter().collect()),
        }
    }
}

struct Authorized {
    allowed_users: Arc<HashSet<i64>>,
    next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for Authorized {
    async fn handle(&self, message: &IncomingMessage) -> Vec<OutgoingMessage> {
        if self.allowed_users.contains(&message.user_id) {
            self.next.handle(message).await
        } else {
            warn!(user_id = message.user_id, "Unauthorized access attempt");
            Vec::new()
        }
    }
}

impl Middleware for AuthMiddleware {
    fn wrap(&self, next: Arc<dyn Handler>) -> Arc<dyn Handler> {
        Arc::new(Authorized {
            allowed_users: self.allowed_users.clone(),
            next,
        })
    }
}
