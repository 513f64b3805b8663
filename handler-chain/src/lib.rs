//! # Handler chain
//!
//! Routes each classified message to exactly one handler. An optional prepare handler runs first
//! and may short-circuit routing; otherwise the routing table runs inside the middleware chain,
//! first registered middleware outermost.

mod handler;
mod table;

pub use handler::{
    handler_fn, middleware_fn, FnHandler, FnMiddleware, Handler, Middleware, PrepareHandler,
};
pub use table::{HandlerTable, Slot};

use botkit_core::{IncomingMessage, OutgoingMessage};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Prepare handler, middleware and routing table, composed into one callable.
#[derive(Clone)]
pub struct HandlerChain {
    table: Arc<HandlerTable>,
    middleware: Vec<Arc<dyn Middleware>>,
    prepare: Option<Arc<dyn PrepareHandler>>,
    /// `table` wrapped by every middleware; rebuilt whenever either changes.
    entry: Arc<dyn Handler>,
}

impl HandlerChain {
    /// Creates a chain routing through `table`, with no middleware and no prepare handler.
    pub fn new(table: HandlerTable) -> Self {
        let table = Arc::new(table);
        Self {
            entry: table.clone(),
            table,
            middleware: Vec::new(),
            prepare: None,
        }
    }

    /// Appends a middleware. It wraps everything registered after it.
    pub fn add_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware.push(middleware);
        self.compose();
        self
    }

    pub fn with_prepare(mut self, prepare: Arc<dyn PrepareHandler>) -> Self {
        self.prepare = Some(prepare);
        self
    }

    pub fn table(&self) -> &HandlerTable {
        &self.table
    }

    fn compose(&mut self) {
        let mut entry: Arc<dyn Handler> = self.table.clone();
        for mw in self.middleware.iter().rev() {
            entry = mw.wrap(entry);
        }
        self.entry = entry;
    }

    /// Runs prepare (if any), then routing inside the middleware chain. Unrouted messages yield
    /// an empty batch.
    pub async fn handle(&self, message: IncomingMessage) -> Vec<OutgoingMessage> {
        self.dispatch(message).await.1
    }

    /// Like [`HandlerChain::handle`], but also hands back the message as the prepare handler
    /// left it.
    #[instrument(skip(self, message), fields(user_id = message.user_id, kind = %message.kind))]
    pub async fn dispatch(
        &self,
        mut message: IncomingMessage,
    ) -> (IncomingMessage, Vec<OutgoingMessage>) {
        if let Some(prepare) = &self.prepare {
            let prepared = prepare.prepare(&mut message).await;
            if !prepared.is_empty() {
                debug!(
                    user_id = message.user_id,
                    count = prepared.len(),
                    "prepare handler answered, routing skipped"
                );
                return (message, prepared);
            }
        }

        let out = self.entry.handle(&message).await;
        debug!(
            user_id = message.user_id,
            count = out.len(),
            "handler chain finished"
        );
        (message, out)
    }
}

impl Default for HandlerChain {
    fn default() -> Self {
        Self::new(HandlerTable::new())
    }
}
