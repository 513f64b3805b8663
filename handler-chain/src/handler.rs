//! Handler, prepare and middleware traits, plus closure adapters.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use botkit_core::{IncomingMessage, OutgoingMessage};

/// Turns one classified message into zero or more outgoing messages.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, message: &IncomingMessage) -> Vec<OutgoingMessage>;
}

/// Runs before routing with mutable access to the message. Returning at least one
/// outgoing message skips routing for this update.
#[async_trait]
pub trait PrepareHandler: Send + Sync {
    async fn prepare(&self, message: &mut IncomingMessage) -> Vec<OutgoingMessage>;
}

/// Decorates the routing handler. The first registered middleware is the outermost one.
pub trait Middleware: Send + Sync {
    fn wrap(&self, next: Arc<dyn Handler>) -> Arc<dyn Handler>;
}

/// [`Handler`] backed by an async closure. The closure gets its own copy of the message.
pub struct FnHandler<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(IncomingMessage) -> Fut + Send + Sync,
    Fut: Future<Output = Vec<OutgoingMessage>> + Send,
{
    async fn handle(&self, message: &IncomingMessage) -> Vec<OutgoingMessage> {
        (self.f)(message.clone()).await
    }
}

/// Wraps an async closure as a shareable [`Handler`].
///
/// ```ignore
/// let start = handler_fn(|msg: IncomingMessage| async move {
///     vec![OutgoingMessage::reply(&msg, "hi")]
/// });
/// ```
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn Handler>
where
    F: Fn(IncomingMessage) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Vec<OutgoingMessage>> + Send + 'static,
{
    Arc::new(FnHandler { f })
}

/// [`Middleware`] backed by a plain function from the next handler to its replacement.
pub struct FnMiddleware<F> {
    f: F,
}

impl<F> Middleware for FnMiddleware<F>
where
    F: Fn(Arc<dyn Handler>) -> Arc<dyn Handler> + Send + Sync,
{
    fn wrap(&self, next: Arc<dyn Handler>) -> Arc<dyn Handler> {
        (self.f)(next)
    }
}

pub fn middleware_fn<F>(f: F) -> Arc<dyn Middleware>
where
    F: Fn(Arc<dyn Handler>) -> Arc<dyn Handler> + Send + Sync + 'static,
{
    Arc::new(FnMiddleware { f })
}
