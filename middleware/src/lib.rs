//! Ready-made middleware for [`handler_chain::HandlerChain`]: logging and an allowlist.

mod logging_auth;

#[cfg(test)]
mod test;

pub use logging_auth::{AuthMiddleware, LoggingMiddleware};
