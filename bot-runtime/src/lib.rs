//! # bot-runtime
//!
//! Classification, per-user state and dispatch: [`Classifier`] turns raw updates into incoming
//! messages using the shared [`WaitState`] and [`LastMessageCache`]; [`Client`] routes them through
//! a handler chain and hands the results to the [`Sender`].

mod classifier;
mod client;
mod sender;
mod state;

pub use classifier::Classifier;
pub use client::{Client, Dispatch};
pub use sender::Sender;
pub use state::{LastMessageCache, WaitState};
