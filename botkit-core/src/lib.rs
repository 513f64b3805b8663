//! # botkit-core
//!
//! Core types for the bot adapter: classified [`IncomingMessage`]s, [`OutgoingMessage`]s, button
//! [`Callback`] tokens, the [`RawUpdate`] model, the [`Gateway`] trait, errors and tracing setup.
//! Transport-agnostic; used by handler-chain, bot-runtime, payment and botkit-telegram.

pub mod callback;
pub mod error;
pub mod gateway;
pub mod logger;
pub mod types;
pub mod update;

pub use callback::{
    Callback, CALLBACK_PAYMENT_CHARGE, CALLBACK_PAYMENT_CHECKOUT, CALLBACK_PAYMENT_ERROR,
    CALLBACK_PAYMENT_NEW,
};
pub use error::{BotError, Result};
pub use gateway::{ApiResponse, Gateway};
pub use logger::init_tracing;
pub use types::{
    looks_like_command, normalize_command, Button, FileAttachment, IncomingKind, IncomingMessage,
    Markup, OutgoingKind, OutgoingMessage, PaymentInfo, WaitData,
};
pub use update::{
    RawCallbackQuery, RawChat, RawDocument, RawEntity, RawMessage, RawOrderInfo, RawPhotoSize,
    RawPreCheckoutQuery, RawSuccessfulPayment, RawUpdate, RawUser, ENTITY_MENTION,
};
