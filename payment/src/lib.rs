//! # payment
//!
//! Two-phase payment support: [`Payment`] invoices (optionally with a fiscal receipt) and
//! checkout confirmation, sent through [`botkit_core::Gateway::raw_request`].

mod client;
mod invoice;

#[cfg(test)]
mod test;

pub use client::PaymentClient;
pub use invoice::{
    Payment, Price, ProviderData, Receipt, ReceiptItem, ReceiptItemAmount, CURRENCY_RUB,
    CURRENCY_RUB_LABEL,
};
