//! Button-press tokens: `type_value_itemid`, decoded leniently into [`Callback`].

use serde::{Deserialize, Serialize};

pub const CALLBACK_PAYMENT_NEW: &str = "payment-new";
pub const CALLBACK_PAYMENT_CHECKOUT: &str = "payment-checkout";
pub const CALLBACK_PAYMENT_CHARGE: &str = "payment-charge";
pub const CALLBACK_PAYMENT_ERROR: &str = "payment-error";

const DELIMITER: char = '_';

/// Structured action decoded from a button token, or built from a pending wait descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callback {
    pub kind: String,
    pub value: String,
    pub item_id: i64,
}

impl Callback {
    pub fn new(kind: impl Into<String>, value: impl Into<String>, item_id: i64) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
            item_id,
        }
    }

    /// Splits `raw` on `_` into at most three parts: type, value, item id.
    /// Never fails; a missing or non-numeric item id is 0.
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.splitn(3, DELIMITER);
        let kind = parts.next().unwrap_or_default().to_string();
        let value = parts.next().unwrap_or_default().to_string();
        let item_id = parts
            .next()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(0);
        Self {
            kind,
            value,
            item_id,
        }
    }

    /// Renders the token a button should carry. Inverse of [`Callback::parse`] as long as
    /// `kind` and `value` contain no `_`.
    pub fn encode(&self) -> String {
        format!("{}{DELIMITER}{}{DELIMITER}{}", self.kind, self.value, self.item_id)
    }
}
