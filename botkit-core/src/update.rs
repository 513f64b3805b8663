//! Raw platform updates as delivered by a [`crate::Gateway`].
//!
//! Field names follow the Bot API JSON, so an update can be decoded straight from a webhook body
//! or from a transport library's own update type. Everything optional defaults when missing.

use serde::{Deserialize, Serialize};

/// Entity type marking an `@username` mention.
pub const ENTITY_MENTION: &str = "mention";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawUpdate {
    #[serde(default)]
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<RawMessage>,
    #[serde(default)]
    pub callback_query: Option<RawCallbackQuery>,
    #[serde(default)]
    pub pre_checkout_query: Option<RawPreCheckoutQuery>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawUser {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl RawUser {
    /// "First Last", or just the first name when there is no last name.
    pub fn display_name(&self) -> String {
        match self.last_name.as_deref() {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }

    pub fn login(&self) -> String {
        self.username.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawChat {
    pub id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEntity {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub length: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPhotoSize {
    pub file_id: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub file_id: String,
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSuccessfulPayment {
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub total_amount: i64,
    #[serde(default)]
    pub invoice_payload: String,
    #[serde(default)]
    pub telegram_payment_charge_id: String,
    #[serde(default)]
    pub provider_payment_charge_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMessage {
    #[serde(default)]
    pub message_id: i32,
    #[serde(default)]
    pub from: Option<RawUser>,
    #[serde(default)]
    pub chat: Option<RawChat>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub entities: Vec<RawEntity>,
    /// Sizes of one photo, smallest first.
    #[serde(default)]
    pub photo: Vec<RawPhotoSize>,
    #[serde(default)]
    pub document: Option<RawDocument>,
    #[serde(default)]
    pub successful_payment: Option<RawSuccessfulPayment>,
}

impl RawMessage {
    pub fn chat_id(&self) -> i64 {
        self.chat.as_ref().map(|c| c.id).unwrap_or(0)
    }

    pub fn text_trimmed(&self) -> String {
        self.text.as_deref().map(str::trim).unwrap_or_default().to_string()
    }

    /// Platform file id of the attachment: the last (largest) photo size, else the document.
    pub fn file_id(&self) -> Option<&str> {
        if let Some(photo) = self.photo.last() {
            return Some(photo.file_id.as_str());
        }
        self.document.as_ref().map(|d| d.file_id.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCallbackQuery {
    #[serde(default)]
    pub id: String,
    pub from: RawUser,
    /// The message carrying the pressed button; absent for inline-mode buttons.
    #[serde(default)]
    pub message: Option<RawMessage>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawOrderInfo {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPreCheckoutQuery {
    pub id: String,
    pub from: RawUser,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub total_amount: i64,
    #[serde(default)]
    pub invoice_payload: String,
    #[serde(default)]
    pub order_info: Option<RawOrderInfo>,
}
