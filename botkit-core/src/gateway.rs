//! The platform gateway seam.
//!
//! [`Gateway`] is transport-agnostic; `botkit-telegram` implements it via teloxide and tests
//! substitute a recording mock.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::{BotError, Result};
use crate::types::OutgoingMessage;
use crate::update::RawUpdate;

/// Envelope of a raw Bot API call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

impl ApiResponse {
    pub fn ok(result: serde_json::Value) -> Self {
        Self {
            ok: true,
            description: None,
            result: Some(result),
        }
    }

    pub fn failed(description: impl Into<String>) -> Self {
        Self {
            ok: false,
            description: Some(description.into()),
            result: None,
        }
    }

    /// Turns `ok = false` into [`BotError::Api`] carrying the platform's description.
    pub fn into_result(self) -> Result<Option<serde_json::Value>> {
        if self.ok {
            Ok(self.result)
        } else {
            Err(BotError::Api(
                self.description
                    .unwrap_or_else(|| "request was not ok".to_string()),
            ))
        }
    }
}

/// Operations the adapter needs from the chat platform. Errors are surfaced as-is; no retries.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Starts long polling. The receiver yields updates in platform order and closes only on shutdown.
    async fn updates(&self, timeout_secs: u32) -> Result<mpsc::UnboundedReceiver<RawUpdate>>;
    /// Resolves a platform file id into a direct download URL.
    async fn file_url(&self, file_id: &str) -> Result<String>;
    /// Creates a message (text, or a document when `message.file` is set). Returns the platform id.
    async fn send_message(&self, message: &OutgoingMessage) -> Result<i32>;
    /// Replaces the text of `message_id`. Returns the id of the edited message.
    async fn edit_message(&self, message: &OutgoingMessage, message_id: i32) -> Result<i32>;
    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<()>;
    /// Calls an API method with form parameters and returns the response envelope untouched.
    async fn raw_request(&self, method: &str, params: &[(String, String)]) -> Result<ApiResponse>;
}
