//! Core types: classified incoming messages, outgoing messages, wait descriptors, payment info.

use std::any::Any;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::callback::Callback;

/// What a classified update is. `Unknown` is the zero value: an update with none of the
/// recognized shapes, routed to the default handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncomingKind {
    #[default]
    Unknown,
    Command,
    Callback,
    Response,
    PaymentCheckout,
    PaymentCharge,
    Text,
}

impl IncomingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncomingKind::Unknown => "unknown",
            IncomingKind::Command => "command",
            IncomingKind::Callback => "callback",
            IncomingKind::Response => "response",
            IncomingKind::PaymentCheckout => "payment-checkout",
            IncomingKind::PaymentCharge => "payment-charge",
            IncomingKind::Text => "text",
        }
    }
}

impl std::fmt::Display for IncomingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checkout or charge metadata. Fields the platform did not send stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInfo {
    pub checkout_id: String,
    pub telegram_charge_id: String,
    pub provider_charge_id: String,
    pub amount: i64,
    pub currency: String,
    pub email: String,
    pub payload: String,
}

/// Registered against a user when the next plain-text reply should be read as a structured response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitData {
    pub kind: String,
    pub value: i64,
}

impl WaitData {
    pub fn new(kind: impl Into<String>, value: i64) -> Self {
        Self {
            kind: kind.into(),
            value,
        }
    }
}

/// One classified update. Built by the classifier; only a prepare handler may touch it afterwards.
#[derive(Debug, Clone, Default)]
pub struct IncomingMessage {
    pub id: i32,
    pub user_id: i64,
    pub kind: IncomingKind,
    pub login: String,
    pub user_name: String,
    pub chat_id: i64,
    pub text: String,
    pub file_id: Option<String>,
    /// Direct download URL; empty when resolving the file failed.
    pub file_url: String,
    /// Set iff kind is `Callback` or `Response`.
    pub callback: Option<Callback>,
    /// Set iff kind is `PaymentCheckout` or `PaymentCharge`.
    pub payment: Option<PaymentInfo>,
    pub last_message: Option<Arc<OutgoingMessage>>,
    pub received_at: DateTime<Utc>,
    /// Application user record attached by a prepare handler. Never set by the classifier.
    pub user: Option<Arc<dyn Any + Send + Sync>>,
}

impl IncomingMessage {
    /// Text starts with `/` and has something after it.
    pub fn is_command(&self) -> bool {
        looks_like_command(&self.text)
    }

    pub fn is_payment(&self) -> bool {
        matches!(
            self.kind,
            IncomingKind::PaymentCheckout | IncomingKind::PaymentCharge
        )
    }

    /// Lower-cased command name: `/Start@my_bot arg` -> `start`. Empty for non-commands.
    pub fn command_name(&self) -> String {
        if !self.is_command() {
            return String::new();
        }
        normalize_command(&self.text)
    }

    pub fn set_user<T: Any + Send + Sync>(&mut self, user: T) {
        self.user = Some(Arc::new(user));
    }

    /// The attached application user, if one of type `T` was set.
    pub fn user<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.user.as_deref()?.downcast_ref::<T>()
    }

    /// Text after the command name, trimmed. Empty when there are no arguments.
    pub fn command_args(&self) -> &str {
        if !self.is_command() {
            return "";
        }
        self.text
            .split_once(char::is_whitespace)
            .map(|(_, rest)| rest.trim())
            .unwrap_or("")
    }
}

pub fn looks_like_command(text: &str) -> bool {
    text.len() > 1 && text.starts_with('/')
}

/// Normalizes a command as typed or as registered: strips one leading `/`, arguments and
/// `@botname`, lower-cases. `"/ start"` and `"//start"` do not normalize to `start`.
pub fn normalize_command(raw: &str) -> String {
    let raw = raw.trim();
    let rest = raw.strip_prefix('/').unwrap_or(raw);
    let head = rest.split(char::is_whitespace).next().unwrap_or_default();
    let name = head.split('@').next().unwrap_or_default();
    name.to_lowercase()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutgoingKind {
    #[default]
    Create,
    Edit,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Button {
    Callback { text: String, data: String },
    Url { text: String, url: String },
}

impl Button {
    pub fn callback(text: impl Into<String>, callback: &Callback) -> Self {
        Button::Callback {
            text: text.into(),
            data: callback.encode(),
        }
    }

    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Button::Url {
            text: text.into(),
            url: url.into(),
        }
    }
}

/// Inline keyboard attached below a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markup {
    pub rows: Vec<Vec<Button>>,
}

impl Markup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(mut self, buttons: Vec<Button>) -> Self {
        self.rows.push(buttons);
        self
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttachment {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for FileAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileAttachment")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A message a handler wants sent. `reply_message_id` is the target for `Edit`/`Delete`
/// and the replied-to message for `Create`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    /// Platform id, written back after a successful create or edit.
    pub id: i32,
    pub kind: OutgoingKind,
    pub chat_id: i64,
    pub user_id: i64,
    pub text: String,
    pub markup: Option<Markup>,
    pub wait: Option<WaitData>,
    pub reply_message_id: Option<i32>,
    pub formatted: bool,
    pub file: Option<FileAttachment>,
}

impl OutgoingMessage {
    pub fn text(chat_id: i64, user_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            user_id,
            text: text.into(),
            ..Default::default()
        }
    }

    /// Plain reply into the chat the incoming message came from.
    pub fn reply(to: &IncomingMessage, text: impl Into<String>) -> Self {
        Self::text(to.chat_id, to.user_id, text)
    }

    pub fn edit(chat_id: i64, user_id: i64, message_id: i32, text: impl Into<String>) -> Self {
        Self {
            kind: OutgoingKind::Edit,
            reply_message_id: Some(message_id),
            ..Self::text(chat_id, user_id, text)
        }
    }

    pub fn delete(chat_id: i64, user_id: i64, message_id: i32) -> Self {
        Self {
            kind: OutgoingKind::Delete,
            reply_message_id: Some(message_id),
            ..Self::text(chat_id, user_id, "")
        }
    }

    pub fn file(chat_id: i64, user_id: i64, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file: Some(FileAttachment {
                name: name.into(),
                bytes,
            }),
            ..Self::text(chat_id, user_id, "")
        }
    }

    pub fn with_markup(mut self, markup: Markup) -> Self {
        self.markup = Some(markup);
        self
    }

    pub fn with_wait(mut self, wait: WaitData) -> Self {
        self.wait = Some(wait);
        self
    }

    pub fn reply_to(mut self, message_id: i32) -> Self {
        self.reply_message_id = Some(message_id);
        self
    }

    pub fn formatted(mut self) -> Self {
        self.formatted = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incoming(text: &str) -> IncomingMessage {
        IncomingMessage {
            text: text.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_is_command() {
        assert!(incoming("/start").is_command());
        assert!(incoming("/a").is_command());
        assert!(!incoming("/").is_command());
        assert!(!incoming("start").is_command());
        assert!(!incoming("").is_command());
    }

    #[test]
    fn test_command_name_normalization() {
        assert_eq!(incoming("/start").command_name(), "start");
        assert_eq!(incoming("/Start@my_bot deep-link").command_name(), "start");
        assert_eq!(incoming("hello").command_name(), "");
        assert_eq!(normalize_command("START"), "start");
        assert_eq!(normalize_command("/help"), "help");
    }

    #[test]
    fn test_command_name_strips_only_one_slash() {
        assert_eq!(incoming("/ start").command_name(), "");
        assert_eq!(incoming("//start").command_name(), "/start");
        assert_eq!(normalize_command("/start  now"), "start");
    }

    #[derive(Debug, PartialEq)]
    struct Account {
        id: u64,
    }

    #[test]
    fn test_user_slot_downcasts_to_attached_type() {
        let mut msg = incoming("hello");
        assert!(msg.user::<Account>().is_none());

        msg.set_user(Account { id: 9 });
        assert_eq!(msg.user::<Account>(), Some(&Account { id: 9 }));
        assert!(msg.user::<String>().is_none());

        let copy = msg.clone();
        assert_eq!(copy.user::<Account>().map(|a| a.id), Some(9));
    }

    #[test]
    fn test_command_args() {
        assert_eq!(incoming("/pay 100  rub").command_args(), "100  rub");
        assert_eq!(incoming("/pay").command_args(), "");
        assert_eq!(incoming("pay 100").command_args(), "");
    }

    #[test]
    fn test_is_payment() {
        let mut msg = incoming("");
        assert!(!msg.is_payment());
        msg.kind = IncomingKind::PaymentCharge;
        assert!(msg.is_payment());
        msg.kind = IncomingKind::PaymentCheckout;
        assert!(msg.is_payment());
    }

    #[test]
    fn test_outgoing_builders() {
        let edit = OutgoingMessage::edit(1, 2, 30, "new");
        assert_eq!(edit.kind, OutgoingKind::Edit);
        assert_eq!(edit.reply_message_id, Some(30));

        let delete = OutgoingMessage::delete(1, 2, 31);
        assert_eq!(delete.kind, OutgoingKind::Delete);
        assert!(delete.text.is_empty());

        let create = OutgoingMessage::text(1, 2, "hi")
            .with_wait(WaitData::new("ask_name", 0))
            .formatted();
        assert_eq!(create.kind, OutgoingKind::Create);
        assert!(create.formatted);
        assert_eq!(create.wait, Some(WaitData::new("ask_name", 0)));
    }

    #[test]
    fn test_file_attachment_debug_hides_bytes() {
        let msg = OutgoingMessage::file(1, 2, "report.txt", vec![0; 1024]);
        let rendered = format!("{:?}", msg.file.unwrap());
        assert!(rendered.contains("report.txt"));
        assert!(rendered.contains("1024"));
    }
}
