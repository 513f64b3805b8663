//! Recording [`Gateway`] for integration tests.
//!
//! Every platform call is appended to a call log; creates get increasing ids starting at 100.
//! Updates are injected through the sender returned by [`MockGateway::with_updates`].

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use botkit_core::{ApiResponse, BotError, Gateway, OutgoingMessage, RawUpdate, Result};
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Send(OutgoingMessage),
    Edit { message: OutgoingMessage, target: i32 },
    Delete { chat_id: i64, message_id: i32 },
    Raw { method: String, params: Vec<(String, String)> },
    FileUrl(String),
}

pub struct MockGateway {
    calls: Mutex<Vec<Call>>,
    next_id: AtomicI32,
    failing_texts: Mutex<HashSet<String>>,
    fail_file_urls: AtomicBool,
    updates: Mutex<Option<mpsc::UnboundedReceiver<RawUpdate>>>,
    raw_response: Mutex<ApiResponse>,
}

impl MockGateway {
    pub fn new() -> Arc<Self> {
        Self::with_updates().0
    }

    /// Returns the gateway plus the sender feeding its update stream; dropping the sender closes it.
    pub fn with_updates() -> (Arc<Self>, mpsc::UnboundedSender<RawUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let gateway = Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            next_id: AtomicI32::new(100),
            failing_texts: Mutex::new(HashSet::new()),
            fail_file_urls: AtomicBool::new(false),
            updates: Mutex::new(Some(rx)),
            raw_response: Mutex::new(ApiResponse::ok(serde_json::json!({"message_id": 555}))),
        });
        (gateway, tx)
    }

    /// Creates and edits whose text equals `text` fail with an API error.
    pub fn fail_on_text(&self, text: &str) {
        self.failing_texts.lock().unwrap().insert(text.to_string());
    }

    pub fn fail_file_urls(&self) {
        self.fail_file_urls.store(true, Ordering::SeqCst);
    }

    pub fn set_raw_response(&self, response: ApiResponse) {
        *self.raw_response.lock().unwrap() = response;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Successfully created messages, in call order.
    pub fn sent(&self) -> Vec<OutgoingMessage> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Send(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_text(&self, text: &str) -> Result<()> {
        if self.failing_texts.lock().unwrap().contains(text) {
            return Err(BotError::Api(format!("rejected: {text}")));
        }
        Ok(())
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn updates(&self, _timeout_secs: u32) -> Result<mpsc::UnboundedReceiver<RawUpdate>> {
        self.updates
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| BotError::Gateway("updates already taken".to_string()))
    }

    async fn file_url(&self, file_id: &str) -> Result<String> {
        self.record(Call::FileUrl(file_id.to_string()));
        if self.fail_file_urls.load(Ordering::SeqCst) {
            return Err(BotError::Api("file not found".to_string()));
        }
        Ok(format!("https://files.test/{file_id}"))
    }

    async fn send_message(&self, message: &OutgoingMessage) -> Result<i32> {
        self.check_text(&message.text)?;
        self.record(Call::Send(message.clone()));
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn edit_message(&self, message: &OutgoingMessage, message_id: i32) -> Result<i32> {
        self.check_text(&message.text)?;
        self.record(Call::Edit {
            message: message.clone(),
            target: message_id,
        });
        Ok(message_id)
    }

    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<()> {
        self.record(Call::Delete {
            chat_id,
            message_id,
        });
        Ok(())
    }

    async fn raw_request(&self, method: &str, params: &[(String, String)]) -> Result<ApiResponse> {
        self.record(Call::Raw {
            method: method.to_string(),
            params: params.to_vec(),
        });
        Ok(self.raw_response.lock().unwrap().clone())
    }
}
