//! teloxide-backed [`Gateway`]. Messages go through teloxide requests; long polling, file lookup
//! and raw method calls go straight to the Bot API over reqwest so the JSON lands in
//! [`RawUpdate`] / [`ApiResponse`] untouched.

use std::time::Duration;

use async_trait::async_trait;
use botkit_core::{
    ApiResponse, BotError, Button, Gateway, Markup, OutgoingMessage, RawUpdate, Result,
};
use teloxide::prelude::*;
use teloxide::types::{
    ChatId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MessageId, ParseMode,
    ReplyMarkup, ReplyParameters,
};
use teloxide::RequestError;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

const ALLOWED_UPDATES: &str = r#"["message","callback_query","pre_checkout_query"]"#;
const POLL_RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Clone)]
pub struct TelegramGateway {
    bot: teloxide::Bot,
    http: reqwest::Client,
}

impl TelegramGateway {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_bot(teloxide::Bot::new(token))
    }

    pub fn with_bot(bot: teloxide::Bot) -> Self {
        Self {
            bot,
            http: reqwest::Client::new(),
        }
    }

    /// Points both teloxide requests and raw calls at another Bot API server.
    pub fn with_api_url(mut self, url: reqwest::Url) -> Self {
        self.bot = self.bot.set_api_url(url);
        self
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url> {
        self.bot
            .api_url()
            .join(path)
            .map_err(|e| BotError::Config(format!("invalid api url: {e}")))
    }

    /// POSTs form parameters to `bot<token>/<method>`. The envelope is decoded whatever the
    /// HTTP status, since the Bot API reports failures inside it.
    async fn call(&self, method: &str, params: &[(String, String)]) -> Result<ApiResponse> {
        let url = self.endpoint(&format!("bot{}/{}", self.bot.token(), method))?;
        let response = self
            .http
            .post(url)
            .form(params)
            .send()
            .await
            .map_err(|e| BotError::Gateway(e.to_string()))?;
        response
            .json::<ApiResponse>()
            .await
            .map_err(|e| BotError::Gateway(format!("{method}: {e}")))
    }

    async fn fetch_updates(&self, offset: i64, timeout_secs: u32) -> Result<Vec<serde_json::Value>> {
        let mut params = vec![
            ("timeout".to_string(), timeout_secs.to_string()),
            ("allowed_updates".to_string(), ALLOWED_UPDATES.to_string()),
        ];
        if offset > 0 {
            params.push(("offset".to_string(), offset.to_string()));
        }
        match self.call("getUpdates", &params).await?.into_result()? {
            Some(serde_json::Value::Array(items)) => Ok(items),
            _ => Ok(Vec::new()),
        }
    }

    /// Long-polls until the receiver is dropped. Failed polls are retried after a short pause;
    /// updates that do not decode are skipped but still acknowledged through the offset.
    async fn poll(self, timeout_secs: u32, tx: mpsc::UnboundedSender<RawUpdate>) {
        let mut offset: i64 = 0;
        while !tx.is_closed() {
            let batch = match self.fetch_updates(offset, timeout_secs).await {
                Ok(batch) => batch,
                Err(e) => {
                    warn!(error = %e, "getUpdates failed");
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                    continue;
                }
            };

            for value in batch {
                let update_id = value
                    .get("update_id")
                    .and_then(serde_json::Value::as_i64)
                    .unwrap_or(0);
                offset = offset.max(update_id + 1);

                match serde_json::from_value::<RawUpdate>(value) {
                    Ok(update) => {
                        if tx.send(update).is_err() {
                            debug!("update receiver dropped, stopping poll");
                            return;
                        }
                    }
                    Err(e) => warn!(error = %e, update_id, "skipping undecodable update"),
                }
            }
        }
        info!("Polling stopped");
    }
}

fn map_request_error(e: RequestError) -> BotError {
    match e {
        RequestError::Api(api) => BotError::Api(api.to_string()),
        other => BotError::Gateway(other.to_string()),
    }
}

fn inline_keyboard(markup: &Markup) -> Result<InlineKeyboardMarkup> {
    let mut rows = Vec::with_capacity(markup.rows.len());
    for row in &markup.rows {
        let mut buttons = Vec::with_capacity(row.len());
        for button in row {
            buttons.push(match button {
                Button::Callback { text, data } => {
                    InlineKeyboardButton::callback(text.clone(), data.clone())
                }
                Button::Url { text, url } => {
                    let url = reqwest::Url::parse(url).map_err(|e| {
                        BotError::InvalidMessage(format!("invalid button url {url}: {e}"))
                    })?;
                    InlineKeyboardButton::url(text.clone(), url)
                }
            });
        }
        rows.push(buttons);
    }
    Ok(InlineKeyboardMarkup::new(rows))
}

#[async_trait]
impl Gateway for TelegramGateway {
    async fn updates(&self, timeout_secs: u32) -> Result<mpsc::UnboundedReceiver<RawUpdate>> {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(self.clone().poll(timeout_secs, tx));
        Ok(rx)
    }

    #[instrument(skip(self))]
    async fn file_url(&self, file_id: &str) -> Result<String> {
        let params = [("file_id".to_string(), file_id.to_string())];
        let result = self.call("getFile", &params).await?.into_result()?;
        let path = result
            .as_ref()
            .and_then(|r| r.get("file_path"))
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| BotError::Api(format!("getFile returned no file_path for {file_id}")))?;
        let url = self.endpoint(&format!("file/bot{}/{}", self.bot.token(), path))?;
        Ok(url.to_string())
    }

    #[instrument(skip(self, message), fields(chat_id = message.chat_id))]
    async fn send_message(&self, message: &OutgoingMessage) -> Result<i32> {
        let chat = ChatId(message.chat_id);
        let markup = message.markup.as_ref().map(inline_keyboard).transpose()?;
        let parse_mode = message.formatted.then_some(ParseMode::MarkdownV2);
        let reply = message
            .reply_message_id
            .map(|id| ReplyParameters::new(MessageId(id)));

        let sent = match &message.file {
            Some(file) => {
                let document = InputFile::memory(file.bytes.clone()).file_name(file.name.clone());
                let mut req = self.bot.send_document(chat, document);
                if !message.text.is_empty() {
                    req.caption = Some(message.text.clone());
                }
                req.parse_mode = parse_mode;
                req.reply_parameters = reply;
                req.reply_markup = markup.map(ReplyMarkup::InlineKeyboard);
                req.await
            }
            None => {
                let mut req = self.bot.send_message(chat, message.text.clone());
                req.parse_mode = parse_mode;
                req.reply_parameters = reply;
                req.reply_markup = markup.map(ReplyMarkup::InlineKeyboard);
                req.await
            }
        }
        .map_err(map_request_error)?;

        Ok(sent.id.0)
    }

    #[instrument(skip(self, message), fields(chat_id = message.chat_id))]
    async fn edit_message(&self, message: &OutgoingMessage, message_id: i32) -> Result<i32> {
        let mut req = self.bot.edit_message_text(
            ChatId(message.chat_id),
            MessageId(message_id),
            message.text.clone(),
        );
        req.parse_mode = message.formatted.then_some(ParseMode::MarkdownV2);
        req.reply_markup = message.markup.as_ref().map(inline_keyboard).transpose()?;

        let edited = req.await.map_err(map_request_error)?;
        Ok(edited.id.0)
    }

    #[instrument(skip(self))]
    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<()> {
        self.bot
            .delete_message(ChatId(chat_id), MessageId(message_id))
            .await
            .map_err(map_request_error)?;
        Ok(())
    }

    #[instrument(skip(self, params))]
    async fn raw_request(&self, method: &str, params: &[(String, String)]) -> Result<ApiResponse> {
        self.call(method, params).await
    }
}
