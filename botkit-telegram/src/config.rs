//! Runtime settings loaded from the environment.
//!
//! `BOT_TOKEN` is required; `TELEGRAM_API_URL` (or `TELOXIDE_API_URL`), `LOG_FILE`,
//! `PAYMENT_TOKEN`, `PAYMENT_WITH_FISCAL` and `POLL_TIMEOUT_SECS` are optional.

use anyhow::Result;
use std::env;

const DEFAULT_POLL_TIMEOUT_SECS: u32 = 60;

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub telegram_api_url: Option<String>,
    pub log_file: Option<String>,
    /// Payment provider token; payments are disabled without it.
    pub payment_token: Option<String>,
    /// Send invoices with a fiscal receipt attached.
    pub payment_with_fiscal: bool,
    /// Long-polling timeout passed to getUpdates.
    pub poll_timeout_secs: u32,
}

impl TelegramConfig {
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Loads from env; `token` overrides `BOT_TOKEN` when given.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("BOT_TOKEN").map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?,
        };
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let log_file = env::var("LOG_FILE").ok();
        let payment_token = env::var("PAYMENT_TOKEN").ok().filter(|t| !t.is_empty());
        let payment_with_fiscal = env::var("PAYMENT_WITH_FISCAL")
            .map(|v| parse_bool(&v))
            .unwrap_or(false);
        let poll_timeout_secs = env::var("POLL_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_POLL_TIMEOUT_SECS);

        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
            payment_token,
            payment_with_fiscal,
            poll_timeout_secs,
        })
    }

    /// Token only; everything else defaults.
    pub fn with_token(bot_token: String) -> Self {
        Self {
            bot_token,
            telegram_api_url: None,
            log_file: None,
            payment_token: None,
            payment_with_fiscal: false,
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            anyhow::bail!("BOT_TOKEN is empty");
        }
        self.api_url()?;
        Ok(())
    }

    /// The custom API URL, if set and valid.
    pub fn api_url(&self) -> Result<Option<reqwest::Url>> {
        match self.telegram_api_url.as_deref() {
            None => Ok(None),
            Some(url_str) => reqwest::Url::parse(url_str).map(Some).map_err(|_| {
                anyhow::anyhow!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                )
            }),
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
