//! Sends invoices and answers checkout queries through a [`Gateway`].

use std::sync::Arc;

use botkit_core::{BotError, Gateway, Result};
use tracing::{info, instrument, warn};

use crate::invoice::Payment;

const METHOD_SEND_INVOICE: &str = "sendInvoice";
const METHOD_ANSWER_CHECKOUT: &str = "answerPreCheckoutQuery";

/// Payment operations. Every call fails fast with a config error when no provider token is set.
#[derive(Clone)]
pub struct PaymentClient {
    gateway: Arc<dyn Gateway>,
    provider_token: String,
    with_fiscal: bool,
}

impl PaymentClient {
    pub fn new(gateway: Arc<dyn Gateway>, provider_token: impl Into<String>, with_fiscal: bool) -> Self {
        Self {
            gateway,
            provider_token: provider_token.into(),
            with_fiscal,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.provider_token.is_empty()
    }

    fn ensure_token(&self) -> Result<()> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(BotError::Config("payment token not set".to_string()))
        }
    }

    /// Sends the invoice and records the platform message id into `payment`.
    #[instrument(skip(self, payment), fields(chat_id = payment.chat_id, amount = payment.amount))]
    pub async fn send_invoice(&self, payment: &mut Payment) -> Result<()> {
        self.ensure_token()?;

        let params = if self.with_fiscal {
            payment.fiscal_invoice_params(&self.provider_token)?
        } else {
            payment.invoice_params(&self.provider_token)?
        };

        let result = self
            .gateway
            .raw_request(METHOD_SEND_INVOICE, &params)
            .await?
            .into_result()?;

        if let Some(id) = result
            .as_ref()
            .and_then(|r| r.get("message_id"))
            .and_then(|id| id.as_i64())
        {
            match i32::try_from(id) {
                Ok(id) => payment.message_id = id,
                Err(_) => warn!(message_id = id, "invoice message id out of range, ignored"),
            }
        }
        info!(
            chat_id = payment.chat_id,
            message_id = payment.message_id,
            fiscal = self.with_fiscal,
            "invoice sent"
        );
        Ok(())
    }

    /// Answers a pre-checkout query: approved when `error_message` is `None`, declined with
    /// that message otherwise.
    #[instrument(skip(self))]
    pub async fn confirm_checkout(&self, checkout_id: &str, error_message: Option<&str>) -> Result<()> {
        self.ensure_token()?;

        let mut params = vec![
            ("pre_checkout_query_id".to_string(), checkout_id.to_string()),
            ("ok".to_string(), error_message.is_none().to_string()),
        ];
        if let Some(reason) = error_message {
            params.push(("error_message".to_string(), reason.to_string()));
        }

        self.gateway
            .raw_request(METHOD_ANSWER_CHECKOUT, &params)
            .await?
            .into_result()?;
        Ok(())
    }
}
