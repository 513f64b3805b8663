//! Invoice and fiscal receipt payloads. Pure formatting, no state.

use serde::{Deserialize, Serialize};

pub const CURRENCY_RUB: &str = "RUB";
pub const CURRENCY_RUB_LABEL: &str = "руб.";
const RECEIPT_QUANTITY: &str = "1.00";
const RECEIPT_VAT_CODE: i32 = 1;

/// An invoice to send. `amount` is in minor units (kopecks).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payment {
    /// Platform id of the invoice message, written back after sending.
    pub message_id: i32,
    pub chat_id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub amount: i64,
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub label: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderData {
    pub receipt: Receipt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub items: Vec<ReceiptItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub description: String,
    pub quantity: String,
    pub amount: ReceiptItemAmount,
    pub vat_code: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptItemAmount {
    pub value: String,
    pub currency: String,
}

impl ProviderData {
    /// One-line receipt: quantity 1, fixed VAT code, amount in whole major units.
    pub fn new(amount: i64, description: &str) -> Self {
        Self {
            receipt: Receipt {
                items: vec![ReceiptItem {
                    description: description.to_string(),
                    quantity: RECEIPT_QUANTITY.to_string(),
                    amount: ReceiptItemAmount {
                        value: format!("{}.00", amount / 100),
                        currency: CURRENCY_RUB.to_string(),
                    },
                    vat_code: RECEIPT_VAT_CODE,
                }],
            },
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Payment {
    pub fn prices(&self) -> Vec<Price> {
        vec![Price {
            label: CURRENCY_RUB_LABEL.to_string(),
            amount: self.amount,
        }]
    }

    /// `sendInvoice` parameters for a plain invoice.
    pub fn invoice_params(&self, provider_token: &str) -> serde_json::Result<Vec<(String, String)>> {
        Ok(vec![
            ("chat_id".to_string(), self.chat_id.to_string()),
            ("title".to_string(), self.title.clone()),
            ("description".to_string(), self.description.clone()),
            ("payload".to_string(), self.payload.clone()),
            ("provider_token".to_string(), provider_token.to_string()),
            ("currency".to_string(), CURRENCY_RUB.to_string()),
            ("prices".to_string(), serde_json::to_string(&self.prices())?),
        ])
    }

    /// `sendInvoice` parameters with a fiscal receipt: the payer's email is requested and
    /// forwarded to the provider together with the receipt.
    pub fn fiscal_invoice_params(
        &self,
        provider_token: &str,
    ) -> serde_json::Result<Vec<(String, String)>> {
        let mut params = self.invoice_params(provider_token)?;
        params.push(("need_email".to_string(), "true".to_string()));
        params.push(("send_email_to_provider".to_string(), "true".to_string()));
        params.push((
            "provider_data".to_string(),
            ProviderData::new(self.amount, &self.description).to_json()?,
        ));
        Ok(params)
    }
}
