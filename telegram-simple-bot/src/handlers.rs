//! Demo handlers: greeting with buttons, a name prompt answered through a wait descriptor,
//! and the invoice / checkout / charge payment flow.

use std::sync::Arc;

use async_trait::async_trait;
use botkit_core::{
    Button, Callback, IncomingKind, IncomingMessage, Markup, OutgoingMessage, WaitData,
    CALLBACK_PAYMENT_NEW,
};
use handler_chain::{handler_fn, Handler, HandlerChain, HandlerTable};
use middleware::{AuthMiddleware, LoggingMiddleware};
use payment::{Payment, PaymentClient};
use tracing::{info, warn};

pub const ASK_NAME: &str = "ask_name";
/// Demo price in kopecks.
const PRICE: i64 = 10000;

pub fn build_chain(payments: PaymentClient, allow: Vec<i64>) -> HandlerChain {
    let table = HandlerTable::new()
        .on_command("start", handler_fn(start))
        .on_command("name", handler_fn(ask_name))
        .on_callback(Arc::new(CallbackHandler {
            payments: payments.clone(),
        }))
        .on_message(handler_fn(on_message))
        .on_payment(Arc::new(CheckoutHandler { payments }), handler_fn(on_charge));

    let mut chain = HandlerChain::new(table).add_middleware(Arc::new(LoggingMiddleware));
    if !allow.is_empty() {
        chain = chain.add_middleware(Arc::new(AuthMiddleware::new(allow)));
    }
    chain
}

async fn start(msg: IncomingMessage) -> Vec<OutgoingMessage> {
    let markup = Markup::new()
        .row(vec![Button::callback(
            "Introduce yourself",
            &Callback::new(ASK_NAME, "", 0),
        )])
        .row(vec![Button::callback(
            format!("Buy ({} RUB)", PRICE / 100),
            &Callback::new(CALLBACK_PAYMENT_NEW, "", PRICE),
        )]);
    vec![OutgoingMessage::reply(&msg, "hi").with_markup(markup)]
}

fn name_prompt(msg: &IncomingMessage) -> OutgoingMessage {
    OutgoingMessage::reply(msg, "What is your name?").with_wait(WaitData::new(ASK_NAME, 0))
}

async fn ask_name(msg: IncomingMessage) -> Vec<OutgoingMessage> {
    vec![name_prompt(&msg)]
}

async fn on_message(msg: IncomingMessage) -> Vec<OutgoingMessage> {
    match (msg.kind, msg.callback.as_ref()) {
        (IncomingKind::Response, Some(cb)) if cb.kind == ASK_NAME => {
            vec![OutgoingMessage::reply(&msg, format!("Nice to meet you, {}!", msg.text))]
        }
        _ if !msg.file_url.is_empty() => {
            vec![OutgoingMessage::reply(&msg, format!("Got your file: {}", msg.file_url))]
        }
        _ if !msg.text.is_empty() => {
            vec![OutgoingMessage::reply(&msg, format!("You said: {}", msg.text))]
        }
        _ => Vec::new(),
    }
}

struct CallbackHandler {
    payments: PaymentClient,
}

#[async_trait]
impl Handler for CallbackHandler {
    async fn handle(&self, msg: &IncomingMessage) -> Vec<OutgoingMessage> {
        let Some(cb) = msg.callback.as_ref() else {
            return Vec::new();
        };

        match cb.kind.as_str() {
            ASK_NAME => vec![name_prompt(msg)],
            CALLBACK_PAYMENT_NEW => {
                let mut invoice = Payment {
                    chat_id: msg.chat_id,
                    user_id: msg.user_id,
                    title: "Demo subscription".to_string(),
                    description: "One month of demo features".to_string(),
                    amount: cb.item_id,
                    payload: format!("demo_{}", msg.user_id),
                    ..Default::default()
                };
                match self.payments.send_invoice(&mut invoice).await {
                    Ok(()) => Vec::new(),
                    Err(e) => {
                        warn!(error = %e, user_id = msg.user_id, "send invoice failed");
                        vec![OutgoingMessage::reply(msg, "Payments are not available right now.")]
                    }
                }
            }
            other => {
                info!(kind = %other, "unhandled callback");
                Vec::new()
            }
        }
    }
}

struct CheckoutHandler {
    payments: PaymentClient,
}

#[async_trait]
impl Handler for CheckoutHandler {
    async fn handle(&self, msg: &IncomingMessage) -> Vec<OutgoingMessage> {
        let Some(payment) = msg.payment.as_ref() else {
            return Vec::new();
        };
        let decline = (payment.amount <= 0).then_some("Invalid amount");

        if let Err(e) = self
            .payments
            .confirm_checkout(&payment.checkout_id, decline)
            .await
        {
            warn!(error = %e, checkout_id = %payment.checkout_id, "confirm checkout failed");
        }
        Vec::new()
    }
}

async fn on_charge(msg: IncomingMessage) -> Vec<OutgoingMessage> {
    let amount = msg.payment.as_ref().map(|p| p.amount).unwrap_or(0);
    vec![OutgoingMessage::reply(
        &msg,
        format!("Payment of {} RUB received, thank you!", amount / 100),
    )]
}
