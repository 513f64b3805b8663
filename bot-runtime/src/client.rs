//! Ties gateway, classifier, handler chain, sender and payments together.

use std::sync::Arc;

use botkit_core::{Gateway, IncomingMessage, OutgoingMessage, RawUpdate, Result};
use handler_chain::HandlerChain;
use payment::{Payment, PaymentClient};
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument};

use crate::classifier::Classifier;
use crate::sender::Sender;
use crate::state::{LastMessageCache, WaitState};

const DEFAULT_POLL_TIMEOUT_SECS: u32 = 60;

/// Outcome of dispatching one update.
#[derive(Debug, Clone)]
pub struct Dispatch {
    /// The classified message after the prepare handler ran.
    pub message: IncomingMessage,
    /// Messages the gateway accepted, with platform ids filled in.
    pub sent: Vec<OutgoingMessage>,
    pub failed: usize,
}

/// The bot: classifies every update, routes it through the handler chain and sends the results.
pub struct Client {
    gateway: Arc<dyn Gateway>,
    wait: WaitState,
    last: LastMessageCache,
    classifier: Classifier,
    sender: Sender,
    chain: HandlerChain,
    payments: PaymentClient,
    poll_timeout_secs: u32,
}

impl Client {
    /// Creates a client with payments disabled (no provider token).
    pub fn new(gateway: Arc<dyn Gateway>, chain: HandlerChain) -> Self {
        let wait = WaitState::new();
        let last = LastMessageCache::new();
        Self {
            classifier: Classifier::new(gateway.clone(), wait.clone(), last.clone()),
            sender: Sender::new(gateway.clone(), wait.clone(), last.clone()),
            payments: PaymentClient::new(gateway.clone(), "", false),
            gateway,
            wait,
            last,
            chain,
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
        }
    }

    pub fn with_payments(mut self, provider_token: impl Into<String>, with_fiscal: bool) -> Self {
        self.payments = PaymentClient::new(self.gateway.clone(), provider_token, with_fiscal);
        self
    }

    pub fn with_poll_timeout(mut self, secs: u32) -> Self {
        self.poll_timeout_secs = secs;
        self
    }

    pub fn payments(&self) -> &PaymentClient {
        &self.payments
    }

    pub fn sender(&self) -> &Sender {
        &self.sender
    }

    pub fn wait_state(&self) -> &WaitState {
        &self.wait
    }

    pub fn last_messages(&self) -> &LastMessageCache {
        &self.last
    }

    /// Consumes the gateway's update stream, one spawned task per update. There is no bound on
    /// in-flight tasks and no back-pressure towards the gateway. Returns once the stream closes
    /// and every in-flight update has been dispatched.
    pub async fn listen(self: Arc<Self>) -> Result<()> {
        let mut updates = self.gateway.updates(self.poll_timeout_secs).await?;
        let mut tasks = JoinSet::new();
        info!(poll_timeout_secs = self.poll_timeout_secs, "Listening for updates");

        while let Some(update) = updates.recv().await {
            let client = self.clone();
            tasks.spawn(async move {
                client.process_update(update).await;
            });
            while let Some(finished) = tasks.try_join_next() {
                if let Err(e) = finished {
                    error!(error = %e, "update task panicked");
                }
            }
        }

        info!(in_flight = tasks.len(), "Update stream closed, draining");
        while let Some(finished) = tasks.join_next().await {
            if let Err(e) = finished {
                error!(error = %e, "update task panicked");
            }
        }
        Ok(())
    }

    /// Classifies and dispatches one update. Each outgoing message is sent independently; a
    /// failed send is logged and the rest of the batch still goes out.
    #[instrument(skip(self, update), fields(update_id = update.update_id))]
    pub async fn process_update(&self, update: RawUpdate) -> Dispatch {
        let message = self.classifier.classify(&update).await;
        debug!(
            user_id = message.user_id,
            chat_id = message.chat_id,
            kind = %message.kind,
            "update classified"
        );

        let (message, batch) = self.chain.dispatch(message).await;

        let mut sent = Vec::with_capacity(batch.len());
        let mut failed = 0;
        for mut out in batch {
            match self.sender.send(&mut out).await {
                Ok(()) => sent.push(out),
                Err(e) => {
                    failed += 1;
                    error!(
                        error = %e,
                        user_id = out.user_id,
                        chat_id = out.chat_id,
                        msg = %out.text,
                        "send message error"
                    );
                }
            }
        }

        Dispatch {
            message,
            sent,
            failed,
        }
    }

    pub async fn send_message(&self, message: &mut OutgoingMessage) -> Result<()> {
        self.sender.send(message).await
    }

    pub async fn send_payment(&self, payment: &mut Payment) -> Result<()> {
        self.payments.send_invoice(payment).await
    }

    /// Approves the checkout when `error_message` is `None`, declines it otherwise.
    pub async fn complete_payment(&self, checkout_id: &str, error_message: Option<&str>) -> Result<()> {
        self.payments.confirm_checkout(checkout_id, error_message).await
    }
}
