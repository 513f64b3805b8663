//! Process-wide per-user state shared by every in-flight update.

use std::sync::Arc;

use botkit_core::{OutgoingMessage, WaitData};
use dashmap::DashMap;

/// Pending "expected reply" per user. Cheap to clone; clones share the map.
#[derive(Clone, Default)]
pub struct WaitState {
    waiting: Arc<DashMap<i64, WaitData>>,
}

impl WaitState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `wait` for `user_id`, replacing any previous descriptor.
    pub fn set(&self, user_id: i64, wait: WaitData) {
        self.waiting.insert(user_id, wait);
    }

    pub fn get(&self, user_id: i64) -> Option<WaitData> {
        self.waiting.get(&user_id).map(|w| w.value().clone())
    }

    /// Returns and clears the descriptor in one map operation, so two concurrent updates from
    /// the same user can never both consume it.
    pub fn take(&self, user_id: i64) -> Option<WaitData> {
        self.waiting.remove(&user_id).map(|(_, w)| w)
    }

    pub fn clear(&self, user_id: i64) {
        self.waiting.remove(&user_id);
    }

    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }
}

/// Most recent message successfully created for each user.
#[derive(Clone, Default)]
pub struct LastMessageCache {
    messages: Arc<DashMap<i64, Arc<OutgoingMessage>>>,
}

impl LastMessageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, user_id: i64, message: OutgoingMessage) {
        self.messages.insert(user_id, Arc::new(message));
    }

    pub fn get(&self, user_id: i64) -> Option<Arc<OutgoingMessage>> {
        self.messages.get(&user_id).map(|m| m.value().clone())
    }
}
