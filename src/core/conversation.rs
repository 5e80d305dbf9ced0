//! In-memory AI conversation transcripts.
//!
//! Transcripts live only for the lifetime of the process and are capped at
//! [`MAX_HISTORY_TURNS`] after every completed AI turn.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::providers::Turn;

/// Turns retained per user.
pub const MAX_HISTORY_TURNS: usize = 20;

/// Per-user conversation transcripts.
#[derive(Default)]
pub struct ConversationStore {
    histories: Mutex<HashMap<String, Vec<Turn>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of a user's transcript (empty if none).
    pub async fn history(&self, user_id: &str) -> Vec<Turn> {
        self.histories
            .lock()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Append a completed exchange and trim to the most recent turns.
    pub async fn record_exchange(&self, user_id: &str, user_text: &str, model_text: &str) {
        let mut histories = self.histories.lock().await;
        let history = histories.entry(user_id.to_string()).or_default();
        history.push(Turn::user(user_text));
        history.push(Turn::model(model_text));
        if history.len() > MAX_HISTORY_TURNS {
            let excess = history.len() - MAX_HISTORY_TURNS;
            history.drain(..excess);
        }
    }

    /// Drop a user's transcript. Returns false when there was nothing to clear.
    pub async fn clear(&self, user_id: &str) -> bool {
        self.histories.lock().await.remove(user_id).is_some()
    }

    pub async fn len(&self, user_id: &str) -> usize {
        self.histories
            .lock()
            .await
            .get(user_id)
            .map_or(0, Vec::len)
    }
}
