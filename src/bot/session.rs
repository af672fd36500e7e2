//! Per-chat conversation state.

use std::collections::HashMap;

use crate::bot::models::Model;

/// State kept for one chat: selected model, the message id of the last model
/// menu we sent (so a later button press can edit it), and a one-turn memory
/// window of the previous exchange.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub model: Model,
    pub pending_menu_message_id: Option<i64>,
    pub last_question: String,
    pub last_completion: String,
}

/// In-memory session map, keyed by chat id. Sessions are created lazily on the
/// first event from a chat and live for the process lifetime; nothing deletes
/// or persists them.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<i64, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the session for a chat, creating it with defaults if absent.
    pub fn get_or_create(&mut self, chat_id: i64) -> &mut Session {
        self.sessions.entry(chat_id).or_default()
    }

    /// Look up an existing session without creating one.
    pub fn get_mut(&mut self, chat_id: i64) -> Option<&mut Session> {
        self.sessions.get_mut(&chat_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_contact_creates_baseline_session() {
        let mut store = SessionStore::new();
        let session = store.get_or_create(42);
        assert_eq!(session.model, Model::Gpt35Turbo);
        assert_eq!(session.pending_menu_message_id, None);
        assert_eq!(session.last_question, "");
        assert_eq!(session.last_completion, "");
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut store = SessionStore::new();
        store.get_or_create(42).model = Model::Gpt4o;
        store.get_or_create(42);
        store.get_or_create(42);
        assert_eq!(store.sessions.len(), 1);
        assert_eq!(store.get_or_create(42).model, Model::Gpt4o);
    }

    #[test]
    fn test_get_mut_does_not_create() {
        let mut store = SessionStore::new();
        assert!(store.get_mut(7).is_none());
        store.get_or_create(7);
        assert!(store.get_mut(7).is_some());
        assert_eq!(store.sessions.len(), 1);
    }

    #[test]
    fn test_sessions_are_independent_per_chat() {
        let mut store = SessionStore::new();
        store.get_or_create(1).last_question = "from chat 1".to_string();
        assert_eq!(store.get_or_create(2).last_question, "");
    }
}
