//! The per-chat state machine: command handling, model selection and the
//! one-turn memory window around the completion call.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::bot::latex::Normalizer;
use crate::bot::models::{Model, MENU_TEXT};
use crate::bot::openai;
use crate::bot::openai::{Message, Role};
use crate::bot::session::SessionStore;

const GREETING: &str =
    "Hello! I am AI ChatGPT bot. You can ask me some questions and I will answer!";
const CLEAR_CONFIRMATION: &str = "ChatGPT memory cleared!";

/// Outbound side of the chat platform, kept narrow so tests can fake it.
pub trait Transport: Send + Sync {
    /// Send a text message, optionally threaded to a message id. Returns the
    /// sent message's id.
    fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to_message_id: Option<i64>,
    ) -> impl Future<Output = Result<i64, String>> + Send;

    /// Send the model-selection menu. Returns the sent message's id.
    fn send_model_menu(
        &self,
        chat_id: i64,
        text: &str,
    ) -> impl Future<Output = Result<i64, String>> + Send;

    fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> impl Future<Output = Result<(), String>> + Send;
}

/// Completion backend seam.
pub trait Completer: Send + Sync {
    fn complete(
        &self,
        model: Model,
        messages: &[Message],
    ) -> impl Future<Output = Result<String, openai::Error>> + Send;
}

impl Completer for openai::Client {
    async fn complete(&self, model: Model, messages: &[Message]) -> Result<String, openai::Error> {
        self.chat_completion(model, messages).await
    }
}

/// An inbound text message.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub chat_id: i64,
    pub message_id: i64,
    pub text: String,
}

#[derive(Debug)]
pub enum Error {
    /// Selection event for a chat that never produced a session.
    MissingSession(i64),
    /// Selection event without a payload.
    MissingPayload,
    /// Selection event but no menu message was recorded for the chat.
    MissingMenuReference(i64),
    /// Selection payload is not a supported model id.
    UnknownModel(String),
    Completion(openai::Error),
    Transport(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MissingSession(chat_id) => {
                write!(f, "no session for chat {chat_id}")
            }
            Error::MissingPayload => write!(f, "selection event carries no payload"),
            Error::MissingMenuReference(chat_id) => {
                write!(f, "no menu message recorded for chat {chat_id}")
            }
            Error::UnknownModel(id) => write!(f, "unknown model id '{id}'"),
            Error::Completion(e) => write!(f, "completion failed: {e}"),
            Error::Transport(e) => write!(f, "transport failed: {e}"),
        }
    }
}

impl std::error::Error for Error {}

/// The dispatcher. Owns the session store; transport and completer are
/// injected at construction.
pub struct Engine<T, C> {
    transport: Arc<T>,
    completer: C,
    sessions: Mutex<SessionStore>,
    normalizer: Normalizer,
}

impl<T: Transport, C: Completer> Engine<T, C> {
    pub fn new(transport: Arc<T>, completer: C) -> Self {
        Self {
            transport,
            completer,
            sessions: Mutex::new(SessionStore::new()),
            normalizer: Normalizer::new(),
        }
    }

    /// Handle an inbound text message: a reserved command or a query.
    pub async fn handle_message(&self, msg: IncomingMessage) -> Result<(), Error> {
        match msg.text.as_str() {
            "/start" => {
                self.sessions.lock().await.get_or_create(msg.chat_id);
                self.transport
                    .send_message(msg.chat_id, GREETING, None)
                    .await
                    .map_err(Error::Transport)?;
                Ok(())
            }
            "/model" => {
                self.sessions.lock().await.get_or_create(msg.chat_id);
                let menu_id = self
                    .transport
                    .send_model_menu(msg.chat_id, MENU_TEXT)
                    .await
                    .map_err(Error::Transport)?;
                self.sessions
                    .lock()
                    .await
                    .get_or_create(msg.chat_id)
                    .pending_menu_message_id = Some(menu_id);
                Ok(())
            }
            "/clear" => {
                // Blanks only the stored completion; the stored question is
                // left in place and still enters the next context window.
                self.sessions
                    .lock()
                    .await
                    .get_or_create(msg.chat_id)
                    .last_completion
                    .clear();
                self.transport
                    .send_message(msg.chat_id, CLEAR_CONFIRMATION, None)
                    .await
                    .map_err(Error::Transport)?;
                Ok(())
            }
            _ => self.handle_query(msg).await,
        }
    }

    async fn handle_query(&self, msg: IncomingMessage) -> Result<(), Error> {
        let (model, context) = {
            let mut sessions = self.sessions.lock().await;
            let session = sessions.get_or_create(msg.chat_id);
            let context = vec![
                Message {
                    role: Role::User,
                    content: session.last_question.clone(),
                },
                Message {
                    role: Role::Assistant,
                    content: session.last_completion.clone(),
                },
                Message {
                    role: Role::User,
                    content: msg.text.clone(),
                },
            ];
            (session.model, context)
        };

        info!("Query from chat {} using {}", msg.chat_id, model);

        // The lock is not held across the completion and send awaits, so a
        // second message from the same chat can interleave with this one and
        // race the memory update. Last writer wins.
        let answer = self
            .completer
            .complete(model, &context)
            .await
            .map_err(Error::Completion)?;
        let answer = self.normalizer.normalize(&answer);

        self.transport
            .send_message(msg.chat_id, &answer, Some(msg.message_id))
            .await
            .map_err(Error::Transport)?;

        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_or_create(msg.chat_id);
        session.last_question = msg.text;
        session.last_completion = answer;
        Ok(())
    }

    /// Handle a menu button press carrying a model id payload.
    pub async fn handle_selection(
        &self,
        chat_id: i64,
        payload: Option<&str>,
    ) -> Result<(), Error> {
        let (menu_id, label) = {
            let mut sessions = self.sessions.lock().await;
            let session = sessions
                .get_mut(chat_id)
                .ok_or(Error::MissingSession(chat_id))?;
            let id = payload.ok_or(Error::MissingPayload)?;
            let model = Model::from_id(id).ok_or_else(|| Error::UnknownModel(id.to_string()))?;
            session.model = model;
            let menu_id = session
                .pending_menu_message_id
                .ok_or(Error::MissingMenuReference(chat_id))?;
            (menu_id, model.label())
        };

        info!("Chat {} switched to {}", chat_id, label);

        self.transport
            .edit_message_text(chat_id, menu_id, &format!("Model selected: {label}"))
            .await
            .map_err(Error::Transport)
    }
}
