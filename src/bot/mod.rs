//! Bot module - relays Telegram messages to the OpenAI completion API.

pub mod engine;
pub mod latex;
pub mod models;
pub mod openai;
pub mod session;
pub mod telegram;

pub use engine::{Engine, IncomingMessage};
pub use telegram::TelegramClient;
