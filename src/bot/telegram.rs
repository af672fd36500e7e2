//! Telegram transport using teloxide.

use teloxide::prelude::*;
use teloxide::types::{
    BotCommand, InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ReplyParameters,
};
use tracing::warn;

use crate::bot::engine::Transport;
use crate::bot::models::Model;

/// Telegram API client.
pub struct TelegramClient {
    bot: Bot,
}

impl TelegramClient {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    /// Register the bot's command list with Telegram.
    pub async fn set_commands(&self) -> Result<(), String> {
        let commands = vec![
            BotCommand::new("start", "Start conversation with the bot"),
            BotCommand::new("model", "Choose the ChatGPT model"),
            BotCommand::new("clear", "Clear memory of the previous exchange"),
        ];

        self.bot
            .set_my_commands(commands)
            .await
            .map(|_| ())
            .map_err(|e| {
                let msg = format!("Failed to set commands: {e}");
                warn!("{}", msg);
                msg
            })
    }
}

/// One button per supported model, laid out in the fixed menu rows.
fn model_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(Model::menu_rows().into_iter().map(|row| {
        row.into_iter()
            .map(|model| InlineKeyboardButton::callback(model.label(), model.as_str()))
    }))
}

impl Transport for TelegramClient {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to_message_id: Option<i64>,
    ) -> Result<i64, String> {
        let chat_id = ChatId(chat_id);
        let mut request = self.bot.send_message(chat_id, text);

        if let Some(msg_id) = reply_to_message_id {
            let reply_params = ReplyParameters::new(MessageId(msg_id as i32));
            request = request.reply_parameters(reply_params);
        }

        request.await.map(|msg| msg.id.0 as i64).map_err(|e| {
            let msg = format!("Failed to send: {e}");
            warn!("{}", msg);
            msg
        })
    }

    async fn send_model_menu(&self, chat_id: i64, text: &str) -> Result<i64, String> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .reply_markup(model_keyboard())
            .await
            .map(|msg| msg.id.0 as i64)
            .map_err(|e| {
                let msg = format!("Failed to send model menu: {e}");
                warn!("{}", msg);
                msg
            })
    }

    async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> Result<(), String> {
        self.bot
            .edit_message_text(ChatId(chat_id), MessageId(message_id as i32), text)
            .await
            .map(|_| ())
            .map_err(|e| {
                let msg = format!("Failed to edit message {message_id}: {e}");
                warn!("{}", msg);
                msg
            })
    }
}
