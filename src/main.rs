mod bot;
mod config;

use std::sync::Arc;

use teloxide::prelude::*;
use tracing::{error, info, warn};
use tracing_subscriber::prelude::*;

use bot::openai;
use bot::{Engine, IncomingMessage, TelegramClient};
use config::Config;

type BotEngine = Engine<TelegramClient, openai::Client>;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    // Setup logging
    std::fs::create_dir_all(&config.log_dir).ok();
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_dir.join("gptgram.log"))
        .expect("Failed to open log file");
    let (non_blocking, _guard) = tracing_appender::non_blocking(log_file);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .init();

    info!("🚀 Starting gptgram...");

    let telegram_bot = Bot::new(&config.telegram_bot_token);
    let telegram = Arc::new(TelegramClient::new(telegram_bot.clone()));

    if let Err(e) = telegram.set_commands().await {
        warn!("Could not register command list: {e}");
    }

    let completer = openai::Client::new(config.openai_api_key.clone());
    let engine = Arc::new(Engine::new(telegram, completer));

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(handle_message))
        .branch(Update::filter_callback_query().endpoint(handle_callback_query));

    Dispatcher::builder(telegram_bot, handler)
        .dependencies(dptree::deps![engine])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn handle_message(msg: Message, engine: Arc<BotEngine>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let incoming = IncomingMessage {
        chat_id: msg.chat.id.0,
        message_id: msg.id.0 as i64,
        text: text.to_string(),
    };

    if let Err(e) = engine.handle_message(incoming).await {
        error!("Message from chat {} failed: {e}", msg.chat.id);
    }

    Ok(())
}

async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    engine: Arc<BotEngine>,
) -> ResponseResult<()> {
    // Clear the client-side loading spinner.
    bot.answer_callback_query(query.id.clone()).await.ok();

    // Button presses arrive attached to the menu message; fall back to the
    // sender's id, which equals the chat id in private chats.
    let chat_id = query
        .message
        .as_ref()
        .map(|m| m.chat().id.0)
        .unwrap_or(query.from.id.0 as i64);

    if let Err(e) = engine.handle_selection(chat_id, query.data.as_deref()).await {
        error!("Selection in chat {chat_id} failed: {e}");
    }

    Ok(())
}
