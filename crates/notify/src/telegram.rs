use async_trait::async_trait;
use teloxide::{requests::Requester, types::ChatId, Bot};
use tracing::debug;

use common::{Error, Notifier, Result};

/// Telegram implementation of [`Notifier`]. The destination chat is fixed
/// at construction; every `send` targets it.
pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramNotifier {
    pub fn new(token: impl Into<String>, chat_id: i64) -> Self {
        Self {
            bot: Bot::new(token.into()),
            chat_id: ChatId(chat_id),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        self.bot
            .send_message(self.chat_id, text)
            .await
            .map_err(|e| Error::Notify(e.to_string()))?;
        debug!(chat_id = self.chat_id.0, chars = text.len(), "Telegram message sent");
        Ok(())
    }
}
