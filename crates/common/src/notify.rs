use async_trait::async_trait;

use crate::Result;

/// Abstraction over the notification channel.
///
/// `TelegramNotifier` in `crates/notify` implements this against the
/// Telegram Bot API; the destination chat is fixed at construction.
/// Delivery failures are logged by the caller and never retried.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;
}
