pub mod format;
pub mod telegram;

pub use format::MessageFormatter;
pub use telegram::TelegramNotifier;
