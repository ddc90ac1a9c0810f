pub mod log_notifier;
pub mod telegram_notifier;
