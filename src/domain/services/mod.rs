pub mod matching;
pub mod notification_service;
