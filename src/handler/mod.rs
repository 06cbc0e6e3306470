pub mod chat;
pub mod jobs;
pub mod notification_handler;
pub mod users;
pub mod wallet;
