pub mod chat;
pub mod domain;
pub mod progress;
pub mod user;
pub mod word;
