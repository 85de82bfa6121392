pub mod config;
pub mod handler;
pub mod message;
pub mod store;
