pub mod bank;
pub mod board;
pub mod card;
pub mod config;
pub mod deck;
pub mod error;
pub mod noble;
pub mod player;
pub mod token;
pub mod turn;
pub mod validator;

#[cfg(feature = "original-game")]
pub mod original_game;
