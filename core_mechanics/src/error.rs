use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bank::Funds;
use super::card::CardLevel;
use super::token::Token;

/// Why a turn was rejected. Rejection never mutates the board.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnError {
    #[error("the game has ended")]
    GameOver,
    #[error("the game is paused")]
    GamePaused,
    #[error("it is not this player's turn")]
    NotYourTurn,
    #[error("gold can only be obtained by reserving a card")]
    CannotTakeGold,
    #[error("too many tokens taken in a single turn")]
    TooManyTokensTaken,
    #[error("take 1 token, 2 of the same kind, or up to 3 of different kinds")]
    InvalidTokenCombination,
    #[error("too few {0} tokens in the pool to take two")]
    InsufficientPoolForDoubleTake(Token),
    #[error("not enough {0} tokens left in the pool")]
    NotEnoughInPool(Token),
    #[error("not enough tokens to pay for this card")]
    InsufficientTokens { missing: Funds },
    #[error("too many reserved cards")]
    TooManyReservedCards,
    #[error("the level {0} stack is empty")]
    EmptyStack(CardLevel),
    #[error("no gold left to hand out for a reservation")]
    GoldPoolExhausted,
    #[error("that noble cannot be chosen now")]
    InvalidNobleChoice,
    #[error("returned tokens must bring the player back to the token limit exactly")]
    InvalidReturnAmount,
    #[error("card not found")]
    CardNotFound,
    #[error("the player does not meet this noble's criteria")]
    NobleCriteriaNotMet,
    #[error("this action is not permitted while another action is pending")]
    ActionNotPermittedInCurrentState,
}

impl TurnError {
    /// Stable numeric code for callers that cannot match on the enum.
    pub fn code(&self) -> u16 {
        match self {
            TurnError::TooManyTokensTaken => 0,
            TurnError::InsufficientTokens { .. } => 2,
            TurnError::TooManyReservedCards => 3,
            TurnError::InvalidTokenCombination => 4,
            TurnError::NobleCriteriaNotMet => 5,
            TurnError::CannotTakeGold => 6,
            TurnError::InvalidReturnAmount => 7,
            TurnError::GameOver => 8,
            TurnError::NotYourTurn => 9,
            TurnError::InsufficientPoolForDoubleTake(_) => 10,
            TurnError::NotEnoughInPool(_) => 11,
            TurnError::InvalidNobleChoice => 12,
            TurnError::CardNotFound => 13,
            TurnError::ActionNotPermittedInCurrentState => 14,
            TurnError::EmptyStack(_) => 15,
            TurnError::GoldPoolExhausted => 16,
            TurnError::GamePaused => 17,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("a game needs 2 to 4 players, {0} given")]
    UnsupportedPlayerCount(usize),
    #[error("player ids must be unique")]
    DuplicatePlayer,
}
