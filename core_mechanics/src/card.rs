use std::fmt;

use serde::{Deserialize, Serialize};

use super::bank::Funds;
use super::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CardLevel {
    One,
    Two,
    Three,
}

impl CardLevel {
    pub const ALL: [CardLevel; 3] = [CardLevel::One, CardLevel::Two, CardLevel::Three];

    pub fn number(&self) -> u8 {
        match self {
            CardLevel::One => 1,
            CardLevel::Two => 2,
            CardLevel::Three => 3,
        }
    }
}

impl fmt::Display for CardLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Stable name of a card, unique within a game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(String);

impl CardId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A development card. Immutable once dealt; only its location changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub level: CardLevel,
    pub produces: Token,
    pub prestige: u8,
    pub price: Funds,
}

impl Card {
    pub fn new(id: CardId, level: CardLevel, produces: Token, prestige: u8, price: Funds) -> Self {
        // gold is never part of a price
        let mut price = price;
        price.set(Token::Gold, 0);
        Self {
            id,
            level,
            produces,
            prestige,
            price,
        }
    }
}
