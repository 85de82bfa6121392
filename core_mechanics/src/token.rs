use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Token {
    Diamond,
    Sapphire,
    Emerald,
    Ruby,
    Onyx,
    Gold,
}

impl Token {
    /// Every kind, gold last.
    pub const ALL: [Token; 6] = [
        Token::Diamond,
        Token::Sapphire,
        Token::Emerald,
        Token::Ruby,
        Token::Onyx,
        Token::Gold,
    ];

    /// The five kinds that cards produce and prices and nobles are expressed in.
    pub const GEMS: [Token; 5] = [
        Token::Diamond,
        Token::Sapphire,
        Token::Emerald,
        Token::Ruby,
        Token::Onyx,
    ];
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Token::Diamond => "diamond",
            Token::Sapphire => "sapphire",
            Token::Emerald => "emerald",
            Token::Ruby => "ruby",
            Token::Onyx => "onyx",
            Token::Gold => "gold",
        };
        write!(f, "{}", name)
    }
}
