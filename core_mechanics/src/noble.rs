use serde::{Deserialize, Serialize};

use super::bank::Funds;
use super::token::Token;

pub const NOBLE_PRESTIGE: u8 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Noble {
    pub id: NobleId,
    /// Minimum owned cards per gem kind.
    pub criteria: Funds,
    pub prestige: u8,
}

impl Noble {
    pub fn new(id: NobleId, criteria: Funds) -> Self {
        let mut criteria = criteria;
        criteria.set(Token::Gold, 0);
        Self {
            id,
            criteria,
            prestige: NOBLE_PRESTIGE,
        }
    }

    /// `card_tokens` is the per-kind count of cards a player owns.
    pub fn is_satisfied_by(&self, card_tokens: &Funds) -> bool {
        card_tokens.covers(&self.criteria)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NobleId(u8);

impl NobleId {
    pub fn new(id: u8) -> Self {
        Self(id)
    }
}

/// Nobles still in play whose criteria `card_tokens` meets, in board order.
pub fn eligible_nobles(nobles: &[Noble], card_tokens: &Funds) -> Vec<NobleId> {
    nobles
        .iter()
        .filter(|noble| noble.is_satisfied_by(card_tokens))
        .map(|noble| noble.id)
        .collect()
}
