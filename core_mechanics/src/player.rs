use std::fmt;

use serde::{Deserialize, Serialize};

use super::bank::Funds;
use super::card::{Card, CardId};
use super::error::TurnError;
use super::noble::Noble;
use super::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(u8);

impl PlayerId {
    pub fn new(id: u8) -> Self {
        Self(id)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub tokens: Funds,
    pub cards: Vec<Card>,
    pub reserved_cards: Vec<Card>,
    pub nobles: Vec<Noble>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tokens: Funds::empty(),
            cards: vec![],
            reserved_cards: vec![],
            nobles: vec![],
        }
    }

    pub fn with_tokens(self, tokens: Funds) -> Self {
        Self { tokens, ..self }
    }

    /// Owned cards counted per produced kind; the discount applied to prices.
    pub fn card_tokens(&self) -> Funds {
        Funds::new_from_list(self.cards.iter().map(|card| card.produces).collect())
    }

    pub fn prestige(&self) -> u16 {
        let from_cards: u16 = self.cards.iter().map(|c| u16::from(c.prestige)).sum();
        let from_nobles: u16 = self.nobles.iter().map(|n| u16::from(n.prestige)).sum();
        from_cards + from_nobles
    }

    pub fn token_count(&self) -> u32 {
        self.tokens.total()
    }

    pub fn reserved_card(&self, card_id: &CardId) -> Option<&Card> {
        self.reserved_cards.iter().find(|card| &card.id == card_id)
    }

    pub fn can_acquire(&self, noble: &Noble) -> bool {
        noble.is_satisfied_by(&self.card_tokens())
    }

    /// Tokens this player would hand over to buy `card`: owned cards are
    /// applied first, then tokens of the matching kind, then gold.
    pub fn payment_for(&self, card: &Card) -> Result<Funds, TurnError> {
        let discounts = self.card_tokens();
        let mut payment = Funds::empty();
        let mut missing = Funds::empty();
        let mut gold_left = self.tokens.get(Token::Gold);

        for gem in Token::GEMS {
            let owed = card.price.get(gem).saturating_sub(discounts.get(gem));
            let from_gem = owed.min(self.tokens.get(gem));
            let short = owed - from_gem;
            let from_gold = short.min(gold_left);
            gold_left -= from_gold;

            payment.set(gem, from_gem);
            payment.set(Token::Gold, payment.get(Token::Gold) + from_gold);
            if short > from_gold {
                missing.set(gem, short - from_gold);
            }
        }

        if missing.is_empty() {
            Ok(payment)
        } else {
            Err(TurnError::InsufficientTokens { missing })
        }
    }
}
