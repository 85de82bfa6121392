use std::{collections::HashMap, ops::Add, ops::Sub};

use serde::{Deserialize, Serialize};

use super::config::RuleConfig;
use super::error::TurnError;
use super::token::Token;

/// A count of tokens per kind. Used for the pool, player holdings, card
/// prices and noble criteria alike. Every kind is always present.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(from = "HashMap<Token, u8>", into = "HashMap<Token, u8>")]
pub struct Funds {
    funds: HashMap<Token, u8>,
}

impl Funds {
    pub fn new(diamond: u8, sapphire: u8, emerald: u8, ruby: u8, onyx: u8, gold: u8) -> Self {
        Self {
            funds: HashMap::from([
                (Token::Diamond, diamond),
                (Token::Sapphire, sapphire),
                (Token::Emerald, emerald),
                (Token::Ruby, ruby),
                (Token::Onyx, onyx),
                (Token::Gold, gold),
            ]),
        }
    }

    /// Gem-only funds, the shape of every price and noble criteria.
    pub fn gems(diamond: u8, sapphire: u8, emerald: u8, ruby: u8, onyx: u8) -> Self {
        Self::new(diamond, sapphire, emerald, ruby, onyx, 0)
    }

    pub fn empty() -> Self {
        Self::new(0, 0, 0, 0, 0, 0)
    }

    pub fn of(token: Token, quantity: u8) -> Self {
        let mut funds = Self::empty();
        funds.set(token, quantity);
        funds
    }

    pub fn new_from(funds: HashMap<Token, u8>) -> Self {
        Self {
            funds: Token::ALL
                .iter()
                .map(|token| (*token, *funds.get(token).unwrap_or(&0)))
                .collect(),
        }
    }

    pub fn new_from_list(tokens: Vec<Token>) -> Self {
        let mut funds = Self::empty();
        for t in tokens {
            funds.set(t, funds.get(t) + 1);
        }
        funds
    }

    pub fn get(&self, token: Token) -> u8 {
        *self.funds.get(&token).unwrap_or(&0)
    }

    pub fn set(&mut self, token: Token, quantity: u8) {
        self.funds.insert(token, quantity);
    }

    pub fn total(&self) -> u32 {
        self.funds.values().map(|q| u32::from(*q)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Kinds with a non-zero count, in `Token::ALL` order.
    pub fn non_empty(&self) -> impl Iterator<Item = (Token, u8)> + '_ {
        Token::ALL
            .into_iter()
            .map(|token| (token, self.get(token)))
            .filter(|(_, quantity)| *quantity > 0)
    }

    /// True when every kind here is at least the count in `other`.
    pub fn covers(&self, other: &Funds) -> bool {
        Token::ALL
            .iter()
            .all(|token| self.get(*token) >= other.get(*token))
    }

    /// Checks a take request against the pool. The player-side token limit
    /// is not checked here: exceeding it is a continuation, not a rejection.
    pub fn can_take(pool: &Funds, requested: &Funds, config: &RuleConfig) -> Result<(), TurnError> {
        if requested.get(Token::Gold) > 0 {
            return Err(TurnError::CannotTakeGold);
        }

        let total = requested.total();
        if total == 0 {
            return Err(TurnError::InvalidTokenCombination);
        }

        let kinds: Vec<(Token, u8)> = requested.non_empty().collect();
        if total > u32::from(config.max_tokens_per_take) || kinds.iter().any(|(_, q)| *q > 2) {
            return Err(TurnError::TooManyTokensTaken);
        }

        let double = match kinds.as_slice() {
            [(token, 2)] => Some(*token),
            _ if kinds.iter().all(|(_, q)| *q == 1) => None,
            _ => return Err(TurnError::InvalidTokenCombination),
        };

        if let Some(token) = double {
            if pool.get(token) < config.min_pool_for_double_take {
                return Err(TurnError::InsufficientPoolForDoubleTake(token));
            }
        }

        for (token, quantity) in kinds {
            if quantity > pool.get(token) {
                return Err(TurnError::NotEnoughInPool(token));
            }
        }

        Ok(())
    }
}

impl Default for Funds {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<HashMap<Token, u8>> for Funds {
    fn from(funds: HashMap<Token, u8>) -> Self {
        Self::new_from(funds)
    }
}

impl From<Funds> for HashMap<Token, u8> {
    fn from(funds: Funds) -> Self {
        funds.funds
    }
}

impl From<Funds> for Vec<Token> {
    fn from(funds: Funds) -> Self {
        let mut tokens: Vec<Token> = vec![];
        for (token, quantity) in funds.non_empty() {
            for _ in 0..quantity {
                tokens.push(token)
            }
        }
        tokens
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum FundsSubtractionError {
    NotEnoughFunds(Token),
}

impl Sub<Funds> for Funds {
    type Output = Result<Self, FundsSubtractionError>;

    fn sub(self, rhs: Funds) -> Self::Output {
        let mut funds_remaining = self.clone();

        for (token, quantity) in rhs.non_empty() {
            let current_amount = self.get(token);
            if quantity > current_amount {
                return Err(FundsSubtractionError::NotEnoughFunds(token));
            }
            funds_remaining.set(token, current_amount - quantity);
        }

        Ok(funds_remaining)
    }
}

impl Add<Funds> for Funds {
    type Output = Funds;

    fn add(self, rhs: Funds) -> Self::Output {
        let mut new_funds = self.clone();

        for (token, quantity) in rhs.non_empty() {
            new_funds.set(token, self.get(token).saturating_add(quantity));
        }

        new_funds
    }
}
