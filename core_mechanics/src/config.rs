use serde::{Deserialize, Serialize};

/// What reserving a card does to the gold pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReserveGold {
    /// Hand out one gold if the pool has any, nothing otherwise.
    #[default]
    WhenAvailable,
    /// Reject the reservation when the pool holds no gold.
    Required,
}

/// Numeric rules of a game. The defaults are the published rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub max_tokens_per_player: u8,
    pub max_reserved_cards: usize,
    pub winning_prestige: u8,
    pub visible_cards_per_level: usize,
    /// Pool size a kind needs before two of it may be taken at once.
    pub min_pool_for_double_take: u8,
    pub max_tokens_per_take: u8,
    pub reserve_gold: ReserveGold,
}

impl RuleConfig {
    pub const DEFAULT_MAX_TOKENS_PER_PLAYER: u8 = 10;
    pub const DEFAULT_MAX_RESERVED_CARDS: usize = 3;
    pub const DEFAULT_WINNING_PRESTIGE: u8 = 15;
    pub const DEFAULT_VISIBLE_CARDS_PER_LEVEL: usize = 4;
    pub const DEFAULT_MIN_POOL_FOR_DOUBLE_TAKE: u8 = 4;
    pub const DEFAULT_MAX_TOKENS_PER_TAKE: u8 = 3;

    pub fn new() -> Self {
        Self {
            max_tokens_per_player: Self::DEFAULT_MAX_TOKENS_PER_PLAYER,
            max_reserved_cards: Self::DEFAULT_MAX_RESERVED_CARDS,
            winning_prestige: Self::DEFAULT_WINNING_PRESTIGE,
            visible_cards_per_level: Self::DEFAULT_VISIBLE_CARDS_PER_LEVEL,
            min_pool_for_double_take: Self::DEFAULT_MIN_POOL_FOR_DOUBLE_TAKE,
            max_tokens_per_take: Self::DEFAULT_MAX_TOKENS_PER_TAKE,
            reserve_gold: ReserveGold::default(),
        }
    }

    pub fn with_reserve_gold(self, reserve_gold: ReserveGold) -> Self {
        Self {
            reserve_gold,
            ..self
        }
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self::new()
    }
}
