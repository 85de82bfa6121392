use serde::{Deserialize, Serialize};

use super::bank::Funds;
use super::card::{CardId, CardLevel};
use super::noble::NobleId;
use super::player::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    TakeTokens(Funds),
    /// Only legal while the player is asked to give back excess tokens.
    ReturnTokens(Funds),
    /// A face-up card or one of the player's reserved cards.
    Purchase(CardId),
    Reserve(CardId),
    /// Reserve the top card of a stack without seeing it.
    ReserveFromStack(CardLevel),
    /// Only legal while the player is asked to choose among nobles.
    ClaimNoble(NobleId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub player: PlayerId,
    pub action: Action,
}

impl Turn {
    pub fn new(player: PlayerId, action: Action) -> Self {
        Self { player, action }
    }

    pub fn take_tokens(player: PlayerId, tokens: Funds) -> Self {
        Self::new(player, Action::TakeTokens(tokens))
    }

    pub fn return_tokens(player: PlayerId, tokens: Funds) -> Self {
        Self::new(player, Action::ReturnTokens(tokens))
    }

    pub fn purchase(player: PlayerId, card_id: CardId) -> Self {
        Self::new(player, Action::Purchase(card_id))
    }

    pub fn reserve(player: PlayerId, card_id: CardId) -> Self {
        Self::new(player, Action::Reserve(card_id))
    }

    pub fn reserve_from_stack(player: PlayerId, level: CardLevel) -> Self {
        Self::new(player, Action::ReserveFromStack(level))
    }

    pub fn claim_noble(player: PlayerId, noble_id: NobleId) -> Self {
        Self::new(player, Action::ClaimNoble(noble_id))
    }
}

/// The follow-up a player owes before their turn is over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContinueAction {
    /// The player holds `excess` tokens over the limit and must return them.
    ReturnTokens { excess: u8 },
    /// More than one noble can be claimed; exactly one must be chosen.
    ChooseNoble { eligible: Vec<NobleId> },
}

impl ContinueAction {
    pub fn code(&self) -> u16 {
        match self {
            ContinueAction::ReturnTokens { .. } => 0,
            ContinueAction::ChooseNoble { .. } => 1,
        }
    }
}

/// Outcome of an accepted turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTurn {
    /// Set when the turn is only partially done.
    pub continue_action: Option<ContinueAction>,
    /// Tokens the player paid for a card or gave back to the pool.
    pub consumed_tokens: Funds,
    pub noble_granted: Option<NobleId>,
    pub game_over: bool,
}

impl CompletedTurn {
    pub fn is_complete(&self) -> bool {
        self.continue_action.is_none()
    }
}

/// A history entry: the accepted turn and the board version it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub version: u64,
    pub turn: Turn,
    pub continue_action: Option<ContinueAction>,
    /// Set when the turn was later undone with a cancel.
    #[serde(default)]
    pub cancelled: bool,
}
