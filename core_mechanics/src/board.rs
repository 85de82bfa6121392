use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::slice::Iter;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use super::bank::Funds;
use super::card::{Card, CardId, CardLevel};
use super::config::RuleConfig;
use super::deck::{CardRow, CardStack};
use super::error::{SetupError, TurnError};
use super::noble::{Noble, NobleId};
use super::player::{Player, PlayerId};
use super::token::Token;
use super::turn::{CompletedTurn, ContinueAction, Turn, TurnRecord};
use super::validator::{self, CardSource, Mutation, ReserveSource, TurnState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Winner(PlayerId),
    Draw(Vec<PlayerId>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundType {
    Normal,
    LastRound,
}

/// What a continuation-producing turn touched, as it was before the turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct TurnSnapshot {
    bank: Funds,
    player: Player,
    rows: HashMap<CardLevel, CardRow>,
    nobles: Vec<Noble>,
    last_turn: Option<TurnRecord>,
    /// History entries from this index on belong to the pending turn.
    history_len: usize,
}

/// The authoritative state of one game.
///
/// A `Board` does no I/O and holds no shared state; callers serialise access
/// to it and use [`Board::version`] for optimistic concurrency against their
/// own storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    players: Vec<Player>,
    player_turn: usize,
    bank: Funds,
    rows: HashMap<CardLevel, CardRow>,
    nobles: Vec<Noble>,
    config: RuleConfig,
    turn_state: TurnState,
    pending: Option<TurnSnapshot>,
    version: u64,
    history: Vec<TurnRecord>,
    last_turn: Option<TurnRecord>,
    round_type: RoundType,
    game_over: bool,
    paused: bool,
    created_at: SystemTime,
}

impl Board {
    /// `decks` holds each level's cards in draw order. The visible windows
    /// are dealt from them immediately.
    pub fn new(
        players: Vec<Player>,
        bank: Funds,
        decks: HashMap<CardLevel, Vec<Card>>,
        nobles: Vec<Noble>,
        config: RuleConfig,
    ) -> Result<Self, SetupError> {
        if players.is_empty() {
            return Err(SetupError::UnsupportedPlayerCount(0));
        }
        let mut seen = HashSet::new();
        if !players.iter().all(|p| seen.insert(p.id)) {
            return Err(SetupError::DuplicatePlayer);
        }

        let mut decks = decks;
        let rows = CardLevel::ALL
            .into_iter()
            .map(|level| {
                let stack = CardStack::new(decks.remove(&level).unwrap_or_default());
                (level, CardRow::deal(stack, config.visible_cards_per_level))
            })
            .collect();

        Ok(Self {
            players,
            player_turn: 0,
            bank,
            rows,
            nobles,
            config,
            turn_state: TurnState::AwaitingTurn,
            pending: None,
            version: 0,
            history: vec![],
            last_turn: None,
            round_type: RoundType::Normal,
            game_over: false,
            paused: false,
            created_at: SystemTime::now(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_bank(self, bank: Funds) -> Self {
        Self { bank, ..self }
    }

    pub fn get_players(&self) -> Iter<Player> {
        self.players.iter()
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.player_turn]
    }

    pub fn current_player_index(&self) -> usize {
        self.player_turn
    }

    pub fn bank(&self) -> &Funds {
        &self.bank
    }

    pub fn row(&self, level: CardLevel) -> Option<&CardRow> {
        self.rows.get(&level)
    }

    pub fn nobles(&self) -> &[Noble] {
        &self.nobles
    }

    pub fn noble(&self, id: &NobleId) -> Option<&Noble> {
        self.nobles.iter().find(|noble| &noble.id == id)
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn turn_state(&self) -> &TurnState {
        &self.turn_state
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    pub fn last_turn(&self) -> Option<&TurnRecord> {
        self.last_turn.as_ref()
    }

    pub fn is_last_round(&self) -> bool {
        self.round_type == RoundType::LastRound
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    pub fn get_card_from_board(&self, card_id: &CardId) -> Option<&Card> {
        self.card_from_board(card_id).map(|(_, _, card)| card)
    }

    /// Level and slot of a face-up card.
    pub fn card_from_board(&self, card_id: &CardId) -> Option<(CardLevel, usize, &Card)> {
        self.rows.iter().find_map(|(level, row)| {
            let slot = row.position(card_id)?;
            let card = row.slots()[slot].as_ref()?;
            Some((*level, slot, card))
        })
    }

    /// Pool plus every player's holdings. Constant over a game.
    pub fn tokens_in_play(&self) -> Funds {
        self.players
            .iter()
            .fold(self.bank.clone(), |total, p| total + p.tokens.clone())
    }

    /// Validates `turn` and applies it. A rejected turn leaves the board
    /// untouched; an accepted one bumps the version exactly once, whether
    /// it finished the turn or left a follow-up pending.
    pub fn execute_turn(&mut self, turn: Turn) -> Result<CompletedTurn, TurnError> {
        let resolution = validator::validate(self, &turn)?;

        // A follow-up that asks for another follow-up keeps the snapshot
        // from before the whole turn.
        let snapshot = match (&resolution.continuation, self.pending.take()) {
            (Some(_), Some(earlier)) => Some(earlier),
            (Some(_), None) => Some(self.snapshot()),
            (None, _) => None,
        };
        let (consumed_tokens, claimed) = self.apply(resolution.mutation);
        let noble_granted = match resolution.noble {
            Some(noble_id) => self.grant_noble(&noble_id),
            None => claimed,
        };

        self.version += 1;
        let record = TurnRecord {
            version: self.version,
            turn,
            continue_action: resolution.continuation.clone(),
            cancelled: false,
        };
        self.history.push(record.clone());
        self.last_turn = Some(record);

        if let Some(continuation) = &resolution.continuation {
            let player = self.current_player().id;
            self.turn_state = match continuation {
                ContinueAction::ReturnTokens { excess } => TurnState::AwaitingTokenReturn {
                    player,
                    excess: *excess,
                },
                ContinueAction::ChooseNoble { eligible } => TurnState::AwaitingNobleChoice {
                    player,
                    eligible: eligible.clone(),
                },
            };
            self.pending = snapshot;
        } else {
            self.turn_state = TurnState::AwaitingTurn;
            self.pending = None;
            self.advance_turn();
        }

        Ok(CompletedTurn {
            continue_action: resolution.continuation,
            consumed_tokens,
            noble_granted,
            game_over: self.game_over,
        })
    }

    /// Undoes the turn that left a follow-up pending, including any
    /// follow-ups already given. Turn order and the version are not
    /// touched; the undone history entries are kept and marked cancelled.
    /// Returns false when nothing is pending.
    pub fn cancel_pending_turn(&mut self) -> bool {
        let Some(snapshot) = self.pending.take() else {
            return false;
        };

        self.bank = snapshot.bank;
        self.players[self.player_turn] = snapshot.player;
        self.rows = snapshot.rows;
        self.nobles = snapshot.nobles;
        self.last_turn = snapshot.last_turn;
        for record in self.history.iter_mut().skip(snapshot.history_len) {
            record.cancelled = true;
        }
        self.turn_state = TurnState::AwaitingTurn;
        true
    }

    /// The winner once the game is over: most prestige, then fewest owned
    /// cards, then the earliest seat.
    pub fn winner(&self) -> Option<&Player> {
        if !self.game_over {
            return None;
        }
        self.players
            .iter()
            .enumerate()
            .min_by_key(|(seat, p)| (Reverse(p.prestige()), p.cards.len(), *seat))
            .map(|(_, p)| p)
    }

    /// Like [`Board::winner`], but reports a draw when the card count tie
    /// break does not separate the leaders.
    pub fn result(&self) -> Option<Winner> {
        if !self.game_over {
            return None;
        }
        let max_points = self.players.iter().map(Player::prestige).max()?;
        let possible_winners: Vec<&Player> = self
            .players
            .iter()
            .filter(|p| p.prestige() == max_points)
            .collect();

        let least_amount_of_cards = possible_winners.iter().map(|p| p.cards.len()).min()?;
        let winners: Vec<PlayerId> = possible_winners
            .into_iter()
            .filter(|p| p.cards.len() == least_amount_of_cards)
            .map(|p| p.id)
            .collect();

        match winners.as_slice() {
            [only] => Some(Winner::Winner(*only)),
            _ => Some(Winner::Draw(winners)),
        }
    }

    fn snapshot(&self) -> TurnSnapshot {
        TurnSnapshot {
            bank: self.bank.clone(),
            player: self.current_player().clone(),
            rows: self.rows.clone(),
            nobles: self.nobles.clone(),
            last_turn: self.last_turn.clone(),
            history_len: self.history.len(),
        }
    }

    fn apply(&mut self, mutation: Mutation) -> (Funds, Option<NobleId>) {
        let turn = self.player_turn;
        match mutation {
            Mutation::TakeTokens { taken } => {
                move_tokens(&mut self.bank, &mut self.players[turn].tokens, &taken);
                (Funds::empty(), None)
            }
            Mutation::ReturnTokens { returned } => {
                move_tokens(&mut self.players[turn].tokens, &mut self.bank, &returned);
                (returned, None)
            }
            Mutation::Purchase { source, payment } => {
                move_tokens(&mut self.players[turn].tokens, &mut self.bank, &payment);
                let card = match source {
                    CardSource::ForSale { level, slot } => {
                        self.rows.get_mut(&level).and_then(|row| row.take(slot))
                    }
                    CardSource::Reserved { index } => {
                        Some(self.players[turn].reserved_cards.remove(index))
                    }
                };
                if let Some(card) = card {
                    self.players[turn].cards.push(card);
                }
                (payment, None)
            }
            Mutation::Reserve { source, gold } => {
                let card = match source {
                    ReserveSource::ForSale { level, slot } => {
                        self.rows.get_mut(&level).and_then(|row| row.take(slot))
                    }
                    ReserveSource::Stack(level) => {
                        self.rows.get_mut(&level).and_then(CardRow::draw_blind)
                    }
                };
                if let Some(card) = card {
                    self.players[turn].reserved_cards.push(card);
                }
                if gold {
                    let one_gold = Funds::of(Token::Gold, 1);
                    move_tokens(&mut self.bank, &mut self.players[turn].tokens, &one_gold);
                }
                (Funds::empty(), None)
            }
            Mutation::ClaimNoble { noble } => (Funds::empty(), self.grant_noble(&noble)),
        }
    }

    fn grant_noble(&mut self, noble_id: &NobleId) -> Option<NobleId> {
        let index = self.nobles.iter().position(|n| &n.id == noble_id)?;
        let noble = self.nobles.remove(index);
        self.players[self.player_turn].nobles.push(noble);
        Some(*noble_id)
    }

    fn advance_turn(&mut self) {
        let threshold = u16::from(self.config.winning_prestige);
        if self.players.iter().any(|p| p.prestige() >= threshold) {
            self.round_type = RoundType::LastRound;
        }

        self.player_turn = (self.player_turn + 1) % self.players.len();

        if self.round_type == RoundType::LastRound && self.player_turn == 0 {
            self.game_over = true;
        }
    }
}

/// Moves validated amounts between two ledgers.
fn move_tokens(from: &mut Funds, to: &mut Funds, amount: &Funds) {
    debug_assert!(from.covers(amount), "moving more tokens than held");
    for (token, quantity) in amount.non_empty() {
        from.set(token, from.get(token).saturating_sub(quantity));
        to.set(token, to.get(token) + quantity);
    }
}
