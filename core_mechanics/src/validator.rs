//! Turn validation.
//!
//! [`validate`] decides, without touching the board, whether a turn is
//! accepted and what it will change. The board applies the returned
//! [`Resolution`] as a whole or not at all.

use serde::{Deserialize, Serialize};

use super::bank::Funds;
use super::board::Board;
use super::card::{Card, CardId, CardLevel};
use super::config::ReserveGold;
use super::error::TurnError;
use super::noble::{eligible_nobles, NobleId};
use super::player::{Player, PlayerId};
use super::token::Token;
use super::turn::{Action, ContinueAction, Turn};

/// Where the board stands in the turn protocol. Anything but `AwaitingTurn`
/// means the named player owes a follow-up before turn order moves on.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    #[default]
    AwaitingTurn,
    AwaitingTokenReturn {
        player: PlayerId,
        excess: u8,
    },
    AwaitingNobleChoice {
        player: PlayerId,
        eligible: Vec<NobleId>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSource {
    ForSale { level: CardLevel, slot: usize },
    Reserved { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReserveSource {
    ForSale { level: CardLevel, slot: usize },
    Stack(CardLevel),
}

/// A validated change, ready to be applied to the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    TakeTokens {
        taken: Funds,
    },
    ReturnTokens {
        returned: Funds,
    },
    Purchase {
        source: CardSource,
        payment: Funds,
    },
    Reserve {
        source: ReserveSource,
        gold: bool,
    },
    ClaimNoble {
        noble: NobleId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub mutation: Mutation,
    /// The one noble the player qualifies for once the mutation is applied.
    pub noble: Option<NobleId>,
    pub continuation: Option<ContinueAction>,
}

impl Resolution {
    fn complete(mutation: Mutation) -> Self {
        Self {
            mutation,
            noble: None,
            continuation: None,
        }
    }

    /// Nobles are visited whenever a turn is about to end: a pending
    /// follow-up postpones the visit, one eligible noble comes along with
    /// the turn, several must be chosen between.
    fn end_of_turn(
        board: &Board,
        card_tokens: &Funds,
        mutation: Mutation,
        continuation: Option<ContinueAction>,
    ) -> Self {
        if continuation.is_some() {
            return Self {
                mutation,
                noble: None,
                continuation,
            };
        }

        let eligible = eligible_nobles(board.nobles(), card_tokens);
        let (noble, continuation) = match eligible.as_slice() {
            [] => (None, None),
            [only] => (Some(*only), None),
            _ => (None, Some(ContinueAction::ChooseNoble { eligible })),
        };
        Self {
            mutation,
            noble,
            continuation,
        }
    }
}

pub fn validate(board: &Board, turn: &Turn) -> Result<Resolution, TurnError> {
    if board.is_game_over() {
        return Err(TurnError::GameOver);
    }
    if board.is_paused() {
        return Err(TurnError::GamePaused);
    }

    match board.turn_state() {
        TurnState::AwaitingTurn => {
            let player = board.current_player();
            if turn.player != player.id {
                return Err(TurnError::NotYourTurn);
            }
            match &turn.action {
                Action::TakeTokens(requested) => validate_take(board, player, requested),
                Action::Purchase(card_id) => validate_purchase(board, player, card_id),
                Action::Reserve(card_id) => {
                    let (level, slot, _) = board
                        .card_from_board(card_id)
                        .ok_or(TurnError::CardNotFound)?;
                    validate_reserve(board, player, ReserveSource::ForSale { level, slot })
                }
                Action::ReserveFromStack(level) => {
                    let has_cards = board
                        .row(*level)
                        .is_some_and(|row| !row.stack().is_empty());
                    if !has_cards {
                        return Err(TurnError::EmptyStack(*level));
                    }
                    validate_reserve(board, player, ReserveSource::Stack(*level))
                }
                Action::ClaimNoble(_) => Err(TurnError::InvalidNobleChoice),
                Action::ReturnTokens(_) => Err(TurnError::ActionNotPermittedInCurrentState),
            }
        }
        TurnState::AwaitingTokenReturn { player, excess } => {
            let player = pending_player(board, turn, player)?;
            match &turn.action {
                Action::ReturnTokens(returned) => {
                    validate_return(board, player, *excess, returned)
                }
                _ => Err(TurnError::ActionNotPermittedInCurrentState),
            }
        }
        TurnState::AwaitingNobleChoice { player, eligible } => {
            let player = pending_player(board, turn, player)?;
            match &turn.action {
                Action::ClaimNoble(noble_id) => validate_claim(board, player, eligible, noble_id),
                _ => Err(TurnError::ActionNotPermittedInCurrentState),
            }
        }
    }
}

fn pending_player<'a>(
    board: &'a Board,
    turn: &Turn,
    pending: &PlayerId,
) -> Result<&'a Player, TurnError> {
    if &turn.player != pending {
        return Err(TurnError::NotYourTurn);
    }
    board.player(pending).ok_or(TurnError::NotYourTurn)
}

fn overflow(player: &Player, incoming: u32, limit: u8) -> Option<ContinueAction> {
    let after = player.token_count() + incoming;
    let excess = after.saturating_sub(u32::from(limit));
    (excess > 0).then(|| ContinueAction::ReturnTokens {
        excess: u8::try_from(excess).unwrap_or(u8::MAX),
    })
}

fn validate_take(
    board: &Board,
    player: &Player,
    requested: &Funds,
) -> Result<Resolution, TurnError> {
    let config = board.config();
    Funds::can_take(board.bank(), requested, config)?;

    let continuation = overflow(player, requested.total(), config.max_tokens_per_player);
    Ok(Resolution::end_of_turn(
        board,
        &player.card_tokens(),
        Mutation::TakeTokens {
            taken: requested.clone(),
        },
        continuation,
    ))
}

fn find_purchasable<'a>(
    board: &'a Board,
    player: &'a Player,
    card_id: &CardId,
) -> Option<(CardSource, &'a Card)> {
    if let Some((level, slot, card)) = board.card_from_board(card_id) {
        return Some((CardSource::ForSale { level, slot }, card));
    }
    player
        .reserved_cards
        .iter()
        .position(|card| &card.id == card_id)
        .map(|index| {
            (
                CardSource::Reserved { index },
                &player.reserved_cards[index],
            )
        })
}

fn validate_purchase(
    board: &Board,
    player: &Player,
    card_id: &CardId,
) -> Result<Resolution, TurnError> {
    let (source, card) = find_purchasable(board, player, card_id).ok_or(TurnError::CardNotFound)?;
    let payment = player.payment_for(card)?;

    // A purchase never adds tokens, so it cannot overflow.
    let card_tokens = player.card_tokens() + Funds::of(card.produces, 1);
    Ok(Resolution::end_of_turn(
        board,
        &card_tokens,
        Mutation::Purchase { source, payment },
        None,
    ))
}

fn validate_reserve(
    board: &Board,
    player: &Player,
    source: ReserveSource,
) -> Result<Resolution, TurnError> {
    let config = board.config();
    if player.reserved_cards.len() >= config.max_reserved_cards {
        return Err(TurnError::TooManyReservedCards);
    }

    let gold = board.bank().get(Token::Gold) > 0;
    if !gold && config.reserve_gold == ReserveGold::Required {
        return Err(TurnError::GoldPoolExhausted);
    }

    let continuation = if gold {
        overflow(player, 1, config.max_tokens_per_player)
    } else {
        None
    };
    Ok(Resolution::end_of_turn(
        board,
        &player.card_tokens(),
        Mutation::Reserve { source, gold },
        continuation,
    ))
}

fn validate_return(
    board: &Board,
    player: &Player,
    excess: u8,
    returned: &Funds,
) -> Result<Resolution, TurnError> {
    if returned.total() != u32::from(excess) || !player.tokens.covers(returned) {
        return Err(TurnError::InvalidReturnAmount);
    }
    Ok(Resolution::end_of_turn(
        board,
        &player.card_tokens(),
        Mutation::ReturnTokens {
            returned: returned.clone(),
        },
        None,
    ))
}

fn validate_claim(
    board: &Board,
    player: &Player,
    eligible: &[NobleId],
    noble_id: &NobleId,
) -> Result<Resolution, TurnError> {
    if !eligible.contains(noble_id) {
        return Err(TurnError::InvalidNobleChoice);
    }
    let noble = board.noble(noble_id).ok_or(TurnError::InvalidNobleChoice)?;
    if !player.can_acquire(noble) {
        return Err(TurnError::NobleCriteriaNotMet);
    }
    // One noble per turn: claiming ends the turn without another visit.
    Ok(Resolution::complete(Mutation::ClaimNoble { noble: *noble_id }))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::config::RuleConfig;
    use crate::noble::Noble;

    fn get_card(n: u8, produces: Token) -> Card {
        Card::new(
            CardId::new(format!("1-{:03}", n)),
            CardLevel::One,
            produces,
            1,
            Funds::gems(0, 0, 1, 1, 0),
        )
    }

    fn get_board(p1: Player, nobles: Vec<Noble>, config: RuleConfig) -> Board {
        let p2 = Player::new(PlayerId::new(2), "bob");
        let decks = HashMap::from([(
            CardLevel::One,
            (1..=5).map(|n| get_card(n, Token::Ruby)).collect(),
        )]);
        Board::new(
            vec![p1, p2],
            Funds::new(4, 4, 4, 4, 4, 5),
            decks,
            nobles,
            config,
        )
        .unwrap()
    }

    fn get_default_board() -> Board {
        get_board(
            Player::new(PlayerId::new(1), "ada"),
            vec![],
            RuleConfig::default(),
        )
    }

    #[test]
    fn only_the_current_player_may_act() {
        let board = get_default_board();
        let turn = Turn::take_tokens(PlayerId::new(2), Funds::gems(1, 1, 1, 0, 0));
        assert_eq!(validate(&board, &turn), Err(TurnError::NotYourTurn));
    }

    #[test]
    fn follow_up_actions_are_rejected_outside_a_continuation() {
        let board = get_default_board();
        let turn = Turn::claim_noble(PlayerId::new(1), NobleId::new(1));
        assert_eq!(validate(&board, &turn), Err(TurnError::InvalidNobleChoice));

        let turn = Turn::return_tokens(PlayerId::new(1), Funds::gems(1, 0, 0, 0, 0));
        assert_eq!(
            validate(&board, &turn),
            Err(TurnError::ActionNotPermittedInCurrentState)
        );
    }

    #[test]
    fn take_over_the_limit_asks_for_a_return() {
        let player = Player::new(PlayerId::new(1), "ada").with_tokens(Funds::new(2, 2, 2, 2, 1, 0));
        let board = get_board(player, vec![], RuleConfig::default());

        let turn = Turn::take_tokens(PlayerId::new(1), Funds::gems(2, 0, 0, 0, 0));
        let resolution = validate(&board, &turn).unwrap();
        assert_eq!(
            resolution.continuation,
            Some(ContinueAction::ReturnTokens { excess: 1 })
        );
        assert_eq!(
            resolution.mutation,
            Mutation::TakeTokens {
                taken: Funds::gems(2, 0, 0, 0, 0)
            }
        );
    }

    #[test]
    fn nobles_are_visited_at_the_end_of_any_turn() {
        let mut player = Player::new(PlayerId::new(1), "ada");
        player.cards = vec![get_card(50, Token::Ruby), get_card(51, Token::Ruby)];
        let nobles = vec![
            Noble::new(NobleId::new(1), Funds::gems(0, 0, 0, 2, 0)),
            Noble::new(NobleId::new(2), Funds::gems(0, 0, 0, 1, 0)),
            Noble::new(NobleId::new(3), Funds::gems(0, 0, 0, 3, 0)),
        ];
        let board = get_board(player.clone(), nobles.clone(), RuleConfig::default());

        let turn = Turn::take_tokens(PlayerId::new(1), Funds::gems(1, 0, 0, 0, 0));
        let resolution = validate(&board, &turn).unwrap();
        assert_eq!(resolution.noble, None);
        assert_eq!(
            resolution.continuation,
            Some(ContinueAction::ChooseNoble {
                eligible: vec![NobleId::new(1), NobleId::new(2)]
            })
        );

        let board = get_board(player, nobles[..1].to_vec(), RuleConfig::default());
        let turn = Turn::reserve_from_stack(PlayerId::new(1), CardLevel::One);
        let resolution = validate(&board, &turn).unwrap();
        assert_eq!(resolution.noble, Some(NobleId::new(1)));
        assert_eq!(resolution.continuation, None);
    }

    #[test]
    fn an_owed_return_postpones_the_noble_visit() {
        let mut player =
            Player::new(PlayerId::new(1), "ada").with_tokens(Funds::new(2, 2, 2, 2, 2, 0));
        player.cards = vec![get_card(50, Token::Ruby)];
        let nobles = vec![Noble::new(NobleId::new(1), Funds::gems(0, 0, 0, 1, 0))];
        let board = get_board(player, nobles, RuleConfig::default());

        let turn = Turn::take_tokens(PlayerId::new(1), Funds::gems(1, 0, 0, 0, 0));
        let resolution = validate(&board, &turn).unwrap();
        assert_eq!(resolution.noble, None);
        assert_eq!(
            resolution.continuation,
            Some(ContinueAction::ReturnTokens { excess: 1 })
        );
    }

    #[test]
    fn purchase_resolves_the_single_eligible_noble() {
        let mut player = Player::new(PlayerId::new(1), "ada").with_tokens(Funds::gems(0, 0, 1, 1, 0));
        player.cards = vec![get_card(50, Token::Ruby)];
        let noble = Noble::new(NobleId::new(7), Funds::gems(0, 0, 0, 2, 0));
        let board = get_board(player, vec![noble], RuleConfig::default());

        let turn = Turn::purchase(PlayerId::new(1), CardId::new("1-001"));
        let resolution = validate(&board, &turn).unwrap();
        assert_eq!(resolution.continuation, None);
        assert_eq!(resolution.noble, Some(NobleId::new(7)));
        assert_eq!(
            resolution.mutation,
            Mutation::Purchase {
                source: CardSource::ForSale {
                    level: CardLevel::One,
                    slot: 0
                },
                payment: Funds::gems(0, 0, 1, 0, 0),
            }
        );
    }

    #[test]
    fn reserve_without_gold_follows_the_configured_policy() {
        let player = Player::new(PlayerId::new(1), "ada");
        let board = get_board(player.clone(), vec![], RuleConfig::default());
        let board = Board::with_bank(board, Funds::new(4, 4, 4, 4, 4, 0));

        let turn = Turn::reserve(PlayerId::new(1), CardId::new("1-002"));
        let resolution = validate(&board, &turn).unwrap();
        assert_eq!(
            resolution.mutation,
            Mutation::Reserve {
                source: ReserveSource::ForSale {
                    level: CardLevel::One,
                    slot: 1
                },
                gold: false
            }
        );

        let config = RuleConfig::default().with_reserve_gold(ReserveGold::Required);
        let board = get_board(player, vec![], config);
        let board = Board::with_bank(board, Funds::new(4, 4, 4, 4, 4, 0));
        assert_eq!(validate(&board, &turn), Err(TurnError::GoldPoolExhausted));
    }

    #[test]
    fn reserve_from_an_empty_or_missing_stack_fails() {
        let board = get_default_board();
        let turn = Turn::reserve_from_stack(PlayerId::new(1), CardLevel::Three);
        assert_eq!(
            validate(&board, &turn),
            Err(TurnError::EmptyStack(CardLevel::Three))
        );
    }
}
