//! The published game: its card and noble catalog and a seeded deal.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::bank::Funds;
use crate::board::Board;
use crate::card::{Card, CardId, CardLevel};
use crate::config::RuleConfig;
use crate::error::SetupError;
use crate::noble::{Noble, NobleId};
use crate::player::Player;
use crate::token::Token;
use crate::token::Token::{Diamond, Emerald, Onyx, Ruby, Sapphire};

/// Produced kind, prestige and price in diamond, sapphire, emerald, ruby,
/// onyx order.
type CardSpec = (Token, u8, [u8; 5]);

/// Deals a new game. The same seed always deals the same stacks and nobles.
pub fn new_game(
    players: Vec<Player>,
    seed: u64,
    config: RuleConfig,
) -> Result<Board, SetupError> {
    let bank = token_supply(players.len())?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let decks: HashMap<CardLevel, Vec<Card>> = CardLevel::ALL
        .into_iter()
        .map(|level| {
            let mut cards = catalog(level);
            cards.shuffle(&mut rng);
            (level, cards)
        })
        .collect();

    let mut nobles = all_nobles();
    nobles.shuffle(&mut rng);
    nobles.truncate(players.len() + 1);

    Board::new(players, bank, decks, nobles, config)
}

/// The starting pool for a table of `n_of_players`.
pub fn token_supply(n_of_players: usize) -> Result<Funds, SetupError> {
    let gems = match n_of_players {
        2 => 4,
        3 => 5,
        4 => 7,
        n => return Err(SetupError::UnsupportedPlayerCount(n)),
    };
    Ok(Funds::new(gems, gems, gems, gems, gems, 5))
}

/// Every card of a level, in catalog order.
pub fn catalog(level: CardLevel) -> Vec<Card> {
    let specs: &[CardSpec] = match level {
        CardLevel::One => &LEVEL_ONE,
        CardLevel::Two => &LEVEL_TWO,
        CardLevel::Three => &LEVEL_THREE,
    };
    specs
        .iter()
        .enumerate()
        .map(|(i, (produces, prestige, [d, s, e, r, o]))| {
            Card::new(
                CardId::new(format!("{}-{:03}", level.number(), i + 1)),
                level,
                *produces,
                *prestige,
                Funds::gems(*d, *s, *e, *r, *o),
            )
        })
        .collect()
}

pub fn all_nobles() -> Vec<Noble> {
    NOBLES
        .iter()
        .zip(1..)
        .map(|([d, s, e, r, o], id)| {
            Noble::new(NobleId::new(id), Funds::gems(*d, *s, *e, *r, *o))
        })
        .collect()
}

const LEVEL_ONE: [CardSpec; 40] = [
    (Emerald, 0, [2, 2, 0, 0, 0]),
    (Emerald, 0, [1, 1, 0, 1, 2]),
    (Emerald, 0, [1, 1, 0, 1, 1]),
    (Onyx, 0, [0, 0, 3, 0, 0]),
    (Onyx, 1, [0, 4, 0, 0, 0]),
    (Onyx, 0, [1, 2, 1, 1, 0]),
    (Sapphire, 0, [0, 1, 3, 1, 0]),
    (Sapphire, 0, [1, 0, 1, 2, 1]),
    (Sapphire, 0, [0, 0, 2, 0, 2]),
    (Diamond, 0, [0, 2, 0, 0, 2]),
    (Ruby, 0, [3, 0, 0, 0, 0]),
    (Emerald, 1, [0, 0, 0, 0, 4]),
    (Emerald, 0, [1, 3, 1, 0, 0]),
    (Emerald, 0, [0, 1, 0, 2, 2]),
    (Ruby, 0, [1, 0, 0, 1, 3]),
    (Ruby, 1, [4, 0, 0, 0, 0]),
    (Diamond, 0, [0, 3, 0, 0, 0]),
    (Onyx, 0, [0, 0, 2, 2, 0]),
    (Onyx, 0, [0, 0, 1, 3, 1]),
    (Onyx, 0, [2, 0, 2, 0, 0]),
    (Sapphire, 0, [1, 0, 1, 1, 1]),
    (Sapphire, 1, [0, 0, 0, 4, 0]),
    (Ruby, 0, [2, 0, 1, 0, 2]),
    (Ruby, 0, [2, 0, 0, 2, 0]),
    (Ruby, 0, [0, 2, 1, 0, 0]),
    (Onyx, 0, [2, 2, 0, 1, 0]),
    (Sapphire, 0, [1, 0, 2, 2, 0]),
    (Sapphire, 0, [0, 0, 0, 0, 3]),
    (Diamond, 0, [2, 2, 0, 0, 1]),
    (Diamond, 0, [0, 1, 1, 1, 1]),
    (Sapphire, 0, [1, 0, 0, 0, 2]),
    (Onyx, 0, [1, 1, 1, 1, 0]),
    (Emerald, 0, [0, 2, 0, 2, 0]),
    (Emerald, 0, [0, 0, 0, 3, 0]),
    (Diamond, 0, [0, 1, 2, 1, 1]),
    (Diamond, 0, [0, 0, 0, 2, 1]),
    (Diamond, 0, [3, 1, 0, 0, 1]),
    (Diamond, 1, [0, 0, 4, 0, 0]),
    (Ruby, 0, [2, 1, 1, 0, 1]),
    (Ruby, 0, [1, 1, 1, 0, 1]),
];

const LEVEL_TWO: [CardSpec; 30] = [
    (Onyx, 1, [3, 0, 3, 0, 2]),
    (Emerald, 1, [3, 0, 2, 3, 0]),
    (Ruby, 1, [0, 3, 0, 2, 3]),
    (Sapphire, 3, [0, 6, 0, 0, 0]),
    (Sapphire, 2, [2, 0, 0, 1, 4]),
    (Diamond, 1, [2, 3, 0, 3, 0]),
    (Emerald, 2, [4, 2, 0, 0, 1]),
    (Sapphire, 2, [0, 5, 0, 0, 0]),
    (Onyx, 2, [5, 0, 0, 0, 0]),
    (Ruby, 1, [2, 0, 0, 2, 3]),
    (Diamond, 3, [6, 0, 0, 0, 0]),
    (Ruby, 2, [1, 4, 2, 0, 0]),
    (Diamond, 2, [0, 0, 0, 5, 0]),
    (Emerald, 3, [0, 0, 6, 0, 0]),
    (Emerald, 2, [0, 0, 5, 0, 0]),
    (Ruby, 2, [0, 0, 0, 0, 5]),
    (Onyx, 1, [3, 2, 2, 0, 0]),
    (Onyx, 3, [0, 0, 0, 0, 6]),
    (Onyx, 2, [0, 0, 5, 3, 0]),
    (Emerald, 2, [0, 5, 3, 0, 0]),
    (Sapphire, 1, [0, 2, 3, 0, 3]),
    (Sapphire, 1, [0, 2, 2, 2, 0]),
    (Sapphire, 2, [5, 3, 0, 0, 0]),
    (Emerald, 1, [2, 3, 0, 0, 2]),
    (Diamond, 2, [0, 0, 0, 5, 3]),
    (Diamond, 2, [0, 0, 1, 4, 2]),
    (Onyx, 2, [0, 0, 4, 2, 1]),
    (Diamond, 1, [0, 0, 3, 2, 2]),
    (Ruby, 3, [0, 0, 0, 6, 0]),
    (Ruby, 2, [3, 0, 0, 0, 5]),
];

const LEVEL_THREE: [CardSpec; 20] = [
    (Emerald, 3, [5, 3, 0, 3, 3]),
    (Sapphire, 3, [3, 0, 3, 3, 5]),
    (Emerald, 4, [3, 6, 3, 0, 0]),
    (Diamond, 5, [3, 0, 0, 0, 7]),
    (Onyx, 4, [0, 0, 0, 7, 0]),
    (Onyx, 4, [0, 0, 3, 6, 3]),
    (Sapphire, 4, [6, 3, 0, 0, 3]),
    (Ruby, 4, [0, 0, 7, 0, 0]),
    (Ruby, 3, [3, 5, 3, 0, 3]),
    (Ruby, 4, [0, 3, 6, 3, 0]),
    (Diamond, 4, [3, 0, 0, 3, 6]),
    (Onyx, 3, [3, 3, 5, 3, 0]),
    (Sapphire, 5, [7, 3, 0, 0, 0]),
    (Ruby, 5, [0, 0, 7, 3, 0]),
    (Emerald, 5, [0, 7, 3, 0, 0]),
    (Diamond, 4, [0, 0, 0, 0, 7]),
    (Emerald, 4, [0, 7, 0, 0, 0]),
    (Diamond, 3, [0, 3, 3, 5, 3]),
    (Sapphire, 4, [7, 0, 0, 0, 0]),
    (Onyx, 5, [0, 0, 0, 7, 3]),
];

/// Criteria in diamond, sapphire, emerald, ruby, onyx order.
const NOBLES: [[u8; 5]; 10] = [
    [0, 4, 4, 0, 0],
    [4, 4, 0, 0, 0],
    [0, 0, 4, 4, 0],
    [4, 0, 0, 0, 4],
    [3, 0, 0, 3, 3],
    [0, 0, 3, 3, 3],
    [0, 3, 3, 3, 0],
    [0, 0, 0, 4, 4],
    [3, 3, 3, 0, 0],
    [3, 3, 0, 0, 3],
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::player::PlayerId;

    fn get_players(n: u8) -> Vec<Player> {
        (1..=n)
            .map(|id| Player::new(PlayerId::new(id), format!("player-{}", id)))
            .collect()
    }

    fn get_default_game(n: u8, seed: u64) -> Board {
        new_game(get_players(n), seed, RuleConfig::default()).unwrap()
    }

    #[test]
    fn catalog_has_every_card_once() {
        let cards: Vec<Card> = CardLevel::ALL.into_iter().flat_map(catalog).collect();
        assert_eq!(cards.len(), 90);

        let ids: HashSet<&CardId> = cards.iter().map(|c| &c.id).collect();
        assert_eq!(ids.len(), 90);
        assert!(cards.iter().all(|c| c.price.get(Token::Gold) == 0));
        assert_eq!(all_nobles().len(), 10);
    }

    #[test]
    fn two_player_game_setup() {
        let board = get_default_game(2, 7);

        assert_eq!(board.bank(), &Funds::new(4, 4, 4, 4, 4, 5));
        assert_eq!(board.nobles().len(), 3);
        assert_eq!(board.get_players().len(), 2);

        for (level, left) in [(CardLevel::One, 36), (CardLevel::Two, 26), (CardLevel::Three, 16)] {
            let row = board.row(level).unwrap();
            assert_eq!(row.cards_for_sale().count(), 4);
            assert_eq!(row.stack().len(), left);
            assert!(row.cards_for_sale().all(|c| c.level == level));
        }
    }

    #[test]
    fn token_supply_depends_on_players() {
        assert_eq!(token_supply(3), Ok(Funds::new(5, 5, 5, 5, 5, 5)));
        assert_eq!(token_supply(4), Ok(Funds::new(7, 7, 7, 7, 7, 5)));
    }

    #[test]
    fn same_seed_deals_the_same_game() {
        let first = get_default_game(4, 42);
        let second = get_default_game(4, 42);
        let other = get_default_game(4, 43);

        assert_eq!(first.nobles(), second.nobles());
        assert_eq!(first.nobles().len(), 5);
        for level in CardLevel::ALL {
            assert_eq!(first.row(level), second.row(level));
        }
        assert!(CardLevel::ALL
            .into_iter()
            .any(|level| first.row(level) != other.row(level)));
    }

    #[test]
    fn rejects_unsupported_tables() {
        let result = new_game(get_players(1), 0, RuleConfig::default());
        assert_eq!(result.unwrap_err(), SetupError::UnsupportedPlayerCount(1));

        let result = new_game(get_players(5), 0, RuleConfig::default());
        assert_eq!(result.unwrap_err(), SetupError::UnsupportedPlayerCount(5));

        let mut players = get_players(2);
        players.push(Player::new(PlayerId::new(1), "again"));
        let result = new_game(players, 0, RuleConfig::default());
        assert_eq!(result.unwrap_err(), SetupError::DuplicatePlayer);
    }
}
