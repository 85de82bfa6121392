use anyhow::{anyhow, bail, Result};
use core_mechanics::error::SetupError;
use core_mechanics::original_game::new_game;
use core_mechanics::player::{Player, PlayerId};
use core_mechanics::turn::Turn;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::HostConfig;
use crate::message::{Request, Response};
use crate::store::{GameStore, SharedBoard};

/// Answers one request. Engine rejections become `Response::Rejected`,
/// anything else that goes wrong becomes `Response::Error`.
pub async fn handle_request(store: &GameStore, config: &HostConfig, request: Request) -> Response {
    match try_handle(store, config, request).await {
        Ok(response) => response,
        Err(e) => {
            warn!("request failed: {:#}", e);
            Response::error(format!("{:#}", e))
        }
    }
}

async fn try_handle(store: &GameStore, config: &HostConfig, request: Request) -> Result<Response> {
    match request {
        Request::CreateGame { players, seed } => create_game(store, config, players, seed).await,
        Request::Turn {
            game_id,
            turn,
            expected_version,
        } => play_turn(store, game_id, turn, expected_version).await,
        Request::CancelPending { game_id } => {
            let game = find_game(store, &game_id).await?;
            let mut board = game.lock().await;
            let cancelled = board.cancel_pending_turn();
            if cancelled {
                info!(%game_id, version = board.version(), "pending turn cancelled");
            }
            Ok(Response::PendingCancelled {
                game_id,
                cancelled,
                version: board.version(),
            })
        }
        Request::SetPaused { game_id, paused } => {
            let game = find_game(store, &game_id).await?;
            game.lock().await.set_paused(paused);
            info!(%game_id, paused, "pause state changed");
            Ok(Response::PausedChanged { game_id, paused })
        }
        Request::State { game_id } => {
            let game = find_game(store, &game_id).await?;
            let board = game.lock().await.clone();
            Ok(Response::State { game_id, board })
        }
        Request::Winner { game_id } => {
            let game = find_game(store, &game_id).await?;
            let board = game.lock().await;
            Ok(Response::Winner {
                game_id,
                winner: board.winner().map(|p| p.id),
                result: board.result(),
            })
        }
        Request::RemoveGame { game_id } => {
            let removed = store.remove(&game_id).await;
            if removed {
                info!(%game_id, "game removed");
            }
            Ok(Response::GameRemoved { game_id, removed })
        }
        Request::ListGames => Ok(Response::Games {
            game_ids: store.list().await,
        }),
    }
}

async fn create_game(
    store: &GameStore,
    config: &HostConfig,
    names: Vec<String>,
    seed: Option<u64>,
) -> Result<Response> {
    let n_of_players = names.len();
    let players = names
        .into_iter()
        .enumerate()
        .map(|(seat, name)| {
            let id = u8::try_from(seat + 1)
                .map_err(|_| SetupError::UnsupportedPlayerCount(n_of_players))?;
            Ok(Player::new(PlayerId::new(id), name))
        })
        .collect::<Result<Vec<Player>, SetupError>>()?;

    let seed = seed.or(config.seed).unwrap_or_else(rand::random);
    let board = new_game(players, seed, config.rules.clone())?;
    let game_id = store.create(board.clone()).await;
    info!(%game_id, seed, players = n_of_players, "game created");

    Ok(Response::GameCreated {
        game_id,
        seed,
        board,
    })
}

async fn play_turn(
    store: &GameStore,
    game_id: Uuid,
    turn: Turn,
    expected_version: Option<u64>,
) -> Result<Response> {
    let game = find_game(store, &game_id).await?;
    let mut board = game.lock().await;

    if let Some(expected) = expected_version {
        if board.version() != expected {
            bail!(
                "game {} is at version {}, not {}",
                game_id,
                board.version(),
                expected
            );
        }
    }

    let player = turn.player;
    match board.execute_turn(turn) {
        Ok(completed) => {
            info!(%game_id, %player, version = board.version(), "turn applied");
            if let Some(continuation) = &completed.continue_action {
                debug!(%game_id, %player, ?continuation, "waiting for the rest of the turn");
            }
            if completed.game_over {
                info!(%game_id, winner = ?board.winner().map(|p| p.id), "game over");
            }
            Ok(Response::TurnApplied {
                game_id,
                version: board.version(),
                completed,
            })
        }
        Err(e) => {
            warn!(%game_id, %player, code = e.code(), "turn rejected: {}", e);
            Ok(Response::Rejected {
                game_id,
                code: e.code(),
                message: e.to_string(),
            })
        }
    }
}

async fn find_game(store: &GameStore, game_id: &Uuid) -> Result<SharedBoard> {
    store
        .get(game_id)
        .await
        .ok_or_else(|| anyhow!("no game with id {}", game_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_mechanics::bank::Funds;
    use core_mechanics::config::RuleConfig;
    use core_mechanics::token::Token;

    fn get_default_config() -> HostConfig {
        HostConfig::new(RuleConfig::default(), Some(42))
    }

    async fn create_two_player_game(store: &GameStore) -> Uuid {
        let request = Request::CreateGame {
            players: vec!["ada".into(), "bob".into()],
            seed: None,
        };
        match handle_request(store, &get_default_config(), request).await {
            Response::GameCreated { game_id, seed, board } => {
                assert_eq!(seed, 42);
                assert_eq!(board.bank(), &Funds::new(4, 4, 4, 4, 4, 5));
                game_id
            }
            other => panic!("unexpected response {:?}", other),
        }
    }

    fn take(player: u8, tokens: Funds) -> Turn {
        Turn::take_tokens(PlayerId::new(player), tokens)
    }

    #[tokio::test]
    async fn plays_turns_against_a_stored_game() {
        let store = GameStore::new();
        let config = get_default_config();
        let game_id = create_two_player_game(&store).await;

        let request = Request::Turn {
            game_id,
            turn: take(1, Funds::gems(2, 0, 0, 0, 0)),
            expected_version: Some(0),
        };
        let response = handle_request(&store, &config, request).await;
        assert!(matches!(response, Response::TurnApplied { version: 1, .. }));

        let request = Request::Turn {
            game_id,
            turn: take(2, Funds::gems(0, 1, 1, 1, 0)),
            expected_version: None,
        };
        handle_request(&store, &config, request).await;

        match handle_request(&store, &config, Request::State { game_id }).await {
            Response::State { board, .. } => {
                assert_eq!(board.version(), 2);
                assert_eq!(board.current_player_index(), 0);
                assert_eq!(board.bank().get(Token::Diamond), 2);
            }
            other => panic!("unexpected response {:?}", other),
        }
    }

    #[tokio::test]
    async fn rejected_turns_report_the_error_code() {
        let store = GameStore::new();
        let config = get_default_config();
        let game_id = create_two_player_game(&store).await;

        let request = Request::Turn {
            game_id,
            turn: take(2, Funds::gems(1, 0, 0, 0, 0)),
            expected_version: None,
        };
        match handle_request(&store, &config, request).await {
            Response::Rejected { code, .. } => assert_eq!(code, 9),
            other => panic!("unexpected response {:?}", other),
        }

        let request = Request::Turn {
            game_id,
            turn: take(1, Funds::of(Token::Gold, 1)),
            expected_version: None,
        };
        match handle_request(&store, &config, request).await {
            Response::Rejected { code, .. } => assert_eq!(code, 6),
            other => panic!("unexpected response {:?}", other),
        }
    }

    #[tokio::test]
    async fn stale_versions_are_refused() {
        let store = GameStore::new();
        let config = get_default_config();
        let game_id = create_two_player_game(&store).await;

        let request = Request::Turn {
            game_id,
            turn: take(1, Funds::gems(1, 0, 0, 0, 0)),
            expected_version: Some(3),
        };
        let response = handle_request(&store, &config, request).await;
        assert!(matches!(response, Response::Error { .. }));
    }

    #[tokio::test]
    async fn paused_games_reject_turns() {
        let store = GameStore::new();
        let config = get_default_config();
        let game_id = create_two_player_game(&store).await;

        let request = Request::SetPaused {
            game_id,
            paused: true,
        };
        handle_request(&store, &config, request).await;

        let request = Request::Turn {
            game_id,
            turn: take(1, Funds::gems(1, 0, 0, 0, 0)),
            expected_version: None,
        };
        match handle_request(&store, &config, request).await {
            Response::Rejected { code, .. } => assert_eq!(code, 17),
            other => panic!("unexpected response {:?}", other),
        }
    }

    #[tokio::test]
    async fn nothing_to_cancel_on_a_fresh_game() {
        let store = GameStore::new();
        let config = get_default_config();
        let game_id = create_two_player_game(&store).await;

        let response = handle_request(&store, &config, Request::CancelPending { game_id }).await;
        assert_eq!(
            response,
            Response::PendingCancelled {
                game_id,
                cancelled: false,
                version: 0
            }
        );

        let response = handle_request(&store, &config, Request::Winner { game_id }).await;
        assert_eq!(
            response,
            Response::Winner {
                game_id,
                winner: None,
                result: None
            }
        );
    }

    #[tokio::test]
    async fn unknown_games_and_bad_tables_are_errors() {
        let store = GameStore::new();
        let config = get_default_config();

        let response = handle_request(
            &store,
            &config,
            Request::State {
                game_id: Uuid::new_v4(),
            },
        )
        .await;
        assert!(matches!(response, Response::Error { .. }));

        let request = Request::CreateGame {
            players: vec!["solo".into()],
            seed: None,
        };
        let response = handle_request(&store, &config, request).await;
        assert!(matches!(response, Response::Error { .. }));
        assert_eq!(
            handle_request(&store, &config, Request::ListGames).await,
            Response::Games { game_ids: vec![] }
        );
    }

    #[tokio::test]
    async fn removed_games_are_gone() {
        let store = GameStore::new();
        let config = get_default_config();
        let game_id = create_two_player_game(&store).await;

        let response = handle_request(&store, &config, Request::RemoveGame { game_id }).await;
        assert_eq!(
            response,
            Response::GameRemoved {
                game_id,
                removed: true
            }
        );
        assert_eq!(
            handle_request(&store, &config, Request::ListGames).await,
            Response::Games { game_ids: vec![] }
        );
    }
}
