use anyhow::Result;
use core_mechanics::board::{Board, Winner};
use core_mechanics::player::PlayerId;
use core_mechanics::turn::{CompletedTurn, Turn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Request {
    CreateGame {
        players: Vec<String>,
        /// Overrides the host's seed for this game only.
        #[serde(default)]
        seed: Option<u64>,
    },
    Turn {
        game_id: Uuid,
        turn: Turn,
        /// Rejects the turn unless the board is still at this version.
        #[serde(default)]
        expected_version: Option<u64>,
    },
    CancelPending {
        game_id: Uuid,
    },
    SetPaused {
        game_id: Uuid,
        paused: bool,
    },
    State {
        game_id: Uuid,
    },
    Winner {
        game_id: Uuid,
    },
    RemoveGame {
        game_id: Uuid,
    },
    ListGames,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    GameCreated {
        game_id: Uuid,
        seed: u64,
        board: Board,
    },
    TurnApplied {
        game_id: Uuid,
        version: u64,
        completed: CompletedTurn,
    },
    /// The engine refused the turn; the board is unchanged.
    Rejected {
        game_id: Uuid,
        code: u16,
        message: String,
    },
    PendingCancelled {
        game_id: Uuid,
        cancelled: bool,
        version: u64,
    },
    PausedChanged {
        game_id: Uuid,
        paused: bool,
    },
    State {
        game_id: Uuid,
        board: Board,
    },
    Winner {
        game_id: Uuid,
        winner: Option<PlayerId>,
        result: Option<Winner>,
    },
    GameRemoved {
        game_id: Uuid,
        removed: bool,
    },
    Games {
        game_ids: Vec<Uuid>,
    },
    Error {
        message: String,
    },
}

impl Request {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(Into::into)
    }
}

impl Response {
    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            message: message.into(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Into::into)
    }
}
