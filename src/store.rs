use std::collections::HashMap;
use std::sync::Arc;

use core_mechanics::board::Board;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// One game, locked for the length of a request.
pub type SharedBoard = Arc<Mutex<Board>>;

/// Every live game on this host, keyed by game id. Requests against the
/// same game are serialised by its lock; different games never contend.
#[derive(Debug, Default, Clone)]
pub struct GameStore {
    games: Arc<RwLock<HashMap<Uuid, SharedBoard>>>,
}

impl GameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, board: Board) -> Uuid {
        let game_id = Uuid::new_v4();
        self.games
            .write()
            .await
            .insert(game_id, Arc::new(Mutex::new(board)));
        game_id
    }

    pub async fn get(&self, game_id: &Uuid) -> Option<SharedBoard> {
        self.games.read().await.get(game_id).cloned()
    }

    pub async fn remove(&self, game_id: &Uuid) -> bool {
        self.games.write().await.remove(game_id).is_some()
    }

    /// Game ids in ascending order.
    pub async fn list(&self) -> Vec<Uuid> {
        let mut game_ids: Vec<Uuid> = self.games.read().await.keys().copied().collect();
        game_ids.sort();
        game_ids
    }
}
