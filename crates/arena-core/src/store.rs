//! Storage port for games and players, plus the in-memory reference store.
//!
//! The scheduler never holds game state in task-local memory across
//! suspension points; everything it needs is re-read through [`Store`],
//! and every mutation is written back before the next await. That is what
//! makes a process restart safe: a fresh scheduler sees exactly what the
//! old one had persisted.
//!
//! Backends must make writes durable before returning. [`MemoryStore`] is
//! the reference implementation used by tests and the demo binary.

use std::collections::BTreeMap;

use arena_types::{Game, GameId, Player, PlayerId};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Errors surfaced by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No game with the given id exists.
    #[error("game {id} not found")]
    GameNotFound {
        /// The missing game id.
        id: GameId,
    },

    /// No player with the given id exists.
    #[error("player {id} not found")]
    PlayerNotFound {
        /// The missing player id.
        id: PlayerId,
    },

    /// The backend itself failed (connection, serialization, disk).
    #[error("storage backend error: {message}")]
    Backend {
        /// Backend-specific failure description.
        message: String,
    },
}

impl StoreError {
    /// Whether this error means the record simply does not exist.
    ///
    /// The scheduler treats a vanished game or player as a signal to stop
    /// quietly rather than as a failure.
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::GameNotFound { .. } | Self::PlayerNotFound { .. }
        )
    }
}

/// Persistence port for games and players.
///
/// The query methods are the typed rendering of "filter the players of a
/// game by a predicate": each predicate the engine needs has a named
/// method, so backends can index for it.
#[async_trait]
pub trait Store: Send + Sync {
    /// Persist a new game record.
    async fn create_game(&self, game: Game) -> Result<(), StoreError>;

    /// Fetch a game by id.
    async fn game(&self, id: GameId) -> Result<Game, StoreError>;

    /// Write back an existing game record.
    async fn save_game(&self, game: &Game) -> Result<(), StoreError>;

    /// Delete a game and all of its players.
    async fn delete_game(&self, id: GameId) -> Result<(), StoreError>;

    /// All games that are started and not yet ended.
    async fn active_games(&self) -> Result<Vec<Game>, StoreError>;

    /// Persist a new player record.
    async fn create_player(&self, player: Player) -> Result<(), StoreError>;

    /// Fetch a player by id.
    async fn player(&self, id: PlayerId) -> Result<Player, StoreError>;

    /// Write back an existing player record.
    async fn save_player(&self, player: &Player) -> Result<(), StoreError>;

    /// Delete a player record.
    async fn delete_player(&self, id: PlayerId) -> Result<(), StoreError>;

    /// All players of a game, dead or alive.
    async fn players_in_game(&self, game: GameId) -> Result<Vec<Player>, StoreError>;

    /// Living players of a game.
    async fn alive_players(&self, game: GameId) -> Result<Vec<Player>, StoreError>;

    /// Living players who have not yet had their turn on `day`.
    async fn pending_players(&self, game: GameId, day: u32) -> Result<Vec<Player>, StoreError>;

    /// Players who died during `day`.
    async fn deaths_on_day(&self, game: GameId, day: u32) -> Result<Vec<Player>, StoreError>;

    /// The player a given user controls in a game, if they joined.
    async fn player_by_user(
        &self,
        game: GameId,
        user_id: u64,
    ) -> Result<Option<Player>, StoreError>;
}

/// In-memory store backed by ordered maps behind async locks.
///
/// Iteration order is id order, which for UUID v7 keys is creation order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    games: RwLock<BTreeMap<GameId, Game>>,
    players: RwLock<BTreeMap<PlayerId, Player>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    async fn players_where<F>(&self, game: GameId, keep: F) -> Vec<Player>
    where
        F: Fn(&Player) -> bool,
    {
        self.players
            .read()
            .await
            .values()
            .filter(|player| player.game_id == game && keep(player))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_game(&self, game: Game) -> Result<(), StoreError> {
        self.games.write().await.insert(game.id, game);
        Ok(())
    }

    async fn game(&self, id: GameId) -> Result<Game, StoreError> {
        self.games
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::GameNotFound { id })
    }

    async fn save_game(&self, game: &Game) -> Result<(), StoreError> {
        let mut games = self.games.write().await;
        if !games.contains_key(&game.id) {
            return Err(StoreError::GameNotFound { id: game.id });
        }
        games.insert(game.id, game.clone());
        Ok(())
    }

    async fn delete_game(&self, id: GameId) -> Result<(), StoreError> {
        if self.games.write().await.remove(&id).is_none() {
            return Err(StoreError::GameNotFound { id });
        }
        self.players
            .write()
            .await
            .retain(|_, player| player.game_id != id);
        Ok(())
    }

    async fn active_games(&self) -> Result<Vec<Game>, StoreError> {
        Ok(self
            .games
            .read()
            .await
            .values()
            .filter(|game| game.is_active())
            .cloned()
            .collect())
    }

    async fn create_player(&self, player: Player) -> Result<(), StoreError> {
        self.players.write().await.insert(player.id, player);
        Ok(())
    }

    async fn player(&self, id: PlayerId) -> Result<Player, StoreError> {
        self.players
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::PlayerNotFound { id })
    }

    async fn save_player(&self, player: &Player) -> Result<(), StoreError> {
        let mut players = self.players.write().await;
        if !players.contains_key(&player.id) {
            return Err(StoreError::PlayerNotFound { id: player.id });
        }
        players.insert(player.id, player.clone());
        Ok(())
    }

    async fn delete_player(&self, id: PlayerId) -> Result<(), StoreError> {
        if self.players.write().await.remove(&id).is_none() {
            return Err(StoreError::PlayerNotFound { id });
        }
        Ok(())
    }

    async fn players_in_game(&self, game: GameId) -> Result<Vec<Player>, StoreError> {
        Ok(self.players_where(game, |_| true).await)
    }

    async fn alive_players(&self, game: GameId) -> Result<Vec<Player>, StoreError> {
        Ok(self.players_where(game, |player| player.is_alive).await)
    }

    async fn pending_players(&self, game: GameId, day: u32) -> Result<Vec<Player>, StoreError> {
        Ok(self
            .players_where(game, |player| player.is_alive && player.current_day < day)
            .await)
    }

    async fn deaths_on_day(&self, game: GameId, day: u32) -> Result<Vec<Player>, StoreError> {
        Ok(self
            .players_where(game, |player| !player.is_alive && player.current_day == day)
            .await)
    }

    async fn player_by_user(
        &self,
        game: GameId,
        user_id: u64,
    ) -> Result<Option<Player>, StoreError> {
        Ok(self
            .players_where(game, |player| player.user_id == user_id)
            .await
            .into_iter()
            .next())
    }
}
