//! Game registry: id allocation, lookup and per-game serialization.
//!
//! External callers never hold a `Game` directly; they operate through
//! closures so each game's entry lock serializes mutations. One
//! logical writer runs at a time per game, and readers observe either
//! the pre- or post-mutation state, never a partial one.

use crate::game::{Game, GameError, GameId, GameSnapshot};
use crate::player::PlayerId;
use dashmap::DashMap;

/// All live games, keyed by id.
///
/// Ended games are not reaped automatically; hosts decide when to
/// call [`GameRegistry::remove`].
#[derive(Debug, Default)]
pub struct GameRegistry {
    games: DashMap<GameId, Game>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self {
            games: DashMap::new(),
        }
    }

    /// Create a game owned by `owner_id` and return its id.
    pub fn create(&self, owner_id: PlayerId) -> GameId {
        let game = Game::new(owner_id);
        let id = game.id;
        self.games.insert(id, game);
        id
    }

    /// Run a read-only closure against a game.
    pub fn with_game<T>(
        &self,
        id: GameId,
        f: impl FnOnce(&Game) -> T,
    ) -> Result<T, GameError> {
        let game = self.games.get(&id).ok_or(GameError::GameNotFound)?;
        Ok(f(&game))
    }

    /// Run a mutating closure against a game under its entry lock.
    pub fn with_game_mut<T>(
        &self,
        id: GameId,
        f: impl FnOnce(&mut Game) -> Result<T, GameError>,
    ) -> Result<T, GameError> {
        let mut game = self.games.get_mut(&id).ok_or(GameError::GameNotFound)?;
        f(&mut game)
    }

    /// Take a consistent snapshot of a game.
    pub fn snapshot(&self, id: GameId) -> Result<GameSnapshot, GameError> {
        self.with_game(id, |game| game.snapshot())
    }

    /// Remove a game, returning whether it existed.
    pub fn remove(&self, id: GameId) -> bool {
        self.games.remove(&id).is_some()
    }

    /// Ids of all live games.
    pub fn ids(&self) -> Vec<GameId> {
        self.games.iter().map(|entry| *entry.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
