//! Player identity and scorecard ownership.

use crate::scorecard::Scorecard;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for a player, assigned by the host
pub type PlayerId = Uuid;

/// A single player's state. Owned exclusively by its game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub scorecard: Scorecard,
}

impl Player {
    /// Create a new player with an empty scorecard.
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            scorecard: Scorecard::new(),
        }
    }

    /// Number of primary categories this player has yet to score.
    pub fn remaining_categories(&self) -> usize {
        self.scorecard.remaining_categories()
    }
}
