//! Actions players can take during a turn and the events they produce.

use crate::dice::DICE_COUNT;
use crate::player::PlayerId;
use crate::scoring::Category;
use serde::{Deserialize, Serialize};

/// An in-turn action submitted by a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum GameAction {
    /// Roll every unlocked die
    RollDice,
    /// Flip the lock on one die
    ToggleDie { index: usize },
    /// Score the current dice into a category, ending the turn
    ScoreCategory { category: Category },
}

/// Events emitted by mutations, for the presentation layer to narrate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum GameEvent {
    /// A player joined during the joining phase
    PlayerJoined { player: PlayerId },

    /// The game left the joining phase
    GameStarted,

    /// A fresh turn was created for a player
    TurnStarted { player: PlayerId },

    /// Dice were rolled
    DiceRolled {
        player: PlayerId,
        values: [u8; DICE_COUNT],
        roll_count: u8,
    },

    /// A die's lock was flipped
    DieToggled {
        player: PlayerId,
        index: usize,
        locked: bool,
    },

    /// A category was scored
    CategoryScored {
        player: PlayerId,
        category: Category,
        points: u32,
    },

    /// Every scorecard is complete; final standings in join order
    GameEnded {
        winner: PlayerId,
        standings: Vec<(PlayerId, u32)>,
    },
}
