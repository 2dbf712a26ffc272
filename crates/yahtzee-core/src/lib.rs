//! Core engine for multiplayer Yahtzee.
//!
//! This crate provides the complete game logic:
//! - Dice rolling and per-turn lock bookkeeping
//! - The 13 scoring categories plus the yahtzee bonus
//! - Scorecards with derived totals and the upper-section bonus
//! - The game state machine: joining, turn rotation, end of game
//! - A registry that owns games and serializes mutations per game
//!
//! # Architecture
//!
//! The engine is synchronous and in-memory; it performs no I/O and
//! produces no user-facing text. A host (such as the bundled
//! WebSocket server) drives it through the operation methods on
//! [`Game`] and renders the [`GameSnapshot`] it returns.
//!
//! # Modules
//!
//! - [`scoring`]: pure category scoring rules
//! - [`dice`]: dice, locks and the per-turn roll counter
//! - [`scorecard`]: category slots and derived totals
//! - [`player`]: player identity
//! - [`game`]: the game state machine
//! - [`registry`]: game creation, lookup and per-game locking

pub mod actions;
pub mod dice;
pub mod game;
pub mod player;
pub mod registry;
pub mod scorecard;
pub mod scoring;

// Re-export commonly used types
pub use actions::{GameAction, GameEvent};
pub use dice::{Die, DiceState, Turn, DICE_COUNT, MAX_ROLLS};
pub use game::{
    next_player, winner, ErrorKind, Game, GameError, GameId, GamePhase, GameSnapshot, GameStatus,
    PlayerSnapshot,
};
pub use player::{Player, PlayerId};
pub use registry::GameRegistry;
pub use scorecard::{CategorySlot, Scorecard, UPPER_BONUS, UPPER_BONUS_THRESHOLD};
pub use scoring::{evaluate, Category};
