//! WebSocket protocol messages for multiplayer Yahtzee.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use yahtzee_core::{ErrorKind, GameAction, GameEvent, GameSnapshot};

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Create a new game; the creator becomes the owner
    CreateGame { player_name: String },

    /// Join a game that is still accepting players
    JoinGame { game_id: Uuid, player_name: String },

    /// Start the game (owner only)
    StartGame,

    /// Submit a roll, toggle or score action
    GameAction { action: GameAction },

    /// Send chat message to everyone in the game
    Chat { message: String },

    /// Request the list of joinable games
    ListGames,

    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Welcome message with assigned player ID
    Welcome { player_id: Uuid },

    /// Game created successfully
    GameCreated { game_id: Uuid },

    /// Joined game successfully
    Joined { snapshot: GameSnapshot },

    /// Game state changed (player joined, roll, toggle, score)
    GameState { snapshot: GameSnapshot },

    /// Events produced by the last action
    Events { events: Vec<GameEvent> },

    /// The game finished; standings in join order
    GameOver {
        winner: Uuid,
        standings: Vec<(Uuid, u32)>,
    },

    /// Chat message received
    ChatMessage { player_name: String, message: String },

    /// Joinable games
    GameList { games: Vec<GameListing> },

    /// An operation failed
    Error { kind: ErrorKind, message: String },

    /// Pong response
    Pong,
}

/// Summary of a joinable game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameListing {
    pub game_id: Uuid,
    pub owner_name: String,
    pub player_count: usize,
}
