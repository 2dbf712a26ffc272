//! WebSocket server and connection handling.

use crate::protocol::{ClientMessage, GameListing, ServerMessage};
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{error, info, warn};
use uuid::Uuid;
use yahtzee_core::{GameError, GameEvent, GameId, GameRegistry, GameStatus, PlayerId};

/// Server state shared across all connections.
pub struct ServerState {
    /// All live games; the registry serializes mutations per game
    pub registry: GameRegistry,
    /// Mapping from player ID to the game they are in
    pub player_games: DashMap<PlayerId, GameId>,
    /// Mapping from player ID to their message sender
    pub player_senders: DashMap<PlayerId, mpsc::UnboundedSender<ServerMessage>>,
    /// Display names, supplied when creating or joining a game
    pub player_names: DashMap<PlayerId, String>,
}

impl ServerState {
    pub fn new() -> Self {
        Self {
            registry: GameRegistry::new(),
            player_games: DashMap::new(),
            player_senders: DashMap::new(),
            player_names: DashMap::new(),
        }
    }

    /// Send a message to a specific player.
    pub fn send_to_player(&self, player_id: PlayerId, msg: ServerMessage) {
        if let Some(sender) = self.player_senders.get(&player_id) {
            let _ = sender.send(msg);
        }
    }

    fn send_error(&self, player_id: PlayerId, err: &GameError) {
        self.send_to_player(
            player_id,
            ServerMessage::Error {
                kind: err.kind(),
                message: err.to_string(),
            },
        );
    }

    /// Broadcast a message to all players in a game.
    pub fn broadcast_to_game(&self, game_id: GameId, msg: ServerMessage) {
        for player_id in self.game_players(game_id) {
            self.send_to_player(player_id, msg.clone());
        }
    }

    fn game_players(&self, game_id: GameId) -> Vec<PlayerId> {
        self.registry
            .with_game(game_id, |game| {
                game.players.iter().map(|p| p.id).collect()
            })
            .unwrap_or_default()
    }

    fn player_name(&self, player_id: PlayerId) -> String {
        self.player_names
            .get(&player_id)
            .map(|name| name.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    /// Push the current snapshot of a game to every player in it.
    fn broadcast_snapshot(&self, game_id: GameId) {
        if let Ok(snapshot) = self.registry.snapshot(game_id) {
            self.broadcast_to_game(game_id, ServerMessage::GameState { snapshot });
        }
    }

    /// Games still accepting players.
    pub fn joinable_games(&self) -> Vec<GameListing> {
        self.registry
            .ids()
            .into_iter()
            .filter_map(|id| self.registry.snapshot(id).ok())
            .filter(|snapshot| snapshot.status == GameStatus::Joining)
            .map(|snapshot| GameListing {
                game_id: snapshot.id,
                owner_name: self.player_name(snapshot.owner_id),
                player_count: snapshot.players.len(),
            })
            .collect()
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the WebSocket server.
pub async fn run_server(addr: SocketAddr, state: Arc<ServerState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Yahtzee server listening on {}", addr);

    while let Ok((stream, peer_addr)) = listener.accept().await {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }

    Ok(())
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    state: Arc<ServerState>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream).await?;
    info!("New WebSocket connection from {}", addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // Assign a player ID
    let player_id = Uuid::new_v4();

    // Create channel for outgoing messages
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    state.player_senders.insert(player_id, tx);

    // Send welcome message
    let welcome = ServerMessage::Welcome { player_id };
    let msg_text = serde_json::to_string(&welcome)?;
    ws_sender.send(Message::Text(msg_text)).await?;

    // Spawn task to forward messages from channel to WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(text) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
        }
    });

    // Handle incoming messages
    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if let Ok(client_msg) = serde_json::from_str::<ClientMessage>(&text) {
                    handle_message(player_id, client_msg, &state);
                } else {
                    warn!("Invalid message from {}: {}", player_id, text);
                }
            }
            Ok(Message::Close(_)) => {
                info!("Client {} closing connection", player_id);
                break;
            }
            Ok(Message::Ping(_)) => {
                state.send_to_player(player_id, ServerMessage::Pong);
            }
            Err(e) => {
                error!("WebSocket error from {}: {}", player_id, e);
                break;
            }
            _ => {}
        }
    }

    // Clean up on disconnect
    handle_disconnect(player_id, &state);
    state.player_senders.remove(&player_id);
    send_task.abort();

    info!("Connection closed for {}", player_id);
    Ok(())
}

/// Handle a client message.
fn handle_message(player_id: PlayerId, msg: ClientMessage, state: &Arc<ServerState>) {
    match msg {
        ClientMessage::CreateGame { player_name } => {
            let game_id = state.registry.create(player_id);
            state.player_names.insert(player_id, player_name);
            state.player_games.insert(player_id, game_id);

            state.send_to_player(player_id, ServerMessage::GameCreated { game_id });
            if let Ok(snapshot) = state.registry.snapshot(game_id) {
                state.send_to_player(player_id, ServerMessage::Joined { snapshot });
            }
        }

        ClientMessage::JoinGame {
            game_id,
            player_name,
        } => {
            let result = state
                .registry
                .with_game_mut(game_id, |game| game.add_player(player_id));

            match result {
                Ok(events) => {
                    state.player_names.insert(player_id, player_name);
                    state.player_games.insert(player_id, game_id);

                    if let Ok(snapshot) = state.registry.snapshot(game_id) {
                        state.send_to_player(player_id, ServerMessage::Joined { snapshot });
                    }
                    state.broadcast_to_game(game_id, ServerMessage::Events { events });
                    state.broadcast_snapshot(game_id);
                }
                Err(e) => state.send_error(player_id, &e),
            }
        }

        ClientMessage::StartGame => {
            let Some(game_id) = state.player_games.get(&player_id).map(|id| *id) else {
                state.send_error(player_id, &GameError::GameNotFound);
                return;
            };

            match state
                .registry
                .with_game_mut(game_id, |game| game.start(player_id))
            {
                Ok(events) => {
                    state.broadcast_to_game(game_id, ServerMessage::Events { events });
                    state.broadcast_snapshot(game_id);
                }
                Err(e) => state.send_error(player_id, &e),
            }
        }

        ClientMessage::GameAction { action } => {
            let Some(game_id) = state.player_games.get(&player_id).map(|id| *id) else {
                state.send_error(player_id, &GameError::GameNotFound);
                return;
            };

            match state
                .registry
                .with_game_mut(game_id, |game| game.apply_action(player_id, action))
            {
                Ok(events) => {
                    let finished = events.iter().find_map(|e| match e {
                        GameEvent::GameEnded { winner, standings } => {
                            Some((*winner, standings.clone()))
                        }
                        _ => None,
                    });

                    state.broadcast_to_game(game_id, ServerMessage::Events { events });
                    state.broadcast_snapshot(game_id);

                    if let Some((winner, standings)) = finished {
                        state.broadcast_to_game(
                            game_id,
                            ServerMessage::GameOver { winner, standings },
                        );
                    }
                }
                Err(e) => state.send_error(player_id, &e),
            }
        }

        ClientMessage::Chat { message } => {
            if let Some(game_id) = state.player_games.get(&player_id).map(|id| *id) {
                let player_name = state.player_name(player_id);
                state.broadcast_to_game(
                    game_id,
                    ServerMessage::ChatMessage {
                        player_name,
                        message,
                    },
                );
            }
        }

        ClientMessage::ListGames => {
            let games = state.joinable_games();
            state.send_to_player(player_id, ServerMessage::GameList { games });
        }

        ClientMessage::Ping => {
            state.send_to_player(player_id, ServerMessage::Pong);
        }
    }
}

/// Handle player disconnect.
///
/// Game membership is frozen once started, so the player stays on the
/// scorecard; the game itself is reaped once no member has a live
/// connection left.
fn handle_disconnect(player_id: PlayerId, state: &Arc<ServerState>) {
    state.player_names.remove(&player_id);

    if let Some((_, game_id)) = state.player_games.remove(&player_id) {
        let any_connected = state
            .game_players(game_id)
            .into_iter()
            .any(|id| id != player_id && state.player_senders.contains_key(&id));

        if any_connected {
            state.broadcast_snapshot(game_id);
        } else if state.registry.remove(game_id) {
            info!("Reaped game {} after last player disconnected", game_id);
        }
    }
}
