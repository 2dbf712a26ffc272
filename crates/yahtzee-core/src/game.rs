//! Core game state machine.
//!
//! This module contains the `Game` struct and all lifecycle logic:
//! joining, turn creation, rolling, locking, scoring, rotation and
//! winner determination. Every mutating operation validates fully
//! before touching state, so a failed call leaves the game unchanged.

use crate::actions::{GameAction, GameEvent};
use crate::dice::{Die, DiceState, Turn, DICE_COUNT};
use crate::player::{Player, PlayerId};
use crate::scorecard::Scorecard;
use crate::scoring::{self, Category};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Identifier for a game
pub type GameId = Uuid;

/// Broad classification of an error, for hosts that map failures to
/// different user-facing treatments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Malformed input: bad index, acting before a roll, gate violation
    Validation,
    /// Legal input in the wrong game phase or by the wrong player
    State,
    /// Unknown game or player id
    NotFound,
}

/// Errors that can occur when operating on a game.
///
/// All are deterministic and local; none warrant a retry.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameError {
    #[error("not your turn")]
    NotYourTurn,

    #[error("game is not accepting players")]
    NotJoining,

    #[error("game has not started")]
    NotStarted,

    #[error("game is over")]
    GameOver,

    #[error("only the owner can start the game")]
    NotOwner,

    #[error("player is already in the game")]
    DuplicatePlayer,

    #[error("game has no players")]
    NoPlayers,

    #[error("no rolls left this turn")]
    RollsExhausted,

    #[error("category {0:?} has already been scored")]
    CategoryAlreadyScored(Category),

    #[error("die index {0} is out of range")]
    InvalidDieIndex(usize),

    #[error("dice have not been rolled yet")]
    DiceNotRolled,

    #[error("yahtzee bonus requires a scored yahtzee")]
    BonusLocked,

    #[error("game not found")]
    GameNotFound,

    #[error("player not found")]
    PlayerNotFound,
}

impl GameError {
    /// Which taxonomy bucket this error falls into.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::InvalidDieIndex(_)
            | GameError::DiceNotRolled
            | GameError::BonusLocked => ErrorKind::Validation,
            GameError::GameNotFound | GameError::PlayerNotFound => ErrorKind::NotFound,
            _ => ErrorKind::State,
        }
    }
}

/// Game lifecycle phase. Transitions are one-way:
/// `Joining -> Started -> Ended`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Players may still join
    Joining,

    /// A game in progress with exactly one active turn
    Started { turn: Turn },

    /// Terminal; the winner is fixed
    Ended { winner: PlayerId },
}

/// Phase of a game without the embedded turn, for snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameStatus {
    Joining,
    Started,
    Ended,
}

/// The complete state of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Unique game id
    pub id: GameId,
    /// The player who created the game; always `players[0]`
    pub owner_id: PlayerId,
    /// All players in join order
    pub players: Vec<Player>,
    /// Current lifecycle phase
    pub phase: GamePhase,
}

impl Game {
    /// Create a new game. The owner is the first player.
    pub fn new(owner_id: PlayerId) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            players: vec![Player::new(owner_id)],
            phase: GamePhase::Joining,
        }
    }

    /// Phase without the embedded turn.
    pub fn status(&self) -> GameStatus {
        match self.phase {
            GamePhase::Joining => GameStatus::Joining,
            GamePhase::Started { .. } => GameStatus::Started,
            GamePhase::Ended { .. } => GameStatus::Ended,
        }
    }

    /// Get a player by id.
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// The turn currently in progress, if any.
    pub fn active_turn(&self) -> Option<&Turn> {
        match &self.phase {
            GamePhase::Started { turn } => Some(turn),
            _ => None,
        }
    }

    /// The winner, once the game has ended.
    pub fn winner(&self) -> Option<PlayerId> {
        match &self.phase {
            GamePhase::Ended { winner } => Some(*winner),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::Ended { .. })
    }

    /// Append a player. Membership is frozen once the game starts.
    pub fn add_player(&mut self, player_id: PlayerId) -> Result<Vec<GameEvent>, GameError> {
        if self.phase != GamePhase::Joining {
            return Err(GameError::NotJoining);
        }
        if self.player(player_id).is_some() {
            return Err(GameError::DuplicatePlayer);
        }

        self.players.push(Player::new(player_id));
        Ok(vec![GameEvent::PlayerJoined { player: player_id }])
    }

    /// Start the game and hand the first turn to the first joiner.
    ///
    /// Only the owner may start.
    pub fn start(&mut self, requester: PlayerId) -> Result<Vec<GameEvent>, GameError> {
        if self.phase != GamePhase::Joining {
            return Err(GameError::NotJoining);
        }
        if requester != self.owner_id {
            return Err(GameError::NotOwner);
        }
        let first = self.players.first().ok_or(GameError::NoPlayers)?.id;

        self.phase = GamePhase::Started {
            turn: Turn::new(first),
        };
        Ok(vec![
            GameEvent::GameStarted,
            GameEvent::TurnStarted { player: first },
        ])
    }

    /// The id of the player whose turn it is, after checking the phase.
    fn require_active_turn(&self) -> Result<PlayerId, GameError> {
        match &self.phase {
            GamePhase::Joining => Err(GameError::NotStarted),
            GamePhase::Ended { .. } => Err(GameError::GameOver),
            GamePhase::Started { turn } => Ok(turn.player_id),
        }
    }

    /// Roll every unlocked die for the active player.
    pub fn roll_dice(&mut self, player_id: PlayerId) -> Result<Vec<GameEvent>, GameError> {
        if self.require_active_turn()? != player_id {
            return Err(GameError::NotYourTurn);
        }

        let turn = match &mut self.phase {
            GamePhase::Started { turn } => turn,
            _ => unreachable!("phase checked above"),
        };

        let mut rng = rand::thread_rng();
        let values = turn.roll(&mut rng)?;
        let roll_count = turn.roll_count;

        Ok(vec![GameEvent::DiceRolled {
            player: player_id,
            values,
            roll_count,
        }])
    }

    /// Flip the lock on one of the active player's dice.
    pub fn toggle_die(
        &mut self,
        player_id: PlayerId,
        index: usize,
    ) -> Result<Vec<GameEvent>, GameError> {
        if self.require_active_turn()? != player_id {
            return Err(GameError::NotYourTurn);
        }

        let turn = match &mut self.phase {
            GamePhase::Started { turn } => turn,
            _ => unreachable!("phase checked above"),
        };

        let locked = turn.toggle_die(index)?;
        Ok(vec![GameEvent::DieToggled {
            player: player_id,
            index,
            locked,
        }])
    }

    /// Score the current dice into a category, then rotate or end.
    ///
    /// The turn is consumed: either a fresh turn is created for the
    /// next player with unscored categories, or the game ends.
    pub fn score_category(
        &mut self,
        player_id: PlayerId,
        category: Category,
    ) -> Result<Vec<GameEvent>, GameError> {
        if self.require_active_turn()? != player_id {
            return Err(GameError::NotYourTurn);
        }

        let dice = self
            .active_turn()
            .and_then(|turn| turn.dice.values())
            .ok_or(GameError::DiceNotRolled)?;

        let scorecard = &mut self
            .player_mut(player_id)
            .ok_or(GameError::PlayerNotFound)?
            .scorecard;

        let bonus_unlocked = scorecard.bonus_unlocked();
        let points =
            scoring::evaluate(category, dice, bonus_unlocked).ok_or(GameError::BonusLocked)?;
        scorecard.record(category, points)?;

        let mut events = vec![GameEvent::CategoryScored {
            player: player_id,
            category,
            points,
        }];

        match next_player(&self.players) {
            Some(next) => {
                self.phase = GamePhase::Started {
                    turn: Turn::new(next),
                };
                events.push(GameEvent::TurnStarted { player: next });
            }
            None => events.extend(self.end_game()),
        }

        Ok(events)
    }

    /// End the game: fix the winner and report final standings.
    fn end_game(&mut self) -> Vec<GameEvent> {
        let winner = winner(&self.players).expect("ended game has players");
        self.phase = GamePhase::Ended { winner };

        vec![GameEvent::GameEnded {
            winner,
            standings: self.standings(),
        }]
    }

    /// Final totals for every player, in join order.
    pub fn standings(&self) -> Vec<(PlayerId, u32)> {
        self.players
            .iter()
            .map(|p| (p.id, p.scorecard.overall_total()))
            .collect()
    }

    /// Apply an in-turn action submitted by a player.
    pub fn apply_action(
        &mut self,
        player_id: PlayerId,
        action: GameAction,
    ) -> Result<Vec<GameEvent>, GameError> {
        match action {
            GameAction::RollDice => self.roll_dice(player_id),
            GameAction::ToggleDie { index } => self.toggle_die(player_id, index),
            GameAction::ScoreCategory { category } => self.score_category(player_id, category),
        }
    }

    /// Build a consistent snapshot for the presentation layer.
    pub fn snapshot(&self) -> GameSnapshot {
        let turn = self.active_turn();
        let active_player = turn.map(|t| t.player_id);

        let dice = turn.and_then(|t| match t.dice {
            DiceState::Unrolled => None,
            DiceState::Rolled(dice) => Some(dice),
        });

        let scoreable = active_player
            .and_then(|id| self.player(id))
            .map(|p| p.scorecard.scoreable_categories())
            .unwrap_or_default();

        GameSnapshot {
            id: self.id,
            status: self.status(),
            owner_id: self.owner_id,
            players: self.players.iter().map(PlayerSnapshot::new).collect(),
            active_player,
            dice,
            roll_count: turn.map(|t| t.roll_count),
            scoreable,
            winner: self.winner(),
        }
    }
}

/// Select the next player to act: among players with unscored
/// categories, the one with the fewest remaining, ties broken by
/// join order. `None` means every scorecard is complete.
pub fn next_player(players: &[Player]) -> Option<PlayerId> {
    players
        .iter()
        .filter(|p| p.remaining_categories() > 0)
        .min_by_key(|p| p.remaining_categories())
        .map(|p| p.id)
}

/// The player with the highest overall total, ties broken by the
/// earliest position in join order.
pub fn winner(players: &[Player]) -> Option<PlayerId> {
    let mut best: Option<&Player> = None;
    for player in players {
        match best {
            Some(b) if player.scorecard.overall_total() <= b.scorecard.overall_total() => {}
            _ => best = Some(player),
        }
    }
    best.map(|p| p.id)
}

/// A read-only view of a game for building outward notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub id: GameId,
    pub status: GameStatus,
    pub owner_id: PlayerId,
    /// Players in join order, with derived totals
    pub players: Vec<PlayerSnapshot>,
    pub active_player: Option<PlayerId>,
    /// Current dice with lock flags, once rolled
    pub dice: Option<[Die; DICE_COUNT]>,
    pub roll_count: Option<u8>,
    /// Categories the active player may currently score
    pub scoreable: Vec<Category>,
    pub winner: Option<PlayerId>,
}

/// One player's scorecard plus derived totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub scorecard: Scorecard,
    pub upper_subtotal: u32,
    pub upper_bonus: u32,
    pub upper_total: u32,
    pub lower_total: u32,
    pub overall_total: u32,
    pub remaining_categories: usize,
}

impl PlayerSnapshot {
    fn new(player: &Player) -> Self {
        let card = &player.scorecard;
        Self {
            id: player.id,
            scorecard: card.clone(),
            upper_subtotal: card.upper_subtotal(),
            upper_bonus: card.upper_bonus(),
            upper_total: card.upper_total(),
            lower_total: card.lower_total(),
            overall_total: card.overall_total(),
            remaining_categories: card.remaining_categories(),
        }
    }
}
