//! Dice and per-turn roll bookkeeping.

use crate::game::GameError;
use crate::player::PlayerId;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Maximum number of rolls per turn
pub const MAX_ROLLS: u8 = 3;

/// Number of dice in play
pub const DICE_COUNT: usize = 5;

/// A single die: its face value and whether the player has locked it
/// against rerolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Die {
    pub value: u8,
    pub locked: bool,
}

/// The dice for a turn. They don't exist until the first roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiceState {
    Unrolled,
    Rolled([Die; DICE_COUNT]),
}

impl DiceState {
    /// The five face values, if the dice have been rolled.
    pub fn values(&self) -> Option<[u8; DICE_COUNT]> {
        match *self {
            DiceState::Unrolled => None,
            DiceState::Rolled(dice) => Some(dice.map(|d| d.value)),
        }
    }
}

/// Transient state for one player's roll/lock/score cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// The player whose turn this is
    pub player_id: PlayerId,
    /// Current dice, unset until the first roll
    pub dice: DiceState,
    /// How many rolls have been taken (0-3)
    pub roll_count: u8,
}

impl Turn {
    /// Start a fresh turn for a player.
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            dice: DiceState::Unrolled,
            roll_count: 0,
        }
    }

    /// Roll every unlocked die. The first roll of a turn rolls all five.
    ///
    /// Locked dice keep their value; each unlocked die draws uniformly
    /// from 1..=6 independent of all other dice and prior rolls.
    pub fn roll<R: Rng>(&mut self, rng: &mut R) -> Result<[u8; DICE_COUNT], GameError> {
        if self.roll_count >= MAX_ROLLS {
            return Err(GameError::RollsExhausted);
        }

        let mut dice = match self.dice {
            DiceState::Unrolled => [Die {
                value: 0,
                locked: false,
            }; DICE_COUNT],
            DiceState::Rolled(dice) => dice,
        };

        for die in dice.iter_mut() {
            if !die.locked {
                die.value = rng.gen_range(1..=6);
            }
        }

        self.dice = DiceState::Rolled(dice);
        self.roll_count += 1;

        Ok(dice.map(|d| d.value))
    }

    /// Flip the locked flag on one die.
    ///
    /// Legal at any roll count; after the third roll a lock only
    /// matters to the state snapshot, since no further roll can happen.
    pub fn toggle_die(&mut self, index: usize) -> Result<bool, GameError> {
        if index >= DICE_COUNT {
            return Err(GameError::InvalidDieIndex(index));
        }

        match &mut self.dice {
            DiceState::Unrolled => Err(GameError::DiceNotRolled),
            DiceState::Rolled(dice) => {
                dice[index].locked = !dice[index].locked;
                Ok(dice[index].locked)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_new_turn_has_no_dice() {
        let turn = Turn::new(Uuid::new_v4());
        assert_eq!(turn.dice, DiceState::Unrolled);
        assert_eq!(turn.roll_count, 0);
        assert_eq!(turn.dice.values(), None);
    }

    #[test]
    fn test_roll_produces_valid_values() {
        let mut turn = Turn::new(Uuid::new_v4());
        let mut rng = rand::thread_rng();

        let values = turn.roll(&mut rng).unwrap();
        assert!(values.iter().all(|&v| (1..=6).contains(&v)));
        assert_eq!(turn.roll_count, 1);
    }

    #[test]
    fn test_fourth_roll_fails() {
        let mut turn = Turn::new(Uuid::new_v4());
        let mut rng = rand::thread_rng();

        for _ in 0..MAX_ROLLS {
            turn.roll(&mut rng).unwrap();
        }
        assert!(matches!(
            turn.roll(&mut rng),
            Err(GameError::RollsExhausted)
        ));
        assert_eq!(turn.roll_count, MAX_ROLLS);
    }

    #[test]
    fn test_locked_die_survives_reroll() {
        let mut turn = Turn::new(Uuid::new_v4());
        let mut rng = rand::thread_rng();

        turn.roll(&mut rng).unwrap();
        let before = turn.dice.values().unwrap();

        turn.toggle_die(2).unwrap();
        turn.roll(&mut rng).unwrap();

        let after = turn.dice.values().unwrap();
        assert_eq!(after[2], before[2]);
    }

    #[test]
    fn test_toggle_before_roll_fails() {
        let mut turn = Turn::new(Uuid::new_v4());
        assert!(matches!(
            turn.toggle_die(0),
            Err(GameError::DiceNotRolled)
        ));
    }

    #[test]
    fn test_toggle_out_of_range_fails() {
        let mut turn = Turn::new(Uuid::new_v4());
        let mut rng = rand::thread_rng();
        turn.roll(&mut rng).unwrap();

        assert!(matches!(
            turn.toggle_die(5),
            Err(GameError::InvalidDieIndex(5))
        ));
    }

    #[test]
    fn test_toggle_flips_lock_both_ways() {
        let mut turn = Turn::new(Uuid::new_v4());
        let mut rng = rand::thread_rng();
        turn.roll(&mut rng).unwrap();

        assert!(turn.toggle_die(0).unwrap());
        assert!(!turn.toggle_die(0).unwrap());
    }
}
