//! Scoring rules for the 13 categories plus the yahtzee bonus.
//!
//! Everything in this module is a pure function of the five dice values;
//! the only context a rule ever needs is whether the player's yahtzee
//! slot has already been scored (the bonus gate).

use serde::{Deserialize, Serialize};

/// Fixed score for a full house
pub const FULL_HOUSE_SCORE: u32 = 25;

/// Fixed score for a small straight
pub const SMALL_STRAIGHT_SCORE: u32 = 30;

/// Fixed score for a large straight
pub const LARGE_STRAIGHT_SCORE: u32 = 40;

/// Fixed score for a yahtzee
pub const YAHTZEE_SCORE: u32 = 50;

/// Score awarded per extra yahtzee once the yahtzee slot is filled
pub const YAHTZEE_BONUS_SCORE: u32 = 100;

/// A scorable category.
///
/// The 13 primary categories each occupy one slot on the scorecard;
/// `YahtzeeBonus` is the repeatable add-on and never counts as a
/// remaining slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Aces,
    Twos,
    Threes,
    Fours,
    Fives,
    Sixes,
    ThreeOfAKind,
    FourOfAKind,
    FullHouse,
    SmallStraight,
    LargeStraight,
    Yahtzee,
    Chance,
    YahtzeeBonus,
}

impl Category {
    /// The 13 primary categories in scorecard order.
    pub const PRIMARY: [Category; 13] = [
        Category::Aces,
        Category::Twos,
        Category::Threes,
        Category::Fours,
        Category::Fives,
        Category::Sixes,
        Category::ThreeOfAKind,
        Category::FourOfAKind,
        Category::FullHouse,
        Category::SmallStraight,
        Category::LargeStraight,
        Category::Yahtzee,
        Category::Chance,
    ];

    /// Whether this is an upper-section category (aces through sixes).
    pub fn is_upper(&self) -> bool {
        self.face().is_some()
    }

    /// The face value counted by an upper-section category.
    pub fn face(&self) -> Option<u32> {
        match self {
            Category::Aces => Some(1),
            Category::Twos => Some(2),
            Category::Threes => Some(3),
            Category::Fours => Some(4),
            Category::Fives => Some(5),
            Category::Sixes => Some(6),
            _ => None,
        }
    }
}

/// Count how many dice show each face. Index 0 holds the count of ones.
fn face_counts(dice: [u8; 5]) -> [u8; 6] {
    let mut counts = [0u8; 6];
    for value in dice {
        counts[(value - 1) as usize] += 1;
    }
    counts
}

fn dice_sum(dice: [u8; 5]) -> u32 {
    dice.iter().map(|&v| u32::from(v)).sum()
}

fn is_five_of_a_kind(dice: [u8; 5]) -> bool {
    dice.iter().all(|&v| v == dice[0])
}

/// Check whether the dice contain every value in `run`.
fn contains_run(counts: &[u8; 6], run: &[u8]) -> bool {
    run.iter().all(|&v| counts[(v - 1) as usize] > 0)
}

/// Evaluate a category against the current dice.
///
/// Returns `None` only for `YahtzeeBonus` while the gate is closed
/// (the player has not yet scored a nonzero yahtzee); every primary
/// category always produces a value, which may legitimately be 0.
pub fn evaluate(category: Category, dice: [u8; 5], bonus_unlocked: bool) -> Option<u32> {
    let counts = face_counts(dice);

    let points = match category {
        Category::Aces
        | Category::Twos
        | Category::Threes
        | Category::Fours
        | Category::Fives
        | Category::Sixes => {
            let face = category.face().unwrap();
            u32::from(counts[(face - 1) as usize]) * face
        }
        Category::ThreeOfAKind => {
            if counts.iter().any(|&c| c >= 3) {
                dice_sum(dice)
            } else {
                0
            }
        }
        Category::FourOfAKind => {
            if counts.iter().any(|&c| c >= 4) {
                dice_sum(dice)
            } else {
                0
            }
        }
        Category::FullHouse => {
            let has_pair = counts.iter().any(|&c| c == 2);
            let has_triple = counts.iter().any(|&c| c == 3);
            if has_pair && has_triple {
                FULL_HOUSE_SCORE
            } else {
                0
            }
        }
        Category::SmallStraight => {
            let runs: [&[u8]; 3] = [&[1, 2, 3, 4], &[2, 3, 4, 5], &[3, 4, 5, 6]];
            if runs.iter().any(|run| contains_run(&counts, run)) {
                SMALL_STRAIGHT_SCORE
            } else {
                0
            }
        }
        Category::LargeStraight => {
            let runs: [&[u8]; 2] = [&[1, 2, 3, 4, 5], &[2, 3, 4, 5, 6]];
            if runs.iter().any(|run| contains_run(&counts, run)) {
                LARGE_STRAIGHT_SCORE
            } else {
                0
            }
        }
        Category::Yahtzee => {
            if is_five_of_a_kind(dice) {
                YAHTZEE_SCORE
            } else {
                0
            }
        }
        Category::Chance => dice_sum(dice),
        Category::YahtzeeBonus => {
            if !bonus_unlocked {
                return None;
            }
            if is_five_of_a_kind(dice) {
                YAHTZEE_BONUS_SCORE
            } else {
                0
            }
        }
    };

    Some(points)
}
