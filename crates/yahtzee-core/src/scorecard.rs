//! Player scorecards and derived totals.
//!
//! A scorecard holds the 13 primary category slots plus the yahtzee
//! bonus accumulator. Primary slots are write-once; the bonus can be
//! added to repeatedly once unlocked.

use crate::game::GameError;
use crate::scoring::Category;
use serde::{Deserialize, Serialize};

/// Bonus awarded when the upper subtotal reaches the threshold
pub const UPPER_BONUS: u32 = 35;

/// Upper subtotal needed to earn the upper bonus
pub const UPPER_BONUS_THRESHOLD: u32 = 63;

/// One scorecard slot. A scored value may legitimately be 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategorySlot {
    #[default]
    Unset,
    Scored(u32),
}

impl CategorySlot {
    pub fn is_scored(&self) -> bool {
        matches!(self, CategorySlot::Scored(_))
    }

    /// The recorded points, treating an unset slot as 0.
    pub fn points(&self) -> u32 {
        match self {
            CategorySlot::Unset => 0,
            CategorySlot::Scored(points) => *points,
        }
    }
}

/// A player's 13 category slots plus the yahtzee bonus accumulator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scorecard {
    pub aces: CategorySlot,
    pub twos: CategorySlot,
    pub threes: CategorySlot,
    pub fours: CategorySlot,
    pub fives: CategorySlot,
    pub sixes: CategorySlot,
    pub three_of_a_kind: CategorySlot,
    pub four_of_a_kind: CategorySlot,
    pub full_house: CategorySlot,
    pub small_straight: CategorySlot,
    pub large_straight: CategorySlot,
    pub yahtzee: CategorySlot,
    pub chance: CategorySlot,
    /// Accumulated bonus points, `None` until the first bonus is scored
    pub yahtzee_bonus: Option<u32>,
}

impl Scorecard {
    /// Create an empty scorecard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the slot for a primary category.
    ///
    /// # Panics
    ///
    /// Panics on `YahtzeeBonus`, which is an accumulator, not a slot.
    pub fn slot(&self, category: Category) -> CategorySlot {
        match category {
            Category::Aces => self.aces,
            Category::Twos => self.twos,
            Category::Threes => self.threes,
            Category::Fours => self.fours,
            Category::Fives => self.fives,
            Category::Sixes => self.sixes,
            Category::ThreeOfAKind => self.three_of_a_kind,
            Category::FourOfAKind => self.four_of_a_kind,
            Category::FullHouse => self.full_house,
            Category::SmallStraight => self.small_straight,
            Category::LargeStraight => self.large_straight,
            Category::Yahtzee => self.yahtzee,
            Category::Chance => self.chance,
            Category::YahtzeeBonus => panic!("yahtzee bonus is not a category slot"),
        }
    }

    fn slot_mut(&mut self, category: Category) -> &mut CategorySlot {
        match category {
            Category::Aces => &mut self.aces,
            Category::Twos => &mut self.twos,
            Category::Threes => &mut self.threes,
            Category::Fours => &mut self.fours,
            Category::Fives => &mut self.fives,
            Category::Sixes => &mut self.sixes,
            Category::ThreeOfAKind => &mut self.three_of_a_kind,
            Category::FourOfAKind => &mut self.four_of_a_kind,
            Category::FullHouse => &mut self.full_house,
            Category::SmallStraight => &mut self.small_straight,
            Category::LargeStraight => &mut self.large_straight,
            Category::Yahtzee => &mut self.yahtzee,
            Category::Chance => &mut self.chance,
            Category::YahtzeeBonus => panic!("yahtzee bonus is not a category slot"),
        }
    }

    /// Whether the yahtzee bonus can be scored.
    ///
    /// The gate is a yahtzee slot scored with a nonzero value; a
    /// yahtzee deliberately scored as 0 keeps the bonus locked.
    pub fn bonus_unlocked(&self) -> bool {
        matches!(self.yahtzee, CategorySlot::Scored(points) if points > 0)
    }

    /// Record points for a category.
    ///
    /// Primary slots are write-once; a second attempt fails and
    /// leaves the card unchanged. `YahtzeeBonus` accumulates instead,
    /// and fails while the bonus gate is closed.
    pub fn record(&mut self, category: Category, points: u32) -> Result<(), GameError> {
        if category == Category::YahtzeeBonus {
            if !self.bonus_unlocked() {
                return Err(GameError::BonusLocked);
            }
            self.yahtzee_bonus = Some(self.yahtzee_bonus.unwrap_or(0) + points);
            return Ok(());
        }

        let slot = self.slot_mut(category);
        if slot.is_scored() {
            return Err(GameError::CategoryAlreadyScored(category));
        }
        *slot = CategorySlot::Scored(points);
        Ok(())
    }

    /// Sum of the six upper slots, before any bonus.
    pub fn upper_subtotal(&self) -> u32 {
        self.aces.points()
            + self.twos.points()
            + self.threes.points()
            + self.fours.points()
            + self.fives.points()
            + self.sixes.points()
    }

    /// 35 once the upper subtotal reaches 63, otherwise 0.
    pub fn upper_bonus(&self) -> u32 {
        if self.upper_subtotal() >= UPPER_BONUS_THRESHOLD {
            UPPER_BONUS
        } else {
            0
        }
    }

    pub fn upper_total(&self) -> u32 {
        self.upper_subtotal() + self.upper_bonus()
    }

    /// Sum of the lower slots plus any accumulated yahtzee bonus.
    pub fn lower_total(&self) -> u32 {
        self.three_of_a_kind.points()
            + self.four_of_a_kind.points()
            + self.full_house.points()
            + self.small_straight.points()
            + self.large_straight.points()
            + self.yahtzee.points()
            + self.chance.points()
            + self.yahtzee_bonus.unwrap_or(0)
    }

    pub fn overall_total(&self) -> u32 {
        self.upper_total() + self.lower_total()
    }

    /// How many of the 13 primary slots are still unset.
    ///
    /// The yahtzee bonus is an add-on and never counts here.
    pub fn remaining_categories(&self) -> usize {
        Category::PRIMARY
            .iter()
            .filter(|&&c| !self.slot(c).is_scored())
            .count()
    }

    /// Categories that can currently be scored: every unset primary
    /// slot, plus the yahtzee bonus while its gate is open.
    pub fn scoreable_categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = Category::PRIMARY
            .iter()
            .copied()
            .filter(|&c| !self.slot(c).is_scored())
            .collect();
        if self.bonus_unlocked() {
            categories.push(Category::YahtzeeBonus);
        }
        categories
    }

    /// Whether every primary slot has been scored.
    pub fn is_complete(&self) -> bool {
        self.remaining_categories() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_scorecard_is_empty() {
        let card = Scorecard::new();
        assert_eq!(card.remaining_categories(), 13);
        assert_eq!(card.overall_total(), 0);
        assert_eq!(card.yahtzee_bonus, None);
    }

    #[test]
    fn test_record_is_write_once() {
        let mut card = Scorecard::new();
        card.record(Category::FullHouse, 25).unwrap();

        let err = card.record(Category::FullHouse, 25).unwrap_err();
        assert!(matches!(
            err,
            GameError::CategoryAlreadyScored(Category::FullHouse)
        ));
        assert_eq!(card.full_house, CategorySlot::Scored(25));
    }

    #[test]
    fn test_scored_zero_still_counts_as_scored() {
        let mut card = Scorecard::new();
        card.record(Category::LargeStraight, 0).unwrap();

        assert!(card.large_straight.is_scored());
        assert_eq!(card.remaining_categories(), 12);
        assert!(card.record(Category::LargeStraight, 40).is_err());
    }

    #[test]
    fn test_upper_bonus_boundary() {
        // Subtotal of exactly 62: no bonus
        let mut card = Scorecard::new();
        card.record(Category::Aces, 2).unwrap();
        card.record(Category::Twos, 6).unwrap();
        card.record(Category::Threes, 9).unwrap();
        card.record(Category::Fours, 12).unwrap();
        card.record(Category::Fives, 15).unwrap();
        card.record(Category::Sixes, 18).unwrap();
        assert_eq!(card.upper_subtotal(), 62);
        assert_eq!(card.upper_bonus(), 0);
        assert_eq!(card.upper_total(), 62);

        // One more ace crosses the threshold
        let mut card = Scorecard::new();
        card.record(Category::Aces, 3).unwrap();
        card.record(Category::Twos, 6).unwrap();
        card.record(Category::Threes, 9).unwrap();
        card.record(Category::Fours, 12).unwrap();
        card.record(Category::Fives, 15).unwrap();
        card.record(Category::Sixes, 18).unwrap();
        assert_eq!(card.upper_subtotal(), 63);
        assert_eq!(card.upper_bonus(), 35);
        assert_eq!(card.upper_total(), 98);
    }

    #[test]
    fn test_bonus_locked_until_nonzero_yahtzee() {
        let mut card = Scorecard::new();
        assert!(matches!(
            card.record(Category::YahtzeeBonus, 100),
            Err(GameError::BonusLocked)
        ));

        // A yahtzee scored as zero keeps the gate closed
        card.record(Category::Yahtzee, 0).unwrap();
        assert!(!card.bonus_unlocked());
        assert!(card.record(Category::YahtzeeBonus, 100).is_err());
    }

    #[test]
    fn test_bonus_accumulates() {
        let mut card = Scorecard::new();
        card.record(Category::Yahtzee, 50).unwrap();
        assert!(card.bonus_unlocked());

        card.record(Category::YahtzeeBonus, 100).unwrap();
        card.record(Category::YahtzeeBonus, 100).unwrap();
        card.record(Category::YahtzeeBonus, 0).unwrap();
        assert_eq!(card.yahtzee_bonus, Some(200));
        assert_eq!(card.lower_total(), 250);
    }

    #[test]
    fn test_bonus_not_a_remaining_category() {
        let mut card = Scorecard::new();
        for category in Category::PRIMARY {
            card.record(category, 1).unwrap();
        }
        assert_eq!(card.remaining_categories(), 0);
        assert!(card.is_complete());
    }

    #[test]
    fn test_scoreable_categories_includes_open_bonus() {
        let mut card = Scorecard::new();
        assert_eq!(card.scoreable_categories().len(), 13);

        card.record(Category::Yahtzee, 50).unwrap();
        let scoreable = card.scoreable_categories();
        assert_eq!(scoreable.len(), 13); // 12 unset primaries + bonus
        assert!(scoreable.contains(&Category::YahtzeeBonus));
        assert!(!scoreable.contains(&Category::Yahtzee));
    }
}
