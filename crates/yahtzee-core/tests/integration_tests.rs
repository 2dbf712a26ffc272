//! Integration tests for the Yahtzee engine.
//!
//! These tests drive complete games through the public API, from
//! joining through to the final standings.

use uuid::Uuid;
use yahtzee_core::*;

/// Drive a game to completion: every turn, roll once and score the
/// first open primary category. Returns the number of turns played.
fn play_to_completion(game: &mut Game) -> usize {
    let mut turns = 0;
    let max_turns = 100;

    while !game.is_finished() && turns < max_turns {
        let player = game.active_turn().expect("game in progress").player_id;
        game.roll_dice(player).unwrap();

        let category = game
            .snapshot()
            .scoreable
            .into_iter()
            .find(|&c| c != Category::YahtzeeBonus)
            .expect("open category for active player");
        game.score_category(player, category).unwrap();
        turns += 1;
    }

    assert!(game.is_finished(), "game should finish within {max_turns} turns");
    turns
}

#[test]
fn test_full_two_player_game() {
    let owner = Uuid::new_v4();
    let other = Uuid::new_v4();

    let mut game = Game::new(owner);
    game.add_player(other).unwrap();
    game.start(owner).unwrap();

    let turns = play_to_completion(&mut game);
    assert_eq!(turns, 26, "13 scoring turns per player");

    // Every primary slot on both cards is filled
    for player in &game.players {
        assert_eq!(player.remaining_categories(), 0);
    }

    // The declared winner holds the maximum total, earliest joiner first
    let standings = game.standings();
    let best = standings.iter().map(|&(_, total)| total).max().unwrap();
    let expected = standings
        .iter()
        .find(|&&(_, total)| total == best)
        .map(|&(id, _)| id)
        .unwrap();
    assert_eq!(game.winner(), Some(expected));
}

#[test]
fn test_full_four_player_game() {
    let owner = Uuid::new_v4();
    let mut game = Game::new(owner);
    for _ in 0..3 {
        game.add_player(Uuid::new_v4()).unwrap();
    }
    game.start(owner).unwrap();

    let turns = play_to_completion(&mut game);
    assert_eq!(turns, 52);
    assert_eq!(game.standings().len(), 4);
}

#[test]
fn test_locked_die_survives_roll_through_game_api() {
    let owner = Uuid::new_v4();
    let mut game = Game::new(owner);
    game.start(owner).unwrap();

    game.roll_dice(owner).unwrap();
    let before = game.snapshot().dice.unwrap();

    game.toggle_die(owner, 2).unwrap();
    game.roll_dice(owner).unwrap();

    let after = game.snapshot().dice.unwrap();
    assert_eq!(after[2].value, before[2].value);
    assert!(after[2].locked);
    for die in after {
        assert!((1..=6).contains(&die.value));
    }
}

#[test]
fn test_three_rolls_then_must_score() {
    let owner = Uuid::new_v4();
    let mut game = Game::new(owner);
    game.start(owner).unwrap();

    for expected in 1..=MAX_ROLLS {
        game.roll_dice(owner).unwrap();
        assert_eq!(game.active_turn().unwrap().roll_count, expected);
    }
    assert_eq!(game.roll_dice(owner), Err(GameError::RollsExhausted));

    // Toggling is still legal after the third roll
    game.toggle_die(owner, 0).unwrap();

    // Scoring is the only way out of the turn
    let events = game.score_category(owner, Category::Chance).unwrap();
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::CategoryScored { .. })));
}

#[test]
fn test_registry_driven_game() {
    let registry = GameRegistry::new();
    let owner = Uuid::new_v4();
    let other = Uuid::new_v4();

    let id = registry.create(owner);
    registry
        .with_game_mut(id, |game| game.add_player(other))
        .unwrap();
    registry
        .with_game_mut(id, |game| game.start(owner))
        .unwrap();

    // Play the whole game through the registry entry lock
    loop {
        let snapshot = registry.snapshot(id).unwrap();
        if snapshot.status == GameStatus::Ended {
            break;
        }
        let player = snapshot.active_player.unwrap();
        registry
            .with_game_mut(id, |game| game.apply_action(player, GameAction::RollDice))
            .unwrap();

        let category = registry
            .snapshot(id)
            .unwrap()
            .scoreable
            .into_iter()
            .find(|&c| c != Category::YahtzeeBonus)
            .unwrap();
        registry
            .with_game_mut(id, |game| {
                game.apply_action(player, GameAction::ScoreCategory { category })
            })
            .unwrap();
    }

    let snapshot = registry.snapshot(id).unwrap();
    assert!(snapshot.winner.is_some());
    assert_eq!(snapshot.active_player, None);

    assert!(registry.remove(id));
    assert_eq!(
        registry.snapshot(id).unwrap_err(),
        GameError::GameNotFound
    );
}

#[test]
fn test_start_events_announce_first_turn() {
    let owner = Uuid::new_v4();
    let mut game = Game::new(owner);
    game.add_player(Uuid::new_v4()).unwrap();

    let events = game.start(owner).unwrap();
    assert_eq!(
        events,
        vec![
            GameEvent::GameStarted,
            GameEvent::TurnStarted { player: owner },
        ]
    );
}

#[test]
fn test_actions_round_trip_as_json() {
    let action = GameAction::ScoreCategory {
        category: Category::SmallStraight,
    };
    let json = serde_json::to_string(&action).unwrap();
    assert!(json.contains("smallStraight"));

    let back: GameAction = serde_json::from_str(&json).unwrap();
    assert_eq!(back, action);
}
