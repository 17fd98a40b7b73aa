use std::collections::HashSet;

use proptest::prelude::*;
use run_from_cats_core::{Cell, CatSpawn, GameConfig, GameError, PlayerStart, Position};
use run_from_cats_system_field_generation::{generate, Field, GENERATION_ATTEMPTS};

fn count(field: &Field, kind: Cell) -> usize {
    field.cells.iter().filter(|cell| **cell == kind).count()
}

fn cell_at(field: &Field, position: Position) -> Cell {
    field.cells[(position.row() * field.width + position.column()) as usize]
}

#[test]
fn same_seed_reproduces_the_field() {
    let config = GameConfig::default();

    let first = generate(&config, Some(0x1234_5678)).expect("first field");
    let second = generate(&config, Some(0x1234_5678)).expect("second field");

    assert_eq!(first, second);
    assert_eq!(first.seed, 0x1234_5678);
}

#[test]
fn missing_seed_is_reported_and_reproducible() {
    let config = GameConfig::default();

    let drawn = generate(&config, None).expect("random field");
    let replayed = generate(&config, Some(drawn.seed)).expect("replayed field");

    assert_eq!(drawn, replayed);
}

#[test]
fn default_field_matches_the_classic_layout() {
    let field = generate(&GameConfig::default(), Some(99)).expect("field");

    assert_eq!((field.width, field.height), (5, 5));
    assert_eq!(field.player, Position::new(2, 2));
    assert_eq!(count(&field, Cell::Player), 1);
    assert_eq!(count(&field, Cell::Cat), 1);
    assert_eq!(count(&field, Cell::Obstacle), 3);

    let cat = field.cats[0];
    assert!(cat.row() == 0 || cat.row() == 4 || cat.column() == 0 || cat.column() == 4);
    assert!(cat.manhattan_distance(field.player) >= 2);
}

#[test]
fn cached_positions_agree_with_cells() {
    let config = GameConfig {
        width: 7,
        height: 6,
        cats: 4,
        obstacles: 8,
        player_start: PlayerStart::Random,
        cat_spawn: CatSpawn::Anywhere,
        ..GameConfig::default()
    };
    let field = generate(&config, Some(3)).expect("field");

    assert_eq!(field.cells.len(), 42);
    assert_eq!(cell_at(&field, field.player), Cell::Player);
    for cat in &field.cats {
        assert_eq!(cell_at(&field, *cat), Cell::Cat);
    }
    let distinct: HashSet<_> = field.cats.iter().collect();
    assert_eq!(distinct.len(), 4);
}

#[test]
fn impossible_spacing_reports_generation_failure() {
    let config = GameConfig {
        width: 3,
        height: 3,
        cats: 1,
        obstacles: 0,
        min_cat_distance: 3,
        ..GameConfig::default()
    };

    assert_eq!(
        generate(&config, Some(1)),
        Err(GameError::GenerationFailed {
            attempts: GENERATION_ATTEMPTS
        })
    );
}

#[test]
fn invalid_dimensions_are_rejected_before_sampling() {
    let config = GameConfig {
        height: 2,
        ..GameConfig::default()
    };

    assert!(matches!(
        generate(&config, Some(1)),
        Err(GameError::InvalidConfig { .. })
    ));
}

proptest! {
    #[test]
    fn generated_fields_are_fair_and_disjoint(
        seed in any::<u64>(),
        cats in 0u32..4,
        obstacles in 0u32..6,
    ) {
        let config = GameConfig {
            width: 6,
            height: 6,
            cats,
            obstacles,
            min_cat_distance: 1,
            player_start: PlayerStart::Random,
            cat_spawn: CatSpawn::Anywhere,
            ..GameConfig::default()
        };

        let field = generate(&config, Some(seed)).expect("roomy field always generates");

        prop_assert_eq!(count(&field, Cell::Player), 1);
        prop_assert_eq!(count(&field, Cell::Cat), cats as usize);
        prop_assert_eq!(count(&field, Cell::Obstacle), obstacles as usize);
        let adjacent = field
            .cats
            .iter()
            .filter(|cat| cat.manhattan_distance(field.player) == 1)
            .count();
        prop_assert!(adjacent <= 1);
    }
}
