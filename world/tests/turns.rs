use proptest::prelude::*;
use run_from_cats_core::{
    CatId, Cell, Direction, Event, GameConfig, GameError, GameStatus, MoveRejection, Position,
    SessionId,
};
use run_from_cats_world::{apply_turn, query, GameSession, Grid};

/// Builds a session from a text map: `.` empty, `#` obstacle, `P` player,
/// `C` cat. Cats resolve in reading order.
fn session_from_map(map: &[&str], survival_turns: u32) -> GameSession {
    let height = map.len() as u32;
    let width = map[0].len() as u32;
    let mut cells = Vec::new();
    let mut player = None;
    let mut cats = Vec::new();

    for (row, line) in map.iter().enumerate() {
        for (column, glyph) in line.chars().enumerate() {
            let position = Position::new(row as u32, column as u32);
            cells.push(match glyph {
                '.' => Cell::Empty,
                '#' => Cell::Obstacle,
                'P' => {
                    player = Some(position);
                    Cell::Player
                }
                'C' => {
                    cats.push(position);
                    Cell::Cat
                }
                other => panic!("unknown map glyph {other:?}"),
            });
        }
    }

    let grid = Grid::from_parts(
        width,
        height,
        cells,
        player.expect("map needs a player"),
        cats,
    )
    .expect("consistent map");
    GameSession::from_grid(SessionId::new(1), grid, survival_turns, 0).expect("session")
}

fn count(session: &GameSession, kind: Cell) -> usize {
    session
        .grid()
        .cells()
        .iter()
        .filter(|cell| **cell == kind)
        .count()
}

#[test]
fn cat_follows_player_then_player_walks_into_it() {
    let mut session = session_from_map(
        &[
            ".....", //
            ".....", //
            "..PC.", //
            ".....", //
            ".....", //
        ],
        20,
    );
    let mut events = Vec::new();

    let status = apply_turn(&mut session, Direction::Left, &mut events).expect("legal move");

    assert_eq!(status, GameStatus::Active);
    assert_eq!(session.player(), Position::new(2, 1));
    assert_eq!(session.cats(), &[Position::new(2, 2)]);
    assert_eq!(session.turn(), 1);
    assert_eq!(
        events,
        vec![
            Event::PlayerMoved {
                from: Position::new(2, 2),
                to: Position::new(2, 1),
            },
            Event::CatMoved {
                cat: CatId::new(0),
                from: Position::new(2, 3),
                to: Position::new(2, 2),
            },
            Event::TurnCompleted { turn: 1 },
        ]
    );

    events.clear();
    let status = apply_turn(&mut session, Direction::Right, &mut events).expect("legal move");

    assert_eq!(status, GameStatus::Lost);
    assert_eq!(session.turn(), 1, "a lost turn is not counted");
    assert_eq!(
        events.last(),
        Some(&Event::PlayerCaught {
            at: Position::new(2, 2)
        })
    );
    assert!(session.grid().is_captured());
    assert_eq!(count(&session, Cell::Player), 0);
}

#[test]
fn cat_reaching_the_player_ends_the_game() {
    let mut session = session_from_map(
        &[
            "..C..", //
            ".....", //
            "..P..", //
            ".....", //
            ".....", //
        ],
        20,
    );
    let mut events = Vec::new();

    let status = apply_turn(&mut session, Direction::Up, &mut events).expect("legal move");

    assert_eq!(status, GameStatus::Lost);
    assert_eq!(session.cats(), &[Position::new(1, 2)]);
    assert_eq!(session.player(), Position::new(1, 2));
    assert_eq!(
        session.grid().get(Position::new(0, 2)),
        Ok(Cell::Empty),
        "the cat left its old cell"
    );
    assert_eq!(session.grid().get(Position::new(1, 2)), Ok(Cell::Cat));
}

#[test]
fn boxed_in_player_cannot_move() {
    let mut session = session_from_map(
        &[
            "C....", //
            "..#..", //
            ".#P#.", //
            "..#..", //
            ".....", //
        ],
        20,
    );
    let before = session.clone();

    for direction in Direction::ALL {
        let mut events = Vec::new();
        let result = apply_turn(&mut session, direction, &mut events);

        assert_eq!(
            result,
            Err(GameError::InvalidMove {
                direction,
                reason: MoveRejection::Obstacle,
            })
        );
        assert!(events.is_empty());
        assert_eq!(session, before);
    }
}

#[test]
fn stepping_off_the_field_is_rejected() {
    let mut session = session_from_map(
        &[
            "P....", //
            ".....", //
            "....C", //
        ],
        20,
    );
    let before = session.clone();
    let mut events = Vec::new();

    assert_eq!(
        apply_turn(&mut session, Direction::Up, &mut events),
        Err(GameError::InvalidMove {
            direction: Direction::Up,
            reason: MoveRejection::OffGrid,
        })
    );
    assert_eq!(
        apply_turn(&mut session, Direction::Left, &mut events),
        Err(GameError::InvalidMove {
            direction: Direction::Left,
            reason: MoveRejection::OffGrid,
        })
    );
    assert_eq!(session, before);
}

#[test]
fn cats_resolve_sequentially_in_generation_order() {
    let mut session = session_from_map(
        &[
            "P.CC.", //
            ".###.", //
            ".....", //
        ],
        20,
    );
    let mut events = Vec::new();

    let _ = apply_turn(&mut session, Direction::Down, &mut events).expect("legal move");

    assert_eq!(
        session.cats(),
        &[Position::new(0, 1), Position::new(0, 2)],
        "the second cat takes the cell the first one vacated"
    );
}

#[test]
fn first_capture_stops_remaining_cats() {
    let mut session = session_from_map(
        &[
            "..C..", //
            ".....", //
            "..P..", //
            ".....", //
            "....C", //
        ],
        20,
    );
    let mut events = Vec::new();

    let status = apply_turn(&mut session, Direction::Up, &mut events).expect("legal move");

    assert_eq!(status, GameStatus::Lost);
    assert_eq!(session.cats()[1], Position::new(4, 4));
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::CatMoved { cat, .. } | Event::CatHeld { cat, .. } if *cat == CatId::new(1))));
}

#[test]
fn surviving_long_enough_wins() {
    let mut session = session_from_map(
        &[
            "P....", //
            ".....", //
            "...#.", //
            "...#C", //
        ],
        2,
    );
    let mut events = Vec::new();

    assert_eq!(
        apply_turn(&mut session, Direction::Right, &mut events),
        Ok(GameStatus::Active)
    );
    assert_eq!(
        apply_turn(&mut session, Direction::Left, &mut events),
        Ok(GameStatus::Won)
    );
    assert_eq!(events.last(), Some(&Event::GameWon { turn: 2 }));
    assert_eq!(query::snapshot(&session).turns_remaining(), 0);
}

#[test]
fn finished_games_reject_every_turn() {
    let mut session = session_from_map(
        &[
            "..C..", //
            ".....", //
            "..P..", //
        ],
        20,
    );
    let mut events = Vec::new();
    let _ = apply_turn(&mut session, Direction::Up, &mut events).expect("capture");
    let finished = session.clone();

    for direction in Direction::ALL {
        let mut events = Vec::new();
        assert_eq!(
            session.apply_turn(direction, &mut events),
            Err(GameError::GameOver {
                status: GameStatus::Lost
            })
        );
        assert!(events.is_empty());
    }
    assert_eq!(session, finished);
}

#[test]
fn snapshot_exposes_semantic_rows() {
    let session = session_from_map(
        &[
            "P#.", //
            "...", //
            "..C", //
        ],
        5,
    );

    let snapshot = query::snapshot(&session);
    let rows: Vec<&[Cell]> = snapshot.rows().collect();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], &[Cell::Player, Cell::Obstacle, Cell::Empty]);
    assert_eq!(rows[2], &[Cell::Empty, Cell::Empty, Cell::Cat]);
    assert_eq!(snapshot.status(), GameStatus::Active);
    assert_eq!(query::nearest_cat_distance(&session), Some(4));
}

fn arbitrary_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

proptest! {
    #[test]
    fn reachable_grids_keep_their_invariants(
        seed in any::<u64>(),
        moves in proptest::collection::vec(arbitrary_direction(), 1..40),
    ) {
        let config = GameConfig {
            width: 6,
            height: 6,
            cats: 2,
            obstacles: 5,
            survival_turns: 25,
            seed: Some(seed),
            ..GameConfig::default()
        };
        let mut session = GameSession::new(SessionId::new(5), &config).expect("session");

        for direction in moves {
            let before = session.clone();
            let mut events = Vec::new();
            match session.apply_turn(direction, &mut events) {
                Ok(_) => {}
                Err(GameError::InvalidMove { .. }) | Err(GameError::GameOver { .. }) => {
                    prop_assert_eq!(&session, &before);
                    prop_assert!(events.is_empty());
                }
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }

            prop_assert!(session.grid().is_consistent());
            if session.status() == GameStatus::Active {
                prop_assert_eq!(count(&session, Cell::Player), 1);
            }
            if session.status() == GameStatus::Lost {
                prop_assert!(session.grid().is_captured());
            }

            let blob = session.serialize().expect("encode");
            let restored = GameSession::deserialize(&blob).expect("decode");
            prop_assert_eq!(restored.serialize().expect("re-encode"), blob);
        }
    }
}
