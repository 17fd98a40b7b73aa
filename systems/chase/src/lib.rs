#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic chase heuristic that steers a cat toward the player.
//!
//! A cat considers its orthogonal neighbours in the fixed order Left, Right,
//! Up, Down, so a cat approaching diagonally closes the column gap first. A neighbour qualifies when it is empty or when it is the
//! player's cell, which is always enterable because stepping onto the player
//! is the capture trigger. The qualifying neighbour with the smallest
//! Manhattan distance to the player wins; ties keep the earliest neighbour in
//! the priority order. The cat stays put when no qualifying neighbour brings
//! it at least as close as it already is.

use run_from_cats_core::{Direction, GridView, Position};

/// Selects the next cell for a cat chasing the player.
///
/// Returns `cat` itself when the cat has no legal step that does not move it
/// away from the player.
#[must_use]
pub fn next_move(cat: Position, player: Position, view: GridView<'_>) -> Position {
    let current_distance = cat.manhattan_distance(player);
    let mut best: Option<Candidate> = None;

    for (priority, neighbor) in view.neighbors4(cat).enumerate() {
        if neighbor != player && !view.is_passable(neighbor) {
            continue;
        }

        let distance = neighbor.manhattan_distance(player);
        if distance > current_distance {
            continue;
        }

        let candidate = Candidate {
            cell: neighbor,
            distance,
            priority,
        };
        best = Some(match best {
            Some(existing) if !candidate.is_better_than(existing) => existing,
            _ => candidate,
        });
    }

    best.map_or(cat, |candidate| candidate.cell)
}

/// Direction that leads from `from` to an orthogonally adjacent `to`.
#[must_use]
pub fn direction_between(from: Position, to: Position) -> Option<Direction> {
    Direction::ALL
        .into_iter()
        .find(|direction| from.step(*direction) == Some(to))
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    cell: Position,
    distance: u32,
    priority: usize,
}

impl Candidate {
    fn is_better_than(self, other: Candidate) -> bool {
        (self.distance, self.priority) < (other.distance, other.priority)
    }
}
