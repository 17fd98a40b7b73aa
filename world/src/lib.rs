#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state for Run From Cats.
//!
//! The world owns each session's [`Grid`], resolves turns through
//! [`apply_turn`], and hands renderers read-only
//! [`Snapshot`](run_from_cats_core::Snapshot) values through
//! [`query`]. Sessions leave the process only as opaque blobs handed to a
//! [`SessionStore`]; the [`SessionTable`] ties intents, sessions and storage
//! together without any process-wide state.

mod grid;
mod session;
mod store;
mod table;

use run_from_cats_core::{CatId, Cell, Direction, Event, GameError, GameStatus, MoveRejection};
use run_from_cats_system_chase::{direction_between, next_move};
use tracing::{debug, info};

pub use grid::Grid;
pub use session::GameSession;
pub use store::{MemoryStore, SessionStore, StoreError};
pub use table::{DispatchError, Outcome, SessionTable};

/// Resolves one full turn: the player's step followed by every cat's step.
///
/// Cats act one after another in generation order against the grid as left by
/// the previous mover. A rejected move leaves the session untouched and does
/// not consume the turn. Once the session is won or lost every call fails with
/// [`GameError::GameOver`].
pub fn apply_turn(
    session: &mut GameSession,
    direction: Direction,
    out_events: &mut Vec<Event>,
) -> Result<GameStatus, GameError> {
    if session.status.is_terminal() {
        return Err(GameError::GameOver {
            status: session.status,
        });
    }

    let grid = &mut session.grid;
    let from = grid.player();
    let target = from
        .step(direction)
        .filter(|target| grid.view().contains(*target))
        .ok_or(GameError::InvalidMove {
            direction,
            reason: MoveRejection::OffGrid,
        })?;

    let walked_into_cat = match grid.get(target)? {
        Cell::Obstacle => {
            return Err(GameError::InvalidMove {
                direction,
                reason: MoveRejection::Obstacle,
            });
        }
        Cell::Cat => true,
        Cell::Empty | Cell::Player => false,
    };

    grid.relocate_player(target);
    out_events.push(Event::PlayerMoved { from, to: target });
    debug!(session = %session.id, %from, to = %target, "player moved");

    if walked_into_cat {
        return Ok(lose(session, out_events));
    }

    for index in 0..grid.cats().len() {
        let Some(&cat_cell) = grid.cats().get(index) else {
            continue;
        };
        let cat = CatId::new(u32::try_from(index).unwrap_or(u32::MAX));
        let next = next_move(cat_cell, target, grid.view());

        if next == cat_cell {
            out_events.push(Event::CatHeld { cat, at: cat_cell });
            continue;
        }

        grid.relocate_cat(index, next);
        out_events.push(Event::CatMoved {
            cat,
            from: cat_cell,
            to: next,
        });
        debug!(
            cat = cat.get(),
            direction = ?direction_between(cat_cell, next),
            to = %next,
            "cat moved"
        );

        if next == target {
            return Ok(lose(session, out_events));
        }
    }

    session.turn = session.turn.saturating_add(1);
    out_events.push(Event::TurnCompleted { turn: session.turn });

    if session.turn >= session.survival_turns {
        session.status = GameStatus::Won;
        out_events.push(Event::GameWon { turn: session.turn });
        info!(session = %session.id, turn = session.turn, "player escaped the cats");
    }

    Ok(session.status)
}

fn lose(session: &mut GameSession, out_events: &mut Vec<Event>) -> GameStatus {
    let at = session.grid.player();
    session.status = GameStatus::Lost;
    out_events.push(Event::PlayerCaught { at });
    info!(session = %session.id, turn = session.turn, %at, "player caught");
    session.status
}

/// Query functions that provide read-only access to sessions.
pub mod query {
    use run_from_cats_core::Snapshot;

    use super::GameSession;

    /// Captures the renderer-facing view of a session.
    #[must_use]
    pub fn snapshot(session: &GameSession) -> Snapshot {
        let grid = session.grid();
        Snapshot::new(
            grid.width(),
            grid.height(),
            grid.cells().to_vec(),
            session.status(),
            session.turn(),
            session.survival_turns(),
        )
    }

    /// Manhattan distance from the player to the closest cat.
    #[must_use]
    pub fn nearest_cat_distance(session: &GameSession) -> Option<u32> {
        let player = session.player();
        session
            .cats()
            .iter()
            .map(|cat| cat.manhattan_distance(player))
            .min()
    }
}
