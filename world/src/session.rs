//! Game sessions and their persisted representation.

use bincode::Options;
use run_from_cats_core::{
    Direction, Event, GameConfig, GameError, GameStatus, Position, SessionId, Snapshot,
};
use run_from_cats_system_field_generation::generate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::grid::Grid;

/// Version tag written in front of every encoded session.
const SNAPSHOT_VERSION: u16 = 1;
/// Upper bound on decoded snapshot size, guarding against corrupt length prefixes.
const SNAPSHOT_BYTE_LIMIT: u64 = 1 << 20;

/// One player's game: the grid plus turn bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSession {
    pub(crate) id: SessionId,
    pub(crate) grid: Grid,
    pub(crate) turn: u32,
    pub(crate) status: GameStatus,
    pub(crate) survival_turns: u32,
    pub(crate) seed: u64,
}

impl GameSession {
    /// Generates a fresh session for `id`.
    pub fn new(id: SessionId, config: &GameConfig) -> Result<Self, GameError> {
        let field = generate(config, config.seed)?;
        let seed = field.seed;
        info!(session = %id, seed, attempts = field.attempts, "new game started");
        Ok(Self {
            id,
            grid: Grid::from_field(field),
            turn: 0,
            status: GameStatus::Active,
            survival_turns: config.survival_turns,
            seed,
        })
    }

    /// Wraps a hand-built grid in an active session.
    pub fn from_grid(
        id: SessionId,
        grid: Grid,
        survival_turns: u32,
        seed: u64,
    ) -> Result<Self, GameError> {
        if let Some(reason) = grid.inconsistency() {
            return Err(GameError::InvalidConfig { reason });
        }
        if grid.is_captured() {
            return Err(GameError::InvalidConfig {
                reason: "an active session cannot start captured".to_owned(),
            });
        }
        if survival_turns == 0 {
            return Err(GameError::InvalidConfig {
                reason: "survival_turns must be positive".to_owned(),
            });
        }

        Ok(Self {
            id,
            grid,
            turn: 0,
            status: GameStatus::Active,
            survival_turns,
            seed,
        })
    }

    /// Discards the current state and regenerates the field, keeping the id.
    ///
    /// On failure the session is left untouched.
    pub fn reset(&mut self, config: &GameConfig) -> Result<(), GameError> {
        *self = Self::new(self.id, config)?;
        Ok(())
    }

    /// Moves the session under a different identifier.
    #[must_use]
    pub fn with_id(mut self, id: SessionId) -> Self {
        self.id = id;
        self
    }

    /// Resolves one turn in `direction`. See [`crate::apply_turn`].
    pub fn apply_turn(
        &mut self,
        direction: Direction,
        out_events: &mut Vec<Event>,
    ) -> Result<GameStatus, GameError> {
        crate::apply_turn(self, direction, out_events)
    }

    /// Identifier of the session.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Authoritative grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Completed turns.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Completed turns required to win.
    #[must_use]
    pub const fn survival_turns(&self) -> u32 {
        self.survival_turns
    }

    /// Seed of the field this session started from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Player position.
    #[must_use]
    pub const fn player(&self) -> Position {
        self.grid.player()
    }

    /// Cat positions in resolution order.
    #[must_use]
    pub fn cats(&self) -> &[Position] {
        self.grid.cats()
    }

    /// Renderer-facing capture of the session.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        crate::query::snapshot(self)
    }

    /// Encodes the session into a blob for the persistence layer.
    pub fn serialize(&self) -> Result<Vec<u8>, GameError> {
        let encoded = EncodedSession {
            version: SNAPSHOT_VERSION,
            id: self.id,
            grid: &self.grid,
            turn: self.turn,
            status: self.status,
            survival_turns: self.survival_turns,
            seed: self.seed,
        };
        codec()
            .serialize(&encoded)
            .map_err(|error| GameError::SnapshotEncoding {
                reason: error.to_string(),
            })
    }

    /// Decodes a blob produced by [`GameSession::serialize`].
    pub fn deserialize(bytes: &[u8]) -> Result<Self, GameError> {
        let decoded: DecodedSession =
            codec()
                .deserialize(bytes)
                .map_err(|error| GameError::CorruptSnapshot {
                    reason: error.to_string(),
                })?;

        if decoded.version != SNAPSHOT_VERSION {
            return Err(corrupt(format!(
                "unsupported snapshot version {}",
                decoded.version
            )));
        }
        if decoded.survival_turns == 0 {
            return Err(corrupt("survival_turns must be positive".to_owned()));
        }
        if let Some(reason) = decoded.grid.inconsistency() {
            return Err(corrupt(reason));
        }

        // Only a capture loses, and only reaching the goal wins.
        let captured = decoded.grid.is_captured();
        let reachable = match decoded.status {
            GameStatus::Active => !captured && decoded.turn < decoded.survival_turns,
            GameStatus::Won => !captured && decoded.turn == decoded.survival_turns,
            GameStatus::Lost => captured && decoded.turn < decoded.survival_turns,
        };
        if !reachable {
            return Err(corrupt(format!(
                "{} session at turn {} of {} (captured: {captured})",
                decoded.status, decoded.turn, decoded.survival_turns
            )));
        }

        let session = Self {
            id: decoded.id,
            grid: decoded.grid,
            turn: decoded.turn,
            status: decoded.status,
            survival_turns: decoded.survival_turns,
            seed: decoded.seed,
        };
        if session.serialize()? != bytes {
            return Err(corrupt("snapshot is not in canonical form".to_owned()));
        }
        Ok(session)
    }
}

#[derive(Serialize)]
struct EncodedSession<'a> {
    version: u16,
    id: SessionId,
    grid: &'a Grid,
    turn: u32,
    status: GameStatus,
    survival_turns: u32,
    seed: u64,
}

#[derive(Deserialize)]
struct DecodedSession {
    version: u16,
    id: SessionId,
    grid: Grid,
    turn: u32,
    status: GameStatus,
    survival_turns: u32,
    seed: u64,
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new().with_limit(SNAPSHOT_BYTE_LIMIT)
}

fn corrupt(reason: String) -> GameError {
    GameError::CorruptSnapshot { reason }
}
