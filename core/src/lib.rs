#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Run From Cats engine.
//!
//! This crate defines the vocabulary that connects adapters, the authoritative
//! world, and pure systems. Adapters translate user input into [`Intent`]
//! values, the world resolves turns against its grid and broadcasts [`Event`]
//! values describing what happened, and systems read the grid exclusively
//! through borrowed [`GridView`] values. Renderers receive a [`Snapshot`] of
//! semantic cells and never see engine internals.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest width or height accepted for a playing field.
pub const MIN_DIMENSION: u32 = 3;

/// Contents of a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Free ground that any mover may enter.
    #[default]
    Empty,
    /// Impassable terrain.
    Obstacle,
    /// The fleeing player.
    Player,
    /// A pursuing cat.
    Cat,
}

/// Orthogonal movement directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in the fixed priority order used for tie-breaking.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        };
        f.write_str(label)
    }
}

/// Location of a single grid cell expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    row: u32,
    column: u32,
}

impl Position {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Computes the Manhattan distance between two positions.
    #[must_use]
    pub fn manhattan_distance(self, other: Position) -> u32 {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column)
    }

    /// Position one cell away in the provided direction.
    ///
    /// Returns `None` when the step would underflow a coordinate. Upper bounds
    /// depend on the grid and are checked by [`GridView::contains`].
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Position> {
        match direction {
            Direction::Up => self.row.checked_sub(1).map(|row| Self::new(row, self.column)),
            Direction::Down => self.row.checked_add(1).map(|row| Self::new(row, self.column)),
            Direction::Left => self
                .column
                .checked_sub(1)
                .map(|column| Self::new(self.row, column)),
            Direction::Right => self
                .column
                .checked_add(1)
                .map(|column| Self::new(self.row, column)),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Identifier of a cat, equal to its index in generation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CatId(u32);

impl CatId {
    /// Creates a new cat identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier of a persisted game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(u64);

impl SessionId {
    /// Creates a new session identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a game session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// The player is still running.
    #[default]
    Active,
    /// The player survived long enough.
    Won,
    /// A cat caught the player.
    Lost,
}

impl GameStatus {
    /// Reports whether the status ends the game.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Active => "active",
            Self::Won => "won",
            Self::Lost => "lost",
        };
        f.write_str(label)
    }
}

/// Requests delivered by the transport layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Move the player one cell in the given direction.
    Move(Direction),
    /// Start a fresh game, replacing any existing one.
    NewGame,
    /// Discard the current game and regenerate the field.
    Reset,
}

/// Events broadcast by the world while resolving intents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A new field was generated for the session.
    FieldGenerated {
        /// Session that received the field.
        session: SessionId,
        /// Seed that reproduces the field.
        seed: u64,
    },
    /// The player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: Position,
        /// Cell the player occupies after moving.
        to: Position,
    },
    /// A cat moved one step closer to the player.
    CatMoved {
        /// Identifier of the cat.
        cat: CatId,
        /// Cell the cat occupied before moving.
        from: Position,
        /// Cell the cat occupies after moving.
        to: Position,
    },
    /// A cat found no improving step and stayed in place.
    CatHeld {
        /// Identifier of the cat.
        cat: CatId,
        /// Cell the cat keeps occupying.
        at: Position,
    },
    /// The player and a cat met on the same cell.
    PlayerCaught {
        /// Cell where the capture happened.
        at: Position,
    },
    /// Every cat moved without reaching the player.
    TurnCompleted {
        /// Turn counter after the increment.
        turn: u32,
    },
    /// The player survived the configured number of turns.
    GameWon {
        /// Turn counter at the moment of victory.
        turn: u32,
    },
}

/// Where the generator places the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStart {
    /// Middle cell of the field.
    #[default]
    Center,
    /// Any free cell.
    Random,
}

/// Which cells the generator considers for cats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatSpawn {
    /// Border rows and columns only.
    #[default]
    Edges,
    /// Any free cell.
    Anywhere,
}

/// Tunable parameters of a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Number of columns in the field.
    pub width: u32,
    /// Number of rows in the field.
    pub height: u32,
    /// Number of cats placed at generation.
    pub cats: u32,
    /// Number of obstacles placed at generation.
    pub obstacles: u32,
    /// Completed turns required to win.
    pub survival_turns: u32,
    /// Seed for field generation; drawn at random when absent.
    pub seed: Option<u64>,
    /// Placement rule for the player.
    pub player_start: PlayerStart,
    /// Placement rule for cats.
    pub cat_spawn: CatSpawn,
    /// Minimum Manhattan distance between the player and any cat at start.
    pub min_cat_distance: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 5,
            height: 5,
            cats: 1,
            obstacles: 3,
            survival_turns: 20,
            seed: None,
            player_start: PlayerStart::Center,
            cat_spawn: CatSpawn::Edges,
            min_cat_distance: 2,
        }
    }
}

impl GameConfig {
    /// Checks that a field could exist for this configuration.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.width < MIN_DIMENSION || self.height < MIN_DIMENSION {
            return Err(GameError::InvalidConfig {
                reason: format!(
                    "field must be at least {MIN_DIMENSION}x{MIN_DIMENSION}, got {}x{}",
                    self.width, self.height
                ),
            });
        }

        if self.survival_turns == 0 {
            return Err(GameError::InvalidConfig {
                reason: "survival_turns must be positive".to_owned(),
            });
        }

        let cells = u64::from(self.width) * u64::from(self.height);
        let occupants = 1 + u64::from(self.cats) + u64::from(self.obstacles);
        if occupants > cells {
            return Err(GameError::InvalidConfig {
                reason: format!("{occupants} occupants do not fit into {cells} cells"),
            });
        }

        Ok(())
    }
}

/// Read-only view into a dense row-major cell grid.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    cells: &'a [Cell],
    width: u32,
    height: u32,
}

impl<'a> GridView<'a> {
    /// Captures a new view backed by the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a [Cell], width: u32, height: u32) -> Self {
        Self {
            cells,
            width,
            height,
        }
    }

    /// Provides the `(width, height)` of the underlying grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Reports whether the position lies inside the grid.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        position.row() < self.height && position.column() < self.width
    }

    /// Returns the cell at the provided position, if it lies inside the grid.
    #[must_use]
    pub fn cell(&self, position: Position) -> Option<Cell> {
        self.index(position)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Reports whether a mover may enter the position.
    #[must_use]
    pub fn is_passable(&self, position: Position) -> bool {
        self.cell(position) == Some(Cell::Empty)
    }

    /// In-bounds orthogonal neighbours in Left, Right, Up, Down order.
    pub fn neighbors4(&self, position: Position) -> impl Iterator<Item = Position> + 'a {
        let view = *self;
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| position.step(direction))
            .filter(move |neighbor| view.contains(*neighbor))
    }

    /// Returns an iterator over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + 'a {
        self.cells.iter().copied()
    }

    /// Row-major offset of the position, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, position: Position) -> Option<usize> {
        if !self.contains(position) {
            return None;
        }
        let row = usize::try_from(position.row()).ok()?;
        let column = usize::try_from(position.column()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

/// Renderer-facing capture of a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    status: GameStatus,
    turn: u32,
    survival_turns: u32,
}

impl Snapshot {
    /// Creates a snapshot from row-major cells and session metadata.
    #[must_use]
    pub fn new(
        width: u32,
        height: u32,
        cells: Vec<Cell>,
        status: GameStatus,
        turn: u32,
        survival_turns: u32,
    ) -> Self {
        Self {
            width,
            height,
            cells,
            status,
            turn,
            survival_turns,
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Status of the session at capture time.
    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Completed turns at capture time.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Completed turns required to win.
    #[must_use]
    pub const fn survival_turns(&self) -> u32 {
        self.survival_turns
    }

    /// Turns left before the player wins.
    #[must_use]
    pub const fn turns_remaining(&self) -> u32 {
        self.survival_turns.saturating_sub(self.turn)
    }

    /// Returns the cell at the provided position.
    #[must_use]
    pub fn cell(&self, position: Position) -> Option<Cell> {
        GridView::new(&self.cells, self.width, self.height).cell(position)
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        let width = usize::try_from(self.width).unwrap_or(usize::MAX).max(1);
        self.cells.chunks(width)
    }
}

/// Reasons the engine refuses a player move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveRejection {
    /// The target cell lies outside the field.
    OffGrid,
    /// The target cell holds an obstacle.
    Obstacle,
}

impl fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OffGrid => f.write_str("the target cell is off the field"),
            Self::Obstacle => f.write_str("an obstacle blocks the way"),
        }
    }
}

/// Failures reported by the engine. All of them are scoped to one session.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    /// A position lies outside the grid.
    #[error("position {position} lies outside the {width}x{height} field")]
    OutOfBounds {
        /// Offending position.
        position: Position,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },
    /// The player move was refused; state is unchanged.
    #[error("cannot move {direction}: {reason}")]
    InvalidMove {
        /// Requested direction.
        direction: Direction,
        /// Why the move was refused.
        reason: MoveRejection,
    },
    /// No fair field was found within the retry budget.
    #[error("could not generate a fair field after {attempts} attempts")]
    GenerationFailed {
        /// Attempts spent before giving up.
        attempts: u32,
    },
    /// The session already ended.
    #[error("the game is over: {status}")]
    GameOver {
        /// Terminal status of the session.
        status: GameStatus,
    },
    /// A stored session could not be decoded.
    #[error("session snapshot is corrupt: {reason}")]
    CorruptSnapshot {
        /// Decoder diagnostic.
        reason: String,
    },
    /// A session could not be encoded.
    #[error("session snapshot could not be encoded: {reason}")]
    SnapshotEncoding {
        /// Encoder diagnostic.
        reason: String,
    },
    /// The configuration cannot produce a field.
    #[error("invalid game configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        reason: String,
    },
}

impl GameError {
    /// Reports whether the caller may retry with different input.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::GameOver { .. } | Self::CorruptSnapshot { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::{Cell, Direction, GameConfig, GameError, GameStatus, GridView, Position};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = Position::new(1, 1);
        let destination = Position::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn step_refuses_to_underflow() {
        let corner = Position::new(0, 0);
        assert_eq!(corner.step(Direction::Up), None);
        assert_eq!(corner.step(Direction::Left), None);
        assert_eq!(corner.step(Direction::Down), Some(Position::new(1, 0)));
        assert_eq!(corner.step(Direction::Right), Some(Position::new(0, 1)));
    }

    #[test]
    fn neighbors_follow_priority_order_and_stay_in_bounds() {
        let cells = vec![Cell::Empty; 9];
        let view = GridView::new(&cells, 3, 3);

        let center: Vec<_> = view.neighbors4(Position::new(1, 1)).collect();
        assert_eq!(
            center,
            vec![
                Position::new(1, 0),
                Position::new(1, 2),
                Position::new(0, 1),
                Position::new(2, 1),
            ]
        );

        let corner: Vec<_> = view.neighbors4(Position::new(2, 2)).collect();
        assert_eq!(corner, vec![Position::new(2, 1), Position::new(1, 2)]);
    }

    #[test]
    fn view_reports_passability() {
        let mut cells = vec![Cell::Empty; 9];
        cells[1] = Cell::Obstacle;
        cells[4] = Cell::Player;
        let view = GridView::new(&cells, 3, 3);

        assert!(view.is_passable(Position::new(0, 0)));
        assert!(!view.is_passable(Position::new(0, 1)));
        assert!(!view.is_passable(Position::new(1, 1)));
        assert!(!view.is_passable(Position::new(3, 0)));
        assert_eq!(view.cell(Position::new(0, 3)), None);
    }

    #[test]
    fn default_config_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn config_rejects_tiny_fields() {
        let config = GameConfig {
            width: 2,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn config_rejects_overcrowded_fields() {
        let config = GameConfig {
            width: 3,
            height: 3,
            cats: 4,
            obstacles: 5,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn game_over_is_not_recoverable() {
        let error = GameError::GameOver {
            status: GameStatus::Lost,
        };
        assert!(!error.is_recoverable());
        assert!(GameError::GenerationFailed { attempts: 100 }.is_recoverable());
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn position_round_trips_through_bincode() {
        assert_round_trip(&Position::new(4, 2));
    }

    #[test]
    fn config_round_trips_through_bincode() {
        let config = GameConfig {
            seed: Some(0x5eed),
            ..GameConfig::default()
        };
        assert_round_trip(&config);
    }
}
