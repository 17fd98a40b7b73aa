//! Authoritative cell storage for a single session.

use run_from_cats_core::{Cell, GameError, GridView, Position, MIN_DIMENSION};
use run_from_cats_system_field_generation::Field;
use serde::{Deserialize, Serialize};

/// Dense row-major grid with cached player and cat positions.
///
/// The caches are an index into the cells, never a second source of truth:
/// the player's cell holds [`Cell::Player`] and every cat's cell holds
/// [`Cell::Cat`]. The only exception is a capture, where the player position
/// coincides with a cat and the cell stays [`Cell::Cat`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    player: Position,
    cats: Vec<Position>,
}

impl Grid {
    /// Assembles a grid from explicit parts, rejecting inconsistent layouts.
    pub fn from_parts(
        width: u32,
        height: u32,
        cells: Vec<Cell>,
        player: Position,
        cats: Vec<Position>,
    ) -> Result<Self, GameError> {
        let grid = Self {
            width,
            height,
            cells,
            player,
            cats,
        };
        match grid.inconsistency() {
            Some(reason) => Err(GameError::InvalidConfig { reason }),
            None => Ok(grid),
        }
    }

    pub(crate) fn from_field(field: Field) -> Self {
        Self {
            width: field.width,
            height: field.height,
            cells: field.cells,
            player: field.player,
            cats: field.cats,
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

    /// Cached player position.
    #[must_use]
    pub const fn player(&self) -> Position {
        self.player
    }

    /// Cached cat positions in generation order.
    #[must_use]
    pub fn cats(&self) -> &[Position] {
        &self.cats
    }

    /// Row-major cell contents.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Borrowed read-only view for systems.
    #[must_use]
    pub fn view(&self) -> GridView<'_> {
        GridView::new(&self.cells, self.width, self.height)
    }

    /// Returns the cell at `position`.
    pub fn get(&self, position: Position) -> Result<Cell, GameError> {
        self.view()
            .cell(position)
            .ok_or_else(|| self.out_of_bounds(position))
    }

    /// Overwrites the cell at `position`.
    ///
    /// The caches are left untouched; callers moving the player or a cat keep
    /// them aligned themselves.
    pub fn set(&mut self, position: Position, cell: Cell) -> Result<(), GameError> {
        let index = self
            .view()
            .index(position)
            .ok_or_else(|| self.out_of_bounds(position))?;
        match self.cells.get_mut(index) {
            Some(slot) => {
                *slot = cell;
                Ok(())
            }
            None => Err(self.out_of_bounds(position)),
        }
    }

    /// Reports whether `position` is inside the grid and empty.
    #[must_use]
    pub fn is_passable(&self, position: Position) -> bool {
        self.view().is_passable(position)
    }

    /// In-bounds orthogonal neighbours in Left, Right, Up, Down order.
    #[must_use]
    pub fn neighbors4(&self, position: Position) -> Vec<Position> {
        self.view().neighbors4(position).collect()
    }

    /// Reports whether a cat shares the player's cell.
    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.cats.contains(&self.player)
    }

    /// Reports whether the caches agree with the cells.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.inconsistency().is_none()
    }

    pub(crate) fn relocate_player(&mut self, to: Position) {
        let from = self.player;
        self.write(from, Cell::Empty);
        if self.view().cell(to) != Some(Cell::Cat) {
            self.write(to, Cell::Player);
        }
        self.player = to;
    }

    pub(crate) fn relocate_cat(&mut self, index: usize, to: Position) {
        let Some(from) = self.cats.get(index).copied() else {
            return;
        };
        self.write(from, Cell::Empty);
        self.write(to, Cell::Cat);
        self.cats[index] = to;
    }

    pub(crate) fn inconsistency(&self) -> Option<String> {
        if self.width < MIN_DIMENSION || self.height < MIN_DIMENSION {
            return Some(format!(
                "grid {}x{} is smaller than {MIN_DIMENSION}x{MIN_DIMENSION}",
                self.width, self.height
            ));
        }

        let expected = u64::from(self.width) * u64::from(self.height);
        if self.cells.len() as u64 != expected {
            return Some(format!(
                "grid holds {} cells, expected {expected}",
                self.cells.len()
            ));
        }

        for (index, cat) in self.cats.iter().enumerate() {
            if self.view().cell(*cat) != Some(Cell::Cat) {
                return Some(format!("cat {index} at {cat} is not on a cat cell"));
            }
            if self.cats[..index].contains(cat) {
                return Some(format!("two cats share {cat}"));
            }
        }

        let cat_cells = self.count(Cell::Cat);
        if cat_cells != self.cats.len() {
            return Some(format!(
                "{cat_cells} cat cells but {} cached cats",
                self.cats.len()
            ));
        }

        let player_cells = self.count(Cell::Player);
        if self.is_captured() {
            if player_cells != 0 {
                return Some("captured player still has a player cell".to_owned());
            }
        } else if self.view().cell(self.player) != Some(Cell::Player) || player_cells != 1 {
            return Some(format!(
                "expected exactly one player cell at {}",
                self.player
            ));
        }

        None
    }

    fn count(&self, kind: Cell) -> usize {
        self.cells.iter().filter(|cell| **cell == kind).count()
    }

    fn write(&mut self, position: Position, cell: Cell) {
        if let Some(index) = self.view().index(position) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = cell;
            }
        }
    }

    fn out_of_bounds(&self, position: Position) -> GameError {
        GameError::OutOfBounds {
            position,
            width: self.width,
            height: self.height,
        }
    }
}
