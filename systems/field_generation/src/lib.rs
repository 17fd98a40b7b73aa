#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic field generation for new game sessions.
//!
//! Fields are sampled from a `ChaCha8Rng` seeded either by the configuration
//! or by a freshly drawn seed that is reported back, so every field can be
//! reproduced. Samples that violate the fairness rule are rejected and drawn
//! again until the retry budget runs out.

use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use run_from_cats_core::{Cell, CatSpawn, GameConfig, GameError, PlayerStart, Position};
use tracing::{debug, info, warn};

/// Number of samples drawn before generation gives up.
pub const GENERATION_ATTEMPTS: u32 = 100;

/// Largest number of cats allowed next to the player at the start.
const MAX_ADJACENT_CATS: usize = 1;

/// Freshly generated playing field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Row-major cell contents.
    pub cells: Vec<Cell>,
    /// Player start cell.
    pub player: Position,
    /// Cat start cells in generation order.
    pub cats: Vec<Position>,
    /// Seed that reproduces this field.
    pub seed: u64,
    /// Samples drawn until this field was accepted.
    pub attempts: u32,
}

/// Generates a field for the configuration.
///
/// `seed` overrides randomness; when absent a seed is drawn and recorded in
/// the returned [`Field`].
pub fn generate(config: &GameConfig, seed: Option<u64>) -> Result<Field, GameError> {
    config.validate()?;

    let seed = seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    for attempt in 1..=GENERATION_ATTEMPTS {
        let Some(layout) = sample(config, &mut rng) else {
            debug!(seed, attempt, "sample ran out of candidate cells");
            continue;
        };

        if !layout.is_fair() {
            debug!(seed, attempt, "sample boxed the player in with cats");
            continue;
        }

        info!(
            seed,
            attempts = attempt,
            width = config.width,
            height = config.height,
            "field generated"
        );
        return Ok(layout.into_field(config, seed, attempt));
    }

    warn!(seed, attempts = GENERATION_ATTEMPTS, "field generation exhausted its budget");
    Err(GameError::GenerationFailed {
        attempts: GENERATION_ATTEMPTS,
    })
}

#[derive(Debug)]
struct Layout {
    player: Position,
    cats: Vec<Position>,
    obstacles: Vec<Position>,
}

impl Layout {
    fn is_fair(&self) -> bool {
        let adjacent = self
            .cats
            .iter()
            .filter(|cat| cat.manhattan_distance(self.player) == 1)
            .count();
        adjacent <= MAX_ADJACENT_CATS
    }

    fn into_field(self, config: &GameConfig, seed: u64, attempts: u32) -> Field {
        let width = usize::try_from(config.width).unwrap_or(0);
        let height = usize::try_from(config.height).unwrap_or(0);
        let mut cells = vec![Cell::Empty; width * height];

        let mut paint = |position: Position, cell: Cell| {
            let index = position.row() as usize * width + position.column() as usize;
            if let Some(slot) = cells.get_mut(index) {
                *slot = cell;
            }
        };
        paint(self.player, Cell::Player);
        for cat in &self.cats {
            paint(*cat, Cell::Cat);
        }
        for obstacle in &self.obstacles {
            paint(*obstacle, Cell::Obstacle);
        }

        Field {
            width: config.width,
            height: config.height,
            cells,
            player: self.player,
            cats: self.cats,
            seed,
            attempts,
        }
    }
}

fn sample(config: &GameConfig, rng: &mut ChaCha8Rng) -> Option<Layout> {
    let mut free: Vec<Position> = (0..config.height)
        .flat_map(|row| (0..config.width).map(move |column| Position::new(row, column)))
        .collect();

    let player = match config.player_start {
        PlayerStart::Center => Position::new((config.height - 1) / 2, (config.width - 1) / 2),
        PlayerStart::Random => *free.choose(rng)?,
    };
    free.retain(|cell| *cell != player);

    let cat_candidates: Vec<Position> = free
        .iter()
        .copied()
        .filter(|cell| may_host_cat(config, *cell, player))
        .collect();
    let cat_count = usize::try_from(config.cats).ok()?;
    if cat_candidates.len() < cat_count {
        return None;
    }
    let cats: Vec<Position> = cat_candidates
        .choose_multiple(rng, cat_count)
        .copied()
        .collect();
    free.retain(|cell| !cats.contains(cell));

    let obstacle_count = usize::try_from(config.obstacles).ok()?;
    if free.len() < obstacle_count {
        return None;
    }
    let obstacles = free.choose_multiple(rng, obstacle_count).copied().collect();

    Some(Layout {
        player,
        cats,
        obstacles,
    })
}

fn may_host_cat(config: &GameConfig, cell: Position, player: Position) -> bool {
    if cell.manhattan_distance(player) < config.min_cat_distance {
        return false;
    }

    match config.cat_spawn {
        CatSpawn::Anywhere => true,
        CatSpawn::Edges => {
            cell.row() == 0
                || cell.column() == 0
                || cell.row() + 1 == config.height
                || cell.column() + 1 == config.width
        }
    }
}
