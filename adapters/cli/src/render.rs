//! Text rendering of fields and replies.
//!
//! The engine only reports semantic cells; the glyphs and wording live here.

use run_from_cats_core::{Cell, GameError, GameStatus, Snapshot};
use run_from_cats_world::Outcome;

const EMPTY_GLYPH: &str = "🟩";
const OBSTACLE_GLYPH: &str = "🌳";
const PLAYER_GLYPH: &str = "🙂";
const CAT_GLYPH: &str = "🐱";
/// Braille blank, wide enough to line labels up with the emoji columns.
const PAD: char = '\u{2800}';
/// Width of the `/left` label in pad characters.
const SIDE_PAD: usize = 3;

const NEW_GAME_MESSAGE: &str = "You have to run from cats! I don't know why. Just run.";
const GOOD_JOB_MESSAGE: &str = "You're doing great! Keep running away from cats.";
const GAME_OVER_MESSAGE: &str = "Unfortunately, the cats caught up with you. Play again? /newgame";
const GAME_WON_MESSAGE: &str = "The cats gave up. You escaped! Play again? /newgame";
const PROGRESS_LOADED_MESSAGE: &str = "Your game was successfully loaded!";
const CORRUPT_SESSION_MESSAGE: &str =
    "Your saved game could not be read. Start over with /newgame";

/// Glyph drawn for a cell.
#[must_use]
pub(crate) const fn glyph(cell: Cell) -> &'static str {
    match cell {
        Cell::Empty => EMPTY_GLYPH,
        Cell::Obstacle => OBSTACLE_GLYPH,
        Cell::Player => PLAYER_GLYPH,
        Cell::Cat => CAT_GLYPH,
    }
}

/// Greets a player before any game exists.
#[must_use]
pub(crate) fn greeting(name: &str) -> String {
    format!("Hi, {name}! To start game, press /newgame")
}

/// Reply for an accepted intent or a resumed session.
///
/// `nearest_cat` is the player's Manhattan distance to the closest cat.
#[must_use]
pub(crate) fn reply(
    outcome: Outcome,
    snapshot: &Snapshot,
    nearest_cat: Option<u32>,
) -> String {
    match outcome {
        Outcome::Started | Outcome::Restarted => {
            format!("{NEW_GAME_MESSAGE}\n{}", navigated_field(snapshot))
        }
        Outcome::Resumed => format!("{PROGRESS_LOADED_MESSAGE}\n{}", board(snapshot)),
        Outcome::Advanced(GameStatus::Active) => {
            let mut text = format!(
                "{GOOD_JOB_MESSAGE} {} to go.",
                plural(snapshot.turns_remaining(), "turn")
            );
            if let Some(distance) = nearest_cat {
                text.push_str(&format!(
                    " The nearest cat is {} away.",
                    plural(distance, "step")
                ));
            }
            format!("{text}\n{}", navigated_field(snapshot))
        }
        Outcome::Advanced(status) => status_message(status, snapshot),
    }
}

/// Reply for an engine refusal the player can act on, if it is one.
///
/// `snapshot` is the session as it stands after the refusal, when one is
/// loaded.
#[must_use]
pub(crate) fn rejection(error: &GameError, snapshot: Option<&Snapshot>) -> Option<String> {
    match error {
        GameError::InvalidMove { direction, reason } => {
            let text = format!("You can't go {direction}: {reason}.");
            Some(match snapshot {
                Some(snapshot) => format!("{text}\n{}", navigated_field(snapshot)),
                None => text,
            })
        }
        GameError::GameOver { status } => Some(match snapshot {
            Some(snapshot) => status_message(*status, snapshot),
            None => GAME_OVER_MESSAGE.to_owned(),
        }),
        GameError::CorruptSnapshot { .. } => Some(CORRUPT_SESSION_MESSAGE.to_owned()),
        _ => None,
    }
}

/// Field with the movement commands around it while the game runs, or the
/// bare field once it is over.
#[must_use]
pub(crate) fn board(snapshot: &Snapshot) -> String {
    if snapshot.status().is_terminal() {
        field(snapshot)
    } else {
        navigated_field(snapshot)
    }
}

fn status_message(status: GameStatus, snapshot: &Snapshot) -> String {
    match status {
        GameStatus::Won => format!("{GAME_WON_MESSAGE}\n{}", field(snapshot)),
        GameStatus::Lost => format!("{GAME_OVER_MESSAGE}\n{}", field(snapshot)),
        GameStatus::Active => navigated_field(snapshot),
    }
}

fn field(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    for row in snapshot.rows() {
        out.push_str(&row_glyphs(row));
        out.push('\n');
    }
    out
}

fn navigated_field(snapshot: &Snapshot) -> String {
    let width = usize::try_from(snapshot.width()).unwrap_or(0);
    let middle = usize::try_from(snapshot.height() / 2).unwrap_or(0);
    let centre_pad: String = std::iter::repeat(PAD).take(width + 2).collect();
    let side_pad: String = std::iter::repeat(PAD).take(SIDE_PAD).collect();

    let mut out = format!("{centre_pad}/up\n");
    for (index, row) in snapshot.rows().enumerate() {
        if index == middle {
            out.push_str(&format!("/left{}/right\n", row_glyphs(row)));
        } else {
            out.push_str(&format!("{side_pad}{}\n", row_glyphs(row)));
        }
    }
    out.push_str(&format!("{centre_pad}/down"));
    out
}

fn row_glyphs(row: &[Cell]) -> String {
    row.iter().map(|cell| glyph(*cell)).collect()
}

fn plural(count: u32, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
