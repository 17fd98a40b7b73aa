//! Parsing of typed player commands into engine intents.

use std::{error::Error, fmt};

use run_from_cats_core::{Direction, Intent};

/// Commands listed back to the player when input is not understood.
pub(crate) const COMMAND_HINT: &str = "/up, /down, /left, /right, /newgame or /reset";

/// Translates one line of player input into an [`Intent`].
///
/// A leading slash is optional and case is ignored, so `/Up`, `up` and `w`
/// all move the player up.
pub(crate) fn parse_intent(input: &str) -> Result<Intent, UnknownCommand> {
    let trimmed = input.trim();
    let token = trimmed.strip_prefix('/').unwrap_or(trimmed).to_ascii_lowercase();

    let intent = match token.as_str() {
        "up" | "w" => Intent::Move(Direction::Up),
        "down" | "s" => Intent::Move(Direction::Down),
        "left" | "a" => Intent::Move(Direction::Left),
        "right" | "d" => Intent::Move(Direction::Right),
        "newgame" | "new" | "n" => Intent::NewGame,
        "reset" | "restart" | "r" => Intent::Reset,
        _ => return Err(UnknownCommand(trimmed.to_owned())),
    };
    Ok(intent)
}

/// Input that names no known command.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct UnknownCommand(String);

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown command '{}', try {COMMAND_HINT}", self.0)
    }
}

impl Error for UnknownCommand {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_commands_match_the_classic_bot() {
        assert_eq!(parse_intent("/up"), Ok(Intent::Move(Direction::Up)));
        assert_eq!(parse_intent("/down"), Ok(Intent::Move(Direction::Down)));
        assert_eq!(parse_intent("/left"), Ok(Intent::Move(Direction::Left)));
        assert_eq!(parse_intent("/right"), Ok(Intent::Move(Direction::Right)));
        assert_eq!(parse_intent("/newgame"), Ok(Intent::NewGame));
        assert_eq!(parse_intent("/reset"), Ok(Intent::Reset));
    }

    #[test]
    fn bare_words_and_keys_are_accepted() {
        assert_eq!(parse_intent("  Left \n"), Ok(Intent::Move(Direction::Left)));
        assert_eq!(parse_intent("W"), Ok(Intent::Move(Direction::Up)));
        assert_eq!(parse_intent("d"), Ok(Intent::Move(Direction::Right)));
        assert_eq!(parse_intent("new"), Ok(Intent::NewGame));
    }

    #[test]
    fn anything_else_is_unknown() {
        let error = parse_intent("/start").expect_err("unknown");

        assert_eq!(error, UnknownCommand("/start".to_owned()));
        assert!(error.to_string().contains(COMMAND_HINT));
        assert!(parse_intent("").is_err());
    }
}
