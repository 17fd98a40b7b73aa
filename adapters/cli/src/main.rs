#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for Run From Cats.
//!
//! Each invocation handles one session: either a single command, or an
//! interactive loop reading one command per line. Sessions are saved to a
//! directory between invocations so a game can be continued later.

mod commands;
mod config;
mod logging;
mod render;
mod store;
mod transfer;

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use run_from_cats_core::{Event, GameConfig, Intent, SessionId};
use run_from_cats_world::{
    query, DispatchError, GameSession, Outcome, SessionStore, SessionTable,
};
use tracing::{debug, info, trace, warn};

use crate::{commands::parse_intent, store::FileStore};

/// Directory used for saved sessions when `--store` is not given.
const DEFAULT_STORE_DIR: &str = ".run-from-cats";
/// Name used in the greeting when the environment does not provide one.
const DEFAULT_PLAYER_NAME: &str = "runner";
/// Input lines that leave the interactive loop.
const QUIT_COMMANDS: [&str; 3] = ["quit", "exit", "/quit"];

#[derive(Parser)]
#[command(
    name = "run-from-cats",
    version,
    about = "Run from cats on a small grid, one turn at a time"
)]
struct Cli {
    /// Session to act on.
    #[arg(long, default_value_t = 1)]
    session: u64,
    /// TOML file with game settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory holding saved sessions.
    #[arg(long, default_value = DEFAULT_STORE_DIR)]
    store: PathBuf,
    /// Fixes the field seed, overriding the config file.
    #[arg(long)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Read commands from stdin, one per line, until `quit` or end of input.
    Play,
    /// Send a single command such as `/up` or `/newgame`.
    Send {
        /// Command to send.
        command: String,
    },
    /// Show the saved field, starting a game when none exists.
    Show,
    /// Print a share code for the saved session.
    Export,
    /// Store the session held in a share code under `--session`.
    Import {
        /// Code printed by `export`.
        code: String,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    let config = config::load(cli.config.as_deref(), cli.seed)?;
    let store = FileStore::open(&cli.store)
        .with_context(|| format!("failed to open session store {}", cli.store.display()))?;
    info!(store = %store.root().display(), session = cli.session, "session store ready");

    let mut game = Game::new(SessionId::new(cli.session), config, store);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => {
            let stdin = io::stdin();
            game.play(stdin.lock(), &mut out)
        }
        Command::Send { command } => {
            let intent = parse_intent(&command)?;
            writeln!(out, "{}", game.dispatch(intent)?)?;
            Ok(())
        }
        Command::Show => {
            writeln!(out, "{}", game.show()?)?;
            Ok(())
        }
        Command::Export => {
            writeln!(out, "{}", game.export()?)?;
            Ok(())
        }
        Command::Import { code } => {
            writeln!(out, "{}", game.import(&code)?)?;
            Ok(())
        }
    }
}

/// One session's view of the engine, bound to a store and a configuration.
struct Game<S> {
    id: SessionId,
    config: GameConfig,
    store: S,
    table: SessionTable,
}

impl<S: SessionStore> Game<S> {
    fn new(id: SessionId, config: GameConfig, store: S) -> Self {
        Self {
            id,
            config,
            store,
            table: SessionTable::new(),
        }
    }

    /// Runs the interactive loop until `quit` or end of input.
    fn play<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        writeln!(out, "{}", render::greeting(&player_name()))?;
        out.flush()?;

        for line in input.lines() {
            let line = line.context("failed to read command")?;
            let command = line.trim();
            if command.is_empty() {
                continue;
            }
            if QUIT_COMMANDS.contains(&command) {
                break;
            }

            let reply = match parse_intent(command) {
                Ok(intent) => self.dispatch(intent)?,
                Err(unknown) => format!("{unknown}\n{}", self.show()?),
            };
            writeln!(out, "{reply}")?;
            out.flush()?;
        }
        Ok(())
    }

    /// Applies one intent and renders the reply.
    ///
    /// Refusals the player can act on become replies; anything else is an
    /// error for the caller.
    fn dispatch(&mut self, intent: Intent) -> Result<String> {
        let mut events = Vec::new();
        let result = self
            .table
            .handle(self.id, intent, &self.config, &mut self.store, &mut events);
        trace_events(&events);

        match result {
            Ok(outcome) => self.reply(outcome),
            Err(DispatchError::Game(error)) => {
                if error.is_recoverable() {
                    debug!(session = %self.id, %error, "intent refused");
                } else {
                    warn!(session = %self.id, %error, "session needs a new game");
                }
                let snapshot = self.table.session(self.id).map(GameSession::snapshot);
                match render::rejection(&error, snapshot.as_ref()) {
                    Some(reply) => Ok(reply),
                    None => Err(error).context("the game could not continue"),
                }
            }
            Err(error) => Err(error).context("session storage failed"),
        }
    }

    /// Loads the saved session, starting a new one when none exists.
    fn show(&mut self) -> Result<String> {
        let mut events = Vec::new();
        let result = self
            .table
            .resume(self.id, &self.config, &mut self.store, &mut events);
        trace_events(&events);

        match result {
            Ok(outcome) => self.reply(outcome),
            Err(DispatchError::Game(error)) => render::rejection(&error, None)
                .ok_or(error)
                .context("the game could not continue"),
            Err(error) => Err(error).context("session storage failed"),
        }
    }

    /// Share code for the saved session.
    fn export(&self) -> Result<String> {
        let blob = self
            .store
            .load(self.id)
            .with_context(|| format!("no saved game for session {}", self.id))?;
        let session = GameSession::deserialize(&blob)
            .with_context(|| format!("saved game for session {} is unreadable", self.id))?;
        Ok(transfer::encode(&session)?)
    }

    /// Saves the session held in `code` under this game's id.
    fn import(&mut self, code: &str) -> Result<String> {
        let session = transfer::decode(code)
            .context("could not import share code")?
            .with_id(self.id);
        let blob = session.serialize()?;
        self.store
            .save(self.id, &blob)
            .with_context(|| format!("failed to save session {}", self.id))?;
        info!(session = %self.id, turn = session.turn(), "session imported");
        Ok(format!(
            "Imported into session {}.\n{}",
            self.id,
            render::board(&session.snapshot())
        ))
    }

    fn reply(&self, outcome: Outcome) -> Result<String> {
        let session = self
            .table
            .session(self.id)
            .with_context(|| format!("session {} vanished after dispatch", self.id))?;
        Ok(render::reply(
            outcome,
            &session.snapshot(),
            query::nearest_cat_distance(session),
        ))
    }
}

fn trace_events(events: &[Event]) {
    for event in events {
        trace!(?event, "engine event");
    }
}

fn player_name() -> String {
    std::env::var("USER").unwrap_or_else(|_| DEFAULT_PLAYER_NAME.to_owned())
}
