//! Explicit session registry that turns intents into persisted state.

use std::collections::BTreeMap;

use run_from_cats_core::{Event, GameConfig, GameError, GameStatus, Intent, SessionId};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    session::GameSession,
    store::{SessionStore, StoreError},
};

/// Failures surfaced while dispatching an intent.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The engine refused the intent.
    #[error(transparent)]
    Game(#[from] GameError),
    /// The persistence layer failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What happened to the session while handling an intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A new session was generated, either on request or because none existed.
    Started,
    /// The existing session was discarded and regenerated.
    Restarted,
    /// A stored session was loaded without changes.
    Resumed,
    /// A turn was resolved, leaving the session in the given status.
    Advanced(GameStatus),
}

/// Mapping from session id to live session.
///
/// The table caches sessions it has seen; the store stays the durable copy
/// and receives every accepted mutation. Callers serialize access per id.
#[derive(Debug, Default)]
pub struct SessionTable {
    sessions: BTreeMap<SessionId, GameSession>,
}

impl SessionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Live session for `id`, if cached.
    #[must_use]
    pub fn session(&self, id: SessionId) -> Option<&GameSession> {
        self.sessions.get(&id)
    }

    /// Number of cached sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Reports whether no session is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Loads the session for `id`, starting a new one when the store has none.
    pub fn resume<S: SessionStore>(
        &mut self,
        id: SessionId,
        config: &GameConfig,
        store: &mut S,
        out_events: &mut Vec<Event>,
    ) -> Result<Outcome, DispatchError> {
        if self.ensure_loaded(id, config, store, out_events)? {
            Ok(Outcome::Started)
        } else {
            Ok(Outcome::Resumed)
        }
    }

    /// Applies `intent` to the session for `id` and persists the result.
    ///
    /// A move for an unknown session starts a new game instead of moving.
    /// Rejected intents leave both the table and the store untouched.
    pub fn handle<S: SessionStore>(
        &mut self,
        id: SessionId,
        intent: Intent,
        config: &GameConfig,
        store: &mut S,
        out_events: &mut Vec<Event>,
    ) -> Result<Outcome, DispatchError> {
        debug!(session = %id, ?intent, "handling intent");
        let outcome = match intent {
            Intent::NewGame => {
                self.start(id, config, store, out_events)?;
                return Ok(Outcome::Started);
            }
            Intent::Reset => {
                match self.sessions.get_mut(&id) {
                    Some(session) => {
                        session.reset(config)?;
                        out_events.push(Event::FieldGenerated {
                            session: id,
                            seed: session.seed(),
                        });
                    }
                    None => self.start(id, config, store, out_events)?,
                }
                Outcome::Restarted
            }
            Intent::Move(direction) => {
                if self.ensure_loaded(id, config, store, out_events)? {
                    return Ok(Outcome::Started);
                }
                let session = self.cached_mut(id)?;
                Outcome::Advanced(session.apply_turn(direction, out_events)?)
            }
        };

        self.persist(id, store)?;
        Ok(outcome)
    }

    fn ensure_loaded<S: SessionStore>(
        &mut self,
        id: SessionId,
        config: &GameConfig,
        store: &mut S,
        out_events: &mut Vec<Event>,
    ) -> Result<bool, DispatchError> {
        if self.sessions.contains_key(&id) {
            return Ok(false);
        }

        match store.load(id) {
            Ok(blob) => {
                let session = GameSession::deserialize(&blob)
                    .and_then(|session| {
                        if session.id() == id {
                            Ok(session)
                        } else {
                            Err(GameError::CorruptSnapshot {
                                reason: format!("stored under {id} but belongs to {}", session.id()),
                            })
                        }
                    })
                    .map_err(|error| {
                        warn!(session = %id, %error, "stored session is unreadable");
                        error
                    })?;
                debug!(session = %id, turn = session.turn(), "session loaded");
                let _ = self.sessions.insert(id, session);
                Ok(false)
            }
            Err(StoreError::NotFound(_)) => {
                debug!(session = %id, "no stored session, starting a new one");
                self.start(id, config, store, out_events)?;
                Ok(true)
            }
            Err(error) => Err(error.into()),
        }
    }

    fn start<S: SessionStore>(
        &mut self,
        id: SessionId,
        config: &GameConfig,
        store: &mut S,
        out_events: &mut Vec<Event>,
    ) -> Result<(), DispatchError> {
        let session = GameSession::new(id, config)?;
        out_events.push(Event::FieldGenerated {
            session: id,
            seed: session.seed(),
        });
        let _ = self.sessions.insert(id, session);
        self.persist(id, store)
    }

    fn persist<S: SessionStore>(&self, id: SessionId, store: &mut S) -> Result<(), DispatchError> {
        let Some(session) = self.sessions.get(&id) else {
            return Ok(());
        };
        store.save(id, &session.serialize()?)?;
        Ok(())
    }

    fn cached_mut(&mut self, id: SessionId) -> Result<&mut GameSession, DispatchError> {
        self.sessions
            .get_mut(&id)
            .ok_or(DispatchError::Store(StoreError::NotFound(id)))
    }
}
