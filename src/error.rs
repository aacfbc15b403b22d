//! Error types for the simulation core.

use thiserror::Error;

use crate::ids::PlayerId;

/// Errors surfaced by the simulation core.
#[derive(Debug, Error)]
pub enum SimError {
    /// Raised at construction time; fatal.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// An action referenced a player id not present in the world.
    #[error("unknown player: {0:?}")]
    UnknownPlayer(PlayerId),

    /// A direction was non-finite or could not be unitized.
    #[error("bad action direction for player {0:?}: {1}")]
    BadAction(PlayerId, String),

    /// A debug-only invariant violation (body outside border, negative
    /// size, a removed body still referenced by a manager). Checked under
    /// `debug_assertions` only.
    #[error("internal invariant violation: {0}")]
    Internal(String),
}

pub type SimResult<T> = Result<T, SimError>;
