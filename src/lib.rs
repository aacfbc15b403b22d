//! Deterministic simulation core for a multi-agent, agar-style arena:
//! tick-driven movement, collision resolution, and the eat/split/eject/fuse
//! rules that turn a population of circles into a competitive game.
//!
//! Collaborators (rendering, observation encoding, networking, CLI driver)
//! live outside this crate; it exposes [`Server`] as the whole surface they
//! need: `new`, `seed`, `reset`, `apply_actions`, `step`, `snapshot`.

pub mod action;
pub mod collision;
pub mod config;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod managers;
pub mod rng;
pub mod rules;
pub mod sim;
pub mod snapshot;
pub mod spatial;

pub use action::{Action, ActionType};
pub use config::Config;
pub use error::{SimError, SimResult};
pub use ids::{BallId, PlayerId, TeamId};
pub use sim::Server;
pub use snapshot::Snapshot;
