//! Stable identity for balls, players, and teams.
//!
//! Replaces identity-by-object-hash with monotonic integer ids so the
//! object graph stays acyclic and collision pairs / cross-references can be
//! compared and hashed cheaply.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Identity of a single ball (food, spore, thorn, or clone), unique across
/// every manager for the lifetime of a `Server`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BallId(pub u64);

/// Identity of a player, stable for the lifetime of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PlayerId(pub u32);

/// Identity of a team, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TeamId(pub u32);

/// Monotonic id source. One instance is owned by `Server` and lent to
/// managers whenever they spawn a new ball, so every ball in the world gets
/// a globally unique id regardless of which manager created it.
#[derive(Debug, Default)]
pub struct BallIdAllocator {
    next: AtomicU64,
}

impl BallIdAllocator {
    pub fn new() -> Self {
        Self { next: AtomicU64::new(1) }
    }

    /// Allocate the next ball id.
    pub fn next(&self) -> BallId {
        BallId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Reset the allocator (used by `reset()`/`seed()`).
    pub fn reset(&mut self) {
        *self.next.get_mut() = 1;
    }
}
