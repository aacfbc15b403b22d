//! Shared circle state for every ball kind (spec §3, §9 "Heterogeneous bodies").

use glam::Vec2;
use serde::Serialize;

use crate::ids::BallId;

/// Tag identifying which concrete ball kind a `BallEntry` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BallKind {
    Food,
    Spore,
    Thorn,
    Clone,
}

/// Fields common to every ball kind: identity, position, size/radius,
/// velocity, and lifecycle flags.
#[derive(Debug, Clone)]
pub struct BallData {
    pub id: BallId,
    pub position: Vec2,
    /// Radius. Invariant: `r >= 0`.
    pub r: f32,
    /// Size, the mass proxy: `s = r^2`. Additive under ingestion.
    pub s: f32,
    /// Net velocity this tick, used for overlap/moving-set bookkeeping and
    /// reported in snapshots.
    pub velocity: Vec2,
    pub moving: bool,
    pub removed: bool,
}

impl BallData {
    pub fn new(id: BallId, position: Vec2, r: f32) -> Self {
        Self { id, position, r, s: r * r, velocity: Vec2::ZERO, moving: false, removed: false }
    }

    /// Set size directly, recomputing radius (`r = sqrt(s)`).
    #[inline]
    pub fn set_size(&mut self, s: f32) {
        self.s = s.max(0.0);
        self.r = self.s.sqrt();
    }

    /// Grow by ingesting another ball's size (the "Eats" rule, spec §4.4).
    #[inline]
    pub fn ingest(&mut self, other_size: f32) {
        self.set_size(self.s + other_size);
    }
}
