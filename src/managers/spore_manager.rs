//! Owns the spore population. Spores are never spawned by initial fill or a
//! refresh clock — only by a clone's `eject` action (spec §4.5) — so this
//! manager is a thin owning store (grounded on GoBigger's `SporeManager`).

use std::collections::HashMap;

use glam::Vec2;

use crate::config::SporeConfig;
use crate::entity::SporeBall;
use crate::ids::{BallId, BallIdAllocator};

#[derive(Debug, Default)]
pub struct SporeManager {
    balls: HashMap<BallId, SporeBall>,
}

impl SporeManager {
    pub fn new() -> Self {
        Self { balls: HashMap::new() }
    }

    pub fn all(&self) -> impl Iterator<Item = &SporeBall> {
        self.balls.values()
    }

    pub fn all_mut(&mut self) -> impl Iterator<Item = &mut SporeBall> {
        self.balls.values_mut()
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn get(&self, id: BallId) -> Option<&SporeBall> {
        self.balls.get(&id)
    }

    pub fn add(&mut self, ball: SporeBall) {
        self.balls.insert(ball.data.id, ball);
    }

    pub fn remove(&mut self, id: BallId) -> Option<SporeBall> {
        self.balls.remove(&id)
    }

    pub fn init(&mut self) {
        self.balls.clear();
    }

    /// Spore manager has no refresh clock of its own; present for interface
    /// symmetry with the other managers (spec §4.2).
    pub fn step(&mut self, _dt: f32) {}

    /// Emit a spore from a clone's rim along `direction`. The spore's own
    /// radius is the constant `radius_min` (spec §3: "constant radius");
    /// `spore_radius_init` is a separate constant used only to debit the
    /// ejecting clone's size (spec §4.5) — the two are not required to
    /// match, since eject is explicitly exempt from mass conservation
    /// (spec §8 property 5).
    pub fn eject_from(
        &mut self,
        cfg: &SporeConfig,
        ids: &BallIdAllocator,
        rim_position: Vec2,
        direction: Vec2,
    ) {
        let ball = SporeBall::new(
            ids.next(),
            rim_position,
            cfg.radius_min,
            direction,
            cfg.vel_init,
            cfg.vel_zero_time,
        );
        tracing::trace!(id = ball.data.id.0, "ejected spore");
        self.add(ball);
    }
}
