//! Static food pellets (spec §3 FoodBall).

use glam::Vec2;

use super::ball::BallData;
use crate::ids::BallId;

/// A food pellet. Never moves; contributes its size to whatever eats it.
#[derive(Debug, Clone)]
pub struct FoodBall {
    pub data: BallData,
}

impl FoodBall {
    pub fn new(id: BallId, position: Vec2, r: f32) -> Self {
        Self { data: BallData::new(id, position, r) }
    }

    /// Food is static; there is nothing to integrate (spec §4.1).
    pub fn integrate(&mut self, _dt: f32) {}
}
