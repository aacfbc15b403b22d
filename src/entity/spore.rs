//! Spore projectiles ejected from clones (spec §3 SporeBall).

use glam::Vec2;

use super::ball::BallData;
use crate::geometry::{Border, LinearDecay};
use crate::ids::BallId;

/// A short-lived projectile emitted by a clone's eject action. Travels in a
/// straight line, decelerating linearly to zero over `vel_zero_time`, then
/// stops but persists until consumed.
#[derive(Debug, Clone)]
pub struct SporeBall {
    pub data: BallData,
    decay: LinearDecay,
}

impl SporeBall {
    pub fn new(id: BallId, position: Vec2, r: f32, direction: Vec2, vel_init: f32, vel_zero_time: f32) -> Self {
        let mut data = BallData::new(id, position, r);
        let decay = LinearDecay::new(direction, vel_init, vel_zero_time);
        data.velocity = decay.velocity();
        data.moving = true;
        Self { data, decay }
    }

    pub fn integrate(&mut self, dt: f32, border: &Border) {
        if !self.data.moving {
            return;
        }
        let done = self.decay.tick(dt);
        self.data.velocity = self.decay.velocity();
        self.data.position += self.data.velocity * dt;
        self.data.position = border.clamp_disc(self.data.position, self.data.r);
        if done {
            self.data.moving = false;
            self.data.velocity = Vec2::ZERO;
        }
    }
}
