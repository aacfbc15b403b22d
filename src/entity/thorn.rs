//! Stationary thorn hazards (spec §3 ThornBall).

use glam::Vec2;

use super::ball::BallData;
use crate::geometry::{Border, LinearDecay};
use crate::ids::BallId;

/// Stationary until struck by a spore, at which point it absorbs the spore
/// and carries its momentum (capped at `vel_max`), decelerating back to
/// rest over `eat_spore_vel_zero_time`.
#[derive(Debug, Clone)]
pub struct ThornBall {
    pub data: BallData,
    momentum: Option<LinearDecay>,
}

impl ThornBall {
    pub fn new(id: BallId, position: Vec2, r: f32) -> Self {
        Self { data: BallData::new(id, position, r), momentum: None }
    }

    /// Struck by a spore travelling in `direction` at `spore_speed`; gains
    /// momentum capped at `vel_max`, initial speed `eat_spore_vel_init`,
    /// decaying to rest over `eat_spore_vel_zero_time` (spec §4.4).
    pub fn absorb_spore_momentum(
        &mut self,
        direction: Vec2,
        vel_init: f32,
        vel_max: f32,
        vel_zero_time: f32,
    ) {
        let speed = vel_init.min(vel_max);
        self.momentum = Some(LinearDecay::new(direction, speed, vel_zero_time));
        self.data.moving = true;
    }

    pub fn integrate(&mut self, dt: f32, border: &Border) {
        let Some(momentum) = &mut self.momentum else {
            return;
        };
        let done = momentum.tick(dt);
        self.data.velocity = momentum.velocity();
        self.data.position += self.data.velocity * dt;
        self.data.position = border.clamp_disc(self.data.position, self.data.r);
        if done {
            self.momentum = None;
            self.data.moving = false;
            self.data.velocity = Vec2::ZERO;
        }
    }
}
