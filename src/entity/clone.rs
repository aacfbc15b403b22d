//! A player's active cell (spec §3 CloneBall).

use glam::Vec2;

use super::ball::BallData;
use crate::config::PlayerConfig;
use crate::geometry::{Border, LinearDecay};
use crate::ids::{BallId, PlayerId, TeamId};

/// One cell owned by a player. A player owns a dynamic set of these.
#[derive(Debug, Clone)]
pub struct CloneBall {
    pub data: BallData,
    pub owner: PlayerId,
    pub team: TeamId,
    /// Seconds since this cell last split (or was spawned).
    pub age: f32,
    /// Current input direction; `None` means no active input (spec §4.5 move/stop).
    input_dir: Option<Vec2>,
    /// Velocity accumulated from input acceleration ("inertia" in spec §4.1).
    inertia: Vec2,
    /// Active stop-deceleration, if a `stop` action is in progress.
    stopping: Option<LinearDecay>,
    /// Active split boost, if this cell was recently spawned by a split or
    /// thorn explosion.
    split_boost: Option<LinearDecay>,
}

impl CloneBall {
    pub fn new(id: BallId, owner: PlayerId, team: TeamId, position: Vec2, r: f32) -> Self {
        Self {
            data: BallData::new(id, position, r),
            owner,
            team,
            age: 0.0,
            input_dir: None,
            inertia: Vec2::ZERO,
            stopping: None,
            split_boost: None,
        }
    }

    /// Apply a `move` action: set the input direction. A zero vector means
    /// no input (spec §4.5).
    pub fn set_move(&mut self, direction: Vec2) {
        self.stopping = None;
        self.input_dir = if direction == Vec2::ZERO { None } else { Some(direction.normalize()) };
    }

    /// Apply a `stop` action: begin decaying velocity to zero and clear the
    /// input direction (spec §4.5).
    pub fn set_stop(&mut self, stop_zero_time: f32) {
        self.input_dir = None;
        let speed = self.inertia.length();
        if speed > 1e-6 {
            self.stopping = Some(LinearDecay::new(self.inertia, speed, stop_zero_time));
        } else {
            self.stopping = None;
            self.inertia = Vec2::ZERO;
        }
    }

    /// Attach a split-boost impulse (used for both split children and
    /// thorn-explosion children, spec §4.5/§4.6).
    pub fn set_split_boost(&mut self, direction: Vec2, speed: f32, zero_time: f32) {
        self.split_boost = Some(LinearDecay::new(direction, speed, zero_time));
    }

    pub fn integrate(&mut self, cfg: &PlayerConfig, dt: f32, border: &Border) {
        if let Some(stop) = &mut self.stopping {
            let done = stop.tick(dt);
            self.inertia = stop.velocity();
            if done {
                self.stopping = None;
                self.inertia = Vec2::ZERO;
            }
        } else if let Some(dir) = self.input_dir {
            let acc = dir * cfg.acc_max;
            self.inertia = (self.inertia + acc * cfg.given_acc_weight * dt).clamp_length_max(cfg.vel_max);
        }

        let mut effective = self.inertia;
        if let Some(boost) = &mut self.split_boost {
            boost.tick(dt);
            effective += boost.velocity();
            if boost.speed() <= 0.0 {
                self.split_boost = None;
            }
        }

        self.data.velocity = effective;
        self.data.moving = effective.length_squared() > 1e-8;
        self.data.position += effective * dt;
        self.data.position = border.clamp_disc(self.data.position, self.data.r);

        let min_size = cfg.radius_min * cfg.radius_min;
        let decayed = self.data.s - cfg.size_decay_rate * self.data.s * dt;
        self.data.set_size(decayed.max(min_size));

        self.age += dt;
    }
}
