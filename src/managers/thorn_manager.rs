//! Owns the thorn population: initial fill, periodic refresh, removal
//! (spec §4.2; grounded on GoBigger's `ThornsManager`).

use std::collections::HashMap;

use rand::Rng;

use crate::config::ThornConfig;
use crate::entity::ThornBall;
use crate::geometry::Border;
use crate::ids::{BallId, BallIdAllocator};
use crate::rng::SimRng;

#[derive(Debug)]
pub struct ThornManager {
    balls: HashMap<BallId, ThornBall>,
    refresh_time_count: f32,
}

impl ThornManager {
    pub fn new() -> Self {
        Self { balls: HashMap::new(), refresh_time_count: 0.0 }
    }

    pub fn all(&self) -> impl Iterator<Item = &ThornBall> {
        self.balls.values()
    }

    pub fn all_mut(&mut self) -> impl Iterator<Item = &mut ThornBall> {
        self.balls.values_mut()
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn get(&self, id: BallId) -> Option<&ThornBall> {
        self.balls.get(&id)
    }

    pub fn get_mut(&mut self, id: BallId) -> Option<&mut ThornBall> {
        self.balls.get_mut(&id)
    }

    pub fn add(&mut self, ball: ThornBall) {
        self.balls.insert(ball.data.id, ball);
    }

    pub fn remove(&mut self, id: BallId) -> Option<ThornBall> {
        self.balls.remove(&id)
    }

    fn spawn_one(&mut self, cfg: &ThornConfig, border: &Border, rng: &mut SimRng, ids: &BallIdAllocator) {
        let position = border.sample(rng);
        let r = if cfg.radius_max > cfg.radius_min {
            rng.inner().random_range(cfg.radius_min..cfg.radius_max)
        } else {
            cfg.radius_min
        };
        let ball = ThornBall::new(ids.next(), position, r);
        tracing::trace!(id = ball.data.id.0, "spawned thorn");
        self.add(ball);
    }

    pub fn init(&mut self, cfg: &ThornConfig, border: &Border, rng: &mut SimRng, ids: &BallIdAllocator) {
        self.balls.clear();
        self.refresh_time_count = 0.0;
        for _ in 0..cfg.num_init {
            self.spawn_one(cfg, border, rng, ids);
        }
    }

    pub fn step(&mut self, cfg: &ThornConfig, dt: f32, border: &Border, rng: &mut SimRng, ids: &BallIdAllocator) {
        self.refresh_time_count += dt;
        if self.refresh_time_count < cfg.refresh_time {
            return;
        }
        self.refresh_time_count = 0.0;
        let todo = cfg.refresh_num.min(cfg.num_max.saturating_sub(self.balls.len()));
        for _ in 0..todo {
            self.spawn_one(cfg, border, rng, ids);
        }
        tracing::trace!(spawned = todo, total = self.balls.len(), "thorn refresh");
    }
}

impl Default for ThornManager {
    fn default() -> Self {
        Self::new()
    }
}
