//! Owns the food population: initial fill, periodic refresh, removal
//! (spec §4.2; grounded on GoBigger's `FoodManager`).

use std::collections::HashMap;

use rand::Rng;

use crate::config::FoodConfig;
use crate::entity::FoodBall;
use crate::geometry::Border;
use crate::ids::{BallId, BallIdAllocator};
use crate::rng::SimRng;

#[derive(Debug)]
pub struct FoodManager {
    balls: HashMap<BallId, FoodBall>,
    refresh_time_count: f32,
}

impl FoodManager {
    pub fn new() -> Self {
        Self { balls: HashMap::new(), refresh_time_count: 0.0 }
    }

    pub fn all(&self) -> impl Iterator<Item = &FoodBall> {
        self.balls.values()
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn get(&self, id: BallId) -> Option<&FoodBall> {
        self.balls.get(&id)
    }

    pub fn add(&mut self, ball: FoodBall) {
        self.balls.insert(ball.data.id, ball);
    }

    pub fn remove(&mut self, id: BallId) -> Option<FoodBall> {
        self.balls.remove(&id)
    }

    fn spawn_one(&mut self, cfg: &FoodConfig, border: &Border, rng: &mut SimRng, ids: &BallIdAllocator) {
        let position = border.sample(rng);
        let r = if cfg.radius_max > cfg.radius_min {
            rng.inner().random_range(cfg.radius_min..cfg.radius_max)
        } else {
            cfg.radius_min
        };
        let ball = FoodBall::new(ids.next(), position, r);
        tracing::trace!(id = ball.data.id.0, "spawned food");
        self.add(ball);
    }

    /// Populate to `num_init` (spec §4.2 `init()`).
    pub fn init(&mut self, cfg: &FoodConfig, border: &Border, rng: &mut SimRng, ids: &BallIdAllocator) {
        self.balls.clear();
        self.refresh_time_count = 0.0;
        for _ in 0..cfg.num_init {
            self.spawn_one(cfg, border, rng, ids);
        }
    }

    /// Accumulate time and, every `refresh_time`, spawn up to `refresh_num`
    /// bodies bounded by `num_max` (spec §4.2 `step()`).
    pub fn step(&mut self, cfg: &FoodConfig, dt: f32, border: &Border, rng: &mut SimRng, ids: &BallIdAllocator) {
        self.refresh_time_count += dt;
        if self.refresh_time_count < cfg.refresh_time {
            return;
        }
        self.refresh_time_count = 0.0;
        let todo = cfg.refresh_num.min(cfg.num_max.saturating_sub(self.balls.len()));
        for _ in 0..todo {
            self.spawn_one(cfg, border, rng, ids);
        }
        tracing::trace!(spawned = todo, total = self.balls.len(), "food refresh");
    }
}

impl Default for FoodManager {
    fn default() -> Self {
        Self::new()
    }
}
