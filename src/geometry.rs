//! 2D vectors (via `glam`), circle math, and the world border rectangle.

use glam::Vec2;
use rand::Rng;

use crate::rng::SimRng;

/// The rectangular playing field, `[0, width] x [0, height]` (matches the
/// original GoBigger server's `Border(0, 0, map_width, map_height)`
/// convention rather than the teacher's origin-centered border).
#[derive(Debug, Clone, Copy)]
pub struct Border {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Border {
    pub fn new(width: f32, height: f32) -> Self {
        Self { min_x: 0.0, min_y: 0.0, max_x: width, max_y: height }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Sample a uniformly random point within the border (used for food and
    /// thorn spawn positions).
    pub fn sample(&self, rng: &mut SimRng) -> Vec2 {
        let r = rng.inner();
        Vec2::new(
            r.random_range(self.min_x..=self.max_x),
            r.random_range(self.min_y..=self.max_y),
        )
    }

    /// Clamp a disc of the given radius so it lies entirely within the
    /// border. No reflection — a simple position clamp (spec §4.1).
    #[inline]
    pub fn clamp_disc(&self, position: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            position.x.clamp(self.min_x + radius, (self.max_x - radius).max(self.min_x + radius)),
            position.y.clamp(self.min_y + radius, (self.max_y - radius).max(self.min_y + radius)),
        )
    }

    /// Whether a disc of the given radius lies entirely within the border.
    #[inline]
    pub fn contains_disc(&self, position: Vec2, radius: f32) -> bool {
        position.x - radius >= self.min_x - 1e-3
            && position.x + radius <= self.max_x + 1e-3
            && position.y - radius >= self.min_y - 1e-3
            && position.y + radius <= self.max_y + 1e-3
    }
}

/// Whether two discs overlap: `‖p_a - p_b‖ < r_a + r_b` (spec §4.3).
#[inline]
pub fn discs_overlap(pos_a: Vec2, r_a: f32, pos_b: Vec2, r_b: f32) -> bool {
    pos_a.distance_squared(pos_b) < (r_a + r_b) * (r_a + r_b)
}

/// A velocity impulse that decays linearly to zero over a fixed duration.
/// Shared by spore travel, thorn post-impact momentum, clone split boosts,
/// and clone stop-deceleration (spec §4.1).
#[derive(Debug, Clone, Copy)]
pub struct LinearDecay {
    pub direction: Vec2,
    initial_speed: f32,
    total_time: f32,
    elapsed: f32,
}

impl LinearDecay {
    pub fn new(direction: Vec2, initial_speed: f32, total_time: f32) -> Self {
        let direction = if direction == Vec2::ZERO { Vec2::X } else { direction.normalize() };
        Self { direction, initial_speed, total_time: total_time.max(1e-6), elapsed: 0.0 }
    }

    /// Current speed (magnitude), linearly interpolated down to zero.
    #[inline]
    pub fn speed(&self) -> f32 {
        (self.initial_speed * (1.0 - self.elapsed / self.total_time)).max(0.0)
    }

    /// Current velocity vector.
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.direction * self.speed()
    }

    /// Advance the decay clock; returns true once fully decayed.
    #[inline]
    pub fn tick(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        self.speed() <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_clamps_disc_inside() {
        let border = Border::new(100.0, 100.0);
        let clamped = border.clamp_disc(Vec2::new(-10.0, 5.0), 4.0);
        assert!(border.contains_disc(clamped, 4.0));
    }

    #[test]
    fn discs_overlap_detects_touching_and_separated() {
        assert!(discs_overlap(Vec2::ZERO, 5.0, Vec2::new(8.0, 0.0), 5.0));
        assert!(!discs_overlap(Vec2::ZERO, 5.0, Vec2::new(20.0, 0.0), 5.0));
    }

    #[test]
    fn linear_decay_reaches_zero() {
        let mut decay = LinearDecay::new(Vec2::X, 30.0, 1.0);
        assert!((decay.speed() - 30.0).abs() < 1e-4);
        for _ in 0..10 {
            decay.tick(0.1);
        }
        assert!(decay.speed() <= 1e-3);
    }
}
