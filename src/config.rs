//! Simulation configuration (spec §6).

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::SimError;

/// Collision-detection backend selector (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionDetectionType {
    Precision,
    Spatial,
}

impl Default for CollisionDetectionType {
    fn default() -> Self {
        CollisionDetectionType::Precision
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_team_num")]
    pub team_num: u32,
    #[serde(default = "default_player_num_per_team")]
    pub player_num_per_team: u32,
    #[serde(default = "default_map_size")]
    pub map_width: f32,
    #[serde(default = "default_map_size")]
    pub map_height: f32,
    #[serde(default = "default_match_time")]
    pub match_time: f32,
    #[serde(default = "default_state_tick_per_second")]
    pub state_tick_per_second: u32,
    #[serde(default = "default_action_tick_per_second")]
    pub action_tick_per_second: u32,
    #[serde(default)]
    pub collision_detection_type: CollisionDetectionType,

    #[serde(default)]
    pub food: FoodConfig,
    #[serde(default)]
    pub thorn: ThornConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub spore: SporeConfig,
}

impl Config {
    /// Load configuration from `config.toml`, writing out the default file
    /// if none exists yet (mirrors the teacher's `Config::load`).
    pub fn load() -> anyhow::Result<Self> {
        let path = Path::new("config.toml");
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            info!("no config.toml found, writing default config");
            let default_config = Self::default();
            std::fs::write(path, toml::to_string_pretty(&default_config)?)?;
            Ok(default_config)
        }
    }

    /// Validate derived invariants not already enforced by the type system.
    /// Raised at construction time; fatal (spec §7 `ConfigInvalid`).
    pub fn validate(&self) -> Result<(), SimError> {
        if self.map_width <= 0.0 || self.map_height <= 0.0 {
            return Err(SimError::ConfigInvalid("map dimensions must be positive".into()));
        }
        if self.match_time <= 0.0 {
            return Err(SimError::ConfigInvalid("match_time must be positive".into()));
        }
        if self.state_tick_per_second == 0
            || self.action_tick_per_second == 0
            || self.state_tick_per_second % self.action_tick_per_second != 0
        {
            return Err(SimError::ConfigInvalid(
                "state_tick_per_second must be a positive multiple of action_tick_per_second".into(),
            ));
        }
        self.food.validate("food")?;
        self.thorn.validate("thorn")?;
        if self.player.radius_min <= 0.0 || self.player.radius_min > self.player.radius_max {
            return Err(SimError::ConfigInvalid("player radius_min/radius_max invalid".into()));
        }
        if self.player.part_num_max == 0 {
            return Err(SimError::ConfigInvalid("player.part_num_max must be at least 1".into()));
        }
        if self.spore.radius_min <= 0.0 || self.spore.radius_min > self.spore.radius_max {
            return Err(SimError::ConfigInvalid("spore radius_min/radius_max invalid".into()));
        }
        Ok(())
    }

    /// Derived: seconds per state-tick.
    #[inline]
    pub fn state_dt(&self) -> f32 {
        1.0 / self.state_tick_per_second as f32
    }

    /// Derived: state-ticks per action-tick.
    #[inline]
    pub fn ticks_per_action(&self) -> u32 {
        self.state_tick_per_second / self.action_tick_per_second
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            team_num: default_team_num(),
            player_num_per_team: default_player_num_per_team(),
            map_width: default_map_size(),
            map_height: default_map_size(),
            match_time: default_match_time(),
            state_tick_per_second: default_state_tick_per_second(),
            action_tick_per_second: default_action_tick_per_second(),
            collision_detection_type: CollisionDetectionType::default(),
            food: FoodConfig::default(),
            thorn: ThornConfig::default(),
            player: PlayerConfig::default(),
            spore: SporeConfig::default(),
        }
    }
}

fn default_team_num() -> u32 {
    4
}
fn default_player_num_per_team() -> u32 {
    3
}
fn default_map_size() -> f32 {
    1000.0
}
fn default_match_time() -> f32 {
    60.0 * 10.0
}
fn default_state_tick_per_second() -> u32 {
    20
}
fn default_action_tick_per_second() -> u32 {
    5
}

/// Common manager population bounds, shared by food and thorn configs.
pub trait PopulationBounds {
    fn num_min(&self) -> usize;
    fn num_max(&self) -> usize;
    fn radius_min(&self) -> f32;
    fn radius_max(&self) -> f32;

    fn validate(&self, label: &str) -> Result<(), SimError> {
        if self.num_min() > self.num_max() {
            return Err(SimError::ConfigInvalid(format!("{label}.num_min > num_max")));
        }
        if self.radius_min() <= 0.0 || self.radius_min() > self.radius_max() {
            return Err(SimError::ConfigInvalid(format!("{label} radius range is empty or invalid")));
        }
        Ok(())
    }
}

/// Food manager configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FoodConfig {
    #[serde(default = "default_food_num_init")]
    pub num_init: usize,
    #[serde(default = "default_food_num_min")]
    pub num_min: usize,
    #[serde(default = "default_food_num_max")]
    pub num_max: usize,
    #[serde(default = "default_food_refresh_time")]
    pub refresh_time: f32,
    #[serde(default = "default_food_refresh_num")]
    pub refresh_num: usize,
    #[serde(default = "default_food_radius_min")]
    pub radius_min: f32,
    #[serde(default = "default_food_radius_max")]
    pub radius_max: f32,
}

impl PopulationBounds for FoodConfig {
    fn num_min(&self) -> usize {
        self.num_min
    }
    fn num_max(&self) -> usize {
        self.num_max
    }
    fn radius_min(&self) -> f32 {
        self.radius_min
    }
    fn radius_max(&self) -> f32 {
        self.radius_max
    }
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            num_init: default_food_num_init(),
            num_min: default_food_num_min(),
            num_max: default_food_num_max(),
            refresh_time: default_food_refresh_time(),
            refresh_num: default_food_refresh_num(),
            radius_min: default_food_radius_min(),
            radius_max: default_food_radius_max(),
        }
    }
}

fn default_food_num_init() -> usize {
    2000
}
fn default_food_num_min() -> usize {
    2000
}
fn default_food_num_max() -> usize {
    2500
}
fn default_food_refresh_time() -> f32 {
    2.0
}
fn default_food_refresh_num() -> usize {
    30
}
fn default_food_radius_min() -> f32 {
    2.0
}
fn default_food_radius_max() -> f32 {
    2.0
}

/// Thorn manager configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ThornConfig {
    #[serde(default = "default_thorn_num_init")]
    pub num_init: usize,
    #[serde(default = "default_thorn_num_min")]
    pub num_min: usize,
    #[serde(default = "default_thorn_num_max")]
    pub num_max: usize,
    #[serde(default = "default_thorn_refresh_time")]
    pub refresh_time: f32,
    #[serde(default = "default_thorn_refresh_num")]
    pub refresh_num: usize,
    #[serde(default = "default_thorn_radius_min")]
    pub radius_min: f32,
    #[serde(default = "default_thorn_radius_max")]
    pub radius_max: f32,
    #[serde(default = "default_thorn_vel_max")]
    pub vel_max: f32,
    #[serde(default = "default_thorn_eat_spore_vel_init")]
    pub eat_spore_vel_init: f32,
    #[serde(default = "default_thorn_eat_spore_vel_zero_time")]
    pub eat_spore_vel_zero_time: f32,
}

impl PopulationBounds for ThornConfig {
    fn num_min(&self) -> usize {
        self.num_min
    }
    fn num_max(&self) -> usize {
        self.num_max
    }
    fn radius_min(&self) -> f32 {
        self.radius_min
    }
    fn radius_max(&self) -> f32 {
        self.radius_max
    }
}

impl Default for ThornConfig {
    fn default() -> Self {
        Self {
            num_init: default_thorn_num_init(),
            num_min: default_thorn_num_min(),
            num_max: default_thorn_num_max(),
            refresh_time: default_thorn_refresh_time(),
            refresh_num: default_thorn_refresh_num(),
            radius_min: default_thorn_radius_min(),
            radius_max: default_thorn_radius_max(),
            vel_max: default_thorn_vel_max(),
            eat_spore_vel_init: default_thorn_eat_spore_vel_init(),
            eat_spore_vel_zero_time: default_thorn_eat_spore_vel_zero_time(),
        }
    }
}

fn default_thorn_num_init() -> usize {
    15
}
fn default_thorn_num_min() -> usize {
    15
}
fn default_thorn_num_max() -> usize {
    20
}
fn default_thorn_refresh_time() -> f32 {
    2.0
}
fn default_thorn_refresh_num() -> usize {
    2
}
fn default_thorn_radius_min() -> f32 {
    12.0
}
fn default_thorn_radius_max() -> f32 {
    20.0
}
fn default_thorn_vel_max() -> f32 {
    100.0
}
fn default_thorn_eat_spore_vel_init() -> f32 {
    10.0
}
fn default_thorn_eat_spore_vel_zero_time() -> f32 {
    1.0
}

/// Player (clone) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerConfig {
    #[serde(default = "default_player_acc_max")]
    pub acc_max: f32,
    #[serde(default = "default_player_vel_max")]
    pub vel_max: f32,
    #[serde(default = "default_player_radius_min")]
    pub radius_min: f32,
    #[serde(default = "default_player_radius_max")]
    pub radius_max: f32,
    #[serde(default = "default_player_radius_init")]
    pub radius_init: f32,
    #[serde(default = "default_player_part_num_max")]
    pub part_num_max: usize,
    #[serde(default = "default_player_on_thorns_part_num")]
    pub on_thorns_part_num: usize,
    #[serde(default = "default_player_on_thorns_part_radius_max")]
    pub on_thorns_part_radius_max: f32,
    #[serde(default = "default_player_split_radius_min")]
    pub split_radius_min: f32,
    #[serde(default = "default_player_eject_radius_min")]
    pub eject_radius_min: f32,
    #[serde(default = "default_player_recombine_age")]
    pub recombine_age: f32,
    #[serde(default = "default_player_split_vel_init")]
    pub split_vel_init: f32,
    #[serde(default = "default_player_split_vel_zero_time")]
    pub split_vel_zero_time: f32,
    #[serde(default = "default_player_stop_zero_time")]
    pub stop_zero_time: f32,
    #[serde(default = "default_player_size_decay_rate")]
    pub size_decay_rate: f32,
    #[serde(default = "default_player_given_acc_weight")]
    pub given_acc_weight: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            acc_max: default_player_acc_max(),
            vel_max: default_player_vel_max(),
            radius_min: default_player_radius_min(),
            radius_max: default_player_radius_max(),
            radius_init: default_player_radius_init(),
            part_num_max: default_player_part_num_max(),
            on_thorns_part_num: default_player_on_thorns_part_num(),
            on_thorns_part_radius_max: default_player_on_thorns_part_radius_max(),
            split_radius_min: default_player_split_radius_min(),
            eject_radius_min: default_player_eject_radius_min(),
            recombine_age: default_player_recombine_age(),
            split_vel_init: default_player_split_vel_init(),
            split_vel_zero_time: default_player_split_vel_zero_time(),
            stop_zero_time: default_player_stop_zero_time(),
            size_decay_rate: default_player_size_decay_rate(),
            given_acc_weight: default_player_given_acc_weight(),
        }
    }
}

fn default_player_acc_max() -> f32 {
    30.0
}
fn default_player_vel_max() -> f32 {
    20.0
}
fn default_player_radius_min() -> f32 {
    3.0
}
fn default_player_radius_max() -> f32 {
    100.0
}
fn default_player_radius_init() -> f32 {
    3.0
}
fn default_player_part_num_max() -> usize {
    16
}
fn default_player_on_thorns_part_num() -> usize {
    10
}
fn default_player_on_thorns_part_radius_max() -> f32 {
    20.0
}
fn default_player_split_radius_min() -> f32 {
    10.0
}
fn default_player_eject_radius_min() -> f32 {
    10.0
}
fn default_player_recombine_age() -> f32 {
    20.0
}
fn default_player_split_vel_init() -> f32 {
    30.0
}
fn default_player_split_vel_zero_time() -> f32 {
    1.0
}
fn default_player_stop_zero_time() -> f32 {
    1.0
}
fn default_player_size_decay_rate() -> f32 {
    0.00005
}
fn default_player_given_acc_weight() -> f32 {
    10.0
}

/// Spore configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SporeConfig {
    #[serde(default = "default_spore_radius_min")]
    pub radius_min: f32,
    #[serde(default = "default_spore_radius_max")]
    pub radius_max: f32,
    #[serde(default = "default_spore_vel_init")]
    pub vel_init: f32,
    #[serde(default = "default_spore_vel_zero_time")]
    pub vel_zero_time: f32,
    #[serde(default = "default_spore_radius_init")]
    pub spore_radius_init: f32,
}

impl Default for SporeConfig {
    fn default() -> Self {
        Self {
            radius_min: default_spore_radius_min(),
            radius_max: default_spore_radius_max(),
            vel_init: default_spore_vel_init(),
            vel_zero_time: default_spore_vel_zero_time(),
            spore_radius_init: default_spore_radius_init(),
        }
    }
}

fn default_spore_radius_min() -> f32 {
    3.0
}
fn default_spore_radius_max() -> f32 {
    3.0
}
fn default_spore_vel_init() -> f32 {
    250.0
}
fn default_spore_vel_zero_time() -> f32 {
    0.3
}
fn default_spore_radius_init() -> f32 {
    20.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn mismatched_tick_rates_are_rejected() {
        let mut cfg = Config::default();
        cfg.state_tick_per_second = 20;
        cfg.action_tick_per_second = 7;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_radius_range_is_rejected() {
        let mut cfg = Config::default();
        cfg.food.radius_min = 5.0;
        cfg.food.radius_max = 2.0;
        assert!(cfg.validate().is_err());
    }
}
