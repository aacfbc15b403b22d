//! Managers: one per ball kind, each exclusively owning its kind's
//! population (spec §3 "Ownership", §4.2).

mod food_manager;
mod player_manager;
mod spore_manager;
mod thorn_manager;

pub use food_manager::FoodManager;
pub use player_manager::{Player, PlayerManager, Team};
pub use spore_manager::SporeManager;
pub use thorn_manager::ThornManager;
