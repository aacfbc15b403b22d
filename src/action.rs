//! Player actions (spec §4.5, §6 "Action encoding").

use glam::Vec2;

/// One of the four action kinds a player may request on an action-tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionType {
    Eject = 0,
    Split = 1,
    Stop = 2,
    Move = 3,
}

/// `(direction_x, direction_y, type)`. A `None` direction with
/// `ActionType::Move` means "continue the previously staged direction".
#[derive(Debug, Clone, Copy)]
pub struct Action {
    pub direction: Option<Vec2>,
    pub action_type: ActionType,
}

impl Action {
    pub fn mv(direction: Vec2) -> Self {
        Self { direction: Some(direction), action_type: ActionType::Move }
    }
    pub fn stop() -> Self {
        Self { direction: None, action_type: ActionType::Stop }
    }
    pub fn split(direction: Vec2) -> Self {
        Self { direction: Some(direction), action_type: ActionType::Split }
    }
    pub fn eject(direction: Vec2) -> Self {
        Self { direction: Some(direction), action_type: ActionType::Eject }
    }
}

/// Accumulates staged action requests for one player within a single
/// action-tick. `apply_actions` may be called more than once before
/// `step()` consumes the batch; flags OR together so a caller can stage a
/// `split` and later a `eject` request for the same player and have the
/// documented priority rule (spec §4.5) resolve them.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PendingAction {
    pub direction: Option<Vec2>,
    pub eject: bool,
    pub split: bool,
    pub stop: bool,
}

impl PendingAction {
    pub fn accumulate(&mut self, action: &Action) {
        match action.action_type {
            ActionType::Eject => self.eject = true,
            ActionType::Split => self.split = true,
            ActionType::Stop => self.stop = true,
            ActionType::Move => {}
        }
        if let Some(d) = action.direction {
            self.direction = Some(d);
        }
    }

    /// Resolve the effective action type for this tick: eject beats split
    /// (spec §4.5), and an explicit `stop` beats a present direction. With
    /// neither eject/split/stop staged, the player simply moves (or
    /// continues its previous direction when none was staged this tick).
    pub fn resolve(&self) -> ActionType {
        if self.eject {
            ActionType::Eject
        } else if self.split {
            ActionType::Split
        } else if self.stop {
            ActionType::Stop
        } else {
            ActionType::Move
        }
    }
}
