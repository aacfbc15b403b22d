//! Read-only world views handed to collaborators (spec §6 `snapshot()`).
//! Plain serde-serializable data — no wire encoding, no rendering logic.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::Serialize;

use crate::entity::BallKind;
use crate::ids::{BallId, PlayerId, TeamId};

/// World-wide state: border size, match clock, per-team leaderboard.
/// `leaderboard` is a `BTreeMap` (not a hash map) so it serializes in a
/// fixed key order — a `Server` snapshot must be byte-for-byte reproducible
/// for a given seed and action stream.
#[derive(Debug, Clone, Serialize)]
pub struct GlobalView {
    pub border: [f32; 2],
    pub total_time: f32,
    pub last_time: f32,
    pub leaderboard: BTreeMap<TeamId, f32>,
}

/// One body as seen by a viewer: enough to render or encode an observation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BallView {
    pub id: BallId,
    pub kind: BallKind,
    pub owner: Option<PlayerId>,
    pub team: Option<TeamId>,
    pub position: Vec2,
    pub r: f32,
    pub velocity: Vec2,
}

/// One player's field of view: every body within their visible rectangle.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub player_id: PlayerId,
    /// `[min_x, min_y, max_x, max_y]`, centered on the player's cells.
    pub rect: [f32; 4],
    pub balls: Vec<BallView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub global: GlobalView,
    pub per_player: BTreeMap<PlayerId, PlayerView>,
}

/// Whether `position` lies within `rect = [min_x, min_y, max_x, max_y]`.
pub(crate) fn rect_contains(rect: [f32; 4], position: Vec2) -> bool {
    position.x >= rect[0] && position.x <= rect[2] && position.y >= rect[1] && position.y <= rect[3]
}

/// The visible-rectangle size is unspecified by the data model beyond "the
/// player's visible rectangle"; we grow it with the player's total size
/// (more mass, more camera pull-back, matching the original game's feel)
/// and center it on the size-weighted centroid of the player's cells.
pub(crate) fn view_rect(center: Vec2, total_size: f32, border_w: f32, border_h: f32) -> [f32; 4] {
    const BASE_HALF_EXTENT: f32 = 250.0;
    const GROWTH: f32 = 6.0;
    let half = BASE_HALF_EXTENT + total_size.sqrt() * GROWTH;
    let half_w = half.min(border_w / 2.0).max(1.0);
    let half_h = half.min(border_h / 2.0).max(1.0);
    [center.x - half_w, center.y - half_h, center.x + half_w, center.y + half_h]
}
