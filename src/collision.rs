//! Collision detection (spec §4.3): given the moving set and the full set,
//! return candidate overlap pairs. Two backends — `precision` (direct scan)
//! and `spatial` (grid index) — must produce identical pair sets.

use std::collections::HashSet;

use glam::Vec2;

use crate::geometry::{discs_overlap, Border};
use crate::ids::BallId;
use crate::spatial::Grid;

/// A lightweight, position/radius-only view of a ball, used purely to
/// build the pair list. Taken as a snapshot before any rules-engine
/// mutation happens this tick, since ingestion never moves the eater
/// (spec §4.4) — positions are stable for the whole resolution phase.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub id: BallId,
    pub position: Vec2,
    pub r: f32,
}

/// Backend-selectable collision index (spec §4.3).
pub trait CollisionBackend {
    /// For each entry in `moving` (in the caller's supplied order), return
    /// the ids of other bodies in `total` it overlaps (self excluded).
    /// `total` is de-duplicated by identity before the scan (spec §9 note 2).
    fn solve(&self, moving: &[Candidate], total: &[Candidate], border: &Border) -> Vec<Vec<BallId>>;
}

fn dedup_total(total: &[Candidate]) -> Vec<Candidate> {
    let mut seen = HashSet::with_capacity(total.len());
    let mut out = Vec::with_capacity(total.len());
    for c in total {
        if seen.insert(c.id) {
            out.push(*c);
        }
    }
    out
}

/// Direct O(n*m) scan. Reference backend; exact for any input size.
#[derive(Debug, Default)]
pub struct PrecisionBackend;

impl CollisionBackend for PrecisionBackend {
    fn solve(&self, moving: &[Candidate], total: &[Candidate], _border: &Border) -> Vec<Vec<BallId>> {
        let total = dedup_total(total);
        moving
            .iter()
            .map(|m| {
                total
                    .iter()
                    .filter(|t| t.id != m.id && discs_overlap(m.position, m.r, t.position, t.r))
                    .map(|t| t.id)
                    .collect()
            })
            .collect()
    }
}

/// Grid-backed spatial index, used for scale. Must return the same pair
/// set as `PrecisionBackend`, modulo iteration order (spec §4.3).
#[derive(Debug, Default)]
pub struct SpatialBackend;

impl CollisionBackend for SpatialBackend {
    fn solve(&self, moving: &[Candidate], total: &[Candidate], border: &Border) -> Vec<Vec<BallId>> {
        let total = dedup_total(total);
        if total.is_empty() {
            return vec![Vec::new(); moving.len()];
        }
        let typical_radius = total.iter().map(|c| c.r).fold(1.0_f32, f32::max).max(1.0);
        let grid = Grid::build(
            border.min_x,
            border.min_y,
            border.max_x,
            border.max_y,
            typical_radius,
            total.iter().enumerate().map(|(i, c)| (i, c.position, c.r)),
        );

        moving
            .iter()
            .map(|m| {
                let mut hits = Vec::new();
                let mut seen = HashSet::new();
                grid.for_each_candidate(m.position, m.r, |idx| {
                    let t = &total[idx];
                    if t.id != m.id
                        && seen.insert(t.id)
                        && discs_overlap(m.position, m.r, t.position, t.r)
                    {
                        hits.push(t.id);
                    }
                });
                hits
            })
            .collect()
    }
}

/// Canonicalize a pair list for test comparison: sort each moving index's
/// target list by body identity (spec §4.3 determinism requirement).
pub fn canonicalize(pairs: &mut [Vec<BallId>]) {
    for list in pairs.iter_mut() {
        list.sort_by_key(|id| id.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(id: u64, x: f32, y: f32, r: f32) -> Candidate {
        Candidate { id: BallId(id), position: Vec2::new(x, y), r }
    }

    #[test]
    fn precision_and_spatial_agree() {
        let border = Border::new(1000.0, 1000.0);
        let total = vec![
            cand(1, 100.0, 100.0, 10.0),
            cand(2, 108.0, 100.0, 10.0),
            cand(3, 500.0, 500.0, 5.0),
            cand(4, 503.0, 500.0, 5.0),
            cand(5, 900.0, 900.0, 3.0),
        ];
        let moving = total.clone();

        let mut precision = PrecisionBackend.solve(&moving, &total, &border);
        let mut spatial = SpatialBackend.solve(&moving, &total, &border);
        canonicalize(&mut precision);
        canonicalize(&mut spatial);
        assert_eq!(precision, spatial);
    }

    #[test]
    fn self_is_excluded() {
        let border = Border::new(100.0, 100.0);
        let total = vec![cand(1, 10.0, 10.0, 5.0)];
        let moving = total.clone();
        let pairs = PrecisionBackend.solve(&moving, &total, &border);
        assert!(pairs[0].is_empty());
    }

    #[test]
    fn duplicate_total_entries_are_deduplicated() {
        let border = Border::new(100.0, 100.0);
        let total = vec![cand(1, 0.0, 0.0, 5.0), cand(2, 1.0, 0.0, 5.0), cand(2, 1.0, 0.0, 5.0)];
        let moving = vec![cand(1, 0.0, 0.0, 5.0)];
        let pairs = PrecisionBackend.solve(&moving, &total, &border);
        assert_eq!(pairs[0], vec![BallId(2)]);
    }
}
