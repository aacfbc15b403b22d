//! Collision resolution: the dispatch table of spec §4.4, run once per
//! state-tick after the collision index has produced candidate pairs.
//!
//! Grounded on the teacher's `process_collisions`/`deal_with_collision`
//! shape and GoBigger's `Server::deal_with_collision` (`original_source/`).
//! Symmetric kind pairs (e.g. a moving Spore hitting a Clone, vs. the Clone
//! itself being the mover) are unified into one outcome regardless of which
//! side appears first in the moving list.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::config::Config;
use crate::entity::BallKind;
use crate::geometry::Border;
use crate::entity::CloneBall;
use crate::ids::{BallId, BallIdAllocator, PlayerId};
use crate::managers::{FoodManager, PlayerManager, SporeManager, ThornManager};
use crate::rng::SimRng;

/// Bundles every manager the rules engine needs to mutate, so it never has
/// to import a manager's internals directly (spec §9 design note: expose a
/// uniform removal capability rather than coupling the engine to manager
/// types).
pub struct RuleContext<'a> {
    pub food: &'a mut FoodManager,
    pub spore: &'a mut SporeManager,
    pub thorn: &'a mut ThornManager,
    pub player: &'a mut PlayerManager,
    pub cfg: &'a Config,
    pub rng: &'a mut SimRng,
    pub ids: &'a BallIdAllocator,
    pub border: &'a Border,
}

#[derive(Debug, Clone, Copy)]
struct Snapshot {
    kind: BallKind,
    size: f32,
    r: f32,
    position: Vec2,
}

fn snapshot(ctx: &RuleContext, id: BallId) -> Option<Snapshot> {
    if let Some(b) = ctx.food.get(id) {
        return Some(Snapshot { kind: BallKind::Food, size: b.data.s, r: b.data.r, position: b.data.position });
    }
    if let Some(b) = ctx.spore.get(id) {
        return Some(Snapshot { kind: BallKind::Spore, size: b.data.s, r: b.data.r, position: b.data.position });
    }
    if let Some(b) = ctx.thorn.get(id) {
        return Some(Snapshot { kind: BallKind::Thorn, size: b.data.s, r: b.data.r, position: b.data.position });
    }
    if let Some(b) = ctx.player.clone_ball(id) {
        return Some(Snapshot { kind: BallKind::Clone, size: b.data.s, r: b.data.r, position: b.data.position });
    }
    None
}

/// Run the rules engine over every moving body and its candidate pair list
/// (spec §4.4, §4.7 step 5). `moving_ids` must already be sorted
/// size-descending with id-ascending tiebreak (spec §9 "Ordering") —
/// `pairs[i]` lists the candidates for `moving_ids[i]`.
pub fn resolve_tick(ctx: &mut RuleContext, moving_ids: &[BallId], pairs: &[Vec<BallId>]) {
    for (i, &a_id) in moving_ids.iter().enumerate() {
        // `a_id` may already have been eaten by an earlier (larger) moving
        // body processed this same tick; a vanished id is our removed flag.
        if snapshot(ctx, a_id).is_none() {
            continue;
        }
        for &b_id in &pairs[i] {
            if a_id == b_id {
                continue;
            }
            let (Some(a), Some(b)) = (snapshot(ctx, a_id), snapshot(ctx, b_id)) else {
                continue;
            };
            dispatch(ctx, a_id, a, b_id, b);
            // `a` may have grown (ingestion); if it no longer exists at all
            // (e.g. consumed by its own Thorn explosion, which keeps its
            // id, so this cannot happen today but costs nothing to guard)
            // stop processing further targets for it.
            if snapshot(ctx, a_id).is_none() {
                break;
            }
        }
    }
}

fn dispatch(ctx: &mut RuleContext, a_id: BallId, a: Snapshot, b_id: BallId, b: Snapshot) {
    use BallKind::*;
    match (a.kind, b.kind) {
        (Clone, Clone) => clone_vs_clone(ctx, a_id, a, b_id, b),
        (Clone, Food) => clone_eats_food(ctx, a_id, b_id),
        (Food, Clone) => clone_eats_food(ctx, b_id, a_id),
        (Clone, Spore) => clone_eats_spore(ctx, a_id, b_id),
        (Spore, Clone) => clone_eats_spore(ctx, b_id, a_id),
        (Clone, Thorn) => clone_vs_thorn(ctx, a_id, a, b_id, b),
        (Thorn, Clone) => clone_vs_thorn(ctx, b_id, b, a_id, a),
        (Thorn, Spore) => thorn_eats_spore(ctx, a_id, b_id),
        (Spore, Thorn) => thorn_eats_spore(ctx, b_id, a_id),
        _ => {}
    }
}

fn clone_vs_clone(ctx: &mut RuleContext, a_id: BallId, a: Snapshot, b_id: BallId, b: Snapshot) {
    let a_owner = ctx.player.clone_ball(a_id).map(|c| c.owner);
    let b_owner = ctx.player.clone_ball(b_id).map(|c| c.owner);
    let (Some(a_owner), Some(b_owner)) = (a_owner, b_owner) else { return };
    if a_owner == b_owner {
        // Same-owner overlap is handled exclusively by `PlayerManager::adjust`.
        return;
    }
    let a_team = ctx.player.clone_ball(a_id).map(|c| c.team);
    let b_team = ctx.player.clone_ball(b_id).map(|c| c.team);

    // Larger eats smaller; ties broken by lower BallId (spec's id-ascending
    // tiebreak convention, applied here for determinism).
    let (winner_id, loser_id, loser_owner) = if a.size > b.size {
        (a_id, b_id, b_owner)
    } else if b.size > a.size {
        (b_id, a_id, a_owner)
    } else if a_id.0 < b_id.0 {
        (a_id, b_id, b_owner)
    } else {
        (b_id, a_id, a_owner)
    };

    if a_team == b_team {
        // Same team, different owner: only eat if it would not empty the
        // loser's roster outright (spec §4.4).
        if ctx.player.clone_count_for(loser_owner) <= 1 {
            return;
        }
    }

    let loser_size = match ctx.player.clone_ball(loser_id) {
        Some(c) => c.data.s,
        None => return,
    };
    ctx.player.remove_clone(loser_id);
    if let Some(winner) = ctx.player.clone_ball_mut(winner_id) {
        winner.data.ingest(loser_size);
    }
}

fn clone_eats_food(ctx: &mut RuleContext, clone_id: BallId, food_id: BallId) {
    let Some(food) = ctx.food.remove(food_id) else { return };
    if let Some(clone) = ctx.player.clone_ball_mut(clone_id) {
        clone.data.ingest(food.data.s);
    }
}

fn clone_eats_spore(ctx: &mut RuleContext, clone_id: BallId, spore_id: BallId) {
    let Some(spore) = ctx.spore.remove(spore_id) else { return };
    if let Some(clone) = ctx.player.clone_ball_mut(clone_id) {
        clone.data.ingest(spore.data.s);
    }
}

fn thorn_eats_spore(ctx: &mut RuleContext, thorn_id: BallId, spore_id: BallId) {
    let Some(spore) = ctx.spore.remove(spore_id) else { return };
    let direction = if spore.data.velocity.length_squared() > 1e-8 {
        spore.data.velocity.normalize()
    } else {
        Vec2::X
    };
    let Some(thorn) = ctx.thorn.get_mut(thorn_id) else { return };
    thorn.data.ingest(spore.data.s);
    thorn.absorb_spore_momentum(
        direction,
        ctx.cfg.thorn.eat_spore_vel_init,
        ctx.cfg.thorn.vel_max,
        ctx.cfg.thorn.eat_spore_vel_zero_time,
    );
}

fn clone_vs_thorn(ctx: &mut RuleContext, clone_id: BallId, clone: Snapshot, thorn_id: BallId, thorn: Snapshot) {
    if clone.size <= thorn.size {
        return;
    }
    // Center-hit discipline (spec §4.4): the thorn's center must lie inside
    // the clone's disc, not merely overlap its rim.
    if clone.position.distance(thorn.position) > clone.r {
        return;
    }

    let owner = match ctx.player.clone_ball(clone_id) {
        Some(c) => c.owner,
        None => return,
    };
    ctx.thorn.remove(thorn_id);

    let cells_before = ctx.player.clone_count_for(owner);
    if cells_before >= ctx.cfg.player.part_num_max {
        // No room to split: plain ingestion.
        if let Some(c) = ctx.player.clone_ball_mut(clone_id) {
            c.data.ingest(thorn.size);
        }
        return;
    }

    if let Some(c) = ctx.player.clone_ball_mut(clone_id) {
        c.data.ingest(thorn.size);
    }
    explode(ctx, clone_id, owner, cells_before);
}

/// Split a clone into up to `on_thorns_part_num` children after it eats a
/// thorn (spec §4.6). The clone keeps its id and remains the largest child;
/// excess mass beyond what the remaining children can hold (bounded by
/// `on_thorns_part_radius_max` and by `part_num_max`) stays with it.
fn explode(ctx: &mut RuleContext, clone_id: BallId, owner: PlayerId, cells_before: usize) {
    let cfg = &ctx.cfg.player;
    let max_children = cfg.part_num_max.saturating_sub(cells_before.saturating_sub(1)).max(1);
    let children_count = cfg.on_thorns_part_num.min(max_children).max(1);

    let (position, total_size, team) = match ctx.player.clone_ball(clone_id) {
        Some(c) => (c.data.position, c.data.s, c.team),
        None => return,
    };

    if children_count <= 1 {
        return;
    }

    let max_child_size = cfg.on_thorns_part_radius_max * cfg.on_thorns_part_radius_max;
    let even_share = total_size / children_count as f32;
    let (new_child_size, eater_size) = if even_share <= max_child_size {
        (even_share, even_share)
    } else {
        let new_child_size = max_child_size;
        let eater_size = total_size - new_child_size * (children_count - 1) as f32;
        (new_child_size, eater_size)
    };

    let base_angle = ctx.rng.inner().random_range(0.0..TAU);
    for k in 0..children_count {
        let angle = base_angle + (k as f32) * TAU / (children_count as f32);
        let dir = Vec2::new(angle.cos(), angle.sin());
        let size = if k == 0 { eater_size } else { new_child_size };
        let r = size.sqrt();
        let pos = ctx.border.clamp_disc(position + dir * r, r);

        if k == 0 {
            if let Some(c) = ctx.player.clone_ball_mut(clone_id) {
                c.data.position = pos;
                c.data.set_size(size);
                c.age = 0.0;
                c.set_split_boost(dir, cfg.split_vel_init, cfg.split_vel_zero_time);
            }
        } else {
            let mut child = CloneBall::new(ctx.ids.next(), owner, team, pos, r);
            child.set_split_boost(dir, cfg.split_vel_init, cfg.split_vel_zero_time);
            ctx.player.add_clone(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::entity::{CloneBall, FoodBall};
    use crate::ids::{BallIdAllocator, PlayerId, TeamId};
    use crate::rng::SimRng;

    fn ctx_harness() -> (FoodManager, SporeManager, ThornManager, PlayerManager, Config, SimRng, BallIdAllocator, Border) {
        (
            FoodManager::new(),
            SporeManager::new(),
            ThornManager::new(),
            PlayerManager::new(1, 2),
            Config::default(),
            SimRng::new(42),
            BallIdAllocator::new(),
            Border::new(1000.0, 1000.0),
        )
    }

    #[test]
    fn clone_eats_food_grows_and_removes_food() {
        let (mut food, mut spore, mut thorn, mut player, cfg, mut rng, ids, border) = ctx_harness();
        let clone_id = ids.next();
        player.add_clone(CloneBall::new(clone_id, PlayerId(0), TeamId(0), Vec2::new(10.0, 10.0), 10.0));
        let food_id = ids.next();
        food.add(FoodBall::new(food_id, Vec2::new(10.0, 10.0), 2.0));
        let before = player.clone_ball(clone_id).unwrap().data.s;

        let mut ctx = RuleContext { food: &mut food, spore: &mut spore, thorn: &mut thorn, player: &mut player, cfg: &cfg, rng: &mut rng, ids: &ids, border: &border };
        clone_eats_food(&mut ctx, clone_id, food_id);

        assert!(ctx.food.get(food_id).is_none());
        assert!(player.clone_ball(clone_id).unwrap().data.s > before);
    }

    #[test]
    fn same_owner_clones_are_never_eaten_by_rules_engine() {
        let (mut food, mut spore, mut thorn, mut player, cfg, mut rng, ids, border) = ctx_harness();
        let a = ids.next();
        let b = ids.next();
        player.add_clone(CloneBall::new(a, PlayerId(0), TeamId(0), Vec2::new(0.0, 0.0), 20.0));
        player.add_clone(CloneBall::new(b, PlayerId(0), TeamId(0), Vec2::new(5.0, 0.0), 5.0));

        let mut ctx = RuleContext { food: &mut food, spore: &mut spore, thorn: &mut thorn, player: &mut player, cfg: &cfg, rng: &mut rng, ids: &ids, border: &border };
        let snap_a = snapshot(&ctx, a).unwrap();
        let snap_b = snapshot(&ctx, b).unwrap();
        clone_vs_clone(&mut ctx, a, snap_a, b, snap_b);

        assert!(player.clone_ball(a).is_some());
        assert!(player.clone_ball(b).is_some());
    }

    #[test]
    fn small_team_mate_cell_survives_if_it_would_empty_owner() {
        let (mut food, mut spore, mut thorn, mut player, cfg, mut rng, ids, border) = ctx_harness();
        // player 0 and player 1 are on the same team (player_num_per_team=2).
        let big = ids.next();
        let small = ids.next();
        player.add_clone(CloneBall::new(big, PlayerId(0), TeamId(0), Vec2::new(0.0, 0.0), 20.0));
        player.add_clone(CloneBall::new(small, PlayerId(1), TeamId(0), Vec2::new(5.0, 0.0), 5.0));

        let mut ctx = RuleContext { food: &mut food, spore: &mut spore, thorn: &mut thorn, player: &mut player, cfg: &cfg, rng: &mut rng, ids: &ids, border: &border };
        let snap_big = snapshot(&ctx, big).unwrap();
        let snap_small = snapshot(&ctx, small).unwrap();
        clone_vs_clone(&mut ctx, big, snap_big, small, snap_small);

        // player 1's only cell: eating is suppressed.
        assert!(player.clone_ball(small).is_some());
    }
}
