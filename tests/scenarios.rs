//! End-to-end scenarios (seed=42, default config unless noted).

use std::collections::HashMap;

use glam::Vec2;

use arena_core::action::Action;
use arena_core::collision::{Candidate, CollisionBackend, PrecisionBackend};
use arena_core::config::Config;
use arena_core::entity::{CloneBall, FoodBall, SporeBall, ThornBall};
use arena_core::error::SimError;
use arena_core::geometry::Border;
use arena_core::ids::{BallIdAllocator, PlayerId, TeamId};
use arena_core::managers::{FoodManager, PlayerManager, SporeManager, ThornManager};
use arena_core::rng::SimRng;
use arena_core::rules::{resolve_tick, RuleContext};
use arena_core::Server;

struct Harness {
    food: FoodManager,
    spore: SporeManager,
    thorn: ThornManager,
    player: PlayerManager,
    cfg: Config,
    rng: SimRng,
    ids: BallIdAllocator,
    border: Border,
}

impl Harness {
    fn new(team_num: u32, player_num_per_team: u32) -> Self {
        Self {
            food: FoodManager::new(),
            spore: SporeManager::new(),
            thorn: ThornManager::new(),
            player: PlayerManager::new(team_num, player_num_per_team),
            cfg: Config::default(),
            rng: SimRng::new(42),
            ids: BallIdAllocator::new(),
            border: Border::new(1000.0, 1000.0),
        }
    }

    fn ctx(&mut self) -> RuleContext<'_> {
        RuleContext {
            food: &mut self.food,
            spore: &mut self.spore,
            thorn: &mut self.thorn,
            player: &mut self.player,
            cfg: &self.cfg,
            rng: &mut self.rng,
            ids: &self.ids,
            border: &self.border,
        }
    }
}

fn cand_from_clone(c: &CloneBall) -> Candidate {
    Candidate { id: c.data.id, position: c.data.position, r: c.data.r }
}

#[test]
fn s1_clone_eats_food_at_zero_distance() {
    let mut h = Harness::new(1, 1);
    let pid = PlayerId(0);
    let team = TeamId(0);
    let clone_id = h.ids.next();
    h.player.add_clone(CloneBall::new(clone_id, pid, team, Vec2::new(500.0, 500.0), 50.0));
    let food_id = h.ids.next();
    h.food.add(FoodBall::new(food_id, Vec2::new(500.0, 500.0), 2.0));

    let moving = vec![cand_from_clone(h.player.clone_ball(clone_id).unwrap())];
    let total = vec![moving[0], Candidate { id: food_id, position: Vec2::new(500.0, 500.0), r: 2.0 }];
    let border = h.border;
    let pairs = PrecisionBackend.solve(&moving, &total, &border);
    let moving_ids = vec![clone_id];

    let size_before = h.player.clone_ball(clone_id).unwrap().data.s;
    let mut ctx = h.ctx();
    resolve_tick(&mut ctx, &moving_ids, &pairs);

    assert!(h.food.get(food_id).is_none());
    assert!((h.player.clone_ball(clone_id).unwrap().data.s - (size_before + 4.0)).abs() < 1e-3);
}

#[test]
fn s2_larger_clone_eats_smaller_different_team() {
    let mut h = Harness::new(2, 1);
    let a = h.ids.next();
    let b = h.ids.next();
    h.player.add_clone(CloneBall::new(a, PlayerId(0), TeamId(0), Vec2::ZERO, 10.0));
    h.player.add_clone(CloneBall::new(b, PlayerId(1), TeamId(1), Vec2::ZERO, 80.0_f32.sqrt()));
    h.player.clone_ball_mut(a).unwrap().data.set_size(100.0);
    h.player.clone_ball_mut(b).unwrap().data.set_size(80.0);

    let ca = cand_from_clone(h.player.clone_ball(a).unwrap());
    let cb = cand_from_clone(h.player.clone_ball(b).unwrap());
    let total = vec![ca, cb];
    let moving = vec![ca, cb];
    let border = h.border;
    let pairs = PrecisionBackend.solve(&moving, &total, &border);
    let moving_ids = vec![ca.id, cb.id];

    let mut ctx = h.ctx();
    resolve_tick(&mut ctx, &moving_ids, &pairs);

    assert!(h.player.clone_ball(b).is_none());
    assert!((h.player.clone_ball(a).unwrap().data.s - 180.0).abs() < 1e-3);
}

#[test]
fn s3_clone_eats_thorn_and_explodes_with_size_preserved() {
    let mut h = Harness::new(1, 1);
    let pid = PlayerId(0);
    let team = TeamId(0);
    let clone_id = h.ids.next();
    h.player.add_clone(CloneBall::new(clone_id, pid, team, Vec2::new(500.0, 500.0), 50.0));
    let thorn_id = h.ids.next();
    h.thorn.add(ThornBall::new(thorn_id, Vec2::new(500.0, 500.0), 15.0));

    let ca = cand_from_clone(h.player.clone_ball(clone_id).unwrap());
    let ct = Candidate { id: thorn_id, position: Vec2::new(500.0, 500.0), r: 15.0 };
    let total = vec![ca, ct];
    let moving = vec![ca];
    let border = h.border;
    let pairs = PrecisionBackend.solve(&moving, &total, &border);
    let moving_ids = vec![clone_id];

    let mut ctx = h.ctx();
    resolve_tick(&mut ctx, &moving_ids, &pairs);

    let count = h.player.clone_count_for(pid);
    assert!(count >= 1 && count <= h.cfg.player.on_thorns_part_num.min(h.cfg.player.part_num_max));
    let total_size: f32 = h
        .player
        .player(pid)
        .unwrap()
        .cells
        .iter()
        .filter_map(|id| h.player.clone_ball(*id))
        .map(|c| c.data.s)
        .sum();
    assert!((total_size - 2725.0).abs() < 1e-2);
}

#[test]
fn s4_thorn_absorbs_spore_and_decays_to_rest() {
    let mut h = Harness::new(1, 1);
    let thorn_id = h.ids.next();
    h.thorn.add(ThornBall::new(thorn_id, Vec2::new(500.0, 500.0), 15.0));
    let spore_id = h.ids.next();
    let direction = Vec2::new(1.0, 0.0);
    h.spore.add(SporeBall::new(spore_id, Vec2::new(500.0, 500.0), 3.0, direction, 250.0, 0.3));

    let cs = Candidate { id: spore_id, position: Vec2::new(500.0, 500.0), r: 3.0 };
    let ct = Candidate { id: thorn_id, position: Vec2::new(500.0, 500.0), r: 15.0 };
    let total = vec![ct, cs];
    let moving = vec![cs];
    let border = h.border;
    let pairs = PrecisionBackend.solve(&moving, &total, &border);
    let moving_ids = vec![spore_id];

    let eat_vel_init = h.cfg.thorn.eat_spore_vel_init;
    let zero_time = h.cfg.thorn.eat_spore_vel_zero_time;
    let mut ctx = h.ctx();
    resolve_tick(&mut ctx, &moving_ids, &pairs);

    assert!(h.spore.get(spore_id).is_none());
    let thorn = h.thorn.get_mut(thorn_id).unwrap();
    assert!((thorn.data.velocity.length() - eat_vel_init).abs() < 1e-3);
    assert!(thorn.data.velocity.normalize().dot(direction) > 0.99);

    for _ in 0..20 {
        thorn.integrate(zero_time / 20.0, &border);
    }
    assert!(thorn.data.velocity.length() <= 1e-2);
}

#[test]
fn s5_same_owner_cells_separate_before_recombine_age_then_fuse_after() {
    let mut h = Harness::new(1, 1);
    let pid = PlayerId(0);
    let team = TeamId(0);
    let a = h.ids.next();
    let b = h.ids.next();
    let mut ca = CloneBall::new(a, pid, team, Vec2::new(500.0, 500.0), 20.0);
    let mut cb = CloneBall::new(b, pid, team, Vec2::new(510.0, 500.0), 20.0);
    ca.age = 0.0;
    cb.age = 0.0;
    h.player.add_clone(ca);
    h.player.add_clone(cb);

    h.player.adjust(&h.cfg.player, &h.border);
    assert_eq!(h.player.clone_count_for(pid), 2);

    // Advance both cells' ages past `recombine_age` without moving them apart.
    for cell in h.player.all_clones_mut() {
        cell.age = h.cfg.player.recombine_age + 1.0;
    }
    h.player.adjust(&h.cfg.player, &h.border);
    assert_eq!(h.player.clone_count_for(pid), 1);
}

#[test]
fn s6_eject_wins_over_split_in_same_action_tick() {
    let mut cfg = Config::default();
    cfg.team_num = 1;
    cfg.player_num_per_team = 1;
    cfg.player.radius_init = 15.0;
    cfg.food.num_init = 0;
    cfg.food.num_min = 0;
    cfg.thorn.num_init = 0;
    cfg.thorn.num_min = 0;
    let mut server = Server::new(cfg).unwrap();
    server.seed(42);
    server.reset();
    let pid = server.player_ids()[0];

    let mut split_action = HashMap::new();
    split_action.insert(pid, Action::split(Vec2::X));
    server.apply_actions(&split_action).unwrap();
    let mut eject_action = HashMap::new();
    eject_action.insert(pid, Action::eject(Vec2::X));
    server.apply_actions(&eject_action).unwrap();

    let size_before = server.player_total_size(pid);
    let cells_before = server.player_cell_count(pid);
    server.step(None).unwrap();

    assert_eq!(server.player_cell_count(pid), cells_before);
    assert_eq!(server.spore_count(), 1);
    let spore_cfg_debit = arena_core::config::Config::default().spore.spore_radius_init.powi(2);
    assert!((server.player_total_size(pid) - (size_before - spore_cfg_debit)).abs() < 1e-2);
}

#[test]
fn apply_actions_rejects_unknown_player_without_staging() {
    let mut cfg = Config::default();
    cfg.team_num = 1;
    cfg.player_num_per_team = 1;
    let mut server = Server::new(cfg).unwrap();
    server.seed(42);
    server.reset();

    let mut actions = HashMap::new();
    actions.insert(PlayerId(999), Action::mv(Vec2::X));
    let err = server.apply_actions(&actions).unwrap_err();
    assert!(matches!(err, SimError::UnknownPlayer(_)));
}

#[test]
fn universal_invariants_hold_after_many_ticks() {
    let mut cfg = Config::default();
    cfg.team_num = 2;
    cfg.player_num_per_team = 2;
    cfg.food.num_init = 100;
    cfg.food.num_max = 120;
    cfg.thorn.num_init = 5;
    let mut server = Server::new(cfg.clone()).unwrap();
    server.seed(42);
    server.reset();

    for _ in 0..200 {
        server.step(None).unwrap();
    }

    for &pid in server.player_ids() {
        let count = server.player_cell_count(pid);
        assert!(count >= 1 && count <= cfg.player.part_num_max);
    }
}
