//! The simulation driver: the fixed-step tick loop of spec §4.7, wired up
//! behind the public `Server` surface of spec §6.

use std::collections::{BTreeMap, HashMap};

use glam::Vec2;

use crate::action::{Action, ActionType, PendingAction};
use crate::collision::{Candidate, CollisionBackend, PrecisionBackend, SpatialBackend};
use crate::config::{CollisionDetectionType, Config};
use crate::entity::CloneBall;
use crate::error::{SimError, SimResult};
use crate::geometry::Border;
use crate::ids::{BallIdAllocator, PlayerId, TeamId};
use crate::managers::{FoodManager, PlayerManager, SporeManager, ThornManager};
use crate::rng::SimRng;
use crate::rules::{resolve_tick, RuleContext};
use crate::snapshot::{view_rect, BallView, GlobalView, PlayerView, Snapshot};

/// The deterministic simulation core. Owns every manager and the shared
/// id/RNG sources; advances via `step`, observed via `snapshot`.
pub struct Server {
    config: Config,
    border: Border,
    ids: BallIdAllocator,
    rng: SimRng,
    food: FoodManager,
    spore: SporeManager,
    thorn: ThornManager,
    player: PlayerManager,
    pending: HashMap<PlayerId, PendingAction>,
    last_time: f32,
}

impl Server {
    /// Construct a server from a validated configuration (spec §7
    /// `ConfigInvalid` is fatal and raised here, at construction).
    pub fn new(config: Config) -> SimResult<Self> {
        config.validate()?;
        let border = Border::new(config.map_width, config.map_height);
        let player = PlayerManager::new(config.team_num, config.player_num_per_team);
        Ok(Self {
            border,
            ids: BallIdAllocator::new(),
            rng: SimRng::default(),
            food: FoodManager::new(),
            spore: SporeManager::new(),
            thorn: ThornManager::new(),
            player,
            pending: HashMap::new(),
            last_time: 0.0,
            config,
        })
    }

    /// Reseed the RNG. Call before `reset()` to get a reproducible match.
    pub fn seed(&mut self, seed: u64) {
        self.rng.reseed(seed);
    }

    /// Clear all state and repopulate: managers to `num_init`, players at
    /// `radius_init` (spec §6 `reset()`).
    pub fn reset(&mut self) {
        self.ids.reset();
        self.pending.clear();
        self.last_time = 0.0;
        self.food.init(&self.config.food, &self.border, &mut self.rng, &self.ids);
        self.thorn.init(&self.config.thorn, &self.border, &mut self.rng, &self.ids);
        self.spore.init();
        self.player.spawn_all(&self.config.player, &self.border, &mut self.rng, &self.ids);
    }

    pub fn player_ids(&self) -> &[PlayerId] {
        self.player.player_ids()
    }

    pub fn team_ids(&self) -> &[TeamId] {
        self.player.team_ids()
    }

    /// Number of cells currently owned by `pid` (0 if unknown).
    pub fn player_cell_count(&self, pid: PlayerId) -> usize {
        self.player.clone_count_for(pid)
    }

    /// Sum of cell sizes currently owned by `pid` (0 if unknown).
    pub fn player_total_size(&self, pid: PlayerId) -> f32 {
        self.player
            .player(pid)
            .map(|p| p.total_size(self.player.clones_map()))
            .unwrap_or(0.0)
    }

    pub fn food_count(&self) -> usize {
        self.food.len()
    }

    pub fn spore_count(&self) -> usize {
        self.spore.len()
    }

    pub fn thorn_count(&self) -> usize {
        self.thorn.len()
    }

    /// Stage actions for the next action-tick (spec §6 `apply_actions`).
    /// Rejects the whole batch if any player id is unknown (spec §7
    /// `UnknownPlayer`) without staging any of it. A non-finite direction on
    /// an individual action is downgraded to `stop` for that player and
    /// surfaced as a `SimError::BadAction` in the returned list rather than
    /// failing the whole batch (spec §7 "action-level errors are recoverable
    /// per-player").
    pub fn apply_actions(&mut self, actions: &HashMap<PlayerId, Action>) -> SimResult<Vec<SimError>> {
        for pid in actions.keys() {
            if self.player.player(*pid).is_none() {
                return Err(SimError::UnknownPlayer(*pid));
            }
        }
        let mut bad_actions = Vec::new();
        for (pid, action) in actions {
            let mut action = *action;
            let checks_direction = matches!(
                action.action_type,
                ActionType::Move | ActionType::Split | ActionType::Eject
            );
            if checks_direction {
                if let Some(d) = action.direction {
                    if !d.is_finite() {
                        let err = SimError::BadAction(*pid, "non-finite action direction".into());
                        tracing::warn!(player = pid.0, "{err}, treating as stop");
                        bad_actions.push(err);
                        action = Action::stop();
                    }
                }
            }
            self.pending.entry(*pid).or_default().accumulate(&action);
        }
        Ok(bad_actions)
    }

    /// Advance one action-tick: `ticks_per_action` state-ticks, with staged
    /// actions consumed on the first (spec §4.7, §6 `step`).
    pub fn step(&mut self, actions: Option<&HashMap<PlayerId, Action>>) -> SimResult<bool> {
        if let Some(actions) = actions {
            self.apply_actions(actions)?;
        }
        self.step_state_tick(true);
        for _ in 1..self.config.ticks_per_action() {
            self.step_state_tick(false);
        }
        Ok(self.last_time >= self.config.match_time)
    }

    fn step_state_tick(&mut self, consume_actions: bool) {
        let dt = self.config.state_dt();

        if consume_actions {
            self.apply_pending_to_players();
        }

        for clone in self.player.all_clones_mut() {
            clone.integrate(&self.config.player, dt, &self.border);
        }
        for spore in self.spore.all_mut() {
            spore.integrate(dt, &self.border);
        }
        for thorn in self.thorn.all_mut() {
            thorn.integrate(dt, &self.border);
        }

        self.player.adjust(&self.config.player, &self.border);

        self.resolve_collisions();

        self.food.step(&self.config.food, dt, &self.border, &mut self.rng, &self.ids);
        self.thorn.step(&self.config.thorn, dt, &self.border, &mut self.rng, &self.ids);
        self.spore.step(dt);
        self.player.respawn_empty(&self.config.player, &self.border, &mut self.rng, &self.ids);

        self.last_time += dt;
    }

    /// Build `moving`/`total` (spec §4.7 step 4), run the selected collision
    /// backend, and hand the pair list to the rules engine.
    fn resolve_collisions(&mut self) {
        let mut moving: Vec<Candidate> = Vec::new();
        for c in self.player.all_clones() {
            moving.push(Candidate { id: c.data.id, position: c.data.position, r: c.data.r });
        }
        for t in self.thorn.all().filter(|t| t.data.moving) {
            moving.push(Candidate { id: t.data.id, position: t.data.position, r: t.data.r });
        }
        for s in self.spore.all().filter(|s| s.data.moving) {
            moving.push(Candidate { id: s.data.id, position: s.data.position, r: s.data.r });
        }
        // Size-descending (size = r^2 is monotone in r, so sorting by r is
        // equivalent), ties broken by stable identity (spec §9 "Ordering").
        moving.sort_by(|a, b| b.r.partial_cmp(&a.r).unwrap_or(std::cmp::Ordering::Equal).then(a.id.0.cmp(&b.id.0)));

        let mut total: Vec<Candidate> = Vec::new();
        for f in self.food.all() {
            total.push(Candidate { id: f.data.id, position: f.data.position, r: f.data.r });
        }
        for s in self.spore.all() {
            total.push(Candidate { id: s.data.id, position: s.data.position, r: s.data.r });
        }
        for t in self.thorn.all() {
            total.push(Candidate { id: t.data.id, position: t.data.position, r: t.data.r });
        }
        for c in self.player.all_clones() {
            total.push(Candidate { id: c.data.id, position: c.data.position, r: c.data.r });
        }

        let pairs = match self.config.collision_detection_type {
            CollisionDetectionType::Precision => PrecisionBackend.solve(&moving, &total, &self.border),
            CollisionDetectionType::Spatial => SpatialBackend.solve(&moving, &total, &self.border),
        };
        let moving_ids: Vec<_> = moving.iter().map(|c| c.id).collect();

        let mut ctx = RuleContext {
            food: &mut self.food,
            spore: &mut self.spore,
            thorn: &mut self.thorn,
            player: &mut self.player,
            cfg: &self.config,
            rng: &mut self.rng,
            ids: &self.ids,
            border: &self.border,
        };
        resolve_tick(&mut ctx, &moving_ids, &pairs);
    }

    /// Consume this tick's staged actions and apply them per-player (spec
    /// §4.5): move sets input direction, stop begins deceleration, split and
    /// eject mutate owned cells directly.
    fn apply_pending_to_players(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        // Deterministic order: `HashMap` iteration order depends on the
        // instance, so two players staging splits/ejects in the same
        // action-tick would otherwise race for `ids.next()` values and
        // desync the same seed + action stream across runs (spec §8
        // property 6).
        let mut pids: Vec<PlayerId> = pending.keys().copied().collect();
        pids.sort_by_key(|pid| pid.0);
        for pid in pids {
            let pend = pending[&pid];
            match pend.resolve() {
                ActionType::Move => {
                    if let Some(dir) = pend.direction {
                        let cell_ids = self.player.player(pid).map(|p| p.cells.clone()).unwrap_or_default();
                        for id in cell_ids {
                            if let Some(c) = self.player.clone_ball_mut(id) {
                                c.set_move(dir);
                            }
                        }
                    }
                    // `direction == None` means "continue previous direction": no-op.
                }
                ActionType::Stop => {
                    let stop_zero_time = self.config.player.stop_zero_time;
                    let cell_ids = self.player.player(pid).map(|p| p.cells.clone()).unwrap_or_default();
                    for id in cell_ids {
                        if let Some(c) = self.player.clone_ball_mut(id) {
                            c.set_stop(stop_zero_time);
                        }
                    }
                }
                ActionType::Split => {
                    let dir = unit_or(pend.direction, Vec2::X);
                    self.split_player(pid, dir);
                }
                ActionType::Eject => {
                    let dir = unit_or(pend.direction, Vec2::X);
                    self.eject_player(pid, dir);
                }
            }
        }
    }

    /// Split every owned cell with `r >= split_radius_min` into two halves
    /// (spec §4.5 `split`), bounded by `part_num_max`.
    fn split_player(&mut self, pid: PlayerId, dir: Vec2) {
        let cfg = self.config.player.clone();
        let cell_ids = self.player.player(pid).map(|p| p.cells.clone()).unwrap_or_default();
        for id in cell_ids {
            if self.player.clone_count_for(pid) >= cfg.part_num_max {
                break;
            }
            let Some((position, r, s, owner, team)) = self
                .player
                .clone_ball(id)
                .map(|c| (c.data.position, c.data.r, c.data.s, c.owner, c.team))
            else {
                continue;
            };
            if r < cfg.split_radius_min {
                continue;
            }

            let half = s / 2.0;
            if let Some(cell) = self.player.clone_ball_mut(id) {
                cell.data.set_size(half);
                cell.age = 0.0;
                cell.set_split_boost(dir, cfg.split_vel_init, cfg.split_vel_zero_time);
            }

            let child_r = half.sqrt();
            let spawn_pos = self.border.clamp_disc(position + dir * child_r, child_r);
            let mut child = CloneBall::new(self.ids.next(), owner, team, spawn_pos, child_r);
            child.set_split_boost(dir, cfg.split_vel_init, cfg.split_vel_zero_time);
            self.player.add_clone(child);
        }
    }

    /// Eject a spore from every owned cell with `r >= eject_radius_min`
    /// (spec §4.5 `eject`).
    fn eject_player(&mut self, pid: PlayerId, dir: Vec2) {
        let player_cfg = self.config.player.clone();
        let spore_cfg = self.config.spore.clone();
        let cell_ids = self.player.player(pid).map(|p| p.cells.clone()).unwrap_or_default();
        for id in cell_ids {
            let Some((position, r)) = self.player.clone_ball(id).map(|c| (c.data.position, c.data.r)) else {
                continue;
            };
            if r < player_cfg.eject_radius_min {
                continue;
            }

            let debit = spore_cfg.spore_radius_init * spore_cfg.spore_radius_init;
            let min_size = player_cfg.radius_min * player_cfg.radius_min;
            if let Some(cell) = self.player.clone_ball_mut(id) {
                let new_size = (cell.data.s - debit).max(min_size);
                cell.data.set_size(new_size);
            }

            let rim = position + dir * r;
            self.spore.eject_from(&spore_cfg, &self.ids, rim, dir);
        }
    }

    /// Render a read-only view of the world (spec §6 `snapshot()`).
    pub fn snapshot(&self) -> Snapshot {
        let leaderboard: BTreeMap<TeamId, f32> = self
            .team_ids()
            .iter()
            .map(|&tid| {
                let size = self
                    .player
                    .team(tid)
                    .map(|team| {
                        team.players
                            .iter()
                            .filter_map(|pid| self.player.player(*pid))
                            .map(|p| p.total_size(self.player.clones_map()))
                            .sum()
                    })
                    .unwrap_or(0.0);
                (tid, size)
            })
            .collect();

        let global = GlobalView {
            border: [self.border.width(), self.border.height()],
            total_time: self.config.match_time,
            last_time: self.last_time,
            leaderboard,
        };

        let all_balls: Vec<BallView> = self.all_ball_views();

        let per_player: BTreeMap<PlayerId, PlayerView> = self
            .player_ids()
            .iter()
            .map(|&pid| {
                let cells: Vec<&CloneBall> = self
                    .player
                    .player(pid)
                    .map(|p| p.cells.iter().filter_map(|id| self.player.clone_ball(*id)).collect())
                    .unwrap_or_default();
                let total_size: f32 = cells.iter().map(|c| c.data.s).sum();
                let center = if cells.is_empty() {
                    Vec2::new(self.border.width() / 2.0, self.border.height() / 2.0)
                } else {
                    cells.iter().map(|c| c.data.position).sum::<Vec2>() / cells.len() as f32
                };
                let rect = view_rect(center, total_size, self.border.width(), self.border.height());
                let balls = all_balls
                    .iter()
                    .copied()
                    .filter(|b| crate::snapshot::rect_contains(rect, b.position))
                    .collect();
                (pid, PlayerView { player_id: pid, rect, balls })
            })
            .collect();

        Snapshot { global, per_player }
    }

    fn all_ball_views(&self) -> Vec<BallView> {
        let mut out = Vec::new();
        for f in self.food.all() {
            out.push(BallView {
                id: f.data.id,
                kind: crate::entity::BallKind::Food,
                owner: None,
                team: None,
                position: f.data.position,
                r: f.data.r,
                velocity: f.data.velocity,
            });
        }
        for s in self.spore.all() {
            out.push(BallView {
                id: s.data.id,
                kind: crate::entity::BallKind::Spore,
                owner: None,
                team: None,
                position: s.data.position,
                r: s.data.r,
                velocity: s.data.velocity,
            });
        }
        for t in self.thorn.all() {
            out.push(BallView {
                id: t.data.id,
                kind: crate::entity::BallKind::Thorn,
                owner: None,
                team: None,
                position: t.data.position,
                r: t.data.r,
                velocity: t.data.velocity,
            });
        }
        for c in self.player.all_clones() {
            out.push(BallView {
                id: c.data.id,
                kind: crate::entity::BallKind::Clone,
                owner: Some(c.owner),
                team: Some(c.team),
                position: c.data.position,
                r: c.data.r,
                velocity: c.data.velocity,
            });
        }
        // Manager storage is a `HashMap`; fix the order here so every
        // `PlayerView.balls` slice built from this comes out identical for
        // identical state (spec §8 property 6).
        out.sort_by_key(|b| b.id.0);
        out
    }
}

fn unit_or(direction: Option<Vec2>, fallback: Vec2) -> Vec2 {
    match direction {
        Some(d) if d != Vec2::ZERO && d.is_finite() => d.normalize(),
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn harness() -> Server {
        let mut cfg = Config::default();
        cfg.team_num = 1;
        cfg.player_num_per_team = 2;
        cfg.food.num_init = 50;
        cfg.food.num_max = 60;
        cfg.thorn.num_init = 4;
        let mut server = Server::new(cfg).unwrap();
        server.seed(42);
        server.reset();
        server
    }

    #[test]
    fn reset_populates_every_player() {
        let server = harness();
        for &pid in server.player_ids() {
            assert_eq!(server.player.clone_count_for(pid), 1);
        }
    }

    #[test]
    fn step_advances_clock_and_stays_in_bounds() {
        let mut server = harness();
        for _ in 0..40 {
            server.step(None).unwrap();
        }
        assert!(server.last_time > 0.0);
        for c in server.player.all_clones() {
            assert!(server.border.contains_disc(c.data.position, c.data.r));
        }
    }

    #[test]
    fn apply_actions_rejects_unknown_player() {
        let mut server = harness();
        let mut actions = HashMap::new();
        actions.insert(PlayerId(9999), Action::mv(Vec2::X));
        assert!(matches!(server.apply_actions(&actions), Err(SimError::UnknownPlayer(_))));
    }

    #[test]
    fn apply_actions_downgrades_non_finite_direction_to_stop() {
        let mut server = harness();
        let pid = server.player_ids()[0];
        let mut actions = HashMap::new();
        actions.insert(pid, Action::mv(Vec2::new(f32::NAN, 0.0)));
        let bad = server.apply_actions(&actions).unwrap();
        assert!(matches!(bad.as_slice(), [SimError::BadAction(p, _)] if *p == pid));
    }

    #[test]
    fn eject_then_split_in_same_tick_prefers_eject() {
        let mut server = harness();
        let pid = server.player_ids()[0];
        let mut actions = HashMap::new();
        actions.insert(pid, Action::split(Vec2::X));
        server.apply_actions(&actions).unwrap();
        let mut actions2 = HashMap::new();
        actions2.insert(pid, Action::eject(Vec2::X));
        server.apply_actions(&actions2).unwrap();

        let cells_before = server.player.clone_count_for(pid);
        server.step(None).unwrap();
        let cells_after = server.player.clone_count_for(pid);
        assert_eq!(cells_before, cells_after);
        assert_eq!(server.spore.len(), 1);
    }
}
