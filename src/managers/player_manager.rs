//! Owns every clone and aggregates players/teams into them (spec §3 P,
//! §4.2 `PlayerManager`).

use std::collections::HashMap;

use glam::Vec2;

use crate::config::PlayerConfig;
use crate::entity::CloneBall;
use crate::geometry::Border;
use crate::ids::{BallId, BallIdAllocator, PlayerId, TeamId};

/// A player owns an ordered set of clone cells. Team membership is fixed at
/// creation.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub team: TeamId,
    pub cells: Vec<BallId>,
}

impl Player {
    /// Total size across every owned cell.
    pub fn total_size(&self, clones: &HashMap<BallId, CloneBall>) -> f32 {
        self.cells.iter().filter_map(|id| clones.get(id)).map(|c| c.data.s).sum()
    }
}

/// A fixed set of players. Score is the sum of its players' total sizes.
#[derive(Debug, Clone)]
pub struct Team {
    pub id: TeamId,
    pub players: Vec<PlayerId>,
}

#[derive(Debug)]
pub struct PlayerManager {
    clones: HashMap<BallId, CloneBall>,
    players: HashMap<PlayerId, Player>,
    teams: HashMap<TeamId, Team>,
    player_order: Vec<PlayerId>,
    team_order: Vec<TeamId>,
}

impl PlayerManager {
    /// Create the fixed player/team roster. Membership never changes after
    /// this (spec §3 "Team membership fixed at creation").
    pub fn new(team_num: u32, player_num_per_team: u32) -> Self {
        let mut players = HashMap::new();
        let mut teams = HashMap::new();
        let mut player_order = Vec::new();
        let mut team_order = Vec::new();
        let mut next_player = 0u32;
        for t in 0..team_num {
            let team_id = TeamId(t);
            let mut roster = Vec::new();
            for _ in 0..player_num_per_team {
                let pid = PlayerId(next_player);
                next_player += 1;
                players.insert(pid, Player { id: pid, team: team_id, cells: Vec::new() });
                player_order.push(pid);
                roster.push(pid);
            }
            teams.insert(team_id, Team { id: team_id, players: roster });
            team_order.push(team_id);
        }
        Self { clones: HashMap::new(), players, teams, player_order, team_order }
    }

    pub fn player_ids(&self) -> &[PlayerId] {
        &self.player_order
    }

    pub fn team_ids(&self) -> &[TeamId] {
        &self.team_order
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(&id)
    }

    pub fn clone_ball(&self, id: BallId) -> Option<&CloneBall> {
        self.clones.get(&id)
    }

    pub fn clone_ball_mut(&mut self, id: BallId) -> Option<&mut CloneBall> {
        self.clones.get_mut(&id)
    }

    pub fn all_clones(&self) -> impl Iterator<Item = &CloneBall> {
        self.clones.values()
    }

    /// Raw backing store, for aggregation helpers like `Player::total_size`.
    pub fn clones_map(&self) -> &HashMap<BallId, CloneBall> {
        &self.clones
    }

    pub fn all_clones_mut(&mut self) -> impl Iterator<Item = &mut CloneBall> {
        self.clones.values_mut()
    }

    /// Number of cells the owner of `cell` currently has (spec §4.2).
    pub fn clone_count(&self, cell: BallId) -> usize {
        self.clones
            .get(&cell)
            .and_then(|c| self.players.get(&c.owner))
            .map(|p| p.cells.len())
            .unwrap_or(0)
    }

    pub fn clone_count_for(&self, owner: PlayerId) -> usize {
        self.players.get(&owner).map(|p| p.cells.len()).unwrap_or(0)
    }

    /// Insert a clone cell, registering it with its owner.
    pub fn add_clone(&mut self, cell: CloneBall) {
        let owner = cell.owner;
        let id = cell.data.id;
        self.clones.insert(id, cell);
        if let Some(player) = self.players.get_mut(&owner) {
            player.cells.push(id);
        }
    }

    /// Remove a clone cell from both the store and its owner's cell list.
    pub fn remove_clone(&mut self, id: BallId) -> Option<CloneBall> {
        let removed = self.clones.remove(&id);
        if let Some(cell) = &removed {
            if let Some(player) = self.players.get_mut(&cell.owner) {
                player.cells.retain(|c| *c != id);
            }
        }
        removed
    }

    /// Spawn every player at `radius_init` at a random valid position (used
    /// by `init()`/`reset()`).
    pub fn spawn_all(&mut self, cfg: &PlayerConfig, border: &Border, rng: &mut crate::rng::SimRng, ids: &BallIdAllocator) {
        self.clones.clear();
        for player in self.players.values_mut() {
            player.cells.clear();
        }
        let player_ids: Vec<PlayerId> = self.player_order.clone();
        for pid in player_ids {
            let team = self.players.get(&pid).unwrap().team;
            let position = border.sample(rng);
            let cell = CloneBall::new(ids.next(), pid, team, position, cfg.radius_init);
            self.add_clone(cell);
        }
    }

    /// Respawn any player with zero cells as one new cell (spec §3
    /// lifecycle: "when a player has zero cells it is immediately
    /// respawned as one new cell").
    pub fn respawn_empty(&mut self, cfg: &PlayerConfig, border: &Border, rng: &mut crate::rng::SimRng, ids: &BallIdAllocator) {
        let empties: Vec<PlayerId> = self
            .player_order
            .iter()
            .copied()
            .filter(|pid| self.players.get(pid).map(|p| p.cells.is_empty()).unwrap_or(false))
            .collect();
        for pid in empties {
            let team = self.players.get(&pid).unwrap().team;
            let position = border.sample(rng);
            let cell = CloneBall::new(ids.next(), pid, team, position, cfg.radius_init);
            tracing::debug!(player = pid.0, "respawned with zero cells");
            self.add_clone(cell);
        }
    }

    /// Rigid-body separation (for cells younger than `recombine_age`) and
    /// same-owner fusion (for cells at or past `recombine_age` that
    /// overlap), run once per tick after kinematics and before collision
    /// detection (spec §4.2 `adjust()`).
    pub fn adjust(&mut self, cfg: &PlayerConfig, border: &Border) {
        let player_ids: Vec<PlayerId> = self.player_order.clone();
        for pid in player_ids {
            let cell_ids = match self.players.get(&pid) {
                Some(p) if p.cells.len() >= 2 => p.cells.clone(),
                _ => continue,
            };

            let mut cells: Vec<CloneBall> =
                cell_ids.iter().filter_map(|id| self.clones.remove(id)).collect();

            loop {
                let mut fused = false;
                'pairs: for i in 0..cells.len() {
                    for j in (i + 1)..cells.len() {
                        let delta = cells[j].data.position - cells[i].data.position;
                        let dist = delta.length();
                        let overlap = (cells[i].data.r + cells[j].data.r) - dist;
                        if overlap <= 0.0 {
                            continue;
                        }

                        let can_fuse =
                            cells[i].age >= cfg.recombine_age && cells[j].age >= cfg.recombine_age;
                        if can_fuse {
                            let (keep, drop) = if cells[i].data.s >= cells[j].data.s {
                                (i, j)
                            } else {
                                (j, i)
                            };
                            let drop_size = cells[drop].data.s;
                            cells[keep].data.ingest(drop_size);
                            cells.remove(drop);
                            fused = true;
                            break 'pairs;
                        }

                        let push_dir = if dist > 1e-6 { delta / dist } else { Vec2::X };
                        let correction = push_dir * (overlap / 2.0);
                        cells[i].data.position -= correction;
                        cells[j].data.position += correction;
                        cells[i].data.position =
                            border.clamp_disc(cells[i].data.position, cells[i].data.r);
                        cells[j].data.position =
                            border.clamp_disc(cells[j].data.position, cells[j].data.r);
                    }
                }
                if !fused {
                    break;
                }
            }

            let remaining_ids: Vec<BallId> = cells.iter().map(|c| c.data.id).collect();
            for cell in cells {
                self.clones.insert(cell.data.id, cell);
            }
            if let Some(player) = self.players.get_mut(&pid) {
                player.cells = remaining_ids;
            }
        }
    }
}
