//! Game state and core simulation types
//!
//! Everything one run needs lives in [`GameState`]: the immutable level,
//! the kinematic entities, the score ledger and the frame counter.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Size};
use super::geometry::Level;
use super::player::Player;
use super::score::ScoreLedger;
use crate::config::{LevelConfig, ObstacleSpawn};
use crate::remaining_seconds;

/// Top-level run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Title screen, waiting for start input
    Home,
    /// Active run
    Gameplay,
    /// Run ended; result shown until acknowledged
    GameOver,
}

/// Why a run was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossReason {
    HitObstacle,
    ReachedGoalUnarmed,
    TimeExpired,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost(LossReason),
}

impl Outcome {
    pub fn is_win(&self) -> bool {
        matches!(self, Outcome::Won)
    }
}

/// Things that happened during a tick, for audio/render/logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted,
    ObstacleEvaded { id: u32 },
    ObstacleDestroyed { id: u32 },
    PowerupCollected,
    RunEnded { outcome: Outcome, score: u32 },
    ReturnedHome,
    QuitRequested,
}

/// A falling hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    /// Rest height; never passed once reached
    pub stop_y: f32,
    pub falling: bool,
    pub vel_y: f32,
    pub gravity: f32,
    pub size: Size,
}

impl Obstacle {
    pub fn spawn(id: u32, spawn: &ObstacleSpawn, size: Size, gravity: f32) -> Self {
        let (y, falling) = match spawn.spawn_y {
            Some(y) => (y, true),
            None => (spawn.rest.y, false),
        };
        Self {
            id,
            pos: Vec2::new(spawn.rest.x, y),
            stop_y: spawn.rest.y,
            falling,
            vel_y: 0.0,
            gravity,
            size,
        }
    }

    /// Advance one frame; a settled obstacle is returned unchanged
    pub fn step(&self) -> Self {
        let mut next = self.clone();
        if !self.falling {
            return next;
        }

        next.vel_y = self.vel_y + self.gravity;
        let y = self.pos.y + next.vel_y;
        if y >= self.stop_y {
            next.pos = Vec2::new(self.pos.x, self.stop_y);
            next.vel_y = 0.0;
            next.falling = false;
        } else {
            next.pos = Vec2::new(self.pos.x, y);
        }
        next
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// The character waiting at the top of the level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub pos: Vec2,
    pub vel_y: f32,
    pub settling: bool,
    pub target_y: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub size: Size,
}

impl Goal {
    pub fn spawn(config: &LevelConfig) -> Self {
        Self {
            pos: Vec2::new(config.goal_rest.x, config.goal_spawn_y),
            vel_y: 0.0,
            settling: true,
            target_y: config.goal_rest.y,
            gravity: config.physics.goal_gravity,
            max_fall_speed: config.physics.goal_max_fall_speed,
            size: config.sizes.goal,
        }
    }

    /// Drop in toward the target height, then stay put for good
    pub fn step(&self) -> Self {
        let mut next = self.clone();
        if !self.settling {
            return next;
        }

        next.vel_y = (self.vel_y + self.gravity).min(self.max_fall_speed);
        let mut y = self.pos.y + next.vel_y;
        if y >= self.target_y {
            y = self.target_y;
            next.settling = false;
            next.vel_y = 0.0;
        }
        next.pos = Vec2::new(self.pos.x, y);
        next
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// The one-time pickup that turns lethal obstacle hits into destruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Powerup {
    pub pos: Vec2,
    pub size: Size,
    pub collected: bool,
}

impl Powerup {
    pub fn spawn(config: &LevelConfig) -> Self {
        Self {
            pos: config.powerup,
            size: config.sizes.powerup,
            collected: false,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: RunPhase,
    /// Gameplay frames elapsed in the current run
    pub frame: u32,
    pub config: LevelConfig,
    pub level: Level,
    pub player: Player,
    pub goal: Goal,
    pub powerup: Powerup,
    /// Active obstacles (sorted by id for determinism)
    pub obstacles: Vec<Obstacle>,
    pub ledger: ScoreLedger,
    /// Set when entering GameOver
    pub outcome: Option<Outcome>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Build the level and park on the Home screen
    pub fn new(config: LevelConfig) -> Self {
        let level = Level::from_config(&config);
        let mut state = Self {
            phase: RunPhase::Home,
            frame: 0,
            player: Player::spawn(&config),
            goal: Goal::spawn(&config),
            powerup: Powerup::spawn(&config),
            obstacles: Vec::new(),
            ledger: ScoreLedger::new(),
            outcome: None,
            level,
            config,
            next_id: 1,
        };
        state.spawn_obstacles();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn spawn_obstacles(&mut self) {
        self.obstacles.clear();
        let size = self.config.sizes.obstacle;
        let gravity = self.config.physics.obstacle_gravity;
        for i in 0..self.config.obstacles.len() {
            let spawn = self.config.obstacles[i];
            let id = self.next_entity_id();
            self.obstacles.push(Obstacle::spawn(id, &spawn, size, gravity));
        }
    }

    /// Full reset for a new run: clock, ledger and every entity
    pub fn reset_run(&mut self) {
        self.frame = 0;
        self.outcome = None;
        self.ledger.reset();
        self.player = Player::spawn(&self.config);
        self.goal = Goal::spawn(&self.config);
        self.powerup = Powerup::spawn(&self.config);
        self.spawn_obstacles();
    }

    /// Remove a destroyed obstacle.
    ///
    /// # Panics
    /// If `id` is not active; that means the resolver credited the same
    /// obstacle twice.
    pub fn destroy_obstacle(&mut self, id: u32) -> Obstacle {
        let index = self
            .obstacles
            .iter()
            .position(|o| o.id == id)
            .unwrap_or_else(|| panic!("obstacle {id} destroyed but not in the active set"));
        self.obstacles.remove(index)
    }

    /// Whole seconds left in the run's frame budget
    pub fn remaining_seconds(&self) -> u32 {
        remaining_seconds(self.config.frame_budget, self.frame)
    }

    /// Ensure obstacles are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.obstacles.sort_by_key(|o| o.id);
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            frame: self.frame,
            remaining_seconds: self.remaining_seconds(),
            player: PlayerView {
                pos: self.player.pos,
                facing_right: self.player.facing_right,
                has_powerup: self.player.has_powerup,
                climbing: self.player.climbing,
            },
            goal: self.goal.pos,
            powerup: (!self.powerup.collected).then_some(self.powerup.pos),
            obstacles: self
                .obstacles
                .iter()
                .map(|o| ObstacleView { id: o.id, pos: o.pos })
                .collect(),
            score: ScoreView {
                destroyed: self.ledger.obstacles_destroyed,
                evaded: self.ledger.obstacles_evaded,
                bonus_seconds: self.ledger.bonus_seconds,
                total: self.ledger.total(),
            },
            outcome: self.outcome,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub facing_right: bool,
    pub has_powerup: bool,
    pub climbing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleView {
    pub id: u32,
    pub pos: Vec2,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreView {
    pub destroyed: u32,
    pub evaded: u32,
    pub bonus_seconds: u32,
    pub total: u32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: RunPhase,
    pub frame: u32,
    pub remaining_seconds: u32,
    pub player: PlayerView,
    pub goal: Vec2,
    /// None once collected
    pub powerup: Option<Vec2>,
    pub obstacles: Vec<ObstacleView>,
    pub score: ScoreView,
    pub outcome: Option<Outcome>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dropping(rest: Vec2, spawn_y: f32, gravity: f32) -> Obstacle {
        Obstacle::spawn(1, &ObstacleSpawn::dropping(rest, spawn_y), Size::square(32.0), gravity)
    }

    #[test]
    fn test_obstacle_falls_into_place() {
        let mut obstacle = dropping(Vec2::new(300.0, 400.0), 300.0, 0.5);
        assert!(obstacle.falling);
        assert_eq!(obstacle.pos, Vec2::new(300.0, 300.0));

        for _ in 0..100 {
            obstacle = obstacle.step();
        }
        assert_eq!(obstacle.pos, Vec2::new(300.0, 400.0));
        assert!(!obstacle.falling);
        assert_eq!(obstacle.vel_y, 0.0);
    }

    #[test]
    fn test_resting_obstacle_never_moves() {
        let obstacle = Obstacle::spawn(
            2,
            &ObstacleSpawn::resting(Vec2::new(10.0, 20.0)),
            Size::square(32.0),
            0.5,
        );
        assert!(!obstacle.falling);
        assert_eq!(obstacle.step(), obstacle);
    }

    #[test]
    fn test_obstacle_spawned_below_rest_snaps_up() {
        let obstacle = dropping(Vec2::new(0.0, 100.0), 150.0, 0.5).step();
        assert_eq!(obstacle.pos.y, 100.0);
        assert!(!obstacle.falling);
    }

    #[test]
    fn test_goal_settles_and_stays() {
        let config = LevelConfig::default();
        let mut goal = Goal::spawn(&config);
        assert_eq!(goal.pos.y, config.goal_spawn_y);
        let mut frames = 0;
        while goal.settling {
            let next = goal.step();
            assert!(next.vel_y <= config.physics.goal_max_fall_speed);
            assert!(next.pos.y <= config.goal_rest.y);
            goal = next;
            frames += 1;
            assert!(frames < 1000);
        }
        assert_eq!(goal.pos, config.goal_rest);
        assert_eq!(goal.step(), goal);
    }

    #[test]
    fn test_reset_run_restores_entities() {
        let mut state = GameState::new(LevelConfig::default());
        let count = state.obstacles.len();
        let first_ids: Vec<u32> = state.obstacles.iter().map(|o| o.id).collect();

        let id = state.obstacles[0].id;
        state.destroy_obstacle(id);
        state.player.collect_powerup();
        state.powerup.collected = true;
        state.frame = 500;
        state.ledger.credit_destroyed();

        state.reset_run();
        assert_eq!(state.frame, 0);
        assert_eq!(state.obstacles.len(), count);
        assert!(!state.player.has_powerup);
        assert!(state.player.settling);
        assert!(!state.powerup.collected);
        assert_eq!(state.ledger.total(), 0);
        assert_eq!(
            state.obstacles.iter().filter(|o| o.falling).count(),
            2,
            "designated drop-ins fall again"
        );
        // Fresh identities each run
        assert!(state.obstacles.iter().all(|o| !first_ids.contains(&o.id)));
    }

    #[test]
    #[should_panic(expected = "not in the active set")]
    fn test_destroying_unknown_obstacle_panics() {
        let mut state = GameState::new(LevelConfig::default());
        state.destroy_obstacle(9_999);
    }

    #[test]
    fn test_snapshot_hides_collected_powerup() {
        let mut state = GameState::new(LevelConfig::default());
        assert!(state.snapshot().powerup.is_some());
        state.powerup.collected = true;
        let snapshot = state.snapshot();
        assert!(snapshot.powerup.is_none());
        assert_eq!(snapshot.phase, RunPhase::Home);
        assert_eq!(snapshot.obstacles.len(), state.obstacles.len());
        assert_eq!(snapshot.remaining_seconds, 166);
    }

    proptest! {
        #[test]
        fn obstacle_fall_is_monotone_and_never_overshoots(
            stop_y in 0.0f32..800.0,
            drop in 0.0f32..800.0,
            gravity in 0.05f32..5.0,
        ) {
            let mut obstacle = dropping(Vec2::new(0.0, stop_y), stop_y - drop, gravity);
            for _ in 0..2000 {
                let next = obstacle.step();
                prop_assert!(next.pos.y >= obstacle.pos.y);
                prop_assert!(next.pos.y <= stop_y);
                obstacle = next;
                if !obstacle.falling {
                    break;
                }
            }
            prop_assert!(!obstacle.falling);
            prop_assert_eq!(obstacle.pos.y, stop_y);

            // Settling is idempotent
            for _ in 0..10 {
                let next = obstacle.step();
                prop_assert_eq!(&next, &obstacle);
                obstacle = next;
            }
        }
    }
}
