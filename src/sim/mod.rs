//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick = one frame)
//! - Stable iteration order (by entity ID, then configuration order)
//! - No rendering, input polling or file I/O

pub mod collision;
pub mod geometry;
pub mod player;
pub mod score;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Size, intersects};
pub use geometry::{Ladder, Level, Platform, StaticGeometry};
pub use player::Player;
pub use score::ScoreLedger;
pub use state::{
    GameEvent, GameState, Goal, LossReason, Obstacle, ObstacleView, Outcome, PlayerView, Powerup,
    RunPhase, ScoreView, Snapshot,
};
pub use tick::{Action, Direction, TickInput, resolve_interactions, tick};
