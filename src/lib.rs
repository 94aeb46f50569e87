//! Barrel Climb - A single-screen ladder climbing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, interactions, run state)
//! - `config`: Level layout and tunables
//! - `demo`: Seeded input pilot for headless runs

pub mod config;
pub mod demo;
pub mod sim;

pub use config::{ConfigError, LevelConfig, Physics, Sizes};
pub use demo::DemoPilot;

/// Game configuration constants
pub mod consts {
    /// Nominal simulation rate used for frame/second conversions
    pub const FRAMES_PER_SECOND: u32 = 60;

    /// Default frame budget for a run (~166 seconds)
    pub const DEFAULT_FRAME_BUDGET: u32 = 10_000;

    /// Player movement defaults
    pub const PLAYER_SPEED: f32 = 3.5;
    pub const PLAYER_CLIMB_SPEED: f32 = 2.0;
    /// Negative is up (screen space, y grows downward)
    pub const PLAYER_JUMP_VELOCITY: f32 = -5.0;
    pub const PLAYER_GRAVITY: f32 = 0.2;
    pub const PLAYER_MAX_FALL_SPEED: f32 = 10.0;

    /// Obstacles fall without a terminal speed
    pub const OBSTACLE_GRAVITY: f32 = 0.5;

    pub const GOAL_GRAVITY: f32 = 0.2;
    pub const GOAL_MAX_FALL_SPEED: f32 = 10.0;

    /// Player box used against ladders and platforms
    pub const PLAYER_WIDTH: f32 = 32.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    /// Player box used against obstacles, the powerup and the goal
    pub const PLAYER_HIT_HEIGHT: f32 = 32.0;

    pub const POWERUP_SIZE: f32 = 32.0;
    pub const OBSTACLE_WIDTH: f32 = 32.0;
    pub const OBSTACLE_HEIGHT: f32 = 32.0;
    pub const GOAL_WIDTH: f32 = 64.0;
    pub const GOAL_HEIGHT: f32 = 64.0;
    pub const LADDER_WIDTH: f32 = 40.0;
    pub const LADDER_HEIGHT: f32 = 180.0;
    pub const PLATFORM_WIDTH: f32 = 64.0;
    pub const PLATFORM_HEIGHT: f32 = 16.0;

    /// Probe offset below the player for grabbing a ladder from above
    pub const LADDER_PROBE_OFFSET: f32 = 5.0;

    /// Max horizontal center distance for an evasion credit
    pub const EVASION_PROXIMITY: f32 = 40.0;

    /// Points per scoring event
    pub const POINTS_PER_DESTROYED: u32 = 100;
    pub const POINTS_PER_EVADED: u32 = 30;
    pub const POINTS_PER_BONUS_SECOND: u32 = 3;
}

/// Whole seconds left in a frame budget (never negative)
#[inline]
pub fn remaining_seconds(frame_budget: u32, frame: u32) -> u32 {
    frame_budget.saturating_sub(frame) / consts::FRAMES_PER_SECOND
}
