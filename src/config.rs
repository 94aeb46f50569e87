//! Level layout and tunables
//!
//! The simulation treats [`LevelConfig`] as already parsed and well formed.
//! This module is where raw text becomes a config: either the flat
//! `key=value` properties format or JSON. Bad scalars fall back to their
//! defaults, bad coordinate pairs are rejected.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::collision::Size;

/// Obstacles (1-based config index) that drop in from above on run start,
/// with their spawn heights, when the properties file names none.
pub const DEFAULT_DROP_INS: [(usize, f32); 2] = [(3, 300.0), (4, 250.0)];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read level config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid level JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("`{key}` must be an `x,y` pair, got `{value}`")]
    MalformedPair { key: String, value: String },
    #[error("`{key}` is invalid: {reason}")]
    Invalid {
        key: &'static str,
        reason: &'static str,
    },
}

/// Fixed pixel sizes for every entity kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sizes {
    /// Box used against ladders and platforms
    pub player: Size,
    /// Box used against obstacles, the powerup and the goal
    pub player_hit: Size,
    pub obstacle: Size,
    pub goal: Size,
    pub powerup: Size,
    pub ladder: Size,
    pub platform: Size,
}

impl Default for Sizes {
    fn default() -> Self {
        Self {
            player: Size::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            player_hit: Size::new(PLAYER_WIDTH, PLAYER_HIT_HEIGHT),
            obstacle: Size::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT),
            goal: Size::new(GOAL_WIDTH, GOAL_HEIGHT),
            powerup: Size::square(POWERUP_SIZE),
            ladder: Size::new(LADDER_WIDTH, LADDER_HEIGHT),
            platform: Size::new(PLATFORM_WIDTH, PLATFORM_HEIGHT),
        }
    }
}

/// Kinematic tunables, all per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Physics {
    pub player_speed: f32,
    pub player_climb_speed: f32,
    pub player_jump_velocity: f32,
    pub player_gravity: f32,
    pub player_max_fall_speed: f32,
    pub obstacle_gravity: f32,
    pub goal_gravity: f32,
    pub goal_max_fall_speed: f32,
    /// Max horizontal center distance for an evasion credit
    pub evasion_proximity: f32,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            player_speed: PLAYER_SPEED,
            player_climb_speed: PLAYER_CLIMB_SPEED,
            player_jump_velocity: PLAYER_JUMP_VELOCITY,
            player_gravity: PLAYER_GRAVITY,
            player_max_fall_speed: PLAYER_MAX_FALL_SPEED,
            obstacle_gravity: OBSTACLE_GRAVITY,
            goal_gravity: GOAL_GRAVITY,
            goal_max_fall_speed: GOAL_MAX_FALL_SPEED,
            evasion_proximity: EVASION_PROXIMITY,
        }
    }
}

/// Where an obstacle rests, and where it drops in from (if it does)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpawn {
    pub rest: Vec2,
    #[serde(default)]
    pub spawn_y: Option<f32>,
}

impl ObstacleSpawn {
    pub const fn resting(rest: Vec2) -> Self {
        Self {
            rest,
            spawn_y: None,
        }
    }

    pub const fn dropping(rest: Vec2, spawn_y: f32) -> Self {
        Self {
            rest,
            spawn_y: Some(spawn_y),
        }
    }
}

/// Complete level description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Frames allotted to a run before it is lost
    pub frame_budget: u32,
    /// Where the player comes to rest after dropping in
    pub player_start: Vec2,
    /// Height the player drops in from
    pub player_spawn_y: f32,
    pub goal_rest: Vec2,
    pub goal_spawn_y: f32,
    pub powerup: Vec2,
    pub obstacles: Vec<ObstacleSpawn>,
    pub ladders: Vec<Vec2>,
    pub platforms: Vec<Vec2>,
    pub sizes: Sizes,
    pub physics: Physics,
}

impl Default for LevelConfig {
    /// The stock four-tier level
    fn default() -> Self {
        let row = |y: f32, from: f32, to: f32| {
            let mut x = from;
            let mut out = Vec::new();
            while x < to {
                out.push(Vec2::new(x, y));
                x += PLATFORM_WIDTH;
            }
            out
        };
        let mut platforms = row(740.0, 0.0, 1024.0);
        platforms.extend(row(560.0, 128.0, 960.0));
        platforms.extend(row(380.0, 0.0, 832.0));
        platforms.extend(row(214.0, 0.0, 448.0));

        Self {
            frame_budget: DEFAULT_FRAME_BUDGET,
            player_start: Vec2::new(100.0, 700.0),
            player_spawn_y: 600.0,
            goal_rest: Vec2::new(100.0, 150.0),
            goal_spawn_y: 0.0,
            powerup: Vec2::new(650.0, 450.0),
            obstacles: vec![
                ObstacleSpawn::resting(Vec2::new(500.0, 708.0)),
                ObstacleSpawn::resting(Vec2::new(300.0, 528.0)),
                ObstacleSpawn::dropping(Vec2::new(700.0, 528.0), 300.0),
                ObstacleSpawn::dropping(Vec2::new(450.0, 348.0), 250.0),
                ObstacleSpawn::resting(Vec2::new(560.0, 348.0)),
                ObstacleSpawn::resting(Vec2::new(250.0, 182.0)),
            ],
            ladders: vec![
                Vec2::new(900.0, 560.0),
                Vec2::new(160.0, 380.0),
                Vec2::new(320.0, 200.0),
            ],
            platforms,
            sizes: Sizes::default(),
            physics: Physics::default(),
        }
    }
}

impl LevelConfig {
    /// Load from a file: `.json` is JSON, anything else is properties text
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&text)?,
            _ => Self::from_properties(&text)?,
        };
        config.validate()?;
        log::info!(
            "Loaded level {}: {} platforms, {} ladders, {} obstacles",
            path.display(),
            config.platforms.len(),
            config.ladders.len(),
            config.obstacles.len()
        );
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse the flat `key=value` level format.
    ///
    /// Collections start empty: a level with no `barrel.count` has no
    /// obstacles. Scalars missing or unparseable keep their defaults.
    pub fn from_properties(text: &str) -> Result<Self, ConfigError> {
        let props = Properties::parse(text);
        let defaults = Self::default();

        let mut config = Self {
            frame_budget: props.u32_or("gamePlay.maxFrames", defaults.frame_budget),
            player_start: Vec2::new(
                props.f32_or("mario.start.x", defaults.player_start.x),
                props.f32_or("mario.start.y", defaults.player_start.y),
            ),
            player_spawn_y: props.f32_or("mario.spawn.y", defaults.player_spawn_y),
            goal_rest: Vec2::new(
                props.f32_or("donkey.x", defaults.goal_rest.x),
                props.f32_or("donkey.y", defaults.goal_rest.y),
            ),
            goal_spawn_y: props.f32_or("donkey.spawn.y", defaults.goal_spawn_y),
            powerup: Vec2::new(
                props.f32_or("hammer.x", defaults.powerup.x),
                props.f32_or("hammer.y", defaults.powerup.y),
            ),
            obstacles: Vec::new(),
            ladders: Vec::new(),
            platforms: Vec::new(),
            sizes: defaults.sizes,
            physics: defaults.physics,
        };

        for i in props.indices("barrel", props.u32_or("barrel.count", 0)) {
            let key = format!("barrel.{i}");
            let Some(rest) = props.pair(&key)? else {
                continue;
            };
            let spawn_y = props.f32(&format!("{key}.startY")).or_else(|| {
                DEFAULT_DROP_INS
                    .iter()
                    .find(|(index, _)| *index == i)
                    .map(|&(_, y)| y)
            });
            config.obstacles.push(ObstacleSpawn { rest, spawn_y });
        }

        for i in props.indices("ladder", props.u32_or("ladder.count", 0)) {
            if let Some(pos) = props.pair(&format!("ladder.{i}"))? {
                config.ladders.push(pos);
            }
        }

        if let Some(list) = props.get("platforms") {
            for part in list.split(';').map(str::trim).filter(|p| !p.is_empty()) {
                config.platforms.push(parse_pair("platforms", part)?);
            }
        }

        for (key, slot) in [
            ("platform.size", &mut config.sizes.platform),
            ("ladder.size", &mut config.sizes.ladder),
            ("barrel.size", &mut config.sizes.obstacle),
            ("donkey.size", &mut config.sizes.goal),
        ] {
            if let Some(size) = props.pair(key)? {
                *slot = Size::new(size.x, size.y);
            }
        }

        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_budget == 0 {
            return Err(ConfigError::Invalid {
                key: "frame_budget",
                reason: "must be at least one frame",
            });
        }

        let sizes = [
            ("sizes.player", self.sizes.player),
            ("sizes.player_hit", self.sizes.player_hit),
            ("sizes.obstacle", self.sizes.obstacle),
            ("sizes.goal", self.sizes.goal),
            ("sizes.powerup", self.sizes.powerup),
            ("sizes.ladder", self.sizes.ladder),
            ("sizes.platform", self.sizes.platform),
        ];
        for (key, size) in sizes {
            if !(size.width > 0.0 && size.height > 0.0) {
                return Err(ConfigError::Invalid {
                    key,
                    reason: "width and height must be positive",
                });
            }
        }

        let rates = [
            ("physics.player_gravity", self.physics.player_gravity),
            ("physics.player_max_fall_speed", self.physics.player_max_fall_speed),
            ("physics.obstacle_gravity", self.physics.obstacle_gravity),
            ("physics.goal_gravity", self.physics.goal_gravity),
            ("physics.goal_max_fall_speed", self.physics.goal_max_fall_speed),
        ];
        for (key, value) in rates {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid {
                    key,
                    reason: "must be positive",
                });
            }
        }

        Ok(())
    }
}

/// Flat `key=value` text, `#`/`!` comments
struct Properties(HashMap<String, String>);

impl Properties {
    fn parse(text: &str) -> Self {
        let map = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
            .filter_map(|line| {
                let (key, value) = line.split_once(['=', ':'])?;
                Some((key.trim().to_string(), value.trim().to_string()))
            })
            .collect();
        Self(map)
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    fn f32(&self, key: &str) -> Option<f32> {
        self.get(key)?.parse().ok()
    }

    fn f32_or(&self, key: &str, default: f32) -> f32 {
        self.scalar_or(key, default)
    }

    fn u32_or(&self, key: &str, default: u32) -> u32 {
        self.scalar_or(key, default)
    }

    fn scalar_or<T: std::str::FromStr + std::fmt::Display + Copy>(&self, key: &str, default: T) -> T {
        match self.get(key) {
            None => default,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                log::warn!("`{key}` = `{raw}` is not a number, using {default}");
                default
            }),
        }
    }

    /// Indices `1..=count` that have a `prefix.N` key, ascending
    fn indices(&self, prefix: &str, count: u32) -> Vec<usize> {
        let mut found: Vec<usize> = self
            .0
            .keys()
            .filter_map(|key| key.strip_prefix(prefix)?.strip_prefix('.')?.parse().ok())
            .filter(|&i: &usize| i >= 1 && i <= count as usize)
            .collect();
        found.sort_unstable();
        if found.len() < count as usize {
            log::warn!(
                "`{prefix}.count` is {count} but only {} `{prefix}.N` entries exist",
                found.len()
            );
        }
        found
    }

    fn pair(&self, key: &str) -> Result<Option<Vec2>, ConfigError> {
        self.get(key).map(|value| parse_pair(key, value)).transpose()
    }
}

fn parse_pair(key: &str, value: &str) -> Result<Vec2, ConfigError> {
    let malformed = || ConfigError::MalformedPair {
        key: key.to_string(),
        value: value.to_string(),
    };
    let (x, y) = value.split_once(',').ok_or_else(malformed)?;
    let x = x.trim().parse().map_err(|_| malformed())?;
    let y = y.trim().parse().map_err(|_| malformed())?;
    Ok(Vec2::new(x, y))
}
