//! Player kinematics
//!
//! One call to [`Player::step`] is one frame: it reads the current player,
//! the held/pressed input and the level, and returns the next player. The
//! previous value is never touched, so a frame either commits whole or not
//! at all.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Size};
use super::geometry::{Level, StaticGeometry};
use super::tick::TickInput;
use crate::config::{LevelConfig, Physics};
use crate::consts::LADDER_PROBE_OFFSET;

/// The climbing character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Vertical velocity (positive is down)
    pub vel_y: f32,
    pub climbing: bool,
    /// Standing on a platform this frame
    pub on_platform: bool,
    /// Left the ground via a jump and has not landed since
    pub airborne: bool,
    pub facing_right: bool,
    pub has_powerup: bool,
    /// Dropping in at run start; input is ignored until settled
    pub settling: bool,
    /// Rest height for the drop-in
    pub start_y: f32,
    /// Box used against ladders and platforms
    pub size: Size,
    /// Box used against obstacles, the powerup and the goal
    pub hit_size: Size,
}

impl Player {
    /// Fresh player for a new run, above its start point
    pub fn spawn(config: &LevelConfig) -> Self {
        Self {
            pos: Vec2::new(config.player_start.x, config.player_spawn_y),
            vel_y: 0.0,
            climbing: false,
            on_platform: false,
            airborne: false,
            facing_right: true,
            has_powerup: false,
            settling: true,
            start_y: config.player_start.y,
            size: config.sizes.player,
            hit_size: config.sizes.player_hit,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::new(self.pos, self.hit_size)
    }

    pub fn collect_powerup(&mut self) {
        self.has_powerup = true;
    }

    /// Advance one frame
    pub fn step(&self, input: &TickInput, level: &Level, physics: &Physics) -> Self {
        let mut next = self.clone();
        next.climbing = false;

        if self.settling {
            next.vel_y = self.vel_y + physics.player_gravity;
            let mut y = self.pos.y + next.vel_y;
            if y >= self.start_y {
                y = self.start_y;
                next.settling = false;
                next.vel_y = 0.0;
            }
            next.pos = Vec2::new(self.pos.x, y);
            return next;
        }

        let mut next_x = self.pos.x;
        let mut next_y = self.pos.y;

        if input.left {
            next_x -= physics.player_speed;
            next.facing_right = false;
        } else if input.right {
            next_x += physics.player_speed;
            next.facing_right = true;
        }

        // First ladder in reach wins; ladders never stack
        let body = self.bounds();
        let probe = body.translated(Vec2::new(0.0, LADDER_PROBE_OFFSET));
        let reachable = level.ladders.iter().find(|ladder| {
            let rungs = ladder.bounds();
            body.overlaps(&rungs) || (input.down && probe.overlaps(&rungs))
        });
        if let Some(ladder) = reachable {
            if input.up {
                next_y -= physics.player_climb_speed;
                next.climbing = true;
            } else if input.down {
                let ladder_bottom = ladder.bottom();
                if body.bottom() < ladder_bottom {
                    next_y = (next_y + physics.player_climb_speed).min(ladder_bottom - self.size.height);
                    next.climbing = true;
                }
            }
        }

        if next.climbing {
            next.vel_y = 0.0;
        } else {
            next.vel_y = (self.vel_y + physics.player_gravity).min(physics.player_max_fall_speed);
            next_y += next.vel_y;
        }

        // Landing: bottom edge crosses a platform top during this frame's motion
        next.on_platform = false;
        for platform in &level.platforms {
            let crossed = body.bottom() <= platform.top() && next_y + self.size.height >= platform.top();
            if crossed && platform.spans(self.pos.x, self.size.width) {
                next.on_platform = true;
                if !next.climbing {
                    next_y = platform.top() - self.size.height;
                    next.airborne = false;
                    next.vel_y = 0.0;
                }
            }
        }

        if input.jump && next.on_platform {
            next.vel_y = physics.player_jump_velocity;
            next.airborne = true;
            next.on_platform = false;
        }

        next.pos = Vec2::new(next_x, next_y);
        next
    }
}
