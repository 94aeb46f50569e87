//! Static level geometry
//!
//! Platforms and ladders never move and have no per-frame behavior; they
//! only expose their bounds. The level is built once from configuration
//! and shared read-only by the player and the interaction resolver.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Size};
use crate::config::LevelConfig;

/// Anything that occupies a fixed rectangle in the level
pub trait StaticGeometry {
    fn bounds(&self) -> Aabb;
}

/// A walkable surface. Only its top edge matters for landing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub pos: Vec2,
    pub size: Size,
}

impl Platform {
    pub const fn new(pos: Vec2, size: Size) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    /// True if the horizontal span `[left, left + width)` overlaps this platform
    pub fn spans(&self, left: f32, width: f32) -> bool {
        left + width > self.pos.x && left < self.pos.x + self.size.width
    }
}

impl StaticGeometry for Platform {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// A climbable ladder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ladder {
    pub pos: Vec2,
    pub size: Size,
}

impl Ladder {
    pub const fn new(pos: Vec2, size: Size) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.height
    }
}

impl StaticGeometry for Ladder {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Immutable level layout (iteration order is configuration order)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Level {
    pub platforms: Vec<Platform>,
    pub ladders: Vec<Ladder>,
}

impl Level {
    pub fn from_config(config: &LevelConfig) -> Self {
        let platform_size = config.sizes.platform;
        let ladder_size = config.sizes.ladder;
        Self {
            platforms: config
                .platforms
                .iter()
                .map(|&pos| Platform::new(pos, platform_size))
                .collect(),
            ladders: config
                .ladders
                .iter()
                .map(|&pos| Ladder::new(pos, ladder_size))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_config_keeps_order_and_sizes() {
        let mut config = LevelConfig::default();
        config.platforms = vec![Vec2::new(0.0, 748.0), Vec2::new(64.0, 748.0)];
        config.ladders = vec![Vec2::new(300.0, 600.0)];

        let level = Level::from_config(&config);
        assert_eq!(level.platforms.len(), 2);
        assert_eq!(level.platforms[1].pos, Vec2::new(64.0, 748.0));
        assert_eq!(level.platforms[0].size, config.sizes.platform);
        assert_eq!(level.ladders[0].bottom(), 600.0 + config.sizes.ladder.height);
    }

    #[test]
    fn test_platform_span() {
        let platform = Platform::new(Vec2::new(100.0, 500.0), Size::new(64.0, 16.0));
        assert!(platform.spans(90.0, 32.0));
        assert!(platform.spans(163.0, 32.0));
        // Touching edges do not count
        assert!(!platform.spans(68.0, 32.0));
        assert!(!platform.spans(164.0, 32.0));
    }
}
