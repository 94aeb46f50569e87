//! Axis-aligned bounding box tests
//!
//! Every proximity check in the game (ladders, platforms, obstacles, the
//! powerup, the goal) goes through [`intersects`]. Boxes are described by
//! their top-left corner plus a size, in screen space with y growing down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Width/height of a box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub const fn square(side: f32) -> Self {
        Self::new(side, side)
    }
}

/// A positioned box, top-left anchored
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Size,
}

impl Aabb {
    pub const fn new(pos: Vec2, size: Size) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.height
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.width / 2.0
    }

    /// Same box moved by `offset`
    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.pos + offset, self.size)
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        intersects(self.pos, self.size, other.pos, other.size)
    }
}

/// Strict AABB overlap: boxes that only share an edge do not collide
#[inline]
pub fn intersects(pos_a: Vec2, size_a: Size, pos_b: Vec2, size_b: Size) -> bool {
    pos_a.x < pos_b.x + size_b.width
        && pos_a.x + size_a.width > pos_b.x
        && pos_a.y < pos_b.y + size_b.height
        && pos_a.y + size_a.height > pos_b.y
}
