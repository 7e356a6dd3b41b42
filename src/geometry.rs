//! Play-area geometry and hit testing.
//!
//! Coordinates are canvas pixels: origin at the top-left corner, y grows downward.
//! Every containment test here is inclusive, so an arrow that only touches an
//! edge still counts as a hit.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.width && p.y <= self.height
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn contains_point(&self, p: DVec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.y > other.bottom()
            || self.bottom() < other.y
            || self.right() < other.x
            || self.x > other.right())
    }

    /// Pulls the rect back inside `area`. A rect larger than the area is pinned
    /// to the top-left corner.
    pub fn clamp_inside(&mut self, area: Size) {
        self.x = self.x.clamp(0.0, (area.width - self.w).max(0.0));
        self.y = self.y.clamp(0.0, (area.height - self.h).max(0.0));
    }
}

/// How generously an arrow is tested against the target and obstacles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CollisionPolicy {
    /// Any overlap of the arrow's bounding box counts.
    BoundingBox,
    /// Only the arrow tip must land inside.
    TipPoint,
}

impl CollisionPolicy {
    pub fn hits(self, tip: DVec2, arrow_box: &Rect, target: &Rect) -> bool {
        match self {
            CollisionPolicy::BoundingBox => arrow_box.overlaps(target),
            CollisionPolicy::TipPoint => target.contains_point(tip),
        }
    }
}
