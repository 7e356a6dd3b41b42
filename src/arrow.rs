use std::collections::HashSet;

use glam::DVec2;

use crate::geometry::{Rect, Size};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArrowConfig {
    /// Shaft thickness (`width`) and length from tip to nock (`height`).
    pub size: Size,
    /// Launch speed in px/s.
    pub speed: f64,
    /// Simulation step for a flying arrow, in seconds.
    pub tick: f64,
}

/// The single projectile of a round. Idle arrows rest on the bow.
#[derive(Clone, Debug)]
pub struct Arrow {
    size: Size,
    tip: DVec2,
    velocity: DVec2,
    heading: DVec2,
    flying: bool,
    hit_obstacles: HashSet<usize>,
}

impl Arrow {
    pub fn new(size: Size, nock: DVec2, heading: DVec2) -> Self {
        Self {
            size,
            tip: nock,
            velocity: DVec2::ZERO,
            heading,
            flying: false,
            hit_obstacles: HashSet::new(),
        }
    }

    pub fn is_flying(&self) -> bool {
        self.flying
    }

    pub fn tip(&self) -> DVec2 {
        self.tip
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    pub fn heading(&self) -> DVec2 {
        self.heading
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Looses the arrow from `nock`. Returns `false` and changes nothing if an
    /// arrow is already in the air.
    pub fn fire(&mut self, nock: DVec2, velocity: DVec2) -> bool {
        if self.flying {
            return false;
        }
        self.flying = true;
        self.tip = nock;
        self.velocity = velocity;
        self.heading = velocity.normalize_or_zero();
        self.hit_obstacles.clear();
        true
    }

    pub fn step(&mut self, dt: f64) {
        if self.flying {
            self.tip += self.velocity * dt;
        }
    }

    /// Returns the arrow to the bow and ends the shot.
    pub fn ground(&mut self, nock: DVec2, heading: DVec2) {
        self.flying = false;
        self.velocity = DVec2::ZERO;
        self.tip = nock;
        self.heading = heading;
        self.hit_obstacles.clear();
    }

    /// Keeps an idle arrow nocked while the bow moves or turns.
    pub fn follow(&mut self, nock: DVec2, heading: DVec2) {
        if !self.flying {
            self.tip = nock;
            self.heading = heading;
        }
    }

    pub fn damp(&mut self, factor: f64) {
        self.velocity *= factor;
    }

    /// Records an obstacle strike for this shot; `false` if it was already struck.
    pub fn mark_obstacle(&mut self, index: usize) -> bool {
        self.hit_obstacles.insert(index)
    }

    pub fn hit_obstacles(&self) -> &HashSet<usize> {
        &self.hit_obstacles
    }

    /// Axis-aligned box around the shaft, from the tip back along the heading.
    pub fn bounds(&self) -> Rect {
        let tail = self.tip - self.heading * self.size.height;
        let half = self.size.width / 2.0;
        let pad = DVec2::new(half * self.heading.y.abs(), half * self.heading.x.abs());
        let min = self.tip.min(tail) - pad;
        let max = self.tip.max(tail) + pad;
        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle() -> Arrow {
        Arrow::new(Size::new(4.0, 40.0), DVec2::new(300.0, 330.0), DVec2::NEG_Y)
    }

    #[test]
    fn second_fire_is_rejected() {
        let mut a = idle();
        assert!(a.fire(DVec2::new(300.0, 330.0), DVec2::new(0.0, -600.0)));
        a.step(0.5);
        let before = (a.tip(), a.velocity());
        assert!(!a.fire(DVec2::new(10.0, 10.0), DVec2::new(5.0, 5.0)));
        assert_eq!((a.tip(), a.velocity()), before);
    }

    #[test]
    fn vertical_bounds_hang_below_tip() {
        let a = idle();
        assert_eq!(a.bounds(), Rect::new(298.0, 330.0, 4.0, 40.0));
    }

    #[test]
    fn obstacle_strike_counts_once_per_shot() {
        let mut a = idle();
        a.fire(a.tip(), DVec2::new(100.0, 0.0));
        assert!(a.mark_obstacle(2));
        assert!(!a.mark_obstacle(2));
        a.ground(DVec2::ZERO, DVec2::X);
        a.fire(a.tip(), DVec2::new(100.0, 0.0));
        assert!(a.mark_obstacle(2));
    }
}
