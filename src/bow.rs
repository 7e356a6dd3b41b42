use std::f64::consts::FRAC_PI_2;

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis the bow slides along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Step direction along the bow's axis: `Backward` is left/up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

/// How a loosed arrow picks its velocity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Launch {
    /// Straight up the screen; the bow cannot be rotated.
    Vertical,
    /// Along the bow's aim angle, which follows the pointer.
    Aimed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BowConfig {
    /// Bow center at the start of a round.
    pub start: DVec2,
    pub axis: Axis,
    pub step: f64,
    /// Inclusive limits of the center coordinate on `axis`.
    pub min: f64,
    pub max: f64,
    pub launch: Launch,
    /// Idle arrow tip relative to the bow center.
    pub nock_offset: DVec2,
}

#[derive(Clone, Debug)]
pub struct Bow {
    config: BowConfig,
    center: DVec2,
    angle: f64,
}

impl Bow {
    pub fn new(config: BowConfig) -> Self {
        Self {
            config,
            center: config.start,
            angle: Self::rest_angle(config.launch),
        }
    }

    fn rest_angle(launch: Launch) -> f64 {
        match launch {
            Launch::Vertical => -FRAC_PI_2,
            Launch::Aimed => 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.center = self.config.start;
        self.angle = Self::rest_angle(self.config.launch);
    }

    pub fn center(&self) -> DVec2 {
        self.center
    }

    /// Aim angle in radians, screen convention (0 = right, positive = clockwise).
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn axis(&self) -> Axis {
        self.config.axis
    }

    pub fn nock(&self) -> DVec2 {
        self.center + self.config.nock_offset
    }

    pub fn heading(&self) -> DVec2 {
        DVec2::from_angle(self.angle)
    }

    pub fn nudge(&mut self, dir: Direction) {
        let delta = match dir {
            Direction::Backward => -self.config.step,
            Direction::Forward => self.config.step,
        };
        let coord = match self.config.axis {
            Axis::Horizontal => &mut self.center.x,
            Axis::Vertical => &mut self.center.y,
        };
        *coord = (*coord + delta).clamp(self.config.min, self.config.max);
    }

    /// Turns the bow toward `point`. Ignored by bows that only shoot vertically.
    pub fn aim_at(&mut self, point: DVec2) {
        if self.config.launch != Launch::Aimed {
            return;
        }
        let d = point - self.center;
        if d != DVec2::ZERO {
            self.angle = d.y.atan2(d.x);
        }
    }

    pub fn launch_velocity(&self, speed: f64) -> DVec2 {
        match self.config.launch {
            Launch::Vertical => DVec2::new(0.0, -speed),
            Launch::Aimed => self.heading() * speed,
        }
    }
}
