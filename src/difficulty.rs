//! Score-driven difficulty tiers.
//!
//! A level is `score / points_per_level + 1`. Crossing into a higher level shrinks
//! the target, speeds up its mover and, from `ObstacleRules::from_level` on,
//! replaces the obstacle field. Levels never go down within a round.

use rand::Rng;

use crate::geometry::{Rect, Size};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Length of the pulse an obstacle shows when struck, in seconds.
pub const OBSTACLE_PULSE_SECS: f64 = 0.1;

/// Target size per level.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Shrink {
    /// Fixed fraction of the base size from level 2 on.
    Scale { factor: f64 },
    /// `max(floor, base - per_level * level)` from level 2 on.
    Linear { per_level: f64, floor: f64 },
}

impl Shrink {
    pub fn size_for(&self, level: u32, base: f64) -> f64 {
        if level <= 1 {
            return base;
        }
        match *self {
            Shrink::Scale { factor } => base * factor,
            Shrink::Linear { per_level, floor } => (base - per_level * level as f64).max(floor),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObstacleRules {
    pub from_level: u32,
    pub max_count: usize,
    pub size: Size,
    /// Top-left corners are drawn from this rect.
    pub region: Rect,
    /// Arrow velocity multiplier on impact.
    pub damping: f64,
}

impl ObstacleRules {
    pub fn count_for(&self, level: u32) -> usize {
        if level < self.from_level {
            0
        } else {
            (level.saturating_sub(1) as usize).min(self.max_count)
        }
    }

    pub fn spawn<R: Rng>(&self, count: usize, area: Size, rng: &mut R) -> Vec<Obstacle> {
        (0..count)
            .map(|_| {
                let mut rect = Rect::new(
                    self.region.x + rng.gen_range(0.0..self.region.w.max(f64::MIN_POSITIVE)),
                    self.region.y + rng.gen_range(0.0..self.region.h.max(f64::MIN_POSITIVE)),
                    self.size.width,
                    self.size.height,
                );
                rect.clamp_inside(area);
                Obstacle::at(rect)
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DifficultyConfig {
    pub points_per_level: u32,
    pub shrink: Shrink,
    pub obstacles: Option<ObstacleRules>,
}

/// Static obstruction that slows arrows passing through it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    pub rect: Rect,
    pulse: f64,
}

impl Obstacle {
    pub fn at(rect: Rect) -> Self {
        Self { rect, pulse: 0.0 }
    }

    pub fn pulse(&self) -> f64 {
        self.pulse
    }

    pub fn start_pulse(&mut self) {
        self.pulse = OBSTACLE_PULSE_SECS;
    }

    pub fn decay_pulse(&mut self, dt: f64) {
        self.pulse = (self.pulse - dt).max(0.0);
    }
}

#[derive(Clone, Debug)]
pub struct DifficultyController {
    level: u32,
    points_per_level: u32,
}

impl DifficultyController {
    pub fn new(points_per_level: u32) -> Self {
        Self { level: 1, points_per_level: points_per_level.max(1) }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn reset(&mut self) {
        self.level = 1;
    }

    /// Returns the new level if `score` moved past a threshold not seen before.
    pub fn on_score(&mut self, score: u32) -> Option<u32> {
        let earned = score / self.points_per_level + 1;
        if earned > self.level {
            self.level = earned;
            Some(earned)
        } else {
            None
        }
    }
}
