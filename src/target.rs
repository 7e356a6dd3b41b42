use glam::DVec2;
use rand::Rng;

use crate::difficulty::Shrink;
use crate::geometry::{Rect, Size};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Length of the scale pulse shown after a hit, in seconds.
pub const HIT_PULSE_SECS: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TargetMotion {
    /// Teleport to a random whole-pixel spot inside `region` every `period` seconds.
    /// Each level shortens the period by `period_step` while it is above `min_period`.
    Jump {
        period: f64,
        period_step: f64,
        min_period: f64,
        region: Rect,
    },
    /// Slide vertically at `speed` px/s in `tick` second steps, reversing within
    /// `margin` of the top and bottom edges.
    Bounce {
        speed: f64,
        tick: f64,
        margin: f64,
        level_speed_step: f64,
        clock_speed_step: f64,
    },
}

impl TargetMotion {
    pub fn period(&self) -> f64 {
        match *self {
            TargetMotion::Jump { period, .. } => period,
            TargetMotion::Bounce { tick, .. } => tick,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TargetConfig {
    /// Side of the square target at level 1.
    pub size: f64,
    /// Top-left corner at the start of a round.
    pub start: DVec2,
    pub motion: TargetMotion,
}

#[derive(Clone, Debug)]
pub struct Target {
    config: TargetConfig,
    rect: Rect,
    motion: TargetMotion,
    direction: f64,
    pulse: f64,
}

impl Target {
    pub fn new(config: TargetConfig) -> Self {
        Self {
            config,
            rect: Rect::new(config.start.x, config.start.y, config.size, config.size),
            motion: config.motion,
            direction: 1.0,
            pulse: 0.0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[cfg(test)]
    pub(crate) fn rect_mut(&mut self) -> &mut Rect {
        &mut self.rect
    }

    pub fn motion(&self) -> &TargetMotion {
        &self.motion
    }

    pub fn mover_period(&self) -> f64 {
        self.motion.period()
    }

    pub fn is_bouncing(&self) -> bool {
        matches!(self.motion, TargetMotion::Bounce { .. })
    }

    /// Remaining hit pulse, 0 when at rest.
    pub fn pulse(&self) -> f64 {
        self.pulse
    }

    pub fn start_pulse(&mut self) {
        self.pulse = HIT_PULSE_SECS;
    }

    pub fn decay_pulse(&mut self, dt: f64) {
        self.pulse = (self.pulse - dt).max(0.0);
    }

    /// One mover step: a jump or a bounce slide depending on the motion.
    pub fn on_mover_tick<R: Rng>(&mut self, area: Size, rng: &mut R) {
        match self.motion {
            TargetMotion::Jump { .. } => self.jump(area, rng),
            TargetMotion::Bounce { speed, tick, margin, .. } => {
                let max_y = area.height - self.rect.h;
                if self.rect.y <= margin {
                    self.direction = 1.0;
                } else if self.rect.y >= max_y - margin {
                    self.direction = -1.0;
                }
                self.rect.y += speed * tick * self.direction;
                self.rect.clamp_inside(area);
            }
        }
    }

    pub fn jump<R: Rng>(&mut self, area: Size, rng: &mut R) {
        if let TargetMotion::Jump { region, .. } = self.motion {
            self.rect.x = region.x + random_whole(rng, region.w);
            self.rect.y = region.y + random_whole(rng, region.h);
            self.rect.clamp_inside(area);
        }
    }

    pub fn speed_up_by_clock(&mut self) {
        if let TargetMotion::Bounce { speed, clock_speed_step, .. } = &mut self.motion {
            *speed += *clock_speed_step;
        }
    }

    /// Applies a new difficulty level. Returns `true` when the mover cadence
    /// changed and its timer has to be restarted.
    pub fn apply_level(&mut self, level: u32, shrink: &Shrink, area: Size) -> bool {
        let size = shrink.size_for(level, self.config.size);
        self.rect.w = size;
        self.rect.h = size;
        self.rect.clamp_inside(area);
        match &mut self.motion {
            TargetMotion::Jump { period, period_step, min_period, .. } => {
                if *period > *min_period + 1e-9 {
                    *period = (*period - *period_step).max(*min_period);
                    true
                } else {
                    false
                }
            }
            TargetMotion::Bounce { speed, level_speed_step, .. } => {
                *speed += *level_speed_step;
                false
            }
        }
    }
}

fn random_whole<R: Rng>(rng: &mut R, span: f64) -> f64 {
    if span <= 0.0 {
        0.0
    } else {
        rng.gen_range(0.0..span).floor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    const AREA: Size = Size::new(600.0, 400.0);

    fn jumper() -> Target {
        Target::new(TargetConfig {
            size: 50.0,
            start: DVec2::new(275.0, 50.0),
            motion: TargetMotion::Jump {
                period: 1.0,
                period_step: 0.1,
                min_period: 0.2,
                region: Rect::new(0.0, 0.0, 540.0, 200.0),
            },
        })
    }

    fn bouncer(speed: f64) -> Target {
        Target::new(TargetConfig {
            size: 100.0,
            start: DVec2::new(400.0, 150.0),
            motion: TargetMotion::Bounce {
                speed,
                tick: 0.02,
                margin: 50.0,
                level_speed_step: 50.0,
                clock_speed_step: 25.0,
            },
        })
    }

    #[test]
    fn jumps_stay_on_whole_pixels_inside_region() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut t = jumper();
        for _ in 0..200 {
            t.on_mover_tick(AREA, &mut rng);
            let r = t.rect();
            assert!(r.x >= 0.0 && r.x < 540.0 && r.x.fract() == 0.0);
            assert!(r.y >= 0.0 && r.y < 200.0 && r.y.fract() == 0.0);
        }
    }

    #[test]
    fn bounce_reverses_near_edges_and_stays_in_area() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut t = bouncer(300.0);
        let mut saw_down = false;
        let mut saw_up = false;
        let mut last = t.rect().y;
        for _ in 0..500 {
            t.on_mover_tick(AREA, &mut rng);
            let y = t.rect().y;
            assert!(y >= 0.0 && y + t.rect().h <= AREA.height);
            saw_down |= y > last;
            saw_up |= y < last;
            last = y;
        }
        assert!(saw_down && saw_up);
    }

    #[test]
    fn jump_period_shrinks_to_floor() {
        let mut t = jumper();
        let shrink = Shrink::Scale { factor: 0.9 };
        let mut restarts = 0;
        for level in 2..20 {
            if t.apply_level(level, &shrink, AREA) {
                restarts += 1;
            }
        }
        assert_eq!(restarts, 8);
        assert!((t.mover_period() - 0.2).abs() < 1e-9);
        assert!((t.rect().w - 45.0).abs() < 1e-9);
    }

    #[test]
    fn bounce_level_and_clock_add_speed() {
        let mut t = bouncer(150.0);
        t.speed_up_by_clock();
        assert!(!t.apply_level(2, &Shrink::Linear { per_level: 5.0, floor: 40.0 }, AREA));
        match *t.motion() {
            TargetMotion::Bounce { speed, .. } => assert_eq!(speed, 225.0),
            _ => unreachable!(),
        }
        assert_eq!(t.rect().w, 90.0);
    }
}
