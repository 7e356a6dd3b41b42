//! Round configuration and the two built-in presets.

use glam::DVec2;

use crate::arrow::ArrowConfig;
use crate::bow::{Axis, BowConfig, Launch};
use crate::difficulty::{DifficultyConfig, ObstacleRules, Shrink};
use crate::error::{ArcheryError, Result};
use crate::geometry::{CollisionPolicy, Rect, Size};
use crate::target::{TargetConfig, TargetMotion};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GameConfig {
    pub duration_secs: u32,
    /// Speed the target up every this many elapsed seconds (bouncing targets only).
    pub clock_ramp_every: Option<u32>,
    pub play_area: Size,
    pub score_per_hit: u32,
    pub collision: CollisionPolicy,
    pub bow: BowConfig,
    pub arrow: ArrowConfig,
    pub target: TargetConfig,
    pub difficulty: DifficultyConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl GameConfig {
    /// Bow slides along the bottom edge and shoots straight up at a target that
    /// hops around the upper half.
    pub fn classic() -> Self {
        let area = Size::new(600.0, 400.0);
        Self {
            duration_secs: 60,
            clock_ramp_every: None,
            play_area: area,
            score_per_hit: 10,
            collision: CollisionPolicy::BoundingBox,
            bow: BowConfig {
                start: DVec2::new(area.width / 2.0, area.height - 30.0),
                axis: Axis::Horizontal,
                // 5 % of the width per step, kept within 5 %..95 %.
                step: 30.0,
                min: 30.0,
                max: 570.0,
                launch: Launch::Vertical,
                nock_offset: DVec2::new(0.0, -40.0),
            },
            arrow: ArrowConfig {
                size: Size::new(4.0, 40.0),
                speed: 600.0,
                tick: 1.0 / 60.0,
            },
            target: TargetConfig {
                size: 50.0,
                start: DVec2::new(area.width / 2.0 - 25.0, 50.0),
                motion: TargetMotion::Jump {
                    period: 1.0,
                    period_step: 0.1,
                    min_period: 0.2,
                    region: Rect::new(0.0, 0.0, area.width - 60.0, area.height / 2.0),
                },
            },
            difficulty: DifficultyConfig {
                points_per_level: 20,
                shrink: Shrink::Scale { factor: 0.9 },
                obstacles: None,
            },
        }
    }

    /// Bow on the left edge rotates toward the pointer; the target bounces on the
    /// right and obstacles appear from level 3.
    pub fn aimed() -> Self {
        let area = Size::new(1000.0, 700.0);
        Self {
            duration_secs: 60,
            clock_ramp_every: Some(10),
            play_area: area,
            score_per_hit: 10,
            collision: CollisionPolicy::TipPoint,
            bow: BowConfig {
                start: DVec2::new(80.0, 370.0),
                axis: Axis::Vertical,
                step: 10.0,
                min: 120.0,
                max: area.height - 80.0,
                launch: Launch::Aimed,
                nock_offset: DVec2::ZERO,
            },
            arrow: ArrowConfig {
                size: Size::new(4.0, 60.0),
                speed: 1250.0,
                tick: 0.02,
            },
            target: TargetConfig {
                size: 100.0,
                start: DVec2::new(area.width - 200.0, area.height / 2.0),
                motion: TargetMotion::Bounce {
                    speed: 150.0,
                    tick: 0.02,
                    margin: 50.0,
                    level_speed_step: 50.0,
                    clock_speed_step: 25.0,
                },
            },
            difficulty: DifficultyConfig {
                points_per_level: 50,
                shrink: Shrink::Linear { per_level: 5.0, floor: 40.0 },
                obstacles: Some(ObstacleRules {
                    from_level: 3,
                    max_count: 6,
                    size: Size::new(30.0, 100.0),
                    region: Rect::new(250.0, 50.0, area.width - 550.0, area.height - 150.0),
                    damping: 0.5,
                }),
            },
        }
    }

    /// Looks up a preset by name.
    pub fn variant(name: &str) -> Result<Self> {
        match name {
            "" | "classic" => Ok(Self::classic()),
            "aimed" => Ok(Self::aimed()),
            other => Err(ArcheryError::InvalidConfig(format!("unknown variant '{other}'"))),
        }
    }

    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(ArcheryError::InvalidConfig(msg.to_string()));
        if self.duration_secs == 0 {
            return invalid("duration must be at least one second");
        }
        if self.play_area.width <= 0.0 || self.play_area.height <= 0.0 {
            return invalid("play area must have a positive size");
        }
        if self.score_per_hit == 0 || self.difficulty.points_per_level == 0 {
            return invalid("score per hit and points per level must be positive");
        }
        if self.arrow.tick <= 0.0 || self.arrow.speed <= 0.0 {
            return invalid("arrow speed and tick must be positive");
        }
        if self.bow.min > self.bow.max {
            return invalid("bow min exceeds bow max");
        }
        let size = self.target.size;
        if size <= 0.0 || size > self.play_area.width || size > self.play_area.height {
            return invalid("target must fit inside the play area");
        }
        match self.target.motion {
            TargetMotion::Jump { period, min_period, .. } if period <= 0.0 || min_period <= 0.0 => {
                return invalid("jump period must be positive");
            }
            TargetMotion::Bounce { tick, .. } if tick <= 0.0 => {
                return invalid("bounce tick must be positive");
            }
            _ => {}
        }
        if let Some(rules) = &self.difficulty.obstacles {
            if !(rules.damping > 0.0 && rules.damping <= 1.0) {
                return invalid("obstacle damping must be in (0, 1]");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        GameConfig::classic().validate().unwrap();
        GameConfig::aimed().validate().unwrap();
    }

    #[test]
    fn classic_bow_slides_in_five_percent_steps() {
        let c = GameConfig::classic();
        assert_eq!(c.bow.step, 30.0);
        assert_eq!((c.bow.min, c.bow.max), (30.0, 570.0));
    }

    #[test]
    fn unknown_variant_is_rejected() {
        assert!(matches!(GameConfig::variant("longbow"), Err(ArcheryError::InvalidConfig(_))));
        assert_eq!(GameConfig::variant("aimed").unwrap(), GameConfig::aimed());
    }

    #[test]
    fn zero_tick_is_rejected() {
        let mut c = GameConfig::aimed();
        c.arrow.tick = 0.0;
        assert!(c.validate().is_err());
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_round_trip_keeps_preset() {
        let json = serde_json::to_string(&GameConfig::aimed()).unwrap();
        assert_eq!(GameConfig::from_json(&json).unwrap(), GameConfig::aimed());
    }
}
