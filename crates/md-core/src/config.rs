//! Generator configuration
//!
//! All dimensions are in blocks. Room-like volumes share one vertical span:
//! a foundation of [`PIT_DEPTH`] blocks below the floor (void pits are dug
//! into it), the floor layer at `floor_y`, `room_height` blocks of clear air
//! and a ceiling layer.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::puzzle::{Interior, PatternKind};

/// Depth of the foundation under every floor
pub const PIT_DEPTH: i32 = 3;

/// Smallest room footprint that leaves a 3x3 interior
pub const MIN_ROOM_SIDE: i32 = 5;

/// Smallest clear height: one block of pillar plus a two block tall player
pub const MIN_ROOM_HEIGHT: i32 = 3;

/// Largest horizontal world extent, the usual voxel world border
pub const MAX_WORLD_EXTENT: i32 = 30_000_000;

/// Largest world height
pub const MAX_WORLD_HEIGHT: i32 = 4096;

/// Maps a raw progression value in `[0, 1]` to a difficulty scalar
///
/// Every curve is monotonic and maps `[0, 1]` onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DifficultyCurve {
    #[default]
    Linear,
    /// Quadratic; early rooms stay easy for longer
    EaseIn,
    /// Quantized into `steps` plateaus
    Stepped { steps: u8 },
}

impl DifficultyCurve {
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            DifficultyCurve::Linear => t,
            DifficultyCurve::EaseIn => t * t,
            DifficultyCurve::Stepped { steps } => {
                let steps = f32::from(steps.max(1));
                (t * steps).floor() / steps
            }
        }
    }
}

/// Options consumed by the layout generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Length of one puzzle room along a branch, walls included
    pub room_length: i32,
    /// Width of a branch across its travel axis, walls included
    pub room_width: i32,
    /// Clear air above the floor
    pub room_height: i32,
    /// Gap between the spine wall and the first room of a branch,
    /// and between neighbouring branches
    pub branch_clearance: i32,
    /// Width of the spine corridor, walls included
    pub spine_width: i32,
    /// Length of the entrance hall before the first junction
    pub entrance_length: i32,
    /// Length of the treasure room closing each branch
    pub treasure_length: i32,
    pub boss_length: i32,
    pub boss_width: i32,
    /// World size on the horizontal axes; valid coordinates are `0..max`
    pub max_world_extent: i32,
    pub world_height: i32,
    /// Y of the floor layer
    pub floor_y: i32,
    /// How many pattern kinds the selector draws from
    pub pattern_library_size: usize,
    pub difficulty_curve: DifficultyCurve,
    /// Keep only the first N messages of every thread
    pub message_cap: Option<usize>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            room_length: 9,
            room_width: 7,
            room_height: 4,
            branch_clearance: 3,
            spine_width: 5,
            entrance_length: 8,
            treasure_length: 7,
            boss_length: 17,
            boss_width: 15,
            max_world_extent: 1024,
            world_height: 256,
            floor_y: 64,
            pattern_library_size: PatternKind::COUNT,
            difficulty_curve: DifficultyCurve::Linear,
            message_cap: None,
        }
    }
}

impl GeneratorConfig {
    /// Check dimensions and library size
    ///
    /// Every dimension is bounded on both sides, so the sums the allocator
    /// computes stay far from `i32` overflow.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let minimums = [
            ("roomLength", MIN_ROOM_SIDE, self.room_length),
            ("roomWidth", MIN_ROOM_SIDE, self.room_width),
            ("roomHeight", MIN_ROOM_HEIGHT, self.room_height),
            ("branchClearance", 1, self.branch_clearance),
            ("spineWidth", 3, self.spine_width),
            ("entranceLength", 3, self.entrance_length),
            ("treasureLength", 4, self.treasure_length),
            ("bossLength", MIN_ROOM_SIDE, self.boss_length),
            ("bossWidth", MIN_ROOM_SIDE, self.boss_width),
            ("floorY", PIT_DEPTH, self.floor_y),
        ];
        for (field, min, value) in minimums {
            if value < min {
                return Err(ConfigError::TooSmall { field, min, value });
            }
        }

        let extent = self.max_world_extent;
        let maximums = [
            ("maxWorldExtent", MAX_WORLD_EXTENT, extent),
            ("worldHeight", MAX_WORLD_HEIGHT, self.world_height),
            ("roomLength", extent, self.room_length),
            ("roomWidth", extent, self.room_width),
            ("branchClearance", extent, self.branch_clearance),
            ("spineWidth", extent, self.spine_width),
            ("entranceLength", extent, self.entrance_length),
            ("treasureLength", extent, self.treasure_length),
            ("bossLength", extent, self.boss_length),
            ("bossWidth", extent, self.boss_width),
            ("roomHeight", self.world_height, self.room_height),
            ("floorY", self.world_height, self.floor_y),
        ];
        for (field, max, value) in maximums {
            if value > max {
                return Err(ConfigError::TooLarge { field, max, value });
            }
        }

        if self.pattern_library_size == 0 || self.pattern_library_size > PatternKind::COUNT {
            return Err(ConfigError::PatternLibrarySize {
                value: self.pattern_library_size,
                max: PatternKind::COUNT,
            });
        }

        if let DifficultyCurve::Stepped { steps: 0 } = self.difficulty_curve {
            return Err(ConfigError::NoCurveSteps);
        }

        let (_, top) = self.vertical_span();
        if top >= self.world_height {
            return Err(ConfigError::TooTall {
                top,
                world_height: self.world_height,
            });
        }

        Ok(())
    }

    /// Lowest and highest y (inclusive) of every room-like volume
    pub fn vertical_span(&self) -> (i32, i32) {
        (self.floor_y - PIT_DEPTH, self.floor_y + self.room_height + 1)
    }

    /// Distance between consecutive junctions on the spine
    pub fn junction_spacing(&self) -> i32 {
        self.room_width + self.branch_clearance
    }

    /// Walkable interior of a puzzle room
    pub fn interior(&self) -> Interior {
        Interior {
            length: self.room_length - 2,
            width: self.room_width - 2,
            height: self.room_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GeneratorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_too_narrow_rooms_rejected() {
        let config = GeneratorConfig {
            room_width: 4,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooSmall {
                field: "roomWidth",
                min: 5,
                value: 4
            })
        );
    }

    #[test]
    fn test_zero_clearance_rejected() {
        let config = GeneratorConfig {
            branch_clearance: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooSmall { field: "branchClearance", .. })
        ));
    }

    #[test]
    fn test_library_size_bounds() {
        let mut config = GeneratorConfig {
            pattern_library_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        config.pattern_library_size = PatternKind::COUNT + 1;
        assert!(config.validate().is_err());
        config.pattern_library_size = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_world_height_checked() {
        let config = GeneratorConfig {
            floor_y: 250,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::TooTall { .. })));
    }

    #[test]
    fn test_huge_room_rejected() {
        let config: GeneratorConfig = serde_json::from_str(r#"{"roomWidth": 2147483647}"#).unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooLarge {
                field: "roomWidth",
                max: 1024,
                value: i32::MAX
            })
        );
    }

    #[test]
    fn test_upper_bounds() {
        let config = GeneratorConfig {
            max_world_extent: i32::MAX,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooLarge { field: "maxWorldExtent", .. })
        ));

        let config = GeneratorConfig {
            room_height: i32::MAX,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooLarge { field: "roomHeight", max: 256, .. })
        ));

        let config = GeneratorConfig {
            max_world_extent: MAX_WORLD_EXTENT,
            branch_clearance: MAX_WORLD_EXTENT,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_stepped_curve_needs_steps() {
        let config = GeneratorConfig {
            difficulty_curve: DifficultyCurve::Stepped { steps: 0 },
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoCurveSteps));
    }

    #[test]
    fn test_curves_monotonic_and_clamped() {
        let curves = [
            DifficultyCurve::Linear,
            DifficultyCurve::EaseIn,
            DifficultyCurve::Stepped { steps: 3 },
        ];
        for curve in curves {
            let mut prev = curve.apply(-1.0);
            assert_eq!(prev, 0.0);
            for i in 0..=100 {
                let v = curve.apply(i as f32 / 100.0);
                assert!(v >= prev, "{curve:?} decreased at {i}");
                assert!((0.0..=1.0).contains(&v));
                prev = v;
            }
            assert_eq!(curve.apply(2.0), 1.0);
        }
    }

    #[test]
    fn test_vertical_span() {
        let config = GeneratorConfig::default();
        assert_eq!(config.vertical_span(), (61, 69));
        assert_eq!(config.junction_spacing(), 10);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{"roomLength": 11, "difficultyCurve": {"kind": "ease_in"}}"#).unwrap();
        assert_eq!(config.room_length, 11);
        assert_eq!(config.difficulty_curve, DifficultyCurve::EaseIn);
        assert_eq!(config.room_width, 7);
    }
}
