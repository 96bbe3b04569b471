//! Configuration for the balloons-and-sweater simulation.
//!
//! Every tuned constant of the engine lives here. A [`SimConfig`] is
//! validated once, handed to [`crate::model::SystemModel::new`], and copied by
//! value into the entities that need it. The values are empirically chosen for
//! how the toy looks and feels; they are not physical constants.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::layout::ChargeLayout;
use crate::types::{BalloonId, Bounds2};

/// Size of the region balloons can move in, wall included.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayAreaConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for PlayAreaConfig {
    fn default() -> Self {
        Self {
            width: 768.0,
            height: 504.0,
        }
    }
}

/// Balloon geometry and start state. Both balloons share a size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalloonConfig {
    pub width: f32,
    pub height: f32,
    pub initial_position_a: Vec2,
    pub initial_position_b: Vec2,
    pub initially_visible_a: bool,
    pub initially_visible_b: bool,
    /// Offset from the bounding-box center to the point the balloon's
    /// charge acts from on the wall.
    pub charge_center_offset: Vec2,
}

impl Default for BalloonConfig {
    fn default() -> Self {
        Self {
            width: 134.0,
            height: 222.0,
            initial_position_a: Vec2::new(440.0, 100.0),
            initial_position_b: Vec2::new(380.0, 130.0),
            initially_visible_a: true,
            initially_visible_b: false,
            charge_center_offset: Vec2::new(0.0, -28.0),
        }
    }
}

impl BalloonConfig {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn initial_position(&self, id: BalloonId) -> Vec2 {
        match id {
            BalloonId::A => self.initial_position_a,
            BalloonId::B => self.initial_position_b,
        }
    }

    pub fn initially_visible(&self, id: BalloonId) -> bool {
        match id {
            BalloonId::A => self.initially_visible_a,
            BalloonId::B => self.initially_visible_b,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweaterConfig {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Minus charge position relative to its plus partner.
    pub minus_offset: Vec2,
    /// Angular slices used to build the charged-area hull.
    pub charged_area_slices: usize,
}

impl Default for SweaterConfig {
    fn default() -> Self {
        Self {
            x: 20.0,
            y: 40.0,
            width: 250.0,
            height: 420.0,
            minus_offset: Vec2::new(6.0, 6.0),
            charged_area_slices: 16,
        }
    }
}

impl SweaterConfig {
    pub fn bounds(&self) -> Bounds2 {
        Bounds2::from_origin_size(Vec2::new(self.x, self.y), Vec2::new(self.width, self.height))
    }
}

/// The wall spans the full play-area height; only `x` and `width` are free.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallConfig {
    pub x: f32,
    pub width: f32,
    pub columns: usize,
    pub rows: usize,
    pub column_spacing: f32,
    pub left_margin: f32,
    pub minus_offset: Vec2,
    pub initially_visible: bool,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            x: 600.0,
            width: 100.0,
            columns: 3,
            rows: 18,
            column_spacing: 28.0,
            left_margin: 22.0,
            minus_offset: Vec2::new(-8.0, 0.0),
            initially_visible: true,
        }
    }
}

/// Tuned force coefficients.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConstants {
    /// Coefficient for sweater/balloon and balloon/balloon forces.
    pub balloon_constant: f32,
    /// Coefficient for the displacement of induced wall charges.
    pub induced_constant: f32,
    /// Charge of one electron, sign included.
    pub electron_charge: f32,
    /// Falloff exponent for induced wall charges.
    pub induced_power: f32,
    /// Magnitude cap on the summed sweater and balloon force.
    pub max_force: f32,
    pub wall_pull: f32,
    pub wall_pull_divisor: f32,
    /// The wall override only applies to balloons holding less than this.
    pub wall_stick_charge: i32,
    pub wall_stick_distance: f32,
    pub wall_stick_charge_scale: f32,
    /// Induced displacement above which a balloon counts as inducing charge.
    pub force_magnitude_threshold: f32,
}

impl Default for ForceConstants {
    fn default() -> Self {
        Self {
            balloon_constant: 0.05,
            induced_constant: 10000.0,
            electron_charge: -1.0,
            induced_power: 2.35,
            max_force: 1e-2,
            wall_pull: 0.003,
            wall_pull_divisor: 20.0,
            wall_stick_charge: -5,
            wall_stick_distance: 40.0,
            wall_stick_charge_scale: 8.0,
            force_magnitude_threshold: 2.0,
        }
    }
}

/// Frame timing. Internal time runs in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub time_scale: f32,
    /// Frames longer than this (internal units) are treated as a stall.
    pub max_frame: f32,
    /// Replacement length of a stalled frame.
    pub nominal_frame: f32,
    pub drag_speed_samples: usize,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            time_scale: 1000.0,
            max_frame: 500.0,
            nominal_frame: 1000.0 / 60.0,
            drag_speed_samples: 5,
        }
    }
}

/// Widths of the landmark bands used by [`crate::play_area_map::PlayAreaMap`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkConfig {
    pub tolerance: f32,
    pub very_close: f32,
    pub near: f32,
    pub center_half_width: f32,
}

impl Default for LandmarkConfig {
    fn default() -> Self {
        Self {
            tolerance: 1.0,
            very_close: 20.0,
            near: 60.0,
            center_half_width: 10.0,
        }
    }
}

/// Complete simulation configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub play_area: PlayAreaConfig,
    pub balloon: BalloonConfig,
    pub sweater: SweaterConfig,
    pub wall: WallConfig,
    pub forces: ForceConstants,
    pub timing: TimingConfig,
    pub landmarks: LandmarkConfig,
    pub layout: ChargeLayout,
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

impl SimConfig {
    /// Parses and validates a JSON configuration. Missing fields take their
    /// default values.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Bounds balloons may occupy. The wall narrows them to `[0, wall.x]`.
    pub fn play_area_bounds(&self, wall_visible: bool) -> Bounds2 {
        let width = if wall_visible {
            self.wall.x
        } else {
            self.play_area.width
        };
        Bounds2::from_origin_size(Vec2::ZERO, Vec2::new(width, self.play_area.height))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("play_area.width", self.play_area.width)?;
        positive("play_area.height", self.play_area.height)?;
        positive("balloon.width", self.balloon.width)?;
        positive("balloon.height", self.balloon.height)?;
        positive("sweater.width", self.sweater.width)?;
        positive("sweater.height", self.sweater.height)?;
        positive("wall.width", self.wall.width)?;
        positive("wall.rows", self.wall.rows as f32)?;
        positive("wall.columns", self.wall.columns as f32)?;
        positive("timing.time_scale", self.timing.time_scale)?;
        positive("timing.max_frame", self.timing.max_frame)?;
        positive("timing.nominal_frame", self.timing.nominal_frame)?;

        let wall = &self.wall;
        if !(wall.x > 0.0 && wall.x + wall.width <= self.play_area.width) {
            return Err(ConfigError::WallOutsidePlayArea {
                x: wall.x,
                width: wall.width,
                play_width: self.play_area.width,
            });
        }

        let narrow = self.play_area_bounds(true);
        if self.balloon.width > narrow.width() || self.balloon.height > narrow.height() {
            return Err(ConfigError::BalloonDoesNotFit {
                width: self.balloon.width,
                height: self.balloon.height,
                play_width: narrow.width(),
                play_height: narrow.height(),
            });
        }

        if !narrow.contains_bounds(&self.sweater.bounds()) {
            return Err(ConfigError::SweaterOutsidePlayArea);
        }

        if self.layout.sweater_charges.is_empty() {
            return Err(ConfigError::EmptyChargeTable {
                table: "sweater_charges",
            });
        }
        if self.layout.balloon_slots.is_empty() {
            return Err(ConfigError::EmptyChargeTable {
                table: "balloon_slots",
            });
        }
        if self.layout.balloon_slots.len() < self.layout.sweater_charges.len() {
            return Err(ConfigError::NotEnoughBalloonSlots {
                slots: self.layout.balloon_slots.len(),
                charges: self.layout.sweater_charges.len(),
            });
        }

        let initial_area = self.play_area_bounds(wall.initially_visible);
        for id in BalloonId::ALL {
            let bounds =
                Bounds2::from_origin_size(self.balloon.initial_position(id), self.balloon.size());
            if !initial_area.contains_bounds(&bounds) {
                return Err(ConfigError::InitialPositionOutOfBounds { balloon: id });
            }
        }

        if self.sweater.charged_area_slices < 3 {
            return Err(ConfigError::TooFewSlices {
                slices: self.sweater.charged_area_slices,
            });
        }
        if self.timing.drag_speed_samples == 0 {
            return Err(ConfigError::NoSpeedSamples);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = SimConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.layout.sweater_charges.len(), 57);
        assert_eq!(cfg.layout.balloon_slots.len(), 57);
    }

    #[test]
    fn play_area_narrows_when_wall_is_visible() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.play_area_bounds(true).width(), 600.0);
        assert_eq!(cfg.play_area_bounds(false).width(), 768.0);
        assert_eq!(cfg.play_area_bounds(true).height(), 504.0);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg = SimConfig::from_json_str(r#"{ "wall": { "x": 620.0 }, "forces": { "max_force": 0.02 } }"#)
            .expect("partial config should parse");

        assert_eq!(cfg.wall.x, 620.0);
        assert_eq!(cfg.wall.width, WallConfig::default().width);
        assert_eq!(cfg.forces.max_force, 0.02);
        assert_eq!(cfg.forces.induced_power, 2.35);
        assert_eq!(cfg.balloon, BalloonConfig::default());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = SimConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SimConfig::from_file("/definitely/not/here/balloons.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn rejects_wall_outside_play_area() {
        let mut cfg = SimConfig::default();
        cfg.wall.x = 700.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::WallOutsidePlayArea { .. })
        ));
    }

    #[test]
    fn rejects_non_positive_sizes() {
        let mut cfg = SimConfig::default();
        cfg.balloon.height = 0.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NonPositive {
                field: "balloon.height",
                ..
            })
        ));

        let mut cfg = SimConfig::default();
        cfg.play_area.width = f32::NAN;
        assert!(matches!(cfg.validate(), Err(ConfigError::NonPositive { .. })));
    }

    #[test]
    fn rejects_too_few_balloon_slots() {
        let mut cfg = SimConfig::default();
        cfg.layout.balloon_slots.truncate(10);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NotEnoughBalloonSlots {
                slots: 10,
                charges: 57
            })
        ));
    }

    #[test]
    fn rejects_initial_position_inside_wall() {
        let mut cfg = SimConfig::default();
        cfg.balloon.initial_position_b = Vec2::new(520.0, 100.0);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InitialPositionOutOfBounds {
                balloon: BalloonId::B
            })
        ));

        // Without the wall the same position fits.
        cfg.wall.initially_visible = false;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_hull_and_speed_buffer() {
        let mut cfg = SimConfig::default();
        cfg.sweater.charged_area_slices = 2;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::TooFewSlices { slices: 2 })
        ));

        let mut cfg = SimConfig::default();
        cfg.timing.drag_speed_samples = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::NoSpeedSamples)));
    }
}
