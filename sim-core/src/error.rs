//! Error types for building a simulation from configuration.
//!
//! The engine itself is a closed numerical system: once a
//! [`crate::model::SystemModel`] exists, nothing it does can fail. Invariant
//! violations inside the engine are programmer errors and are checked with
//! `debug_assert!` instead of being reported here.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::BalloonId;

/// Errors raised while loading or validating a [`crate::config::SimConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed.
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration text is not valid JSON for [`crate::config::SimConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A size or count that must be strictly positive and finite is not.
    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    /// The wall does not fit inside the play area.
    #[error("wall [{x}, {x} + {width}] does not fit a play area of width {play_width}")]
    WallOutsidePlayArea { x: f32, width: f32, play_width: f32 },

    /// A balloon is larger than the play area narrowed by the wall.
    #[error("balloon {width}x{height} does not fit a {play_width}x{play_height} play area")]
    BalloonDoesNotFit {
        width: f32,
        height: f32,
        play_width: f32,
        play_height: f32,
    },

    /// The sweater is not inside the play area left of the wall.
    #[error("sweater does not lie inside the play area")]
    SweaterOutsidePlayArea,

    /// A charge position table is empty.
    #[error("charge table `{table}` is empty")]
    EmptyChargeTable { table: &'static str },

    /// A balloon could not hold every electron the sweater can give away.
    #[error("balloon has {slots} charge slots but the sweater holds {charges} charges")]
    NotEnoughBalloonSlots { slots: usize, charges: usize },

    /// A balloon's initial bounding box lies outside the initial play area.
    #[error("initial position of balloon {balloon:?} is outside the play area")]
    InitialPositionOutOfBounds { balloon: BalloonId },

    /// The sweater's charged area needs at least a triangle.
    #[error("charged area needs at least 3 slices, got {slices}")]
    TooFewSlices { slices: usize },

    /// The drag speed estimate needs at least one sample.
    #[error("drag speed buffer needs at least one sample")]
    NoSpeedSamples,
}
