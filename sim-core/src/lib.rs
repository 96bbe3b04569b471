//! Core 2-D balloon electrostatics library.
//!
//! Main components:
//! - [`model`]: the top-level [`SystemModel`] and its per-frame step.
//! - [`balloon`]: balloon state, force model and motion integration.
//! - [`sweater`]: the sweater's charges and charge transfer.
//! - [`wall`]: the wall's induced charges.
//! - [`charge`]: fixed and movable point charges.
//! - [`force`]: Coulomb-like force laws.
//! - [`direction`]: movement direction classification.
//! - [`play_area_map`]: named rows, columns and landmarks.
//! - [`speed_buffer`]: rolling drag-speed samples.
//! - [`config`] / [`layout`]: configuration and charge position tables.
//! - [`error`]: configuration errors.
//! - [`types`]: shared IDs and geometry.

pub mod balloon;
pub mod charge;
pub mod config;
pub mod direction;
pub mod error;
pub mod force;
pub mod layout;
pub mod model;
pub mod play_area_map;
pub mod speed_buffer;
pub mod sweater;
pub mod types;
pub mod wall;

pub use balloon::Balloon;
pub use config::SimConfig;
pub use error::ConfigError;
pub use model::{ChargeDisplay, StepReport, SystemModel};
pub use types::{BalloonId, Bounds2};
