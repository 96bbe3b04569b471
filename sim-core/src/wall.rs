//! The grounded wall and its induced charges.
//!
//! The wall holds a grid of plus/minus pairs. Its electrons are pushed away
//! by charged balloons; their displaced positions are a pure function of the
//! current balloon state and are recomputed from the rest positions on every
//! update, never accumulated.

use glam::Vec2;
use tracing::info;

use crate::balloon::Balloon;
use crate::charge::{MovableCharge, PointCharge};
use crate::config::{ForceConstants, SimConfig};
use crate::force::coulomb_force;
use crate::types::Bounds2;

#[derive(Clone, Debug, PartialEq)]
pub struct Wall {
    bounds: Bounds2,
    visible: bool,
    initially_visible: bool,
    forces: ForceConstants,
    plus_charges: Vec<PointCharge>,
    minus_charges: Vec<MovableCharge>,
}

impl Wall {
    pub fn new(cfg: &SimConfig) -> Self {
        let w = &cfg.wall;
        let bounds = Bounds2::from_origin_size(
            Vec2::new(w.x, 0.0),
            Vec2::new(w.width, cfg.play_area.height),
        );
        let row_height = cfg.play_area.height / w.rows as f32;

        let mut plus_charges = Vec::with_capacity(w.columns * w.rows);
        let mut minus_charges = Vec::with_capacity(w.columns * w.rows);
        for i in 0..w.columns {
            let x = w.x + w.left_margin + i as f32 * w.column_spacing;
            for k in 0..w.rows {
                let plus = Vec2::new(x, (k as f32 + 0.5) * row_height);
                plus_charges.push(PointCharge::new(plus));
                minus_charges.push(MovableCharge::new(plus + w.minus_offset));
            }
        }

        Self {
            bounds,
            visible: w.initially_visible,
            initially_visible: w.initially_visible,
            forces: cfg.forces,
            plus_charges,
            minus_charges,
        }
    }

    pub fn x(&self) -> f32 {
        self.bounds.min.x
    }

    pub fn width(&self) -> f32 {
        self.bounds.width()
    }

    pub fn height(&self) -> f32 {
        self.bounds.height()
    }

    pub fn bounds(&self) -> Bounds2 {
        self.bounds
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Shows or hides the wall. A hidden wall's electrons sit at rest.
    pub fn set_visible(&mut self, visible: bool) {
        if visible == self.visible {
            return;
        }
        self.visible = visible;
        if !visible {
            self.reset_charges();
        }
        info!(visible, "wall visibility changed");
    }

    pub fn plus_charges(&self) -> &[PointCharge] {
        &self.plus_charges
    }

    pub fn minus_charges(&self) -> &[MovableCharge] {
        &self.minus_charges
    }

    /// Displacement a balloon induces on an electron resting at `rest`.
    ///
    /// An invisible balloon induces nothing.
    pub fn induced_displacement(&self, balloon: &Balloon, rest: Vec2) -> Vec2 {
        if !balloon.is_visible() {
            return Vec2::ZERO;
        }
        let f = &self.forces;
        let kqq = f.induced_constant * f.electron_charge * balloon.charge() as f32;
        coulomb_force(rest, balloon.charge_center(), kqq, f.induced_power)
    }

    /// Moves every electron to its rest position plus the displacement
    /// induced by all `balloons`.
    pub fn update_induced_charges(&mut self, balloons: &[Balloon]) {
        if !self.visible {
            self.reset_charges();
            return;
        }
        for i in 0..self.minus_charges.len() {
            let rest = self.minus_charges[i].rest_position();
            let displacement: Vec2 = balloons
                .iter()
                .map(|b| self.induced_displacement(b, rest))
                .sum();
            self.minus_charges[i].set_position(rest + displacement);
        }
    }

    /// Index of the electron whose rest position is nearest the balloon's
    /// charge center, or `None` for a wall without charges.
    pub fn closest_charge_to(&self, balloon: &Balloon) -> Option<usize> {
        let target = balloon.charge_center();
        let mut best = None;
        let mut best_d2 = f32::MAX;
        for (i, c) in self.minus_charges.iter().enumerate() {
            let d2 = (c.rest_position() - target).length_squared();
            if d2 < best_d2 {
                best_d2 = d2;
                best = Some(i);
            }
        }
        best
    }

    /// Whether an induced displacement is large enough to count as the
    /// balloon inducing charge in the wall.
    pub fn force_indicates_induced_charge(&self, force: Vec2) -> bool {
        force.length() > self.forces.force_magnitude_threshold
    }

    /// Restores the initial visibility and puts every electron at rest.
    pub fn reset(&mut self) {
        self.visible = self.initially_visible;
        self.reset_charges();
    }

    /// Puts every electron back at rest without touching visibility.
    pub(crate) fn reset_charges(&mut self) {
        for c in &mut self.minus_charges {
            c.reset();
        }
    }
}
