//! The wool sweater: a fixed set of charge pairs that gives away electrons.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use tracing::debug;

use crate::balloon::Balloon;
use crate::charge::PointCharge;
use crate::config::SweaterConfig;
use crate::layout::ChargeLayout;
use crate::types::Bounds2;

/// Polygon approximating the region covered by the sweater's charges.
///
/// Built once by a radial-slice hull: around the centroid of the input points
/// the full turn is cut into equal slices and the farthest point of each
/// non-empty slice becomes a vertex, in order of increasing angle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChargedArea {
    vertices: Vec<Vec2>,
}

impl ChargedArea {
    pub fn from_points(points: &[Vec2], slices: usize) -> Self {
        if points.is_empty() || slices == 0 {
            return Self::default();
        }

        let centroid = points.iter().copied().sum::<Vec2>() / points.len() as f32;
        let mut farthest: Vec<Option<(Vec2, f32)>> = vec![None; slices];

        for &p in points {
            let d = p - centroid;
            let d2 = d.length_squared();
            if d2 == 0.0 {
                continue;
            }
            let t = (d.y.atan2(d.x) + PI) / TAU;
            let slice = ((t * slices as f32) as usize).min(slices - 1);
            match farthest[slice] {
                Some((_, best)) if best >= d2 => {}
                _ => farthest[slice] = Some((p, d2)),
            }
        }

        Self {
            vertices: farthest.into_iter().flatten().map(|(p, _)| p).collect(),
        }
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Even-odd point containment. Fewer than three vertices contain nothing.
    pub fn contains(&self, p: Vec2) -> bool {
        let v = &self.vertices;
        if v.len() < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = v.len() - 1;
        for i in 0..v.len() {
            let (a, b) = (v[i], v[j]);
            if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Sweater {
    bounds: Bounds2,
    /// Electrons given away so far. Never negative.
    charge: i32,
    plus_charges: Vec<PointCharge>,
    minus_charges: Vec<PointCharge>,
    charged_area: ChargedArea,
}

impl Sweater {
    pub fn new(cfg: &SweaterConfig, layout: &ChargeLayout) -> Self {
        let bounds = cfg.bounds();
        let plus_charges: Vec<PointCharge> = layout
            .sweater_charges
            .iter()
            .map(|&p| PointCharge::new(bounds.min + p))
            .collect();
        let minus_charges: Vec<PointCharge> = plus_charges
            .iter()
            .map(|c| PointCharge::new(c.position() + cfg.minus_offset))
            .collect();

        let minus_positions: Vec<Vec2> = minus_charges.iter().map(PointCharge::position).collect();
        let charged_area = ChargedArea::from_points(&minus_positions, cfg.charged_area_slices);

        Self {
            bounds,
            charge: 0,
            plus_charges,
            minus_charges,
            charged_area,
        }
    }

    pub fn bounds(&self) -> Bounds2 {
        self.bounds
    }

    pub fn center(&self) -> Vec2 {
        self.bounds.center()
    }

    pub fn charge(&self) -> i32 {
        self.charge
    }

    pub fn plus_charges(&self) -> &[PointCharge] {
        &self.plus_charges
    }

    pub fn minus_charges(&self) -> &[PointCharge] {
        &self.minus_charges
    }

    pub fn charged_area(&self) -> &ChargedArea {
        &self.charged_area
    }

    /// Electrons still on the sweater.
    pub fn remaining_charges(&self) -> usize {
        self.minus_charges.iter().filter(|c| !c.moved).count()
    }

    /// Hands every unmoved electron whose rest position lies inside the
    /// balloon's bounding box over to the balloon.
    ///
    /// Containment is a plain rectangle test against the bounding box, not
    /// the balloon's ellipse. Each transfer moves exactly one unit of charge:
    /// the balloon's charge drops by one and the sweater's rises by one.
    ///
    /// ### Returns
    /// Number of electrons transferred.
    pub fn transfer_charges(&mut self, balloon: &mut Balloon) -> usize {
        let area = balloon.bounds();
        let mut count = 0;

        for minus in self.minus_charges.iter_mut().filter(|c| !c.moved) {
            if !area.contains_point(minus.position()) {
                continue;
            }
            if !balloon.add_electron() {
                debug_assert!(false, "balloon {:?} has no free charge slot", balloon.id());
                break;
            }
            minus.moved = true;
            self.charge += 1;
            count += 1;
        }

        debug_assert!(self.charge as usize <= self.minus_charges.len());
        if count > 0 {
            debug!(
                balloon = ?balloon.id(),
                count,
                balloon_charge = balloon.charge(),
                sweater_charge = self.charge,
                "charges transferred"
            );
        }
        count
    }

    /// Returns `true` iff at least one electron moved to the balloon.
    pub fn check_and_transfer_charges(&mut self, balloon: &mut Balloon) -> bool {
        self.transfer_charges(balloon) > 0
    }

    pub fn reset(&mut self) {
        self.charge = 0;
        for c in &mut self.minus_charges {
            c.reset();
        }
    }
}
