//! Balloon state, force model, and motion integration.
//!
//! A balloon is either dragged by the user, in which case it may pick up
//! electrons from the sweater, or free, in which case it drifts under the
//! tuned sweater / other-balloon / wall forces and is clamped to the play
//! area.
//!
//! Derived flags (`touching_wall`, `on_sweater`, `inducing_charge`, the
//! region labels, the closest wall charge) are cached. Any change to
//! position, charge or visibility marks the balloon dirty; the owning
//! [`crate::model::SystemModel`] recomputes them through
//! [`Balloon::refresh_derived`] before returning to the caller.

use glam::Vec2;
use tracing::debug;

use crate::charge::PointCharge;
use crate::config::{ForceConstants, SimConfig, TimingConfig};
use crate::direction::{Direction, get_direction};
use crate::force::{INVERSE_SQUARE, clamp_magnitude, coulomb_force};
use crate::play_area_map::{Column, Landmark, PlayAreaMap, Row};
use crate::speed_buffer::SpeedBuffer;
use crate::sweater::Sweater;
use crate::types::{BalloonId, Bounds2};
use crate::wall::Wall;

/// Minus partner of a neutral pair, relative to the plus charge.
const NEUTRAL_MINUS_OFFSET: Vec2 = Vec2::new(8.0, 8.0);

/// Tolerance when checking that integration kept the balloon in bounds.
const BOUNDS_EPS: f32 = 1e-3;

/// Everything a balloon reads (or, for the sweater, mutates) during a step.
///
/// Built by the model for one balloon at a time, so the balloon never holds
/// references to its neighbours between frames.
pub struct StepContext<'a> {
    pub sweater: &'a mut Sweater,
    pub wall: &'a Wall,
    pub other: &'a Balloon,
    pub map: &'a PlayAreaMap,
    pub play_area: Bounds2,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Balloon {
    id: BalloonId,
    size: Vec2,
    charge_center_offset: Vec2,
    initial_position: Vec2,
    initially_visible: bool,
    forces: ForceConstants,
    timing: TimingConfig,

    position: Vec2,
    velocity: Vec2,
    drag_velocity: Vec2,
    /// Net charge in electrons; never positive.
    charge: i32,
    visible: bool,
    dragged: bool,
    direction: Option<Direction>,
    time_since_release: f32,
    last_drag_center: Option<Vec2>,
    speed_samples: SpeedBuffer,

    neutral_pairs: Vec<(PointCharge, PointCharge)>,
    charge_slots: Vec<PointCharge>,

    dirty: bool,
    closest_wall_charge: Option<usize>,
    touching_wall: bool,
    on_sweater: bool,
    inducing_charge: bool,
    row: Row,
    column: Column,
    landmark: Option<Landmark>,
}

impl Balloon {
    pub fn new(id: BalloonId, cfg: &SimConfig) -> Self {
        let initial_position = cfg.balloon.initial_position(id);
        let initially_visible = cfg.balloon.initially_visible(id);
        let size = cfg.balloon.size();

        let neutral_pairs = cfg
            .layout
            .balloon_neutral_pairs
            .iter()
            .map(|&p| (PointCharge::new(p), PointCharge::new(p + NEUTRAL_MINUS_OFFSET)))
            .collect();
        let charge_slots = cfg
            .layout
            .balloon_slots
            .iter()
            .map(|&p| PointCharge::new(p))
            .collect();

        Self {
            id,
            size,
            charge_center_offset: cfg.balloon.charge_center_offset,
            initial_position,
            initially_visible,
            forces: cfg.forces,
            timing: cfg.timing,
            position: initial_position,
            velocity: Vec2::ZERO,
            drag_velocity: Vec2::ZERO,
            charge: 0,
            visible: initially_visible,
            dragged: false,
            direction: None,
            time_since_release: 0.0,
            last_drag_center: None,
            speed_samples: SpeedBuffer::with_len(cfg.timing.drag_speed_samples),
            neutral_pairs,
            charge_slots,
            dirty: true,
            closest_wall_charge: None,
            touching_wall: false,
            on_sweater: false,
            inducing_charge: false,
            // Placeholders until the owning model runs `refresh_derived`.
            row: Row::Upper,
            column: Column::LeftArm,
            landmark: None,
        }
    }

    pub fn id(&self) -> BalloonId {
        self.id
    }

    /// Top-left corner of the bounding box.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Pointer-driven velocity measured while dragged.
    pub fn drag_velocity(&self) -> Vec2 {
        self.drag_velocity
    }

    pub fn charge(&self) -> i32 {
        self.charge
    }

    /// Most electrons the balloon can hold.
    pub fn max_charge(&self) -> usize {
        self.charge_slots.len()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_dragged(&self) -> bool {
        self.dragged
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Internal time units since the balloon was last let go.
    pub fn time_since_release(&self) -> f32 {
        self.time_since_release
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn bounds(&self) -> Bounds2 {
        Bounds2::from_origin_size(self.position, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size / 2.0
    }

    /// Point the balloon's charge acts from on the wall.
    pub fn charge_center(&self) -> Vec2 {
        self.center() + self.charge_center_offset
    }

    /// Index into [`Wall::minus_charges`] of the wall electron nearest to
    /// [`Balloon::charge_center`], measured at rest positions.
    pub fn closest_wall_charge(&self) -> Option<usize> {
        self.closest_wall_charge
    }

    pub fn touching_wall(&self) -> bool {
        self.touching_wall
    }

    pub fn on_sweater(&self) -> bool {
        self.on_sweater
    }

    pub fn inducing_charge(&self) -> bool {
        self.inducing_charge
    }

    pub fn row(&self) -> Row {
        self.row
    }

    pub fn column(&self) -> Column {
        self.column
    }

    pub fn landmark(&self) -> Option<Landmark> {
        self.landmark
    }

    /// World positions of the neutral plus charges.
    pub fn plus_charge_positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.neutral_pairs
            .iter()
            .map(move |(plus, _)| self.position + plus.position())
    }

    /// World positions of the neutral minus charges followed by one entry
    /// per collected electron.
    pub fn minus_charge_positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        let collected = self.charge.unsigned_abs() as usize;
        self.neutral_pairs
            .iter()
            .map(|(_, minus)| minus)
            .chain(self.charge_slots.iter().take(collected))
            .map(move |c| self.position + c.position())
    }

    /// Moves the balloon and updates its direction of travel.
    ///
    /// The direction is left unchanged when the position does not change.
    pub fn set_position(&mut self, position: Vec2) {
        if position == self.position {
            return;
        }
        if let Some(direction) = get_direction(position, self.position) {
            self.direction = Some(direction);
        }
        self.position = position;
        self.dirty = true;
    }

    pub fn set_dragged(&mut self, dragged: bool) {
        if dragged == self.dragged {
            return;
        }
        self.dragged = dragged;
        if dragged {
            self.velocity = Vec2::ZERO;
            self.last_drag_center = None;
            self.speed_samples.clear();
            debug!(balloon = ?self.id, "grabbed");
        } else {
            self.drag_velocity = Vec2::ZERO;
            self.time_since_release = 0.0;
            debug!(balloon = ?self.id, charge = self.charge, "released");
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        if visible == self.visible {
            return;
        }
        self.visible = visible;
        if !visible {
            self.set_dragged(false);
        }
        self.dirty = true;
        debug!(balloon = ?self.id, visible, "visibility changed");
    }

    /// Takes one electron. Returns `false` if every charge slot is full.
    pub(crate) fn add_electron(&mut self) -> bool {
        if self.charge.unsigned_abs() as usize >= self.charge_slots.len() {
            return false;
        }
        self.charge -= 1;
        self.dirty = true;
        true
    }

    #[cfg(test)]
    pub(crate) fn set_charge(&mut self, charge: i32) {
        self.charge = charge.clamp(-(self.charge_slots.len() as i32), 0);
        self.dirty = true;
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn reset_time_since_release(&mut self) {
        self.time_since_release = 0.0;
    }

    /// Returns the balloon to its construction state. Visibility is only
    /// restored when `reset_visibility` is set.
    pub fn reset(&mut self, reset_visibility: bool) {
        self.position = self.initial_position;
        self.velocity = Vec2::ZERO;
        self.drag_velocity = Vec2::ZERO;
        self.charge = 0;
        self.dragged = false;
        self.direction = None;
        self.time_since_release = 0.0;
        self.last_drag_center = None;
        self.speed_samples.clear();
        if reset_visibility {
            self.visible = self.initially_visible;
        }
        self.dirty = true;
    }

    /// Advances the balloon by `dt` seconds.
    ///
    /// Time is scaled to internal units; a frame longer than
    /// `timing.max_frame` is treated as a stall (the host lost focus) and
    /// replaced by one nominal frame.
    ///
    /// ### Returns
    /// Number of electrons picked up from the sweater during this step.
    pub fn step(&mut self, ctx: StepContext<'_>, dt: f32) -> usize {
        debug_assert!(!dt.is_nan(), "step called with NaN dt");
        if !(dt.is_finite() && dt > 0.0) {
            return 0;
        }

        let mut dt = dt * self.timing.time_scale;
        if dt > self.timing.max_frame {
            debug!(balloon = ?self.id, dt, "stalled frame clamped");
            dt = self.timing.nominal_frame;
        }

        if self.dragged {
            self.drag(ctx.sweater, dt)
        } else {
            self.apply_force(&ctx, dt);
            self.time_since_release += dt;
            0
        }
    }

    /// Measures drag velocity and rubs the sweater.
    ///
    /// Charges are only picked up while the smoothed speed over the last few
    /// frames is non-zero, so holding the balloon still on the sweater does
    /// nothing.
    fn drag(&mut self, sweater: &mut Sweater, dt: f32) -> usize {
        let center = self.center();
        let mut transferred = 0;

        if let Some(last) = self.last_drag_center {
            let velocity = (center - last) / dt;
            self.speed_samples.push(velocity);
            self.drag_velocity = velocity;

            if self.speed_samples.smoothed_speed() > 0.0 {
                transferred = sweater.transfer_charges(self);
            }
        }

        self.last_drag_center = Some(center);
        transferred
    }

    /// Whether the balloon's center is over the sweater's charged area, in
    /// which case it sticks to the sweater and does not move.
    pub fn center_in_charged_area(&self, sweater: &Sweater) -> bool {
        sweater.charged_area().contains(self.center())
    }

    /// Explicit Euler step followed by clamping to the play area.
    fn apply_force(&mut self, ctx: &StepContext<'_>, dt: f32) {
        if self.center_in_charged_area(ctx.sweater) {
            self.velocity = Vec2::ZERO;
            return;
        }

        let force = self.total_force(ctx.sweater, ctx.wall, ctx.other);
        let bounds = ctx.play_area;
        let size = self.size;

        let mut velocity = self.velocity + force * dt;
        let mut position = self.position + self.velocity * dt;

        if position.x + size.x >= bounds.max.x {
            position.x = bounds.max.x - size.x;
            if velocity.x > 0.0 {
                velocity.x = 0.0;
            }
            // Pressed against the wall: friction stops the slide.
            if ctx
                .map
                .is_at_wall(position.x + size.x / 2.0, ctx.wall.is_visible())
            {
                velocity.y = 0.0;
            }
        }
        if position.y + size.y >= bounds.max.y {
            position.y = bounds.max.y - size.y;
            if velocity.y > 0.0 {
                velocity.y = 0.0;
            }
        }
        if position.x <= bounds.min.x {
            position.x = bounds.min.x;
            if velocity.x < 0.0 {
                velocity.x = 0.0;
            }
        }
        if position.y <= bounds.min.y {
            position.y = bounds.min.y;
            if velocity.y < 0.0 {
                velocity.y = 0.0;
            }
        }

        // Position first so velocity observers see where the balloon ended up.
        self.set_position(position);
        self.velocity = velocity;

        debug_assert!(
            {
                let b = self.bounds();
                b.min.x >= bounds.min.x - BOUNDS_EPS
                    && b.min.y >= bounds.min.y - BOUNDS_EPS
                    && b.max.x <= bounds.max.x + BOUNDS_EPS
                    && b.max.y <= bounds.max.y + BOUNDS_EPS
            },
            "balloon {:?} left the play area",
            self.id
        );
    }

    /// Net force on a free balloon.
    ///
    /// A strongly charged balloon right next to the visible wall is held by
    /// a flat pull toward the wall that overrides everything else. Otherwise
    /// the sweater and other-balloon forces are summed and capped at
    /// `max_force` so that nearby charges cannot fling the balloon across the
    /// screen in one frame.
    pub fn total_force(&self, sweater: &Sweater, wall: &Wall, other: &Balloon) -> Vec2 {
        let f = &self.forces;
        if wall.is_visible() && self.charge < f.wall_stick_charge {
            let charge = self.charge as f32;
            let rel_dist = wall.x() - self.position.x - self.size.x;
            if rel_dist <= f.wall_stick_distance + charge / f.wall_stick_charge_scale {
                return Vec2::new(-f.wall_pull * charge / f.wall_pull_divisor, 0.0);
            }
        }

        let sum = self.sweater_force(sweater) + self.other_balloon_force(other);
        clamp_magnitude(sum, f.max_force)
    }

    /// Attraction toward the sweater's center.
    pub fn sweater_force(&self, sweater: &Sweater) -> Vec2 {
        let kqq = -self.forces.balloon_constant * sweater.charge() as f32 * self.charge as f32;
        coulomb_force(sweater.center(), self.center(), kqq, INVERSE_SQUARE)
    }

    /// Repulsion from the other balloon; zero unless both are visible and
    /// neither is held by the user.
    pub fn other_balloon_force(&self, other: &Balloon) -> Vec2 {
        if self.dragged || other.dragged || !self.visible || !other.visible {
            return Vec2::ZERO;
        }
        let kqq = self.forces.balloon_constant * self.charge as f32 * other.charge as f32;
        coulomb_force(self.center(), other.center(), kqq, INVERSE_SQUARE)
    }

    /// Recomputes every cached flag and label.
    pub(crate) fn refresh_derived(&mut self, sweater: &Sweater, wall: &Wall, map: &PlayAreaMap) {
        let center = self.center();

        self.closest_wall_charge = wall.closest_charge_to(self);
        debug_assert!(
            self.closest_wall_charge.is_some() || wall.minus_charges().is_empty(),
            "wall has charges but none is closest"
        );

        self.touching_wall = map.is_at_wall(center.x, wall.is_visible());
        self.on_sweater = sweater.bounds().intersects(&self.bounds());
        self.inducing_charge = self.compute_inducing_charge(wall);

        self.row = map.row(center.y);
        self.column = map.column(center.x);
        self.landmark = map.landmark(center.x, wall.is_visible());

        self.dirty = false;
    }

    fn compute_inducing_charge(&self, wall: &Wall) -> bool {
        if self.charge == 0 || !self.visible || !wall.is_visible() {
            return false;
        }
        self.closest_wall_charge
            .and_then(|i| wall.minus_charges().get(i))
            .is_some_and(|c| {
                let displacement = wall.induced_displacement(self, c.rest_position());
                wall.force_indicates_induced_charge(displacement)
            })
    }
}
