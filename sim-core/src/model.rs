//! The top-level simulation: one sweater, one wall, two balloons.
//!
//! [`SystemModel`] is the only owner of the entities. Balloons are stepped one
//! at a time with a [`StepContext`] borrowing everything they interact with;
//! after every change the wall's induced charges and the balloons' cached
//! flags are recomputed before control returns to the caller.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::balloon::{Balloon, StepContext};
use crate::config::SimConfig;
use crate::error::ConfigError;
use crate::play_area_map::PlayAreaMap;
use crate::sweater::Sweater;
use crate::types::{BalloonId, Bounds2};
use crate::wall::Wall;

/// Which charges renderers should draw. The engine stores it but never
/// reads it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChargeDisplay {
    #[default]
    All,
    None,
    /// Only unbalanced charges.
    Diff,
}

/// What happened during one [`SystemModel::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    transferred: [usize; 2],
}

impl StepReport {
    /// Electrons the balloon picked up from the sweater this frame.
    pub fn transferred(&self, id: BalloonId) -> usize {
        self.transferred[id.index()]
    }

    pub fn total_transferred(&self) -> usize {
        self.transferred.iter().sum()
    }

    pub fn any_transfer(&self) -> bool {
        self.total_transferred() > 0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SystemModel {
    config: SimConfig,
    map: PlayAreaMap,
    sweater: Sweater,
    wall: Wall,
    balloons: [Balloon; 2],
    play_area: Bounds2,
    balloons_adjacent: bool,
    charge_display: ChargeDisplay,
}

impl SystemModel {
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let wall = Wall::new(&config);
        let mut model = Self {
            map: PlayAreaMap::new(&config),
            sweater: Sweater::new(&config.sweater, &config.layout),
            play_area: config.play_area_bounds(wall.is_visible()),
            wall,
            balloons: [
                Balloon::new(BalloonId::A, &config),
                Balloon::new(BalloonId::B, &config),
            ],
            balloons_adjacent: false,
            charge_display: ChargeDisplay::default(),
            config,
        };
        model.refresh();
        Ok(model)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn map(&self) -> &PlayAreaMap {
        &self.map
    }

    pub fn sweater(&self) -> &Sweater {
        &self.sweater
    }

    pub fn wall(&self) -> &Wall {
        &self.wall
    }

    pub fn balloon(&self, id: BalloonId) -> &Balloon {
        &self.balloons[id.index()]
    }

    pub fn balloons(&self) -> &[Balloon; 2] {
        &self.balloons
    }

    /// Region balloons may currently occupy.
    pub fn play_area(&self) -> Bounds2 {
        self.play_area
    }

    /// Both balloons visible and closer than one balloon width.
    pub fn balloons_adjacent(&self) -> bool {
        self.balloons_adjacent
    }

    pub fn charge_display(&self) -> ChargeDisplay {
        self.charge_display
    }

    pub fn set_charge_display(&mut self, display: ChargeDisplay) {
        self.charge_display = display;
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Each visible balloon is stepped in turn and the derived state is
    /// refreshed right after it, so balloon B sees A's new position.
    pub fn step(&mut self, dt: f32) -> StepReport {
        let mut report = StepReport::default();

        for id in BalloonId::ALL {
            if !self.balloons[id.index()].is_visible() {
                continue;
            }

            let [a, b] = &mut self.balloons;
            let (balloon, other) = match id {
                BalloonId::A => (a, &*b),
                BalloonId::B => (b, &*a),
            };
            debug_assert_eq!(other.id(), id.other());
            report.transferred[id.index()] = balloon.step(
                StepContext {
                    sweater: &mut self.sweater,
                    wall: &self.wall,
                    other,
                    map: &self.map,
                    play_area: self.play_area,
                },
                dt,
            );

            self.refresh();
        }

        report
    }

    /// Moves a balloon, keeping its bounding box inside the play area.
    pub fn set_balloon_position(&mut self, id: BalloonId, position: Vec2) {
        let balloon = &mut self.balloons[id.index()];
        let clamped = self.play_area.clamp_origin(position, balloon.size());
        balloon.set_position(clamped);
        self.refresh();
    }

    pub fn set_balloon_dragged(&mut self, id: BalloonId, dragged: bool) {
        self.balloons[id.index()].set_dragged(dragged);
        self.refresh();
    }

    pub fn set_balloon_visible(&mut self, id: BalloonId, visible: bool) {
        self.balloons[id.index()].set_visible(visible);
        self.refresh();
    }

    /// Shows or hides the wall and resizes the play area to match.
    ///
    /// A charged balloon stuck to the wall when it disappears counts as
    /// freshly released. When the wall comes back, balloons overlapping it
    /// are pushed out into the narrowed play area.
    pub fn set_wall_visible(&mut self, visible: bool) {
        if visible == self.wall.is_visible() {
            return;
        }

        if !visible {
            for b in &mut self.balloons {
                if b.touching_wall() && b.charge() != 0 {
                    b.reset_time_since_release();
                }
            }
        }

        self.wall.set_visible(visible);
        self.play_area = self.config.play_area_bounds(visible);

        for b in &mut self.balloons {
            if visible {
                let clamped = self.play_area.clamp_origin(b.position(), b.size());
                b.set_position(clamped);
            }
            b.mark_dirty();
        }
        self.refresh();
    }

    /// Returns everything to its construction state, visibility and charge
    /// display included.
    pub fn reset(&mut self) {
        self.wall.reset();
        self.sweater.reset();
        for b in &mut self.balloons {
            b.reset(true);
        }
        self.play_area = self.config.play_area_bounds(self.wall.is_visible());
        self.charge_display = ChargeDisplay::default();
        self.refresh();
        info!("model reset");
    }

    /// Resets balloons and the charges they carry but keeps every
    /// visibility setting. The sweater takes its electrons back.
    pub fn reset_balloons(&mut self) {
        for b in &mut self.balloons {
            b.reset(false);
        }
        self.sweater.reset();
        self.wall.reset_charges();
        self.refresh();
        info!("balloons reset");
    }

    /// Whether any visible balloon with charge rests against the wall.
    pub fn any_charged_balloon_touching_wall(&self) -> bool {
        self.balloons
            .iter()
            .any(|b| b.is_visible() && b.charge() != 0 && b.touching_wall())
    }

    /// Recomputes induced wall charges and cached flags after a change.
    fn refresh(&mut self) {
        if !self.balloons.iter().any(Balloon::is_dirty) {
            return;
        }

        self.wall.update_induced_charges(&self.balloons);
        for b in &mut self.balloons {
            if b.is_dirty() {
                b.refresh_derived(&self.sweater, &self.wall, &self.map);
            }
        }

        let [a, b] = &self.balloons;
        self.balloons_adjacent =
            a.is_visible() && b.is_visible() && a.center().distance(b.center()) < a.width();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::play_area_map::{Column, Landmark, Row};
    use rand::{Rng, SeedableRng, rngs::StdRng};

    const FRAME: f32 = 1.0 / 60.0;

    fn model() -> SystemModel {
        SystemModel::new(SimConfig::default()).expect("default config is valid")
    }

    fn balloon_mut(m: &mut SystemModel, id: BalloonId) -> &mut Balloon {
        &mut m.balloons[id.index()]
    }

    /// Drags `id` across the sweater until it holds some charge, then parks
    /// it at `park` and lets go.
    fn rub(m: &mut SystemModel, id: BalloonId, park: Vec2) -> i32 {
        m.set_balloon_dragged(id, true);
        m.set_balloon_position(id, Vec2::new(20.0, 40.0));
        m.step(FRAME);
        m.set_balloon_position(id, Vec2::new(30.0, 50.0));
        m.step(FRAME);
        m.set_balloon_position(id, park);
        m.step(FRAME);
        m.set_balloon_dragged(id, false);
        m.balloon(id).charge()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut cfg = SimConfig::default();
        cfg.wall.x = -5.0;
        assert!(SystemModel::new(cfg).is_err());
    }

    #[test]
    fn initial_state() {
        let m = model();
        assert!(m.wall().is_visible());
        assert_eq!(m.play_area().width(), 600.0);
        assert!(m.balloon(BalloonId::A).is_visible());
        assert!(!m.balloon(BalloonId::B).is_visible());
        assert!(!m.balloons_adjacent());
        assert_eq!(m.charge_display(), ChargeDisplay::All);
        assert!(m.balloon(BalloonId::A).closest_wall_charge().is_some());
        assert!(!m.balloon(BalloonId::A).inducing_charge());

        let a = m.balloon(BalloonId::A);
        assert_eq!(a.row(), Row::Center);
        assert_eq!(a.column(), Column::RightPlayArea);
        assert_eq!(a.landmark(), Some(Landmark::AtNearWall));
    }

    #[test]
    fn charged_balloon_at_wall_induces_charge() {
        let mut m = model();
        balloon_mut(&mut m, BalloonId::A).set_charge(-30);
        // Center x lands on the at-wall position, top at the upper bound.
        m.set_balloon_position(BalloonId::A, Vec2::new(466.0, 0.0));

        let a = m.balloon(BalloonId::A);
        assert_eq!(a.center().x, m.map().x_positions().at_wall);
        assert!(a.touching_wall());
        assert!(a.inducing_charge());
        assert!(m.any_charged_balloon_touching_wall());

        let idx = a.closest_wall_charge().unwrap();
        let closest = m.wall().minus_charges()[idx];
        assert!(closest.displacement() > m.config().forces.force_magnitude_threshold);
    }

    #[test]
    fn hidden_wall_stops_induction() {
        let mut m = model();
        balloon_mut(&mut m, BalloonId::A).set_charge(-30);
        m.set_balloon_position(BalloonId::A, Vec2::new(466.0, 0.0));

        m.set_wall_visible(false);
        let a = m.balloon(BalloonId::A);
        assert!(!a.touching_wall());
        assert!(!a.inducing_charge());
        assert!(m.wall().minus_charges().iter().all(|c| c.displacement() == 0.0));
    }

    #[test]
    fn input_positions_are_clamped() {
        let mut m = model();
        m.set_balloon_position(BalloonId::A, Vec2::new(900.0, -40.0));
        assert_eq!(m.balloon(BalloonId::A).position(), Vec2::new(466.0, 0.0));

        m.set_wall_visible(false);
        m.set_balloon_position(BalloonId::A, Vec2::new(900.0, 900.0));
        assert_eq!(m.balloon(BalloonId::A).position(), Vec2::new(634.0, 282.0));
    }

    #[test]
    fn step_reports_pickup() {
        let mut m = model();
        m.set_balloon_dragged(BalloonId::A, true);
        m.set_balloon_position(BalloonId::A, Vec2::new(20.0, 40.0));
        assert!(!m.step(FRAME).any_transfer());

        m.set_balloon_position(BalloonId::A, Vec2::new(30.0, 50.0));
        let report = m.step(FRAME);
        assert!(report.transferred(BalloonId::A) > 0);
        assert_eq!(report.transferred(BalloonId::B), 0);
        assert_eq!(report.total_transferred() as i32, -m.balloon(BalloonId::A).charge());
        assert!(m.balloon(BalloonId::A).on_sweater());
    }

    #[test]
    fn dragging_conserves_and_bounds_charge() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut m = model();
        m.set_balloon_dragged(BalloonId::A, true);

        let max = m.balloon(BalloonId::A).max_charge() as i32;
        for _ in 0..400 {
            let p = Vec2::new(rng.random_range(0.0..200.0), rng.random_range(0.0..300.0));
            m.set_balloon_position(BalloonId::A, p);
            m.step(rng.random_range(0.005..0.05));

            let charge = m.balloon(BalloonId::A).charge();
            assert!((-max..=0).contains(&charge));
            assert_eq!(m.sweater().charge() + charge, 0);
        }
        assert!(m.sweater().charge() > 0);
    }

    #[test]
    fn two_balloons_share_one_sweater() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut m = model();
        m.set_balloon_visible(BalloonId::B, true);
        let total = m.sweater().minus_charges().len();

        for (id, frames) in [(BalloonId::A, 6), (BalloonId::B, 300)] {
            m.set_balloon_dragged(id, true);
            for _ in 0..frames {
                let p = Vec2::new(rng.random_range(0.0..200.0), rng.random_range(0.0..300.0));
                m.set_balloon_position(id, p);
                m.step(FRAME);

                let sweater = m.sweater();
                let a = m.balloon(BalloonId::A).charge();
                let b = m.balloon(BalloonId::B).charge();
                assert_eq!(sweater.charge() + a + b, 0);
                assert!(sweater.charge() as usize <= total);
                assert_eq!(sweater.remaining_charges() + sweater.charge() as usize, total);
            }
            m.set_balloon_dragged(id, false);
        }
        assert!(m.sweater().charge() > 0);
    }

    #[test]
    fn regrab_on_sweater_without_motion_picks_up_nothing() {
        let mut m = model();
        m.set_balloon_dragged(BalloonId::A, true);
        m.set_balloon_position(BalloonId::A, Vec2::new(300.0, 100.0));
        m.step(FRAME);
        m.set_balloon_position(BalloonId::A, Vec2::new(330.0, 100.0));
        m.step(FRAME);
        m.set_balloon_dragged(BalloonId::A, false);
        assert_eq!(m.balloon(BalloonId::A).charge(), 0);

        m.set_balloon_position(BalloonId::A, Vec2::new(20.0, 40.0));
        m.set_balloon_dragged(BalloonId::A, true);
        for _ in 0..2 {
            assert!(!m.step(FRAME).any_transfer());
        }
        assert_eq!(m.balloon(BalloonId::A).charge(), 0);
        assert_eq!(m.sweater().charge(), 0);
    }

    #[test]
    fn released_balloon_drifts_toward_sweater() {
        let mut m = model();
        assert!(rub(&mut m, BalloonId::A, Vec2::new(300.0, 100.0)) < 0);
        let start = m.balloon(BalloonId::A).position();

        for _ in 0..10 {
            m.step(FRAME);
        }
        assert!(m.balloon(BalloonId::A).position().x < start.x);
        assert!(m.balloon(BalloonId::A).time_since_release() > 0.0);
    }

    #[test]
    fn hidden_balloon_does_not_step() {
        let mut m = model();
        balloon_mut(&mut m, BalloonId::B).set_charge(-20);
        let before = m.balloon(BalloonId::B).clone();
        for _ in 0..5 {
            m.step(FRAME);
        }
        assert_eq!(m.balloon(BalloonId::B).position(), before.position());
        assert_eq!(m.balloon(BalloonId::B).time_since_release(), 0.0);
    }

    #[test]
    fn removing_wall_releases_stuck_balloon() {
        let mut m = model();
        balloon_mut(&mut m, BalloonId::A).set_charge(-30);
        m.set_balloon_position(BalloonId::A, Vec2::new(466.0, 0.0));
        m.step(FRAME);
        m.step(FRAME);
        assert!(m.balloon(BalloonId::A).touching_wall());
        assert!(m.balloon(BalloonId::A).time_since_release() > 0.0);

        m.set_wall_visible(false);
        assert_eq!(m.balloon(BalloonId::A).time_since_release(), 0.0);
        assert_eq!(m.play_area().width(), 768.0);
    }

    #[test]
    fn restoring_wall_pushes_balloons_out() {
        let mut m = model();
        m.set_wall_visible(false);
        m.set_balloon_position(BalloonId::A, Vec2::new(600.0, 100.0));
        assert_eq!(m.balloon(BalloonId::A).position().x, 600.0);

        m.set_wall_visible(true);
        let a = m.balloon(BalloonId::A);
        assert_eq!(a.position(), Vec2::new(466.0, 100.0));
        assert!(m.play_area().contains_bounds(&a.bounds()));
        assert!(a.touching_wall());
    }

    #[test]
    fn adjacency_needs_both_balloons_close() {
        let mut m = model();
        m.set_balloon_visible(BalloonId::B, true);
        // Default positions are 60 px apart horizontally.
        assert!(m.balloons_adjacent());

        m.set_balloon_position(BalloonId::B, Vec2::new(100.0, 100.0));
        assert!(!m.balloons_adjacent());

        m.set_balloon_position(BalloonId::B, Vec2::new(400.0, 120.0));
        assert!(m.balloons_adjacent());
        m.set_balloon_visible(BalloonId::B, false);
        assert!(!m.balloons_adjacent());
    }

    #[test]
    fn reset_is_idempotent() {
        let mut m = model();
        m.set_balloon_visible(BalloonId::B, true);
        rub(&mut m, BalloonId::B, Vec2::new(300.0, 200.0));
        m.set_wall_visible(false);
        m.set_charge_display(ChargeDisplay::Diff);
        m.step(FRAME);

        m.reset();
        let once = m.clone();
        m.reset();
        assert_eq!(m, once);
        assert_eq!(m, model());
    }

    #[test]
    fn reset_balloons_keeps_visibility() {
        let mut m = model();
        m.set_balloon_visible(BalloonId::B, true);
        m.set_wall_visible(false);
        m.set_charge_display(ChargeDisplay::None);
        assert!(rub(&mut m, BalloonId::B, Vec2::new(300.0, 200.0)) < 0);

        m.reset_balloons();
        let b = m.balloon(BalloonId::B);
        assert!(b.is_visible());
        assert_eq!(b.charge(), 0);
        assert_eq!(b.position(), m.config().balloon.initial_position_b);
        assert_eq!(m.sweater().charge(), 0);
        assert_eq!(m.sweater().remaining_charges(), 57);
        assert!(!m.wall().is_visible());
        assert_eq!(m.charge_display(), ChargeDisplay::None);
    }
}
