//! Interactive balloons and static electricity viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the [`SystemModel`] and
//! implements [`eframe::App`] to render it and to feed pointer drags back to
//! the engine as balloon positions.

use balloons_core::{
    Balloon, BalloonId, ChargeDisplay, StepReport, SystemModel, charge::PointCharge,
};
use eframe::App;
use glam::Vec2;

const PLUS_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 60, 60);
const MINUS_COLOR: egui::Color32 = egui::Color32::from_rgb(60, 110, 230);
/// Balloon fills in [`BalloonId::index`] order: yellow A, green B.
const BALLOON_FILLS: [egui::Color32; 2] = [
    egui::Color32::from_rgb(240, 200, 40),
    egui::Color32::from_rgb(80, 190, 90),
];

/// Main application state for the interactive viewer.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / input (grab, drag, release of balloons).
/// 2. If `running` is `true`, call [`Viewer::advance`] with the frame time.
/// 3. Render the sweater, wall, balloons and their charges.
///
/// ### Fields
/// - `model` - The simulation being shown.
///
/// - `running` - Whether the simulation is currently auto-advancing.
/// - `speed` - Multiplier applied to the frame time before stepping.
/// - `zoom` - Zoom factor for world-to-screen coordinate mapping.
/// - `pan` - Screen-space pan offset in pixels.
///
/// - `grabbed` - Balloon held by the pointer and the grab point relative to
///   its top-left corner.
///
/// - `last_report` - What the last step reported (charge pickups).
/// - `total_transferred` - Charges picked up since the last reset.
/// - `last_step_dt` - Time passed to the last step (for display only).
pub struct Viewer {
    model: SystemModel,

    running: bool,
    speed: f32,
    zoom: f32,
    pan: egui::Vec2,

    grabbed: Option<(BalloonId, Vec2)>,

    last_report: StepReport,
    total_transferred: usize,
    last_step_dt: f32,
}

impl Viewer {
    /// Creates a viewer around an already built model.
    ///
    /// The simulation starts running at normal speed with no pan.
    pub fn new(model: SystemModel) -> Self {
        Self {
            model,
            running: true,
            speed: 1.0,
            zoom: 1.0,
            pan: egui::vec2(0.0, 0.0),
            grabbed: None,
            last_report: StepReport::default(),
            total_transferred: 0,
            last_step_dt: 0.0,
        }
    }

    /// Resets the whole model and drops any grab in progress.
    fn reset(&mut self) {
        self.model.reset();
        self.grabbed = None;
        self.last_report = StepReport::default();
        self.total_transferred = 0;
    }

    /// Resets only the balloons, keeping wall and balloon visibility.
    fn reset_balloons(&mut self) {
        self.model.reset_balloons();
        self.grabbed = None;
        self.last_report = StepReport::default();
        self.total_transferred = 0;
    }

    /// Advances the simulation by `dt` seconds of wall-clock time.
    fn advance(&mut self, dt: f32) {
        let dt = dt * self.speed;
        self.last_report = self.model.step(dt);
        self.total_transferred += self.last_report.total_transferred();
        self.last_step_dt = dt;
    }

    /// Topmost visible balloon under a world position.
    ///
    /// Balloon B is drawn over A, so it wins when both are hit.
    fn balloon_at(&self, world: Vec2) -> Option<BalloonId> {
        BalloonId::ALL.into_iter().rev().find(|&id| {
            let b = self.model.balloon(id);
            b.is_visible() && b.bounds().contains_point(world)
        })
    }

    /// Grabs the balloon under `world`, if any.
    ///
    /// ### Returns
    /// `true` if a balloon was grabbed; otherwise the drag pans the view.
    fn begin_drag(&mut self, world: Vec2) -> bool {
        let Some(id) = self.balloon_at(world) else {
            return false;
        };
        let offset = world - self.model.balloon(id).position();
        self.grabbed = Some((id, offset));
        self.model.set_balloon_dragged(id, true);
        true
    }

    /// Moves the grabbed balloon so the grab point follows the pointer.
    fn drag_to(&mut self, world: Vec2) {
        if let Some((id, offset)) = self.grabbed {
            self.model.set_balloon_position(id, world - offset);
        }
    }

    /// Lets go of the grabbed balloon.
    fn end_drag(&mut self) {
        if let Some((id, _)) = self.grabbed.take() {
            self.model.set_balloon_dragged(id, false);
        }
    }

    /// Converts a world-space position to screen-space.
    ///
    /// The play area is centered inside `rect`, scaled by `zoom` and offset
    /// by `pan`. World y already points down, like screen y.
    ///
    /// ### Parameters
    /// - `p` - World-space position.
    /// - `rect` - Screen-space rectangle representing the drawing area.
    ///
    /// ### Returns
    /// The corresponding egui position in screen-space.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        let world_center = self.world_center();
        egui::pos2(
            center.x + (p.x - world_center.x) * self.zoom + self.pan.x,
            center.y + (p.y - world_center.y) * self.zoom + self.pan.y,
        )
    }

    /// Converts a screen-space position back to world-space.
    ///
    /// This is the inverse of [`Viewer::world_to_screen`] (up to floating
    /// point rounding), using the same `zoom`, `pan`, and `rect` center.
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let world_center = self.world_center();
        let x = (p.x - center.x - self.pan.x) / self.zoom + world_center.x;
        let y = (p.y - center.y - self.pan.y) / self.zoom + world_center.y;
        Vec2::new(x, y)
    }

    fn world_center(&self) -> Vec2 {
        let area = &self.model.config().play_area;
        Vec2::new(area.width, area.height) / 2.0
    }

    fn world_rect(&self, min: Vec2, max: Vec2, rect: egui::Rect) -> egui::Rect {
        egui::Rect::from_min_max(self.world_to_screen(min, rect), self.world_to_screen(max, rect))
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, resets, visibility, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                if ui.button("Step").clicked() {
                    self.advance(1.0 / 60.0);
                }

                if ui.button("Reset all").clicked() {
                    self.reset();
                }

                if ui.button("Reset balloons").clicked() {
                    self.reset_balloons();
                }

                ui.separator();

                let mut wall = self.model.wall().is_visible();
                if ui.checkbox(&mut wall, "Wall").changed() {
                    self.model.set_wall_visible(wall);
                }

                let mut two = self.model.balloon(BalloonId::B).is_visible();
                if ui.checkbox(&mut two, "Two balloons").changed() {
                    if !two && matches!(self.grabbed, Some((BalloonId::B, _))) {
                        self.grabbed = None;
                    }
                    self.model.set_balloon_visible(BalloonId::B, two);
                }

                let mut display = self.model.charge_display();
                egui::ComboBox::from_label("Charges")
                    .selected_text(match display {
                        ChargeDisplay::All => "Show all",
                        ChargeDisplay::None => "Show none",
                        ChargeDisplay::Diff => "Show differences",
                    })
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut display, ChargeDisplay::All, "Show all");
                        ui.selectable_value(&mut display, ChargeDisplay::None, "Show none");
                        ui.selectable_value(&mut display, ChargeDisplay::Diff, "Show differences");
                    });
                if display != self.model.charge_display() {
                    self.model.set_charge_display(display);
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.25..=4.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (step time, charges, adjacency).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt last = {:.4} s", self.last_step_dt));
                ui.separator();
                ui.label(format!("sweater charge = {}", self.model.sweater().charge()));
                ui.label(format!("picked up = {}", self.total_transferred));
                if self.last_report.any_transfer() {
                    ui.label("⚡");
                }
                ui.separator();
                if self.model.balloons_adjacent() {
                    ui.label("balloons adjacent");
                }
                if self.model.any_charged_balloon_touching_wall() {
                    ui.label("charged balloon on wall");
                }
            });
        });
    }

    fn ui_balloon_info(ui: &mut egui::Ui, name: &str, b: &Balloon) {
        ui.label(name);
        if !b.is_visible() {
            ui.label("hidden");
            return;
        }
        ui.label(format!("charge = {} / -{}", b.charge(), b.max_charge()));
        ui.label(format!("position = ({:.0}, {:.0})", b.position().x, b.position().y));
        ui.label(format!("direction = {:?}", b.direction()));
        ui.label(format!("row = {:?}, column = {:?}", b.row(), b.column()));
        ui.label(format!("landmark = {:?}", b.landmark()));
        ui.label(format!(
            "on sweater = {}, touching wall = {}, inducing = {}",
            b.on_sweater(),
            b.touching_wall(),
            b.inducing_charge()
        ));
    }

    /// Builds the right-hand panel with per-balloon state and run speed.
    fn ui_info_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("info_panel")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("State");

                ui.separator();
                Self::labeled_drag_f32(ui, "speed:", &mut self.speed, 0.0..=4.0, 0.05);

                ui.separator();
                Self::ui_balloon_info(ui, "Yellow balloon", self.model.balloon(BalloonId::A));

                ui.separator();
                Self::ui_balloon_info(ui, "Green balloon", self.model.balloon(BalloonId::B));
            });
    }

    fn draw_charge(&self, painter: &egui::Painter, rect: egui::Rect, world: Vec2, plus: bool) {
        let p = self.world_to_screen(world, rect);
        let r = (4.0 * self.zoom).max(2.0);
        let color = if plus { PLUS_COLOR } else { MINUS_COLOR };
        let stroke = egui::Stroke::new((1.5 * self.zoom).max(1.0), egui::Color32::WHITE);

        painter.circle_filled(p, r, color);
        painter.line_segment([p - egui::vec2(r * 0.6, 0.0), p + egui::vec2(r * 0.6, 0.0)], stroke);
        if plus {
            painter.line_segment([p - egui::vec2(0.0, r * 0.6), p + egui::vec2(0.0, r * 0.6)], stroke);
        }
    }

    fn draw_sweater(&self, painter: &egui::Painter, rect: egui::Rect) {
        let sweater = self.model.sweater();
        let b = sweater.bounds();
        painter.rect_filled(
            self.world_rect(b.min, b.max, rect),
            8.0 * self.zoom,
            egui::Color32::from_rgb(120, 60, 150),
        );

        let outline: Vec<egui::Pos2> = sweater
            .charged_area()
            .vertices()
            .iter()
            .map(|&v| self.world_to_screen(v, rect))
            .collect();
        painter.add(egui::Shape::closed_line(
            outline,
            egui::Stroke::new(1.0, egui::Color32::from_rgba_unmultiplied(255, 255, 255, 40)),
        ));

        let pairs = sweater.plus_charges().iter().zip(sweater.minus_charges());
        for (plus, minus) in pairs {
            match self.model.charge_display() {
                ChargeDisplay::None => {}
                ChargeDisplay::All => {
                    self.draw_charge(painter, rect, plus.position(), true);
                    if !minus.moved {
                        self.draw_charge(painter, rect, minus.position(), false);
                    }
                }
                ChargeDisplay::Diff => {
                    if minus.moved {
                        self.draw_charge(painter, rect, plus.position(), true);
                    }
                }
            }
        }
    }

    fn draw_wall(&self, painter: &egui::Painter, rect: egui::Rect) {
        let wall = self.model.wall();
        if !wall.is_visible() {
            return;
        }
        let b = wall.bounds();
        painter.rect_filled(
            self.world_rect(b.min, b.max, rect),
            0.0,
            egui::Color32::from_rgb(200, 170, 120),
        );

        // The wall is always neutral overall.
        if self.model.charge_display() != ChargeDisplay::All {
            return;
        }
        for plus in wall.plus_charges().iter().map(PointCharge::position) {
            self.draw_charge(painter, rect, plus, true);
        }
        for minus in wall.minus_charges() {
            self.draw_charge(painter, rect, minus.position(), false);
        }
    }

    fn draw_balloon(&self, painter: &egui::Painter, rect: egui::Rect, b: &Balloon, fill: egui::Color32) {
        if !b.is_visible() {
            return;
        }
        let center = self.world_to_screen(b.center(), rect);
        let radius = egui::vec2(b.width(), b.height()) * 0.5 * self.zoom;
        painter.add(egui::Shape::ellipse_filled(center, radius, fill));

        let string_top = Vec2::new(b.center().x, b.bounds().max.y);
        painter.line_segment(
            [
                self.world_to_screen(string_top, rect),
                self.world_to_screen(string_top + Vec2::new(0.0, 40.0), rect),
            ],
            egui::Stroke::new(1.0, egui::Color32::GRAY),
        );

        match self.model.charge_display() {
            ChargeDisplay::None => {}
            ChargeDisplay::All => {
                for p in b.plus_charge_positions() {
                    self.draw_charge(painter, rect, p, true);
                }
                for p in b.minus_charge_positions() {
                    self.draw_charge(painter, rect, p, false);
                }
            }
            ChargeDisplay::Diff => {
                let neutral = b.plus_charge_positions().count();
                for p in b.minus_charge_positions().skip(neutral) {
                    self.draw_charge(painter, rect, p, false);
                }
            }
        }
    }

    /// Builds the central panel where the scene is drawn and balloons are dragged.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            let pointer_world = response
                .interact_pointer_pos()
                .map(|p| self.screen_to_world(p, rect));

            if response.drag_started()
                && let Some(world) = pointer_world
            {
                self.begin_drag(world);
            }

            if response.dragged() {
                match (self.grabbed, pointer_world) {
                    (Some(_), Some(world)) => self.drag_to(world),
                    _ => self.pan += response.drag_delta(),
                }
            }

            if response.drag_stopped() {
                self.end_drag();
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let world_before = self.screen_to_world(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(0.25, 4.0);

                let screen_after = self.world_to_screen(world_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            if self.running {
                let dt = ctx.input(|i| i.stable_dt);
                self.advance(dt);
                ctx.request_repaint();
            }

            let area = self.model.play_area();
            let full = self.model.config().play_area_bounds(false);
            painter.rect_filled(
                self.world_rect(full.min, full.max, rect),
                0.0,
                egui::Color32::from_rgb(30, 30, 40),
            );
            painter.rect_stroke(
                self.world_rect(area.min, area.max, rect),
                0.0,
                egui::Stroke::new(1.0, egui::Color32::DARK_GRAY),
                egui::StrokeKind::Inside,
            );

            self.draw_sweater(&painter, rect);
            self.draw_wall(&painter, rect);
            for (balloon, fill) in self.model.balloons().iter().zip(BALLOON_FILLS) {
                self.draw_balloon(&painter, rect, balloon, fill);
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_info_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
