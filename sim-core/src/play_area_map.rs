//! Named regions of the play area.
//!
//! Balloon centers are looked up against static range tables to get a row,
//! a column, and (near interesting spots) a landmark. The tables are built
//! once from the configuration.

use serde::{Deserialize, Serialize};

use crate::config::{LandmarkConfig, SimConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Row {
    Upper,
    Center,
    Lower,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    LeftArm,
    LeftSideOfSweater,
    RightSideOfSweater,
    RightArm,
    LeftPlayArea,
    CenterPlayArea,
    RightPlayArea,
    Wall,
    RightEdge,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Landmark {
    AtLeftEdge,
    AtNearSweater,
    AtVeryCloseToSweater,
    AtCenterPlayArea,
    AtNearWall,
    AtVeryCloseToWall,
    AtWall,
    AtNearRightEdge,
    AtVeryCloseToRightEdge,
    AtRightEdge,
}

/// Balloon center x coordinates at the edges of motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct XPositions {
    /// Balloon pressed against the left edge of the play area.
    pub left_edge: f32,
    /// Balloon pressed against the wall.
    pub at_wall: f32,
    /// Balloon pressed against the right edge with the wall removed.
    pub right_edge: f32,
}

/// Static lookup tables for rows, columns, and landmarks.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayAreaMap {
    /// Exclusive upper y limit per row, increasing.
    rows: Vec<(Row, f32)>,
    /// Exclusive upper x limit per column, increasing.
    columns: Vec<(Column, f32)>,
    x_positions: XPositions,
    sweater_right: f32,
    wall_x: f32,
    play_width: f32,
    balloon_half_width: f32,
    bands: LandmarkConfig,
}

impl PlayAreaMap {
    pub fn new(cfg: &SimConfig) -> Self {
        let h = cfg.play_area.height;
        let rows = vec![
            (Row::Upper, h / 3.0),
            (Row::Center, 2.0 * h / 3.0),
            (Row::Lower, f32::INFINITY),
        ];

        let sx = cfg.sweater.x;
        let sw = cfg.sweater.width;
        let sweater_right = sx + sw;
        let wall_x = cfg.wall.x;
        let third = (wall_x - sweater_right) / 3.0;
        let columns = vec![
            (Column::LeftArm, sx + sw * 0.25),
            (Column::LeftSideOfSweater, sx + sw * 0.5),
            (Column::RightSideOfSweater, sx + sw * 0.75),
            (Column::RightArm, sweater_right),
            (Column::LeftPlayArea, sweater_right + third),
            (Column::CenterPlayArea, sweater_right + 2.0 * third),
            (Column::RightPlayArea, wall_x),
            (Column::Wall, wall_x + cfg.wall.width),
            (Column::RightEdge, f32::INFINITY),
        ];

        let half = cfg.balloon.width / 2.0;
        let x_positions = XPositions {
            left_edge: half,
            at_wall: wall_x - half,
            right_edge: cfg.play_area.width - half,
        };

        Self {
            rows,
            columns,
            x_positions,
            sweater_right,
            wall_x,
            play_width: cfg.play_area.width,
            balloon_half_width: half,
            bands: cfg.landmarks,
        }
    }

    pub fn x_positions(&self) -> XPositions {
        self.x_positions
    }

    /// Row containing a center y.
    pub fn row(&self, y: f32) -> Row {
        self.rows
            .iter()
            .find(|&&(_, hi)| y < hi)
            .map_or(Row::Lower, |&(row, _)| row)
    }

    /// Column containing a center x.
    pub fn column(&self, x: f32) -> Column {
        self.columns
            .iter()
            .find(|&&(_, hi)| x < hi)
            .map_or(Column::RightEdge, |&(column, _)| column)
    }

    /// Whether a balloon centered at `x` rests against the visible wall.
    pub fn is_at_wall(&self, x: f32, wall_visible: bool) -> bool {
        wall_visible && (x - self.x_positions.at_wall).abs() <= 1e-3
    }

    /// Landmark near a center x, if any. First match wins.
    pub fn landmark(&self, x: f32, wall_visible: bool) -> Option<Landmark> {
        let b = &self.bands;

        if x <= self.x_positions.left_edge + b.tolerance {
            return Some(Landmark::AtLeftEdge);
        }

        let (edge, at, very_close, near) = if wall_visible {
            (
                self.x_positions.at_wall,
                Landmark::AtWall,
                Landmark::AtVeryCloseToWall,
                Landmark::AtNearWall,
            )
        } else {
            (
                self.x_positions.right_edge,
                Landmark::AtRightEdge,
                Landmark::AtVeryCloseToRightEdge,
                Landmark::AtNearRightEdge,
            )
        };
        // The wall is a stop on both sides; the right edge is open beyond it.
        let at_edge = if wall_visible {
            (x - edge).abs() <= b.tolerance
        } else {
            x >= edge - b.tolerance
        };
        if at_edge {
            return Some(at);
        }
        if x >= edge - b.very_close && x < edge - b.tolerance {
            return Some(very_close);
        }
        if x >= edge - b.near && x < edge - b.very_close {
            return Some(near);
        }

        let gap = x - self.balloon_half_width - self.sweater_right;
        if gap > 0.0 && gap <= b.very_close {
            return Some(Landmark::AtVeryCloseToSweater);
        }
        if gap > b.very_close && gap <= b.near {
            return Some(Landmark::AtNearSweater);
        }

        let right_limit = if wall_visible {
            self.wall_x
        } else {
            self.play_width
        };
        let mid = (self.sweater_right + right_limit) / 2.0;
        if (x - mid).abs() <= b.center_half_width {
            return Some(Landmark::AtCenterPlayArea);
        }

        None
    }
}
