//! Movement direction classification.
//!
//! Screen coordinates: +y points down, so negative angles are "up".
//! Diagonal bands are 30 degrees wide, centered on the 45-degree diagonals;
//! the four cardinal bands fill the rest of the circle.

use std::f32::consts::{FRAC_PI_4, PI};

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

const HALF_DIAGONAL: f32 = PI / 12.0;

/// Half-open angular bands `[lo, hi)` covering `[-PI, PI)` in increasing
/// order. `PI` itself belongs to the last band.
pub fn bands() -> [(Direction, f32, f32); 9] {
    let q = FRAC_PI_4;
    let h = HALF_DIAGONAL;
    [
        (Direction::Left, -PI, -3.0 * q - h),
        (Direction::UpLeft, -3.0 * q - h, -3.0 * q + h),
        (Direction::Up, -3.0 * q + h, -q - h),
        (Direction::UpRight, -q - h, -q + h),
        (Direction::Right, -q + h, q - h),
        (Direction::DownRight, q - h, q + h),
        (Direction::Down, q + h, 3.0 * q - h),
        (Direction::DownLeft, 3.0 * q - h, 3.0 * q + h),
        (Direction::Left, 3.0 * q + h, PI),
    ]
}

/// Maps an angle in `[-PI, PI]` to its band, `None` outside that range.
pub fn direction_of_angle(angle: f32) -> Option<Direction> {
    if angle == PI {
        return Some(Direction::Left);
    }
    bands()
        .into_iter()
        .find(|&(_, lo, hi)| angle >= lo && angle < hi)
        .map(|(direction, _, _)| direction)
}

/// Direction of travel from `old` to `new`.
///
/// Returns `None` when the points coincide (no movement) or the inputs are
/// not finite; callers keep their previous direction in that case.
pub fn get_direction(new: Vec2, old: Vec2) -> Option<Direction> {
    let d = new - old;
    if d == Vec2::ZERO {
        return None;
    }
    direction_of_angle(d.y.atan2(d.x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    #[test]
    fn cardinal_and_diagonal_moves() {
        let o = Vec2::ZERO;
        assert_eq!(get_direction(Vec2::new(1.0, 0.0), o), Some(Direction::Right));
        assert_eq!(get_direction(Vec2::new(-1.0, 0.0), o), Some(Direction::Left));
        assert_eq!(get_direction(Vec2::new(0.0, -1.0), o), Some(Direction::Up));
        assert_eq!(get_direction(Vec2::new(0.0, 1.0), o), Some(Direction::Down));
        assert_eq!(get_direction(Vec2::new(1.0, -1.0), o), Some(Direction::UpRight));
        assert_eq!(get_direction(Vec2::new(-1.0, -1.0), o), Some(Direction::UpLeft));
        assert_eq!(get_direction(Vec2::new(1.0, 1.0), o), Some(Direction::DownRight));
        assert_eq!(get_direction(Vec2::new(-1.0, 1.0), o), Some(Direction::DownLeft));
    }

    #[test]
    fn shallow_diagonal_counts_as_cardinal() {
        // 20 degrees below horizontal is outside the 30..60 degree diagonal band.
        let angle = 20.0_f32.to_radians();
        let p = Vec2::new(angle.cos(), angle.sin());
        assert_eq!(get_direction(p, Vec2::ZERO), Some(Direction::Right));

        let angle = 35.0_f32.to_radians();
        let p = Vec2::new(angle.cos(), angle.sin());
        assert_eq!(get_direction(p, Vec2::ZERO), Some(Direction::DownRight));
    }

    #[test]
    fn no_movement_has_no_direction() {
        let p = Vec2::new(4.0, 2.0);
        assert_eq!(get_direction(p, p), None);
        assert_eq!(get_direction(Vec2::new(f32::NAN, 0.0), p), None);
    }

    #[test]
    fn classification_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let a = Vec2::new(rng.random_range(-50.0..50.0), rng.random_range(-50.0..50.0));
            let b = Vec2::new(rng.random_range(-50.0..50.0), rng.random_range(-50.0..50.0));
            assert_eq!(get_direction(a, b), get_direction(a, b));
        }
    }

    #[test]
    fn bands_partition_the_circle() {
        let bands = bands();
        assert_eq!(bands[0].1, -PI);
        assert_eq!(bands[bands.len() - 1].2, PI);
        for pair in bands.windows(2) {
            assert_eq!(pair[0].2, pair[1].1, "gap or overlap between bands");
        }

        let steps = 10_000;
        for i in 0..=steps {
            let angle = -PI + 2.0 * PI * (i as f32) / (steps as f32);
            let angle = angle.clamp(-PI, PI);
            let hits = bands
                .iter()
                .filter(|&&(_, lo, hi)| angle >= lo && (angle < hi || (hi == PI && angle == PI)))
                .count();
            assert_eq!(hits, 1, "angle {angle} falls in {hits} bands");
            assert!(direction_of_angle(angle).is_some());
        }
    }

    #[test]
    fn angles_outside_range_have_no_band() {
        assert_eq!(direction_of_angle(4.0), None);
        assert_eq!(direction_of_angle(-4.0), None);
        assert_eq!(direction_of_angle(f32::NAN), None);
        assert_eq!(direction_of_angle(PI), Some(Direction::Left));
        assert_eq!(direction_of_angle(-PI), Some(Direction::Left));
    }
}
