use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Identifier for one of the two balloons owned by a
/// [`crate::model::SystemModel`].
///
/// Balloons never hold a reference to each other; the model resolves the
/// "other" balloon through [`BalloonId::other`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BalloonId {
    A,
    B,
}

impl BalloonId {
    pub const ALL: [BalloonId; 2] = [BalloonId::A, BalloonId::B];

    /// Index into the model's balloon array.
    pub fn index(self) -> usize {
        match self {
            BalloonId::A => 0,
            BalloonId::B => 1,
        }
    }

    pub fn other(self) -> BalloonId {
        match self {
            BalloonId::A => BalloonId::B,
            BalloonId::B => BalloonId::A,
        }
    }
}

/// Axis-aligned rectangle, `min` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds2 {
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Inclusive on all four edges.
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn contains_bounds(&self, other: &Bounds2) -> bool {
        other.min.x >= self.min.x
            && other.max.x <= self.max.x
            && other.min.y >= self.min.y
            && other.max.y <= self.max.y
    }

    pub fn intersects(&self, other: &Bounds2) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Clamps a top-left origin so that a box of `size` stays inside `self`.
    ///
    /// If `size` is larger than `self` on an axis, the box is pinned to the
    /// minimum edge on that axis.
    pub fn clamp_origin(&self, origin: Vec2, size: Vec2) -> Vec2 {
        let max_x = (self.max.x - size.x).max(self.min.x);
        let max_y = (self.max.y - size.y).max(self.min.y);
        Vec2::new(origin.x.clamp(self.min.x, max_x), origin.y.clamp(self.min.y, max_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_balloon_is_symmetric() {
        for id in BalloonId::ALL {
            assert_eq!(id.other().other(), id);
            assert_ne!(id.other(), id);
        }
        assert_eq!(BalloonId::A.index(), 0);
        assert_eq!(BalloonId::B.index(), 1);
    }

    #[test]
    fn containment_and_intersection() {
        let outer = Bounds2::from_origin_size(Vec2::ZERO, Vec2::new(100.0, 50.0));
        let inner = Bounds2::from_origin_size(Vec2::new(10.0, 10.0), Vec2::new(20.0, 20.0));
        let apart = Bounds2::from_origin_size(Vec2::new(200.0, 0.0), Vec2::new(5.0, 5.0));

        assert!(outer.contains_bounds(&inner));
        assert!(!inner.contains_bounds(&outer));
        assert!(outer.intersects(&inner));
        assert!(!outer.intersects(&apart));
        assert!(outer.contains_point(Vec2::new(100.0, 50.0)));
        assert!(!outer.contains_point(Vec2::new(100.1, 50.0)));
        assert_eq!(outer.center(), Vec2::new(50.0, 25.0));
    }

    #[test]
    fn clamp_origin_keeps_box_inside() {
        let area = Bounds2::from_origin_size(Vec2::ZERO, Vec2::new(600.0, 504.0));
        let size = Vec2::new(134.0, 222.0);

        assert_eq!(
            area.clamp_origin(Vec2::new(700.0, -20.0), size),
            Vec2::new(466.0, 0.0)
        );
        assert_eq!(
            area.clamp_origin(Vec2::new(-5.0, 400.0), size),
            Vec2::new(0.0, 282.0)
        );
        assert_eq!(
            area.clamp_origin(Vec2::new(10.0, 20.0), size),
            Vec2::new(10.0, 20.0)
        );
    }
}
