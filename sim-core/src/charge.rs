use glam::Vec2;

/// A charge pinned at a fixed position.
///
/// `moved` marks a sweater electron that has been handed to a balloon; it is
/// cleared again only by a reset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointCharge {
    position: Vec2,
    pub moved: bool,
}

impl PointCharge {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            moved: false,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn reset(&mut self) {
        self.moved = false;
    }
}

/// A charge that can be pushed away from its rest position.
///
/// Used for the wall's electrons, which are displaced by nearby charged
/// balloons and snap back when the inducing charge goes away.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovableCharge {
    rest: PointCharge,
    position: Vec2,
}

impl MovableCharge {
    pub fn new(rest_position: Vec2) -> Self {
        Self {
            rest: PointCharge::new(rest_position),
            position: rest_position,
        }
    }

    pub fn rest_position(&self) -> Vec2 {
        self.rest.position()
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Distance from the rest position.
    pub fn displacement(&self) -> f32 {
        self.position.distance(self.rest.position())
    }

    pub fn reset(&mut self) {
        self.rest.reset();
        self.position = self.rest.position();
    }
}
