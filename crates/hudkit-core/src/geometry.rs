use crate::math::Vec2;

/// Axis-aligned bounds described by a centre point and a size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub center: Vec2,
    pub size: Vec2,
}

impl Bounds {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Bounds { center, size }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.size * 0.5
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.size * 0.5
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    pub fn is_empty(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }
}
