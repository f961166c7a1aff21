//! Axis-aligned bounding boxes
//!
//! All gameplay collision is box-vs-box. Touching faces count as contact.

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box centered on `center` with the given half extents
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Grow (positive) or shrink (negative) every face by `amount`
    ///
    /// Shrinking never inverts the box; an axis collapses onto the center.
    pub fn expanded(&self, amount: f32) -> Self {
        let half = (self.half_extents() + Vec3::splat(amount)).max(Vec3::ZERO);
        Self::from_center(self.center(), half)
    }

    /// Overlap test (inclusive)
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        self.min.cmple(point).all() && self.max.cmpge(point).all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_center() {
        let b = Aabb::from_center(Vec3::new(1.0, 2.0, 3.0), Vec3::splat(0.5));
        assert_eq!(b.min, Vec3::new(0.5, 1.5, 2.5));
        assert_eq!(b.max, Vec3::new(1.5, 2.5, 3.5));
        assert_eq!(b.center(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_expand_and_contract() {
        let b = Aabb::from_center(Vec3::ZERO, Vec3::splat(0.5));
        let grown = b.expanded(4.0);
        assert_eq!(grown.max, Vec3::splat(4.5));
        let shrunk = b.expanded(-0.2);
        assert!((shrunk.max.x - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_contract_never_inverts() {
        let b = Aabb::from_center(Vec3::new(2.0, 0.0, 0.0), Vec3::splat(0.5));
        let collapsed = b.expanded(-3.0);
        assert_eq!(collapsed.min, collapsed.max);
        assert_eq!(collapsed.center(), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_intersects() {
        let a = Aabb::from_center(Vec3::ZERO, Vec3::splat(0.5));
        let touching = Aabb::from_center(Vec3::new(1.0, 0.0, 0.0), Vec3::splat(0.5));
        let apart = Aabb::from_center(Vec3::new(1.01, 0.0, 0.0), Vec3::splat(0.5));
        let above = Aabb::from_center(Vec3::new(0.0, 2.0, 0.0), Vec3::splat(0.5));
        assert!(a.intersects(&touching));
        assert!(!a.intersects(&apart));
        assert!(!a.intersects(&above));
    }

    #[test]
    fn test_contains_point() {
        let b = Aabb::new(Vec3::splat(1.0), Vec3::splat(-1.0));
        assert!(b.contains_point(Vec3::ZERO));
        assert!(b.contains_point(Vec3::splat(1.0)));
        assert!(!b.contains_point(Vec3::new(0.0, 1.5, 0.0)));
    }
}
