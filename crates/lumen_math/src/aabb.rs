use crate::{Interval, Ray, Vec3};

/// Axis-aligned bounding box: one interval per axis.
///
/// Boxes only answer whether a ray crosses them inside a parametric range;
/// the exact crossing is resolved by the primitive itself. Every
/// constructor pads near-degenerate axes so planar geometry still yields a
/// usable volume for BVH partitioning.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Build from three axis intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut bbox = Self { x, y, z };
        bbox.pad_to_minimums();
        bbox
    }

    /// Build from two extremal points, in either coordinate order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));

        let mut bbox = Self { x, y, z };
        bbox.pad_to_minimums();
        bbox
    }

    /// The smallest box containing both inputs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Interval for a given axis (0 = X, 1 = Y, 2 = Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            1 => self.y,
            2 => self.z,
            _ => self.x,
        }
    }

    /// Slab-method ray-box test within `ray_t`.
    ///
    /// Per axis, the entry/exit parameters narrow the running interval;
    /// the test short-circuits as soon as the interval empties. A zero
    /// direction component divides to +-infinity, which resolves the axis
    /// as always-inside or always-outside without a special case.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let ax = self.axis_interval(axis);
            let adinv = 1.0 / r.direction[axis];

            let t0 = (ax.min - r.origin[axis]) * adinv;
            let t1 = (ax.max - r.origin[axis]) * adinv;

            let (entry, exit) = if t0 < t1 { (t0, t1) } else { (t1, t0) };
            ray_t.min = ray_t.min.max(entry);
            ray_t.max = ray_t.max.min(exit);

            if ray_t.max <= ray_t.min {
                return false;
            }
        }
        true
    }

    /// Index of the axis with the largest extent (0 = X, 1 = Y, 2 = Z).
    pub fn longest_axis(&self) -> usize {
        if self.x.size() > self.y.size() {
            if self.x.size() > self.z.size() {
                0
            } else {
                2
            }
        } else if self.y.size() > self.z.size() {
            1
        } else {
            2
        }
    }

    /// The box shifted by an offset vector.
    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb::new(
            self.x.add_scalar(offset.x),
            self.y.add_scalar(offset.y),
            self.z.add_scalar(offset.z),
        )
    }

    /// Widen any axis thinner than a minimum delta so the box never
    /// degenerates to a plane.
    fn pad_to_minimums(&mut self) {
        let delta = 0.0001;
        if self.x.size() < delta {
            self.x = self.x.expand(delta);
        }
        if self.y.size() < delta {
            self.y = self.y.expand(delta);
        }
        if self.z.size() < delta {
            self.z = self.z.expand(delta);
        }
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub const UNIVERSE: Aabb = Aabb {
        x: Interval::UNIVERSE,
        y: Interval::UNIVERSE,
        z: Interval::UNIVERSE,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains_box(outer: &Aabb, inner: &Aabb) -> bool {
        outer.x.contains(inner.x.min)
            && outer.x.contains(inner.x.max)
            && outer.y.contains(inner.y.min)
            && outer.y.contains(inner.y.max)
            && outer.z.contains(inner.z.min)
            && outer.z.contains(inner.z.max)
    }

    #[test]
    fn test_from_points_orders_extrema() {
        let bbox = Aabb::from_points(Vec3::new(10.0, 0.0, 5.0), Vec3::new(0.0, 10.0, -5.0));

        assert_eq!(bbox.x.min, 0.0);
        assert_eq!(bbox.x.max, 10.0);
        assert_eq!(bbox.y.min, 0.0);
        assert_eq!(bbox.y.max, 10.0);
        assert_eq!(bbox.z.min, -5.0);
        assert_eq!(bbox.z.max, 5.0);
    }

    #[test]
    fn test_surrounding_contains_both() {
        let box1 = Aabb::from_points(Vec3::ZERO, Vec3::new(5.0, 5.0, 5.0));
        let box2 = Aabb::from_points(Vec3::new(3.0, -2.0, 3.0), Vec3::new(10.0, 10.0, 10.0));
        let merged = Aabb::surrounding(&box1, &box2);

        assert!(contains_box(&merged, &box1));
        assert!(contains_box(&merged, &box2));
        assert_eq!(merged.x.min, 0.0);
        assert_eq!(merged.x.max, 10.0);
        assert_eq!(merged.y.min, -2.0);
    }

    #[test]
    fn test_hit_through_center() {
        let bbox = Aabb::from_points(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        // One axis-aligned ray through the center per axis
        for dir in [Vec3::X, Vec3::Y, Vec3::Z] {
            let ray = Ray::new_simple(-5.0 * dir, dir);
            assert!(bbox.hit(&ray, Interval::new(0.0, 100.0)));
        }
    }

    #[test]
    fn test_hit_misses() {
        let bbox = Aabb::from_points(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        // Pointing away
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(!bbox.hit(&ray, Interval::new(0.0, 100.0)));

        // Offset with no overlap on the x slab
        let ray = Ray::new_simple(Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(!bbox.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_hit_zero_direction_component() {
        let bbox = Aabb::from_points(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        // Direction has a zero y component; inside the y slab, so still hits
        let ray = Ray::new_simple(Vec3::new(-5.0, 0.5, 0.0), Vec3::X);
        assert!(bbox.hit(&ray, Interval::new(0.0, 100.0)));

        // Outside the y slab with zero y direction: the infinite reciprocal
        // empties the interval
        let ray = Ray::new_simple(Vec3::new(-5.0, 2.0, 0.0), Vec3::X);
        assert!(!bbox.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_longest_axis() {
        let bbox = Aabb::from_points(Vec3::ZERO, Vec3::new(10.0, 1.0, 1.0));
        assert_eq!(bbox.longest_axis(), 0);

        let bbox = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 10.0, 1.0));
        assert_eq!(bbox.longest_axis(), 1);

        let bbox = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 1.0, 10.0));
        assert_eq!(bbox.longest_axis(), 2);
    }

    #[test]
    fn test_pad_keeps_planar_box_usable() {
        // Zero thickness on z
        let bbox = Aabb::from_points(Vec3::new(0.0, 0.0, 1.0), Vec3::new(4.0, 4.0, 1.0));

        assert!(bbox.z.size() > 0.0);

        let ray = Ray::new_simple(Vec3::new(2.0, 2.0, -3.0), Vec3::Z);
        assert!(bbox.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_translate() {
        let bbox = Aabb::from_points(Vec3::ZERO, Vec3::ONE).translate(Vec3::new(5.0, 0.0, 0.0));

        assert_eq!(bbox.x.min, 5.0);
        assert_eq!(bbox.x.max, 6.0);
        assert_eq!(bbox.y.min, 0.0);
    }
}
