//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over shared hittables, built once at scene-load time by
//! recursive median splits along the longest axis of each range's union
//! box. Traversal is near O(log N) for well-distributed scenes and
//! degrades toward O(N) when most boxes overlap the ray.

use crate::{HitRecord, Hittable, HittableList};
use lumen_math::{Aabb, Interval, Ray};
use std::sync::Arc;

/// Internal binary-tree node over shared primitives.
///
/// Every node has exactly two children; a single-element range aliases the
/// same primitive as both children, keeping the traversal shape uniform at
/// the cost of one redundant hit test at true leaves. The tree is immutable
/// once built.
pub struct BvhNode {
    left: Arc<dyn Hittable>,
    right: Arc<dyn Hittable>,
    bbox: Aabb,
}

impl BvhNode {
    /// Build a BVH over the objects of a list.
    ///
    /// Panics if the list is empty; an empty scene is a caller
    /// precondition violation, not a recoverable state.
    pub fn from_list(list: HittableList) -> Self {
        Self::new(list.into_objects())
    }

    /// Build a BVH over shared hittables.
    ///
    /// Only the median split reorders the vector; no children are copied
    /// beyond the node objects themselves.
    pub fn new(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        assert!(!objects.is_empty(), "cannot build a BVH over zero objects");

        log::debug!("building BVH over {} hittables", objects.len());
        let end = objects.len();
        Self::build(&mut objects, 0, end)
    }

    fn build(objects: &mut [Arc<dyn Hittable>], start: usize, end: usize) -> Self {
        // Union box of the active range decides the split axis
        let mut bbox = Aabb::EMPTY;
        for object in &objects[start..end] {
            bbox = Aabb::surrounding(&bbox, &object.bounding_box());
        }
        let axis = bbox.longest_axis();

        let span = end - start;
        let (left, right): (Arc<dyn Hittable>, Arc<dyn Hittable>) = match span {
            1 => (objects[start].clone(), objects[start].clone()),
            2 => (objects[start].clone(), objects[start + 1].clone()),
            _ => {
                // Median split by ascending minimum bound on the chosen
                // axis: balanced by count, not by cost (no SAH)
                objects[start..end].sort_unstable_by(|a, b| {
                    let a_min = a.bounding_box().axis_interval(axis).min;
                    let b_min = b.bounding_box().axis_interval(axis).min;
                    a_min.partial_cmp(&b_min).unwrap_or(std::cmp::Ordering::Equal)
                });

                let mid = start + span / 2;
                (
                    Arc::new(Self::build(objects, start, mid)) as Arc<dyn Hittable>,
                    Arc::new(Self::build(objects, mid, end)) as Arc<dyn Hittable>,
                )
            }
        };

        Self { left, right, bbox }
    }
}

impl Hittable for BvhNode {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        if !self.bbox.hit(ray, ray_t) {
            return None;
        }

        let hit_left = self.left.hit(ray, ray_t);

        // The right subtree only needs to beat the left hit, so tighten its
        // far bound; it can never return a farther valid hit.
        let right_max = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
        let hit_right = self.right.hit(ray, Interval::new(ray_t.min, right_max));

        hit_right.or(hit_left)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
