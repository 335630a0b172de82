//! Sphere primitive, static or linearly moving.

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use lumen_math::{Aabb, Interval, Ray, Vec3};
use std::f32::consts::PI;

/// A sphere primitive.
///
/// The center is stored as a ray so a moving sphere is just
/// `center(time) = center0 + time * (center1 - center0)`; a static sphere
/// has a zero displacement.
pub struct Sphere<M: Material> {
    center: Ray,
    radius: f32,
    material: M,
    bbox: Aabb,
}

impl<M: Material> Sphere<M> {
    /// A stationary sphere.
    pub fn new(center: Vec3, radius: f32, material: M) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center: Ray::new_simple(center, Vec3::ZERO),
            radius,
            material,
            bbox,
        }
    }

    /// A sphere moving linearly from `center0` (time 0) to `center1`
    /// (time 1). The box merges both endpoint boxes, which is conservative
    /// for any intermediate time under linear motion.
    pub fn new_moving(center0: Vec3, center1: Vec3, radius: f32, material: M) -> Self {
        let radius = radius.max(0.0);
        let center = Ray::new_simple(center0, center1 - center0);

        let rvec = Vec3::splat(radius);
        let box0 = Aabb::from_points(center.at(0.0) - rvec, center.at(0.0) + rvec);
        let box1 = Aabb::from_points(center.at(1.0) - rvec, center.at(1.0) + rvec);

        Self {
            center,
            radius,
            material,
            bbox: Aabb::surrounding(&box0, &box1),
        }
    }

    /// UV coordinates for a point on the unit sphere at the origin.
    ///
    /// `u` is the angle around the Y axis from X = -1, `v` the angle from
    /// Y = -1 to Y = +1, both mapped to [0, 1].
    fn sphere_uv(p: Vec3) -> (f32, f32) {
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl<M: Material> Hittable for Sphere<M> {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let current_center = self.center.at(ray.time);
        let oc = current_center - ray.origin;

        // Quadratic in the half-b form: h = dot(D, C - O)
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Nearest root inside the range, trying the smaller one first
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let p = ray.at(root);
        let outward_normal = (p - current_center) / self.radius;
        let (u, v) = Self::sphere_uv(outward_normal);

        let mut rec = HitRecord {
            p,
            normal: outward_normal,
            material: &self.material,
            u,
            v,
            t: root,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);

        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
