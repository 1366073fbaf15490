//! Primitive collision shapes and intersection algorithms

use crate::foundation::math::Vec3;
use crate::scene::Entity;

/// A ray for ray casting and line-of-sight checks
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Ray from `from` toward `to`, plus the distance between them
    ///
    /// Returns `None` when the points coincide.
    pub fn between(from: Vec3, to: Vec3) -> Option<(Self, f32)> {
        let span = to - from;
        let length = span.magnitude();
        if length <= f32::EPSILON || !length.is_finite() {
            return None;
        }
        Some((
            Self {
                origin: from,
                direction: span / length,
            },
            length,
        ))
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Result of a ray intersection test
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// The entity that was hit
    pub entity: Entity,
    /// The distance from the ray origin to the hit point
    pub distance: f32,
    /// The point of intersection in world space
    pub point: Vec3,
    /// The surface normal at the intersection point
    pub normal: Vec3,
}

/// A bounding sphere for collision detection
#[derive(Debug, Clone, Copy)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if this sphere intersects with another
    pub fn intersects(&self, other: &Self) -> bool {
        let distance_squared = (self.center - other.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared <= radius_sum * radius_sum
    }

    /// Test ray intersection with this sphere
    ///
    /// Returns (distance, hit_point, normal) for the closest intersection in
    /// front of the origin. A ray starting inside the sphere reports the exit
    /// point.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, Vec3, Vec3)> {
        // Solve |origin + t*direction - center|^2 = radius^2
        let oc = ray.origin - self.center;
        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * oc.dot(&ray.direction);
        let c = oc.dot(&oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_discriminant = discriminant.sqrt();
        let t1 = (-b - sqrt_discriminant) / (2.0 * a);
        let t2 = (-b + sqrt_discriminant) / (2.0 * a);

        let t = if t1 > 0.0 {
            t1
        } else if t2 > 0.0 {
            t2
        } else {
            return None;
        };

        let hit_point = ray.point_at(t);
        let normal = (hit_point - self.center).normalize();

        Some((t, hit_point, normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ray_normalizes_direction() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -5.0));
        assert_relative_eq!(ray.direction, Vec3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(ray.point_at(2.0), Vec3::new(0.0, 0.0, -2.0));
    }

    #[test]
    fn test_ray_between() {
        let (ray, length) = Ray::between(Vec3::zeros(), Vec3::new(3.0, 4.0, 0.0)).unwrap();
        assert_relative_eq!(length, 5.0);
        assert_relative_eq!(ray.direction, Vec3::new(0.6, 0.8, 0.0));
        assert!(Ray::between(Vec3::x(), Vec3::x()).is_none());
    }

    #[test]
    fn test_sphere_ray_hit_front() {
        let sphere = BoundingSphere::new(Vec3::new(0.0, 0.0, -10.0), 2.0);
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        let (distance, point, normal) = sphere.intersect_ray(&ray).unwrap();
        assert_relative_eq!(distance, 8.0, epsilon = 1e-5);
        assert_relative_eq!(point, Vec3::new(0.0, 0.0, -8.0), epsilon = 1e-5);
        assert_relative_eq!(normal, Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_sphere_ray_miss_behind() {
        let sphere = BoundingSphere::new(Vec3::new(0.0, 0.0, 10.0), 2.0);
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        assert!(sphere.intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_sphere_overlap() {
        let a = BoundingSphere::new(Vec3::zeros(), 1.0);
        let b = BoundingSphere::new(Vec3::new(1.5, 0.0, 0.0), 0.5);
        let c = BoundingSphere::new(Vec3::new(3.0, 0.0, 0.0), 0.5);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }
}
