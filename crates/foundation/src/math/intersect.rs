use super::{Vec3, WGS84_A, WGS84_B};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }
}

/// First intersection of a ray with an axis-aligned ellipsoid of equatorial
/// radius `a` and polar radius `b`, centered at the origin.
///
/// Returns `None` only on a genuine miss (or a degenerate direction). Rays
/// starting inside the ellipsoid always hit.
pub fn intersect_ellipsoid(ray: Ray, a: f64, b: f64) -> Option<Vec3> {
    // Scale to unit-sphere space.
    let o = Vec3::new(ray.origin.x / a, ray.origin.y / a, ray.origin.z / b);
    let d = Vec3::new(ray.dir.x / a, ray.dir.y / a, ray.dir.z / b);

    let qa = d.length_squared();
    if qa < 1e-30 {
        return None;
    }
    let qb = 2.0 * o.dot(d);
    let qc = o.length_squared() - 1.0;

    let disc = qb * qb - 4.0 * qa * qc;
    if disc < 0.0 {
        return None;
    }

    let sqrt_disc = disc.sqrt();
    let t0 = (-qb - sqrt_disc) / (2.0 * qa);
    let t1 = (-qb + sqrt_disc) / (2.0 * qa);

    let t = if t0 >= 0.0 {
        t0
    } else if t1 >= 0.0 {
        t1
    } else {
        return None;
    };

    Some(ray.origin + ray.dir * t)
}

/// Intersection with the WGS84 ellipsoid.
pub fn intersect_wgs84(ray: Ray) -> Option<Vec3> {
    intersect_ellipsoid(ray, WGS84_A, WGS84_B)
}
