use foundation::math::{
    Ecef, Geodetic, Ray, Vec3, WGS84_A, ecef_to_geodetic, intersect_wgs84, surface_point,
};

/// Geographic extent in radians, west/south/east/north.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Extent {
    pub west_rad: f64,
    pub south_rad: f64,
    pub east_rad: f64,
    pub north_rad: f64,
}

impl Extent {
    pub fn new(west_rad: f64, south_rad: f64, east_rad: f64, north_rad: f64) -> Self {
        Self {
            west_rad,
            south_rad,
            east_rad,
            north_rad,
        }
    }

    pub fn from_degrees(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self::new(
            west.to_radians(),
            south.to_radians(),
            east.to_radians(),
            north.to_radians(),
        )
    }
}

/// Direction bisecting two unit directions.
///
/// When the inputs cancel (antipodal corners, midpoint cancellation in a
/// flight blend) the bisector is ambiguous; an axis orthogonal to the first
/// input is substituted so callers never see a zero or NaN direction. The
/// flight planner reuses this as its degenerate-blend fallback.
pub fn bisect_directions(a: Vec3, b: Vec3) -> Vec3 {
    let mid = (a + b).normalize();
    if mid != Vec3::ZERO {
        return mid;
    }
    let axis = a.cross(Vec3::UP).normalize();
    if axis != Vec3::ZERO {
        return axis;
    }
    a.cross(Vec3::new(1.0, 0.0, 0.0)).normalize()
}

/// Surface center of an extent: the bisector of the two corner directions,
/// dropped back onto the ellipsoid.
pub fn extent_center(extent: Extent) -> Geodetic {
    let sw = surface_point(Geodetic::new(extent.south_rad, extent.west_rad, 0.0))
        .to_vec3()
        .normalize();
    let ne = surface_point(Geodetic::new(extent.north_rad, extent.east_rad, 0.0))
        .to_vec3()
        .normalize();

    let g = bisect_directions(sw, ne);
    let center = intersect_wgs84(Ray::new(Vec3::ZERO, g)).unwrap_or(g * WGS84_A);
    ecef_to_geodetic(Ecef::from(center))
}
