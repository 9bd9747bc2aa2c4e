use std::f64::consts::{FRAC_PI_4, PI};

use super::Geodetic;

/// Latitude limit of the square web-mercator projection (radians).
///
/// 85.05113 degrees: the latitude where the normalized mercator y
/// coordinate reaches 1.
pub const MAX_MERCATOR_LAT: f64 = 85.05113 * PI / 180.0;

/// Normalized web-mercator coordinates, both axes in `[-1, 1]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mercator {
    pub x: f64,
    pub y: f64,
}

impl Mercator {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Forward projection. `None` outside the valid latitude band; callers
/// must treat the mercator form as unset there.
pub fn mercator_from_geodetic(geo: Geodetic) -> Option<Mercator> {
    if geo.lat_rad.abs() > MAX_MERCATOR_LAT {
        return None;
    }
    let x = geo.lon_rad / PI;
    let y = (FRAC_PI_4 + 0.5 * geo.lat_rad).tan().ln() / PI;
    Some(Mercator::new(x, y))
}

/// Inverse projection back to zero-height geodetic coordinates.
pub fn geodetic_from_mercator(merc: Mercator) -> Geodetic {
    let lon = merc.x * PI;
    let lat = 2.0 * (merc.y * PI).exp().atan() - 2.0 * FRAC_PI_4;
    Geodetic::new(lat, lon, 0.0)
}

#[cfg(test)]
mod tests {
    use super::{MAX_MERCATOR_LAT, Mercator, geodetic_from_mercator, mercator_from_geodetic};
    use crate::math::Geodetic;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn origin_maps_to_origin() {
        let m = mercator_from_geodetic(Geodetic::new(0.0, 0.0, 0.0)).expect("in band");
        assert_close(m.x, 0.0, 1e-12);
        assert_close(m.y, 0.0, 1e-12);
    }

    #[test]
    fn band_edge_reaches_unit_square() {
        let m = mercator_from_geodetic(Geodetic::new(MAX_MERCATOR_LAT, std::f64::consts::PI, 0.0))
            .expect("band edge is valid");
        assert_close(m.x, 1.0, 1e-12);
        assert_close(m.y, 1.0, 1e-5);
    }

    #[test]
    fn outside_band_is_unset() {
        let polar = Geodetic::from_degrees(86.0, 10.0, 0.0);
        assert!(mercator_from_geodetic(polar).is_none());
        let south = Geodetic::from_degrees(-89.9, 10.0, 0.0);
        assert!(mercator_from_geodetic(south).is_none());
    }

    #[test]
    fn round_trips_inside_band() {
        let geo = Geodetic::from_degrees(47.37, 8.54, 0.0);
        let m = mercator_from_geodetic(geo).expect("in band");
        let rt = geodetic_from_mercator(m);
        assert_close(rt.lat_rad, geo.lat_rad, 1e-12);
        assert_close(rt.lon_rad, geo.lon_rad, 1e-12);
    }

    #[test]
    fn height_does_not_affect_projection() {
        let low = mercator_from_geodetic(Geodetic::from_degrees(10.0, 20.0, 0.0)).expect("in band");
        let high =
            mercator_from_geodetic(Geodetic::from_degrees(10.0, 20.0, 9_000.0)).expect("in band");
        assert_eq!(low, Mercator::new(high.x, high.y));
    }
}
