use foundation::math::{Ecef, Geodetic, Mercator, Vec3, ecef_to_geodetic, mercator_from_geodetic};

/// Derived geographic view of the camera eye.
///
/// Never authoritative: the Cartesian eye is, and this is recomputed from it
/// on every update. The mercator form exists only while the latitude is
/// inside the projection's valid band.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeodeticTracker {
    geo: Geodetic,
    mercator: Option<Mercator>,
}

impl GeodeticTracker {
    pub fn new() -> Self {
        Self {
            geo: Geodetic::new(0.0, 0.0, 0.0),
            mercator: mercator_from_geodetic(Geodetic::new(0.0, 0.0, 0.0)),
        }
    }

    /// Re-derive longitude/latitude/height (and the mercator form when in
    /// band) from a Cartesian eye position.
    pub fn update_from_eye(&mut self, eye: Vec3) {
        self.geo = ecef_to_geodetic(Ecef::from(eye));
        self.mercator = mercator_from_geodetic(self.geo);
    }

    pub fn geodetic(&self) -> Geodetic {
        self.geo
    }

    /// `None` outside the mercator band; callers check before use.
    pub fn mercator(&self) -> Option<Mercator> {
        self.mercator
    }
}

impl Default for GeodeticTracker {
    fn default() -> Self {
        Self::new()
    }
}
