use foundation::math::{Geodetic, Mercator, geodetic_from_mercator};
use serde::{Deserialize, Serialize};

use crate::gate::GateKind;

/// Tile coordinate in ZXY scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Geographic corners of this tile, south-west then north-east.
    ///
    /// Tiles address the square mercator band; y counts down from the
    /// northern band edge.
    pub fn bounds(&self) -> (Geodetic, Geodetic) {
        let n = f64::from(1u32 << self.z);
        let merc = |tx: f64, ty: f64| {
            Mercator::new((tx / n) * 2.0 - 1.0, 1.0 - (ty / n) * 2.0)
        };
        let sw = geodetic_from_mercator(merc(f64::from(self.x), f64::from(self.y) + 1.0));
        let ne = geodetic_from_mercator(merc(f64::from(self.x) + 1.0, f64::from(self.y)));
        (sw, ne)
    }
}

/// One unit of background streaming work, addressed to a subsystem.
///
/// Transport-agnostic and serde-serializable so an application can put
/// requests on a wire; the navigation core only ever sees them in-process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRequest {
    pub subsystem: GateKind,
    pub coord: TileCoord,
}

impl TileRequest {
    pub fn new(subsystem: GateKind, coord: TileCoord) -> Self {
        Self { subsystem, coord }
    }
}

#[cfg(test)]
mod tests {
    use super::{TileCoord, TileRequest};
    use crate::gate::GateKind;
    use foundation::math::MAX_MERCATOR_LAT;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn round_trips_through_json() {
        let req = TileRequest::new(GateKind::TerrainStream, TileCoord::new(7, 66, 45));
        let json = serde_json::to_string(&req).expect("serialize");
        assert!(json.contains("terrain_stream"));
        let back: TileRequest = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, req);
    }

    #[test]
    fn root_tile_spans_the_mercator_band() {
        let (sw, ne) = TileCoord::new(0, 0, 0).bounds();
        assert_close(sw.lon_rad, -std::f64::consts::PI, 1e-12);
        assert_close(ne.lon_rad, std::f64::consts::PI, 1e-12);
        assert_close(sw.lat_rad, -MAX_MERCATOR_LAT, 1e-5);
        assert_close(ne.lat_rad, MAX_MERCATOR_LAT, 1e-5);
    }

    #[test]
    fn z1_tiles_split_at_the_equator() {
        let (sw, ne) = TileCoord::new(1, 0, 0).bounds();
        assert_close(sw.lat_rad, 0.0, 1e-12);
        assert_close(sw.lon_rad, -std::f64::consts::PI, 1e-12);
        assert_close(ne.lon_rad, 0.0, 1e-12);
        assert!(ne.lat_rad > 0.0);
    }
}
