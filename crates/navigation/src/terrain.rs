use foundation::math::{Ecef, Geodetic, Vec3, ecef_to_geodetic, surface_point};

/// Identifier of a quad-tree terrain node.
///
/// Node lifetime is controlled externally by tile eviction, so the camera
/// never holds a reference to a node, only this key, and resolves it
/// through the provider every tick.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct NodeKey(pub u64);

/// The terrain collaborator as the navigator sees it.
pub trait TerrainProvider {
    /// Key of the resident node under a geodetic location, if any.
    fn node_at(&self, geo: Geodetic) -> Option<NodeKey>;

    /// Height of `eye` above the terrain inside `node`, updating the
    /// node-local contact position in place. `None` when the node has been
    /// evicted since `node_at`.
    fn terrain_point(&mut self, node: NodeKey, eye: Vec3, local: &mut Vec3) -> Option<f64>;
}

/// Where the eye currently touches down on the terrain.
///
/// Refreshed every non-flying tick; intentionally stale during flight.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ContactState {
    pub node: Option<NodeKey>,
    /// Contact position local to the node.
    pub local: Vec3,
    /// Last sampled height-above-terrain.
    pub altitude: Option<f64>,
}

impl ContactState {
    pub fn new() -> Self {
        Self {
            node: None,
            local: Vec3::ZERO,
            altitude: None,
        }
    }
}

impl Default for ContactState {
    fn default() -> Self {
        Self::new()
    }
}

/// Terrain at a constant height above the ellipsoid, one node per 10x10
/// degree cell. Stands in for the quad-tree in tests and demos.
#[derive(Debug, Copy, Clone)]
pub struct FlatTerrain {
    pub terrain_height_m: f64,
}

impl FlatTerrain {
    pub fn new(terrain_height_m: f64) -> Self {
        Self { terrain_height_m }
    }
}

impl TerrainProvider for FlatTerrain {
    fn node_at(&self, geo: Geodetic) -> Option<NodeKey> {
        let col = ((geo.lon_rad.to_degrees() + 180.0) / 10.0).floor() as u64;
        let row = ((geo.lat_rad.to_degrees() + 90.0) / 10.0).floor() as u64;
        Some(NodeKey(row * 36 + col))
    }

    fn terrain_point(&mut self, _node: NodeKey, eye: Vec3, local: &mut Vec3) -> Option<f64> {
        let geo = ecef_to_geodetic(Ecef::from(eye));
        *local = eye - surface_point(geo).to_vec3();
        Some(geo.alt_m - self.terrain_height_m)
    }
}
