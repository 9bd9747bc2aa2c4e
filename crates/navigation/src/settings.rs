use serde::{Deserialize, Serialize};

/// Tunable navigation parameters.
///
/// Serde-serializable so a host application can ship them alongside its
/// streaming configuration; every field falls back to the stock value when
/// absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationSettings {
    /// Number of interpolation steps per flight; the plan holds one frame
    /// more than this (both endpoints are included).
    #[serde(default = "default_flight_frames")]
    pub num_flight_frames: u32,

    /// Cruise floor for the flight apex (meters above the ellipsoid).
    /// Long hops arc up toward this height.
    #[serde(default = "default_max_altitude")]
    pub max_altitude: f64,

    /// Minimum height above terrain enforced while not flying (world units).
    #[serde(default = "default_min_altitude")]
    pub min_altitude: f64,

    /// Above this height terrain following is skipped entirely; the sample
    /// could not matter visually.
    #[serde(default = "default_follow_ceiling")]
    pub terrain_follow_ceiling: f64,
}

fn default_flight_frames() -> u32 {
    50
}

fn default_max_altitude() -> f64 {
    6_640_000.0
}

fn default_min_altitude() -> f64 {
    50.0
}

fn default_follow_ceiling() -> f64 {
    1_000_000.0
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            num_flight_frames: default_flight_frames(),
            max_altitude: default_max_altitude(),
            min_altitude: default_min_altitude(),
            terrain_follow_ceiling: default_follow_ceiling(),
        }
    }
}
