use foundation::math::{
    Ecef, Geodetic, Ray, Vec3, WGS84_A, ecef_to_geodetic, intersect_wgs84, surface_point,
};

use crate::camera::Basis;
use crate::extent::bisect_directions;
use crate::settings::NavigationSettings;

/// One precomputed pose along a flight.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PoseFrame {
    pub eye: Vec3,
    pub u: Vec3,
    pub v: Vec3,
    pub n: Vec3,
}

impl PoseFrame {
    pub fn from_basis(eye: Vec3, basis: Basis) -> Self {
        Self {
            eye,
            u: basis.u,
            v: basis.v,
            n: basis.n,
        }
    }

    pub fn basis(&self) -> Basis {
        Basis::new(self.u, self.v, self.n)
    }
}

/// A precomputed hop between two camera states.
///
/// Frames are stored destination-first: index 0 holds the end pose, the
/// last index holds the start pose. The cursor counts down from the last
/// index, so frames are consumed start → end, one per tick, never skipped.
#[derive(Debug, Clone)]
pub struct FlightPlan {
    frames: Vec<PoseFrame>,
    cursor: i64,
}

impl FlightPlan {
    /// Total stored frames (`num_flight_frames + 1`).
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> &[PoseFrame] {
        &self.frames
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// The frame to apply this tick, walking the cursor down. `None` once
    /// the plan is exhausted.
    pub fn take_next(&mut self) -> Option<PoseFrame> {
        if self.cursor < 0 {
            return None;
        }
        let frame = self.frames[self.cursor as usize];
        self.cursor -= 1;
        Some(frame)
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor < 0
    }
}

/// Requested end state of a flight.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FlightTarget {
    /// Destination eye position (ECEF).
    pub position: Vec3,
    /// Look target at arrival; the globe center when unset.
    pub look: Option<Vec3>,
    /// Up hint at arrival; world up when unset.
    pub up: Option<Vec3>,
}

impl FlightTarget {
    pub fn position(position: Vec3) -> Self {
        Self {
            position,
            look: None,
            up: None,
        }
    }
}

/// Doubled smoothstep on `[0, 1]`.
///
/// `s(x) = x²(3 − 2x)`, then squared. Steeper than the canonical curve,
/// with near-zero velocity at both ends; the squaring is intentional and
/// the visual timing depends on it.
pub fn ease(x: f64) -> f64 {
    let s = x * x * (3.0 - 2.0 * x);
    s * s
}

/// Blend weight toward the destination for stored frame `i` of `n`.
pub fn blend_weight(i: u32, num_frames: u32) -> f64 {
    let t = f64::from(i) / f64::from(num_frames);
    ease(1.0 - t)
}

/// Cubic Bernstein blend of (start, apex, apex, end).
fn height_blend(h_start: f64, apex: f64, h_end: f64, d: f64) -> f64 {
    let e = 1.0 - d;
    h_start * e * e * e + 3.0 * apex * d * e * e + 3.0 * apex * d * d * e + h_end * d * d * d
}

/// Direction-only blend of two unit vectors; `fallback` when they cancel.
fn blend_direction(a: Vec3, b: Vec3, d: f64, fallback: Vec3) -> Vec3 {
    let v = (a * (1.0 - d) + b * d).normalize();
    if v != Vec3::ZERO { v } else { fallback }
}

/// Precompute the full pose sequence for a hop from the current camera
/// state to `target`.
///
/// The ground track interpolates the two zero-height surface directions
/// spherically; the altitude profile rises toward an apex scaled by the
/// chordal separation of the endpoints, so long hops arc over the horizon
/// instead of cutting through the ellipsoid.
pub fn plan_flight(
    start_eye: Vec3,
    start_basis: Basis,
    start_geo: Geodetic,
    target: FlightTarget,
    settings: &NavigationSettings,
) -> FlightPlan {
    let end_eye = target.position;
    let end_geo = ecef_to_geodetic(Ecef::from(end_eye));
    let look = target.look.unwrap_or(Vec3::ZERO);
    let up = target.up.unwrap_or(Vec3::UP);
    let end_basis = Basis::from_look(end_eye, look, up);

    let dir_a = surface_point(start_geo).to_vec3().normalize();
    let dir_b = surface_point(end_geo).to_vec3().normalize();

    // Chordal separation drives the bulge: 0 for coincident endpoints,
    // approaching sin(theta/2) = 1 for antipodal ones.
    let sep = (1.0 - dir_a.dot(dir_b)).max(0.0);
    let bulge = (sep / 2.0).sqrt();

    let h_start = start_geo.alt_m;
    let h_end = end_geo.alt_m;
    let h_max = h_start.max(h_end);
    let floor_eff = settings.max_altitude.max(h_max);
    let apex = h_max + 2.5 * bulge * (floor_eff - h_max);

    let fallback = bisect_directions(dir_a, dir_b);

    let num_frames = settings.num_flight_frames.max(1);
    let mut frames = Vec::with_capacity(num_frames as usize + 1);
    for i in 0..=num_frames {
        let d = blend_weight(i, num_frames);

        let g = blend_direction(dir_a, dir_b, d, fallback);
        let ground = intersect_wgs84(Ray::new(Vec3::ZERO, g)).unwrap_or(g * WGS84_A);

        let height = height_blend(h_start, apex, h_end, d);
        let eye = ground + g * height;

        let up_i = blend_direction(start_basis.v, end_basis.v, d, g);
        let back_i = blend_direction(start_basis.n, end_basis.n, d, g);
        let basis = Basis::from_look(eye, eye - back_i, up_i);

        frames.push(PoseFrame::from_basis(eye, basis));
    }

    // The blend reproduces the endpoints only to within the skew between
    // the radial direction and the geodetic normal; pin them exactly.
    let last = frames.len() - 1;
    frames[0] = PoseFrame::from_basis(end_eye, end_basis);
    frames[last] = PoseFrame::from_basis(start_eye, start_basis);

    FlightPlan {
        cursor: last as i64,
        frames,
    }
}
