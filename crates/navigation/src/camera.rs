use foundation::math::{FrustumPlanes, Mat4, Vec3, WGS84_A};
use runtime::event_bus::{EventBus, kinds};
use runtime::frame::Frame;

/// Orthonormal camera basis: right `u`, up `v`, back `n`.
///
/// `n` points from the look target back toward the eye; the camera looks
/// along `-n`. Callers own orthonormality when constructing one directly.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Basis {
    pub u: Vec3,
    pub v: Vec3,
    pub n: Vec3,
}

impl Basis {
    pub fn new(u: Vec3, v: Vec3, n: Vec3) -> Self {
        Self { u, v, n }
    }

    /// Derive an orthonormal basis from an eye point, a look target and an
    /// approximate up vector. When `up` is (anti)parallel to the view
    /// direction, an arbitrary orthogonal axis is substituted so the basis
    /// stays well-formed.
    pub fn from_look(eye: Vec3, look: Vec3, up: Vec3) -> Self {
        let mut n = (eye - look).normalize();
        if n == Vec3::ZERO {
            n = Vec3::UP;
        }

        let mut u = up.cross(n).normalize();
        if u == Vec3::ZERO {
            u = Vec3::new(1.0, 0.0, 0.0).cross(n).normalize();
        }
        if u == Vec3::ZERO {
            u = Vec3::new(0.0, 1.0, 0.0).cross(n).normalize();
        }
        let v = n.cross(u);

        Self { u, v, n }
    }

    /// True when all three vectors are unit length and pairwise orthogonal
    /// within `eps`.
    pub fn is_orthonormal(&self, eps: f64) -> bool {
        (self.u.length() - 1.0).abs() <= eps
            && (self.v.length() - 1.0).abs() <= eps
            && (self.n.length() - 1.0).abs() <= eps
            && self.u.dot(self.v).abs() <= eps
            && self.v.dot(self.n).abs() <= eps
            && self.n.dot(self.u).abs() <= eps
    }
}

/// Perspective projection parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    pub fov_y_rad: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Projection {
    pub fn new(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> Self {
        Self {
            fov_y_rad,
            aspect,
            near,
            far,
        }
    }

    /// Clip planes scaled to the eye's distance from the globe center, so
    /// depth precision holds both in orbit and near the surface.
    pub fn with_auto_clip(fov_y_rad: f64, aspect: f64, eye_distance: f64) -> Self {
        let near = (eye_distance * 0.001).max(10.0);
        let far = (eye_distance * 4.0 + 4.0 * WGS84_A).max(near + 1.0);
        Self::new(fov_y_rad, aspect, near, far)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(45f64.to_radians(), 1280.0 / 720.0, 10.0, 10.0 * WGS84_A)
    }
}

/// The camera pose model: eye + basis, plus the derived matrix/frustum set
/// rebuilt by [`CameraPose::recompute_derived`].
#[derive(Debug, Clone)]
pub struct CameraPose {
    eye: Vec3,
    basis: Basis,
    projection: Projection,

    view: Mat4,
    proj: Mat4,
    proj_view: Mat4,
    inv_proj_view: Mat4,
    frustum: FrustumPlanes,
}

impl CameraPose {
    /// Camera parked on the +X axis at three globe radii, looking at the
    /// globe center.
    pub fn new(projection: Projection) -> Self {
        let eye = Vec3::new(3.0 * WGS84_A, 0.0, 0.0);
        let basis = Basis::from_look(eye, Vec3::ZERO, Vec3::UP);

        let mut pose = Self {
            eye,
            basis,
            projection,
            view: Mat4::IDENTITY,
            proj: Mat4::IDENTITY,
            proj_view: Mat4::IDENTITY,
            inv_proj_view: Mat4::IDENTITY,
            frustum: FrustumPlanes::from_proj_view(Mat4::IDENTITY),
        };
        pose.rebuild_matrices();
        pose
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn basis(&self) -> Basis {
        self.basis
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn proj_view(&self) -> Mat4 {
        self.proj_view
    }

    pub fn inv_proj_view(&self) -> Mat4 {
        self.inv_proj_view
    }

    pub fn frustum(&self) -> &FrustumPlanes {
        &self.frustum
    }

    /// Replace eye and basis. The derived set is stale until the next
    /// [`CameraPose::recompute_derived`].
    pub fn set_pose(&mut self, eye: Vec3, basis: Basis) {
        self.eye = eye;
        self.basis = basis;
    }

    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
    }

    /// Point the camera at `look` from `eye`, deriving a fresh orthonormal
    /// basis.
    pub fn look_at(&mut self, eye: Vec3, look: Vec3, up: Vec3) {
        self.set_pose(eye, Basis::from_look(eye, look, up));
    }

    /// Rebuild view, projection-view, its inverse and the frustum planes,
    /// then notify observers through the bus.
    pub fn recompute_derived(&mut self, frame: Frame, bus: &mut EventBus) {
        self.rebuild_matrices();
        bus.emit(frame, kinds::VIEW_CHANGED, "pose recompute");
    }

    fn rebuild_matrices(&mut self) {
        self.view = Mat4::view_from_basis(self.eye, self.basis.u, self.basis.v, self.basis.n);
        self.proj = Mat4::perspective_rh(
            self.projection.fov_y_rad,
            self.projection.aspect,
            self.projection.near,
            self.projection.far,
        );
        self.proj_view = self.proj.mul(self.view);
        // A perspective-view product is invertible for sane projection
        // parameters; keep the previous inverse if it ever is not.
        if let Some(inv) = self.proj_view.invert() {
            self.inv_proj_view = inv;
        }
        self.frustum = FrustumPlanes::from_proj_view(self.proj_view);
    }
}

#[cfg(test)]
mod tests {
    use super::{Basis, CameraPose, Projection};
    use foundation::math::{Vec3, WGS84_A};
    use runtime::event_bus::{EventBus, kinds};
    use runtime::frame::Frame;

    #[test]
    fn from_look_produces_orthonormal_basis() {
        let eye = Vec3::new(2.0 * WGS84_A, WGS84_A, WGS84_A);
        let basis = Basis::from_look(eye, Vec3::ZERO, Vec3::UP);
        assert!(basis.is_orthonormal(1e-12));
        // n points from the look target toward the eye.
        assert!(basis.n.dot(eye) > 0.0);
    }

    #[test]
    fn from_look_survives_parallel_up() {
        let eye = Vec3::new(0.0, 0.0, 2.0 * WGS84_A);
        let basis = Basis::from_look(eye, Vec3::ZERO, Vec3::UP);
        assert!(basis.is_orthonormal(1e-12));
    }

    #[test]
    fn recompute_emits_view_changed() {
        let mut pose = CameraPose::new(Projection::default());
        let mut bus = EventBus::new();
        pose.recompute_derived(Frame::at_60hz(0), &mut bus);
        pose.recompute_derived(Frame::at_60hz(1), &mut bus);
        assert_eq!(bus.count_of_kind(kinds::VIEW_CHANGED), 2);
    }

    #[test]
    fn frustum_tracks_the_pose() {
        let mut pose = CameraPose::new(Projection::default());
        let mut bus = EventBus::new();

        // Default pose looks at the globe center.
        assert!(pose.frustum().contains_point(Vec3::ZERO));

        // Turn the camera away; the center leaves the frustum.
        let eye = pose.eye();
        pose.look_at(eye, eye + Vec3::new(WGS84_A, 0.0, 0.0), Vec3::UP);
        pose.recompute_derived(Frame::at_60hz(0), &mut bus);
        assert!(!pose.frustum().contains_point(Vec3::ZERO));
    }

    #[test]
    fn inverse_round_trips_points() {
        let pose = CameraPose::new(Projection::default());
        let world = Vec3::new(WGS84_A, 0.0, 0.0);
        let clip = pose.proj_view().transform_point(world);
        let back = pose.inv_proj_view().transform_point(clip);
        assert!((back - world).length() < 1e-3);
    }

    #[test]
    fn auto_clip_scales_with_distance() {
        let close = Projection::with_auto_clip(1.0, 1.0, 1_000.0);
        assert_eq!(close.near, 10.0);
        let orbit = Projection::with_auto_clip(1.0, 1.0, 3.0 * WGS84_A);
        assert!(orbit.near > 10.0);
        assert!(orbit.far > orbit.near);
    }
}
