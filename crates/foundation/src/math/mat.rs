use super::Vec3;

/// Column-major 4x4 matrix (`m[col][row]`), `f64` throughout.
///
/// CPU-side camera math stays in double precision; conversion to `f32`
/// happens at the renderer boundary, outside this crate.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4 {
    pub m: [[f64; 4]; 4],
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn mul(self, other: Self) -> Self {
        let a = self.m;
        let b = other.m;
        let mut c = [[0.0f64; 4]; 4];
        for col in 0..4 {
            for row in 0..4 {
                c[col][row] = a[0][row] * b[col][0]
                    + a[1][row] * b[col][1]
                    + a[2][row] * b[col][2]
                    + a[3][row] * b[col][3];
            }
        }
        Self { m: c }
    }

    /// View matrix from an eye position and an orthonormal `u,v,n` basis
    /// (right, up, back). The basis is assumed orthonormal by the caller.
    pub fn view_from_basis(eye: Vec3, u: Vec3, v: Vec3, n: Vec3) -> Self {
        Self {
            m: [
                [u.x, v.x, n.x, 0.0],
                [u.y, v.y, n.y, 0.0],
                [u.z, v.z, n.z, 0.0],
                [-u.dot(eye), -v.dot(eye), -n.dot(eye), 1.0],
            ],
        }
    }

    /// Right-handed perspective projection with depth mapped to `0..1`.
    pub fn perspective_rh(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> Self {
        let f = 1.0 / (0.5 * fov_y_rad).tan();
        let m22 = far / (near - far);
        let m32 = (near * far) / (near - far);

        Self {
            m: [
                [f / aspect, 0.0, 0.0, 0.0],
                [0.0, f, 0.0, 0.0],
                [0.0, 0.0, m22, -1.0],
                [0.0, 0.0, m32, 0.0],
            ],
        }
    }

    /// General inverse via cofactor expansion. `None` when singular.
    pub fn invert(self) -> Option<Self> {
        // Flatten to the conventional a00..a33 (row, col) naming.
        let a = |r: usize, c: usize| self.m[c][r];

        let b00 = a(0, 0) * a(1, 1) - a(0, 1) * a(1, 0);
        let b01 = a(0, 0) * a(1, 2) - a(0, 2) * a(1, 0);
        let b02 = a(0, 0) * a(1, 3) - a(0, 3) * a(1, 0);
        let b03 = a(0, 1) * a(1, 2) - a(0, 2) * a(1, 1);
        let b04 = a(0, 1) * a(1, 3) - a(0, 3) * a(1, 1);
        let b05 = a(0, 2) * a(1, 3) - a(0, 3) * a(1, 2);
        let b06 = a(2, 0) * a(3, 1) - a(2, 1) * a(3, 0);
        let b07 = a(2, 0) * a(3, 2) - a(2, 2) * a(3, 0);
        let b08 = a(2, 0) * a(3, 3) - a(2, 3) * a(3, 0);
        let b09 = a(2, 1) * a(3, 2) - a(2, 2) * a(3, 1);
        let b10 = a(2, 1) * a(3, 3) - a(2, 3) * a(3, 1);
        let b11 = a(2, 2) * a(3, 3) - a(2, 3) * a(3, 2);

        let det = b00 * b11 - b01 * b10 + b02 * b09 + b03 * b08 - b04 * b07 + b05 * b06;
        if det.abs() < 1e-300 {
            return None;
        }
        let inv_det = 1.0 / det;

        let mut out = [[0.0f64; 4]; 4];
        out[0][0] = (a(1, 1) * b11 - a(1, 2) * b10 + a(1, 3) * b09) * inv_det;
        out[1][0] = (a(0, 2) * b10 - a(0, 1) * b11 - a(0, 3) * b09) * inv_det;
        out[2][0] = (a(3, 1) * b05 - a(3, 2) * b04 + a(3, 3) * b03) * inv_det;
        out[3][0] = (a(2, 2) * b04 - a(2, 1) * b05 - a(2, 3) * b03) * inv_det;
        out[0][1] = (a(1, 2) * b08 - a(1, 0) * b11 - a(1, 3) * b07) * inv_det;
        out[1][1] = (a(0, 0) * b11 - a(0, 2) * b08 + a(0, 3) * b07) * inv_det;
        out[2][1] = (a(3, 2) * b02 - a(3, 0) * b05 - a(3, 3) * b01) * inv_det;
        out[3][1] = (a(2, 0) * b05 - a(2, 2) * b02 + a(2, 3) * b01) * inv_det;
        out[0][2] = (a(1, 0) * b10 - a(1, 1) * b08 + a(1, 3) * b06) * inv_det;
        out[1][2] = (a(0, 1) * b08 - a(0, 0) * b10 - a(0, 3) * b06) * inv_det;
        out[2][2] = (a(3, 0) * b04 - a(3, 1) * b02 + a(3, 3) * b00) * inv_det;
        out[3][2] = (a(2, 1) * b02 - a(2, 0) * b04 - a(2, 3) * b00) * inv_det;
        out[0][3] = (a(1, 1) * b07 - a(1, 0) * b09 - a(1, 2) * b06) * inv_det;
        out[1][3] = (a(0, 0) * b09 - a(0, 1) * b07 + a(0, 2) * b06) * inv_det;
        out[2][3] = (a(3, 1) * b01 - a(3, 0) * b03 - a(3, 2) * b00) * inv_det;
        out[3][3] = (a(2, 0) * b03 - a(2, 1) * b01 + a(2, 2) * b00) * inv_det;

        // out is currently (row, col); repack into column-major.
        let mut m = [[0.0f64; 4]; 4];
        for (col, column) in m.iter_mut().enumerate() {
            for (row, cell) in column.iter_mut().enumerate() {
                *cell = out[row][col];
            }
        }
        Some(Self { m })
    }

    /// Transform a point with perspective divide.
    pub fn transform_point(self, p: Vec3) -> Vec3 {
        let m = self.m;
        let x = m[0][0] * p.x + m[1][0] * p.y + m[2][0] * p.z + m[3][0];
        let y = m[0][1] * p.x + m[1][1] * p.y + m[2][1] * p.z + m[3][1];
        let z = m[0][2] * p.x + m[1][2] * p.y + m[2][2] * p.z + m[3][2];
        let w = m[0][3] * p.x + m[1][3] * p.y + m[2][3] * p.z + m[3][3];
        if w.abs() > 0.0 {
            Vec3::new(x / w, y / w, z / w)
        } else {
            Vec3::new(x, y, z)
        }
    }
}

/// One clip plane: `normal · p + d >= 0` for points on the inside.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f64,
}

impl Plane {
    fn normalized(normal: Vec3, d: f64) -> Self {
        let len = normal.length();
        if len > 1e-12 {
            Self {
                normal: Vec3::new(normal.x / len, normal.y / len, normal.z / len),
                d: d / len,
            }
        } else {
            Self { normal, d }
        }
    }

    pub fn signed_distance(self, p: Vec3) -> f64 {
        self.normal.dot(p) + self.d
    }
}

/// Six view-frustum planes in world space, extracted from a combined
/// projection-view matrix (Gribb/Hartmann), depth range `0..1`.
///
/// Order: left, right, bottom, top, near, far.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrustumPlanes {
    pub planes: [Plane; 6],
}

impl FrustumPlanes {
    pub fn from_proj_view(pv: Mat4) -> Self {
        let row = |r: usize| {
            (
                Vec3::new(pv.m[0][r], pv.m[1][r], pv.m[2][r]),
                pv.m[3][r],
            )
        };
        let (r0, d0) = row(0);
        let (r1, d1) = row(1);
        let (r2, d2) = row(2);
        let (r3, d3) = row(3);

        Self {
            planes: [
                Plane::normalized(r3 + r0, d3 + d0),
                Plane::normalized(r3 - r0, d3 - d0),
                Plane::normalized(r3 + r1, d3 + d1),
                Plane::normalized(r3 - r1, d3 - d1),
                Plane::normalized(r2, d2),
                Plane::normalized(r3 - r2, d3 - d2),
            ],
        }
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        self.planes.iter().all(|pl| pl.signed_distance(p) >= 0.0)
    }

    pub fn intersects_sphere(&self, center: Vec3, radius: f64) -> bool {
        self.planes
            .iter()
            .all(|pl| pl.signed_distance(center) >= -radius)
    }
}
