//! Versors: unit quaternions driving globe rotation.
//!
//! The component layout is scalar-first, `[w, x, y, z]`, and the Euler
//! conventions match the `[lambda, phi, gamma]` rotation triplet used by
//! spherical projections (degrees, yaw about the polar axis first).

use super::vec::Vec3;

/// Convert spherical `[lon, lat]` (degrees) to a unit cartesian vector.
pub fn cartesian(lon_deg: f64, lat_deg: f64) -> Vec3 {
    let lambda = lon_deg.to_radians();
    let phi = lat_deg.to_radians();
    let cos_phi = phi.cos();
    Vec3::new(cos_phi * lambda.cos(), cos_phi * lambda.sin(), phi.sin())
}

/// Unit quaternion, scalar-first.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Versor(pub [f64; 4]);

impl Versor {
    pub const IDENTITY: Versor = Versor([1.0, 0.0, 0.0, 0.0]);

    /// Build the versor for a projection rotation `[lambda, phi, gamma]`
    /// in degrees.
    pub fn from_rotation(angles_deg: [f64; 3]) -> Self {
        let l = (angles_deg[0] / 2.0).to_radians();
        let p = (angles_deg[1] / 2.0).to_radians();
        let g = (angles_deg[2] / 2.0).to_radians();
        let (sl, cl) = l.sin_cos();
        let (sp, cp) = p.sin_cos();
        let (sg, cg) = g.sin_cos();
        Versor([
            cl * cp * cg + sl * sp * sg,
            sl * cp * cg - cl * sp * sg,
            cl * sp * cg + sl * cp * sg,
            cl * cp * sg - sl * sp * cg,
        ])
    }

    /// Recover the projection rotation `[lambda, phi, gamma]` in degrees.
    pub fn rotation(self) -> [f64; 3] {
        let [w, x, y, z] = self.0;
        [
            (2.0 * (w * x + y * z))
                .atan2(1.0 - 2.0 * (x * x + y * y))
                .to_degrees(),
            (2.0 * (w * y - z * x)).clamp(-1.0, 1.0).asin().to_degrees(),
            (2.0 * (w * z + x * y))
                .atan2(1.0 - 2.0 * (y * y + z * z))
                .to_degrees(),
        ]
    }

    /// The minimal rotation taking unit vector `v0` onto `v1`.
    ///
    /// Degenerate input (parallel or antiparallel vectors with a vanishing
    /// cross product) yields the identity.
    pub fn delta(v0: Vec3, v1: Vec3) -> Self {
        Self::delta_scaled(v0, v1, 1.0)
    }

    /// Like [`Versor::delta`], with the rotation angle scaled by `alpha`.
    pub fn delta_scaled(v0: Vec3, v1: Vec3, alpha: f64) -> Self {
        let axis = v0.cross(v1);
        let len = axis.length();
        if len == 0.0 {
            return Self::IDENTITY;
        }
        let t = alpha * v0.dot(v1).clamp(-1.0, 1.0).acos() / 2.0;
        let s = t.sin();
        // Axis components are permuted to match the rotation conventions of
        // the [lambda, phi, gamma] Euler triplet.
        Versor([t.cos(), axis.z / len * s, -axis.y / len * s, axis.x / len * s])
    }

    /// Hamilton product `self * other`.
    pub fn multiply(self, other: Self) -> Self {
        let [a0, a1, a2, a3] = self.0;
        let [b0, b1, b2, b3] = other.0;
        Versor([
            a0 * b0 - a1 * b1 - a2 * b2 - a3 * b3,
            a0 * b1 + a1 * b0 + a2 * b3 - a3 * b2,
            a0 * b2 - a1 * b3 + a2 * b0 + a3 * b1,
            a0 * b3 + a1 * b2 - a2 * b1 + a3 * b0,
        ])
    }

    /// Scalar (cosine of half rotation angle) component.
    pub fn w(self) -> f64 {
        self.0[0]
    }

    pub fn normalize(self) -> Self {
        let [w, x, y, z] = self.0;
        let n = (w * w + x * x + y * y + z * z).sqrt();
        if n == 0.0 {
            Self::IDENTITY
        } else {
            Versor([w / n, x / n, y / n, z / n])
        }
    }
}
