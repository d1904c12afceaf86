//! Three-angle spherical rotation: yaw about the poles (λ), then pitch and
//! roll (φ, γ) applied together. Composes the same way the rest of the geo
//! stack expects, so a rotated projection recenters on `[-λ, -φ]`.

use std::f64::consts::{PI, TAU};

#[derive(Copy, Clone, Debug)]
pub struct Rotation {
    delta_lambda: f64,
    cos_phi: f64,
    sin_phi: f64,
    cos_gamma: f64,
    sin_gamma: f64,
    skew: bool,
}

fn wrap_longitude(lambda: f64) -> f64 {
    if lambda > PI {
        lambda - TAU
    } else if lambda < -PI {
        lambda + TAU
    } else {
        lambda
    }
}

impl Rotation {
    /// Build from `[λ, φ, γ]` in degrees.
    pub fn new(angles: [f64; 3]) -> Self {
        let delta_phi = angles[1].to_radians();
        let delta_gamma = angles[2].to_radians();
        Rotation {
            delta_lambda: angles[0].to_radians() % TAU,
            cos_phi: delta_phi.cos(),
            sin_phi: delta_phi.sin(),
            cos_gamma: delta_gamma.cos(),
            sin_gamma: delta_gamma.sin(),
            skew: delta_phi != 0.0 || delta_gamma != 0.0,
        }
    }

    pub fn identity() -> Self {
        Rotation::new([0.0, 0.0, 0.0])
    }

    /// Rotate a point, radians in and out.
    pub fn forward(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let lambda = wrap_longitude(lambda + self.delta_lambda);
        if !self.skew {
            return (lambda, phi);
        }
        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();
        let k = z * self.cos_phi + x * self.sin_phi;
        (
            (y * self.cos_gamma - k * self.sin_gamma)
                .atan2(x * self.cos_phi - z * self.sin_phi),
            (k * self.cos_gamma + y * self.sin_gamma).clamp(-1.0, 1.0).asin(),
        )
    }

    /// Undo the rotation, radians in and out.
    pub fn invert(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let (lambda, phi) = if self.skew {
            let cos_phi = phi.cos();
            let x = lambda.cos() * cos_phi;
            let y = lambda.sin() * cos_phi;
            let z = phi.sin();
            let k = z * self.cos_gamma - y * self.sin_gamma;
            (
                (y * self.cos_gamma + z * self.sin_gamma)
                    .atan2(x * self.cos_phi + k * self.sin_phi),
                (k * self.cos_phi - x * self.sin_phi).clamp(-1.0, 1.0).asin(),
            )
        } else {
            (lambda, phi)
        };
        (wrap_longitude(lambda - self.delta_lambda), phi)
    }
}

#[cfg(test)]
mod tests {
    use super::Rotation;

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "expected {a} ~= {b}");
    }

    #[test]
    fn identity_is_a_no_op() {
        let r = Rotation::identity();
        let (l, p) = r.forward(0.5, -0.3);
        assert_close(l, 0.5, 1e-12);
        assert_close(p, -0.3, 1e-12);
    }

    #[test]
    fn yaw_shifts_longitude_and_wraps() {
        let r = Rotation::new([90.0, 0.0, 0.0]);
        let (l, p) = r.forward(2.0, 0.4);
        assert_close(l, 2.0 + 90f64.to_radians() - std::f64::consts::TAU, 1e-12);
        assert_close(p, 0.4, 1e-12);
    }

    #[test]
    fn forward_invert_round_trip() {
        let r = Rotation::new([35.0, -20.0, 55.0]);
        for (lambda, phi) in [(0.0, 0.0), (1.2, 0.7), (-2.8, -1.2), (3.0, 1.4)] {
            let (l, p) = r.forward(lambda, phi);
            let (l2, p2) = r.invert(l, p);
            assert_close(l2, lambda, 1e-9);
            assert_close(p2, phi, 1e-9);
        }
    }

    #[test]
    fn pitch_brings_the_pole_to_the_center() {
        // A projection rotated [0, -90] centers on the north pole, so the
        // pole rotates to the origin.
        let r = Rotation::new([0.0, -90.0, 0.0]);
        let (l, p) = r.forward(0.0, std::f64::consts::FRAC_PI_2);
        assert_close(l, 0.0, 1e-9);
        assert_close(p, 0.0, 1e-9);
    }
}
