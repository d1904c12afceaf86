//! Raw projection transforms in rotated spherical coordinates (radians in,
//! unit-scale planar out, y up). Scaling, translation, and the y flip live
//! in [`crate::Projection`].

use std::f64::consts::{FRAC_PI_4, PI};

use foundation::Aabb2;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProjectionKind {
    Orthographic,
    AzimuthalEqualArea,
    AzimuthalEquidistant,
    Mercator,
}

impl ProjectionKind {
    /// Forward transform. `lambda`/`phi` are already rotated, in radians.
    pub fn forward(self, lambda: f64, phi: f64) -> [f64; 2] {
        match self {
            ProjectionKind::Orthographic => [phi.cos() * lambda.sin(), phi.sin()],
            ProjectionKind::AzimuthalEqualArea => {
                azimuthal_forward(lambda, phi, |cxcy| (2.0 / (1.0 + cxcy)).sqrt())
            }
            ProjectionKind::AzimuthalEquidistant => azimuthal_forward(lambda, phi, |cxcy| {
                let c = cxcy.clamp(-1.0, 1.0).acos();
                if c == 0.0 { 1.0 } else { c / c.sin() }
            }),
            // Clamped to the square frame: y = ±π is latitude ±85.05°.
            ProjectionKind::Mercator => {
                [lambda, (FRAC_PI_4 + phi / 2.0).tan().ln().clamp(-PI, PI)]
            }
        }
    }

    /// Inverse transform. `None` when the point lies outside the projected
    /// image of the sphere.
    pub fn invert(self, x: f64, y: f64) -> Option<(f64, f64)> {
        match self {
            ProjectionKind::Orthographic => azimuthal_invert(x, y, |z| {
                if z > 1.0 { None } else { Some(z.asin()) }
            }),
            ProjectionKind::AzimuthalEqualArea => azimuthal_invert(x, y, |z| {
                if z > 2.0 { None } else { Some(2.0 * (z / 2.0).asin()) }
            }),
            ProjectionKind::AzimuthalEquidistant => {
                azimuthal_invert(x, y, |z| if z > PI { None } else { Some(z) })
            }
            ProjectionKind::Mercator => {
                if x.abs() > PI {
                    return None;
                }
                Some((x, 2.0 * y.exp().atan() - PI / 2.0))
            }
        }
    }

    /// Whether a rotated point is outside the projection's visible region.
    /// Only the orthographic view hides anything (the far hemisphere).
    pub fn clips(self, lambda: f64, phi: f64) -> bool {
        match self {
            ProjectionKind::Orthographic => lambda.cos() * phi.cos() < 0.0,
            _ => false,
        }
    }

    /// Planar extent of the full sphere under the raw transform.
    pub fn sphere_extent(self) -> Aabb2 {
        match self {
            ProjectionKind::Orthographic => Aabb2::new([-1.0, -1.0], [1.0, 1.0]),
            ProjectionKind::AzimuthalEqualArea => Aabb2::new([-2.0, -2.0], [2.0, 2.0]),
            ProjectionKind::AzimuthalEquidistant => Aabb2::new([-PI, -PI], [PI, PI]),
            // Conventional square mercator frame, latitude cut at ~85.05°.
            ProjectionKind::Mercator => Aabb2::new([-PI, -PI], [PI, PI]),
        }
    }
}

fn azimuthal_forward(lambda: f64, phi: f64, scale: impl Fn(f64) -> f64) -> [f64; 2] {
    let cx = lambda.cos();
    let cy = phi.cos();
    let k = scale(cx * cy);
    [k * cy * lambda.sin(), k * phi.sin()]
}

fn azimuthal_invert(x: f64, y: f64, angle: impl Fn(f64) -> Option<f64>) -> Option<(f64, f64)> {
    let z = x.hypot(y);
    let c = angle(z)?;
    let (sc, cc) = c.sin_cos();
    let lambda = (x * sc).atan2(z * cc);
    let phi = if z == 0.0 {
        0.0
    } else {
        (y * sc / z).clamp(-1.0, 1.0).asin()
    };
    Some((lambda, phi))
}

#[cfg(test)]
mod tests {
    use super::ProjectionKind;
    use std::f64::consts::{FRAC_PI_2, PI};

    const KINDS: [ProjectionKind; 4] = [
        ProjectionKind::Orthographic,
        ProjectionKind::AzimuthalEqualArea,
        ProjectionKind::AzimuthalEquidistant,
        ProjectionKind::Mercator,
    ];

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "expected {a} ~= {b}");
    }

    #[test]
    fn origin_maps_to_origin() {
        for kind in KINDS {
            let [x, y] = kind.forward(0.0, 0.0);
            assert_close(x, 0.0, 1e-12);
            assert_close(y, 0.0, 1e-12);
        }
    }

    #[test]
    fn forward_invert_round_trip() {
        // Latitudes stay inside the mercator frame (|y| < π).
        let samples = [(0.3, 0.4), (-1.2, 0.9), (1.0, -1.1), (0.0, 1.45)];
        for kind in KINDS {
            for (lambda, phi) in samples {
                if kind.clips(lambda, phi) {
                    continue;
                }
                let [x, y] = kind.forward(lambda, phi);
                let (l, p) = kind.invert(x, y).unwrap();
                assert_close(l, lambda, 1e-9);
                assert_close(p, phi, 1e-9);
            }
        }
    }

    #[test]
    fn orthographic_rejects_far_hemisphere() {
        assert!(ProjectionKind::Orthographic.clips(PI, 0.0));
        assert!(!ProjectionKind::Orthographic.clips(0.5, 0.5));
        // A radius outside the unit disc has no preimage.
        assert_eq!(ProjectionKind::Orthographic.invert(1.5, 0.0), None);
    }

    #[test]
    fn equidistant_preserves_radius() {
        // Distance from center equals angular distance.
        let [x, y] = ProjectionKind::AzimuthalEquidistant.forward(FRAC_PI_2, 0.0);
        assert_close(x.hypot(y), FRAC_PI_2, 1e-12);
    }

    #[test]
    fn mercator_equator_is_linear() {
        let [x, y] = ProjectionKind::Mercator.forward(1.0, 0.0);
        assert_close(x, 1.0, 1e-12);
        assert_close(y, 0.0, 1e-12);
    }

    #[test]
    fn mercator_poles_clamp_to_the_frame() {
        let [_, north] = ProjectionKind::Mercator.forward(0.0, FRAC_PI_2);
        assert_close(north, PI, 0.0);
        let [_, south] = ProjectionKind::Mercator.forward(0.0, -FRAC_PI_2);
        assert_close(south, -PI, 0.0);
    }
}
