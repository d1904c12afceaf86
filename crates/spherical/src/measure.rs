//! Spherical measures: ring/polygon area (steradians) and point-in-polygon
//! containment, both following the spherical-excess conventions of the
//! surrounding geo ecosystem. Ring orientation determines which side of the
//! boundary is the interior, so area is winding-sensitive and containment
//! is a winding count, not a planar crossing test.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use foundation::math::Vec3;

use crate::geometry::{Geometry, Position};

const EPSILON: f64 = 1e-6;
const EPSILON2: f64 = 1e-12;

/// Area of the full sphere.
pub const SPHERE_AREA: f64 = 2.0 * TAU;

/// Raw half-area accumulation for one ring (radian half-angle transform).
///
/// The closing duplicate vertex, if present, is ignored; the ring is
/// treated as cyclic.
fn ring_sum(ring: &[Position]) -> f64 {
    let n = ring.len();
    let n = if n > 1 && ring[0] == ring[n - 1] { n - 1 } else { n };
    if n < 2 {
        return 0.0;
    }

    let mut sum = 0.0;
    let prev = ring[n - 1];
    let mut lambda0 = prev[0].to_radians();
    let phi0 = prev[1].to_radians() / 2.0 + FRAC_PI_4;
    let (mut sin_phi0, mut cos_phi0) = phi0.sin_cos();

    for p in &ring[..n] {
        let lambda = p[0].to_radians();
        let phi = p[1].to_radians() / 2.0 + FRAC_PI_4;
        let (sin_phi, cos_phi) = phi.sin_cos();
        let d_lambda = lambda - lambda0;
        let sign = if d_lambda >= 0.0 { 1.0 } else { -1.0 };
        let ad_lambda = sign * d_lambda;
        let k = sin_phi0 * sin_phi;
        let u = cos_phi0 * cos_phi + k * ad_lambda.cos();
        let v = k * sign * ad_lambda.sin();
        sum += v.atan2(u);
        lambda0 = lambda;
        sin_phi0 = sin_phi;
        cos_phi0 = cos_phi;
    }
    sum
}

fn wrap_area(sum: f64) -> f64 {
    2.0 * if sum < 0.0 { TAU + sum } else { sum }
}

/// Spherical area of a single ring, in `[0, 4π)`.
pub fn ring_area(ring: &[Position]) -> f64 {
    wrap_area(ring_sum(ring))
}

/// Spherical area of a polygon: rings accumulate before normalization, so a
/// correctly wound hole subtracts from its outer ring.
pub fn polygon_area(rings: &[Vec<Position>]) -> f64 {
    wrap_area(rings.iter().map(|r| ring_sum(r)).sum())
}

/// Spherical area of any geometry. Points and lines measure zero.
pub fn geometry_area(geometry: &Geometry) -> f64 {
    match geometry {
        Geometry::Polygon(rings) => polygon_area(rings),
        Geometry::MultiPolygon(polys) => polys.iter().map(|p| polygon_area(p)).sum(),
        Geometry::GeometryCollection(gs) => gs.iter().map(geometry_area).sum(),
        Geometry::Sphere => SPHERE_AREA,
        _ => 0.0,
    }
}

fn cartesian_rad(lambda: f64, phi: f64) -> Vec3 {
    let cos_phi = phi.cos();
    Vec3::new(cos_phi * lambda.cos(), cos_phi * lambda.sin(), phi.sin())
}

/// Spherical point-in-polygon test (degrees in, rings cyclic).
///
/// Counts meridian crossings of the boundary on the sphere and combines the
/// winding parity with the accumulated boundary angle, so it honors winding
/// order: the "inside" of a ring larger than a hemisphere is the larger cap.
pub fn polygon_contains(polygon: &[Vec<Position>], point: Position) -> bool {
    let lambda = point[0].to_radians();
    let mut phi = point[1].to_radians();
    let sin_phi = phi.sin();
    let normal = Vec3::new(lambda.sin(), -lambda.cos(), 0.0);

    // Nudge off the poles where every meridian crosses.
    if sin_phi == 1.0 {
        phi = FRAC_PI_2 + EPSILON;
    } else if sin_phi == -1.0 {
        phi = -FRAC_PI_2 - EPSILON;
    }

    let mut angle = 0.0;
    let mut winding: i32 = 0;
    let mut sum = 0.0;

    for ring in polygon {
        let n = ring.len();
        let m = if n > 1 && ring[0] == ring[n - 1] { n - 1 } else { n };
        if m == 0 {
            continue;
        }

        let to_rad = |p: &Position| [p[0].to_radians(), p[1].to_radians()];
        let mut point0 = to_rad(&ring[m - 1]);
        let mut lambda0 = point0[0];
        let phi0 = point0[1] / 2.0 + FRAC_PI_4;
        let (mut sin_phi0, mut cos_phi0) = phi0.sin_cos();

        for p in &ring[..m] {
            let point1 = to_rad(p);
            let lambda1 = point1[0];
            let phi1 = point1[1] / 2.0 + FRAC_PI_4;
            let (sin_phi1, cos_phi1) = phi1.sin_cos();
            let delta = lambda1 - lambda0;
            let sign = if delta >= 0.0 { 1.0 } else { -1.0 };
            let abs_delta = sign * delta;
            let antimeridian = abs_delta > PI;
            let k = sin_phi0 * sin_phi1;

            sum += (k * sign * abs_delta.sin()).atan2(cos_phi0 * cos_phi1 + k * abs_delta.cos());
            angle += if antimeridian { delta + sign * TAU } else { delta };

            // Does this edge cross the point's meridian?
            if antimeridian ^ (lambda0 >= lambda) ^ (lambda1 >= lambda) {
                let arc = cartesian_rad(point0[0], point0[1])
                    .cross(cartesian_rad(point1[0], point1[1]))
                    .normalize();
                let intersection = normal.cross(arc).normalize();
                let phi_arc = if antimeridian ^ (delta >= 0.0) { -1.0 } else { 1.0 }
                    * intersection.z.clamp(-1.0, 1.0).asin();
                if phi > phi_arc || (phi == phi_arc && (arc.x != 0.0 || arc.y != 0.0)) {
                    winding += if antimeridian ^ (delta >= 0.0) { 1 } else { -1 };
                }
            }

            point0 = point1;
            lambda0 = lambda1;
            sin_phi0 = sin_phi1;
            cos_phi0 = cos_phi1;
        }
    }

    // A ring that winds the "wrong" way (negative total angle, or zero angle
    // with negative area) encloses the complement of what it crosses.
    (angle < -EPSILON || (angle < EPSILON && sum < -EPSILON2)) ^ ((winding & 1) != 0)
}

/// Containment for polygonal geometries; anything else is `false`.
pub fn geometry_contains(geometry: &Geometry, point: Position) -> bool {
    match geometry {
        Geometry::Polygon(rings) => polygon_contains(rings, point),
        Geometry::MultiPolygon(polys) => polys.iter().any(|p| polygon_contains(p, point)),
        Geometry::GeometryCollection(gs) => gs.iter().any(|g| geometry_contains(g, point)),
        Geometry::Sphere => true,
        _ => false,
    }
}
