//! Versor zoom: rotate the globe by quaternion composition so dragging feels
//! like spinning a physical sphere, with pinch zoom and two-finger roll.
//!
//! The gesture anchors the sphere point under the pointer at gesture start
//! (`v0`) and, on every move, solves for the minimal rotation taking `v0`
//! onto the point currently under the pointer, composed onto the rotation
//! the globe had when the gesture started. Inverting under the saved start
//! frame rather than the live one keeps the solve stable across frames.

use foundation::math::{Vec3, Versor, cartesian};
use projection::Projection;

/// Screen position of one active pointer.
pub type Pointer = [f64; 2];

/// Scalar threshold below which the drag anchor nears the antipode of the
/// start point and the quaternion solve loses stability. The gesture is
/// silently restarted from the current pose instead.
const RESTART_THRESHOLD: f64 = 0.7;

pub struct VersorZoom {
    base_scale: f64,
    scale_extent: [f64; 2],
    v0: Option<Vec3>,
    q0: Versor,
    r0: [f64; 3],
    a0: f64,
    pointer_count: usize,
}

/// Mean position of the active pointers, plus the inter-pointer angle when
/// there are at least two (for roll).
fn reduce(pointers: &[Pointer]) -> (Pointer, Option<f64>) {
    if pointers.len() > 1 {
        let n = pointers.len() as f64;
        let x = pointers.iter().map(|p| p[0]).sum::<f64>() / n;
        let y = pointers.iter().map(|p| p[1]).sum::<f64>() / n;
        let angle = (pointers[1][1] - pointers[0][1]).atan2(pointers[1][0] - pointers[0][0]);
        ([x, y], Some(angle))
    } else {
        (pointers.first().copied().unwrap_or([0.0, 0.0]), None)
    }
}

impl VersorZoom {
    /// Captures the projection's current scale as the baseline the scale
    /// extent multiplies.
    pub fn new(projection: &Projection) -> Self {
        VersorZoom {
            base_scale: projection.scale(),
            scale_extent: [0.8, 8.0],
            v0: None,
            q0: Versor::IDENTITY,
            r0: [0.0, 0.0, 0.0],
            a0: 0.0,
            pointer_count: 0,
        }
    }

    /// Relative zoom range, multiplied by the baseline scale.
    pub fn with_scale_extent(mut self, extent: [f64; 2]) -> Self {
        self.scale_extent = extent;
        self
    }

    /// Absolute scale range for the projection.
    pub fn scale_extent(&self) -> [f64; 2] {
        [
            self.scale_extent[0] * self.base_scale,
            self.scale_extent[1] * self.base_scale,
        ]
    }

    pub fn clamp_scale(&self, scale: f64) -> f64 {
        let [lo, hi] = self.scale_extent();
        scale.clamp(lo, hi)
    }

    /// Begin a gesture: anchor the sphere point under the pointer and save
    /// the starting pose.
    pub fn start(&mut self, projection: &Projection, pointers: &[Pointer]) {
        let (pt, angle) = reduce(pointers);
        self.pointer_count = pointers.len();
        self.r0 = projection.rotate();
        self.q0 = Versor::from_rotation(self.r0);
        self.v0 = projection.invert(pt).map(|ll| cartesian(ll[0], ll[1]));
        if let Some(a) = angle {
            self.a0 = a;
        }
    }

    /// Apply a gesture update: set the (clamped) scale and rotate the globe
    /// so the anchor follows the pointer. Pointers landing off the globe
    /// leave the rotation where it was.
    pub fn zoom(&mut self, projection: &mut Projection, pointers: &[Pointer], scale: f64) {
        // A finger going down or up moves the mean point; re-anchor rather
        // than interpreting the jump as a spin.
        if pointers.len() != self.pointer_count {
            self.start(projection, pointers);
        }

        projection.set_scale(self.clamp_scale(scale));

        let (pt, angle) = reduce(pointers);
        let current = projection.rotate();
        projection.set_rotate(self.r0);
        let inverted = projection.invert(pt);
        let (Some(v0), Some(lonlat)) = (self.v0, inverted) else {
            projection.set_rotate(current);
            return;
        };
        let v1 = cartesian(lonlat[0], lonlat[1]);
        let delta = Versor::delta(v0, v1);
        let mut q1 = self.q0.multiply(delta);

        // Two-finger twist rolls about the view axis.
        if let Some(a) = angle {
            let d = (a - self.a0) / 2.0;
            let s = -d.sin();
            let c = d.cos().signum();
            q1 = Versor([(1.0 - s * s).sqrt(), 0.0, 0.0, c * s]).multiply(q1);
        }

        projection.set_rotate(q1.rotation());

        if delta.w() < RESTART_THRESHOLD {
            self.start(projection, pointers);
        }
    }
}
