//! Map projections: azimuthal and cylindrical raw transforms, three-angle
//! spherical rotation, and a [`Projection`] wrapper handling scale,
//! translation, screen-space streaming, and extent fitting.

pub mod fit;
pub mod raw;
pub mod rotation;
mod transform;

pub use fit::fitted_height;
pub use raw::ProjectionKind;
pub use rotation::Rotation;
pub use transform::{Projection, ProjectStream, rewound_stream};
