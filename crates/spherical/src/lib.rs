//! Spherical GeoJSON primitives: the object model, the streaming protocol,
//! spherical measures (area, containment), and the winding-order repair
//! transform built on top of them.

pub mod geometry;
pub mod measure;
pub mod rewind;
pub mod stream;

pub use geometry::*;
pub use measure::*;
pub use rewind::*;
pub use stream::*;
