//! Globe interaction: a versor-driven drag/zoom gesture that rotates a
//! projection so the point under the pointer stays under the pointer.

pub mod zoom;

pub use zoom::VersorZoom;
