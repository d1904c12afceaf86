pub mod vec;
pub mod versor;

pub use vec::*;
pub use versor::*;
