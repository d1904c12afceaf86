//! Geographic data sources: TopoJSON topologies, derived world layers
//! (ocean, inland seas), flight information regions, and tabular point
//! datasets (airports, cities).

pub mod firs;
pub mod tables;
pub mod topology;
pub mod world;

pub use firs::{FirLevels, fir_levels, firs_at_level};
pub use tables::{Airport, City, TableError, every_nth, read_airports, read_cities};
pub use topology::{TopoError, TopoGeometry, TopoObject, Topology};
pub use world::{ocean_object, split_inland_seas};
