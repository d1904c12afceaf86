//! Label placement: push dense point labels apart by moving each label to
//! the centroid of its Voronoi cell within the frame.

pub mod voronoi;

pub use voronoi::{Arrow, displace, label_arrows, polygon_centroid, voronoi_cell};
