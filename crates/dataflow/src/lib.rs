//! A small reactive cell graph.
//!
//! Cells are named values; derived cells declare the cells they read and a
//! compute function. Reads are memoized, setting a source invalidates its
//! transitive dependents only, and evaluation walks the dependency graph
//! depth-first with cycle detection. Single-threaded and synchronous.

pub mod graph;

pub use graph::{CellError, CellGraph, CellValue, Inputs};
