//! Scene furniture for the builder viewport.

/// Flat ground grid mesh generation for spatial reference.
pub mod grid;
