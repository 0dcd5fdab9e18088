//! Geographic referencing for the local scene frame.

/// Equirectangular-with-averaged-Mercator-scale projection and its memo cache.
pub mod projector;
