//! Viewport camera system for builder scene navigation.
//!
//! Provides free-flight camera controls with flat ground plane intersection,
//! smooth interpolation, and keyboard/mouse input handling.

/// Viewport camera resource and controller system for scene navigation.
pub mod viewport_camera;
