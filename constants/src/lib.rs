pub mod geo;
pub mod placement;
pub mod render_settings;
