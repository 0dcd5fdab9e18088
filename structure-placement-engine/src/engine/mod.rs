pub mod camera;
pub mod geo;
pub mod scene;
