use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use constants::geo::DEFAULT_SCALE_STEPS;

use crate::engine::geo::projector::GeoPoint;
use crate::tools::builder::attach::RotationComposition;

/// Builder configuration loaded from `assets/config/builder.settings.json`.
/// Doubles as the live resource; defaults apply until the asset arrives.
#[derive(Resource, Asset, TypePath, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderSettings {
    /// Grid cell size in metres; nudges and map placements snap to it.
    pub grid_step: f32,
    /// Sample count for the averaged Mercator scale integration.
    pub scale_steps: u32,
    /// Geographic anchor of the scene's local origin.
    pub origin: GeoPoint,
    pub rotation_composition: RotationComposition,
}

impl Default for BuilderSettings {
    fn default() -> Self {
        Self {
            grid_step: 1.0,
            scale_steps: DEFAULT_SCALE_STEPS,
            origin: GeoPoint::new(0.0, 0.0),
            rotation_composition: RotationComposition::default(),
        }
    }
}

#[derive(Resource)]
pub struct SettingsHandle(pub Handle<BuilderSettings>);

pub fn load_settings(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(SettingsHandle(
        asset_server.load("config/builder.settings.json"),
    ));
}

/// Copy the settings asset into the live resource once it finishes loading.
pub fn apply_loaded_settings(
    handle: Res<SettingsHandle>,
    assets: Res<Assets<BuilderSettings>>,
    mut settings: ResMut<BuilderSettings>,
    mut applied: Local<bool>,
) {
    if *applied {
        return;
    }
    let Some(loaded) = assets.get(&handle.0) else {
        return;
    };
    *settings = loaded.clone();
    *applied = true;
    info!(
        "Builder settings loaded: origin ({}, {}), {} scale steps",
        settings.origin.longitude, settings.origin.latitude, settings.scale_steps
    );
}
