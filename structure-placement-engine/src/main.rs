use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy::window::PresentMode;
use bevy_common_assets::json::JsonAssetPlugin;

mod engine;
mod rpc;
mod settings;
mod structures;
mod tools;

use engine::camera::viewport_camera::{ViewportCamera, camera_controller};
use engine::scene::grid::{GridCreated, create_ground_grid};
use rpc::web_rpc::WebRpcPlugin;
use settings::{BuilderSettings, SettingsHandle, apply_loaded_settings, load_settings};
use structures::catalog::StructureCatalog;
use structures::load_structure_catalog;
use tools::builder::BuilderPlugin;

/// Half-width of the ground grid in metres.
const GRID_HALF_EXTENT: f32 = 60.0;

fn main() {
    let mut app = create_app();

    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(async move {
            app.run();
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.run();
    }
}

/// Create application with builder tooling and RPC integration
fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(JsonAssetPlugin::<StructureCatalog>::new(&["catalog.json"]))
        .add_plugins(JsonAssetPlugin::<BuilderSettings>::new(&["settings.json"]))
        .add_plugins(WebRpcPlugin)
        .add_plugins(BuilderPlugin);

    app.init_resource::<GridCreated>()
        .init_resource::<BuilderSettings>()
        .add_systems(Startup, (setup, load_settings, load_structure_catalog))
        .add_systems(
            Update,
            (
                apply_loaded_settings,
                spawn_grid_when_ready,
                camera_controller,
                fps_text_update_system,
            ),
        );

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        Window {
            canvas: Some("#bevy".into()),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: false,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}

#[derive(Component)]
struct FpsText;

/// Setup lighting, camera, and the FPS overlay
fn setup(mut commands: Commands) {
    info!("=== STRUCTURE PLACEMENT ENGINE ===");

    spawn_lighting(&mut commands);
    spawn_camera(&mut commands);
    spawn_ui(&mut commands);
}

/// Spawn the ground grid once the settings asset is in, so its spacing
/// matches the configured grid step.
fn spawn_grid_when_ready(
    mut grid_created: ResMut<GridCreated>,
    settings_handle: Option<Res<SettingsHandle>>,
    settings_assets: Res<Assets<BuilderSettings>>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if grid_created.created {
        return;
    }
    let Some(handle) = settings_handle else {
        return;
    };
    let Some(loaded) = settings_assets.get(&handle.0) else {
        return;
    };

    create_ground_grid(
        &mut commands,
        &mut meshes,
        &mut materials,
        GRID_HALF_EXTENT,
        loaded.grid_step,
    );
    grid_created.created = true;
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}

fn spawn_camera(commands: &mut Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 25.0, 35.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.insert_resource(ViewportCamera::default());
}

fn spawn_ui(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    for mut text in &mut query {
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                text.0 = format!("FPS: {value:.1}");
            }
        }
    }
}
