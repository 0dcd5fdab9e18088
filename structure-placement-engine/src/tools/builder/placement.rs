use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::engine::camera::viewport_camera::ViewportCamera;
use crate::engine::geo::projector::GeoProjector;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::settings::BuilderSettings;
use crate::structures::placed::{PlacedStructure, StructureBounds, structure_mesh};
use crate::tools::mode::{ModeManager, PlacementMode};

use super::attach::{place_on_face, place_on_face_indexed};
use super::face::resolve_face;
use super::ray::{ObbHit, ray_hits_obb};
use super::state::*;

// Click on the ground to drop the armed template (map mode)
pub fn place_on_map_click(
    buttons: Res<ButtonInput<MouseButton>>,
    mode_manager: Res<ModeManager>,
    mut active: ResMut<ActiveTemplate>,
    settings: Res<BuilderSettings>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    viewport_camera: Option<ResMut<ViewportCamera>>,
    structures: Query<(&GlobalTransform, &StructureBounds), With<PlacedStructure>>,
    selected: Query<Entity, With<SelectedStructure>>,
    mut status: ResMut<StatusMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !mode_manager.is_mode_active(PlacementMode::Map) || !buttons.just_pressed(MouseButton::Left)
    {
        return;
    }
    let Some(template) = active.selected.clone() else {
        return;
    };

    // Validate prereqs (camera, window, cursor pos)
    let Some(mut viewport_camera) = viewport_camera else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor_pos) = window.cursor_position() else {
        return;
    };
    let Ok((cam_xform, camera)) = cameras.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(cam_xform, cursor_pos) else {
        return;
    };

    // Raycast from mouse to ground plane
    let Some(hit) = viewport_camera.mouse_to_ground_plane(cursor_pos, camera, cam_xform) else {
        return;
    };

    // A structure standing in front of the ground hit swallows the click.
    let ground_t = (hit - ray.origin).length();
    for (xf, bounds) in &structures {
        if let Some(obb) = ray_hits_obb(ray.origin, *ray.direction, xf, bounds.0) {
            if obb.t < ground_t {
                return;
            }
        }
    }

    let snapped = snap_to_grid(hit, settings.grid_step);
    let mut placed = PlacedStructure::from_template(template, snapped);
    // Sit flat on the ground: centre offset by half height.
    placed.position.y = hit.y + placed.bounds_size().y * 0.5;

    let kind = placed.template.kind;
    let position = placed.position;
    let entity = spawn_structure(&mut commands, &mut meshes, &mut materials, placed);
    select_only(&mut commands, &selected, entity);
    active.selected = None;

    status.show(format!("Placed {}", kind.as_str()));
    rpc_interface.send_notification(
        "structure_placed",
        serde_json::json!({
            "kind": kind.as_str(),
            "position": [position.x, position.y, position.z],
            "mode": "map",
        }),
    );
}

// Click a face of an existing structure to attach the armed template (attach mode)
pub fn attach_on_structure_click(
    buttons: Res<ButtonInput<MouseButton>>,
    mode_manager: Res<ModeManager>,
    mut active: ResMut<ActiveTemplate>,
    settings: Res<BuilderSettings>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    structures: Query<(&GlobalTransform, &StructureBounds, &PlacedStructure)>,
    selected: Query<Entity, With<SelectedStructure>>,
    mut status: ResMut<StatusMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !mode_manager.is_mode_active(PlacementMode::Attach)
        || !buttons.just_pressed(MouseButton::Left)
    {
        return;
    }
    let Some(template) = active.selected.clone() else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor_pos) = window.cursor_position() else {
        return;
    };
    let Ok((cam_xform, camera)) = cameras.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(cam_xform, cursor_pos) else {
        return;
    };

    // Closest structure under the cursor wins.
    let mut best: Option<(ObbHit, &GlobalTransform, &PlacedStructure)> = None;
    for (xf, bounds, placed) in &structures {
        if let Some(hit) = ray_hits_obb(ray.origin, *ray.direction, xf, bounds.0) {
            if best.as_ref().map_or(true, |(b, _, _)| hit.t < b.t) {
                best = Some((hit, xf, placed));
            }
        }
    }
    let Some((hit, parent_xf, parent)) = best else {
        return;
    };

    // Face resolution runs in the parent's local frame.
    let inv = parent_xf.compute_matrix().inverse();
    let local_camera = inv.transform_point3(ray.origin);
    let local_to_camera = local_camera - hit.local_point;

    let Some(face) = resolve_face(hit.local_normal, local_to_camera) else {
        status.show("Could not detect face");
        rpc_interface.send_notification(
            "status_message",
            serde_json::json!({ "text": "Could not detect face" }),
        );
        return;
    };

    let placement = place_on_face(parent, face, &template, settings.rotation_composition);
    let mut placed = PlacedStructure::from_template(template, placement.position);
    placed.rotation = placement.rotation;

    let kind = placed.template.kind;
    let parent_kind = parent.template.kind;
    let position = placed.position;
    let entity = spawn_structure(&mut commands, &mut meshes, &mut materials, placed);
    select_only(&mut commands, &selected, entity);
    active.selected = None;

    status.show(format!(
        "Attached {} to {}",
        kind.as_str(),
        parent_kind.as_str()
    ));
    rpc_interface.send_notification(
        "structure_placed",
        serde_json::json!({
            "kind": kind.as_str(),
            "position": [position.x, position.y, position.z],
            "mode": "attach",
            "face": face.index(),
        }),
    );
}

// Geographic clicks relayed from the embedding map land through the projector
pub fn place_on_geo_click(
    mut events: EventReader<GeoPlaceEvent>,
    mode_manager: Res<ModeManager>,
    mut active: ResMut<ActiveTemplate>,
    settings: Res<BuilderSettings>,
    mut projector: ResMut<GeoProjector>,
    selected: Query<Entity, With<SelectedStructure>>,
    mut status: ResMut<StatusMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for event in events.read() {
        if !mode_manager.is_mode_active(PlacementMode::Map) {
            continue;
        }
        let Some(template) = active.selected.clone() else {
            status.show("No structure armed for placement");
            continue;
        };

        let offset = projector.project(&event.point, &settings.origin, settings.scale_steps);
        let ground = Vec3::new(offset.x as f32, offset.y as f32, offset.z as f32);

        let mut placed = PlacedStructure::from_template(template, ground);
        placed.position.y = ground.y + placed.bounds_size().y * 0.5;

        let kind = placed.template.kind;
        let position = placed.position;
        let entity = spawn_structure(&mut commands, &mut meshes, &mut materials, placed);
        select_only(&mut commands, &selected, entity);
        active.selected = None;

        status.show(format!("Placed {} from map click", kind.as_str()));
        rpc_interface.send_notification(
            "structure_placed",
            serde_json::json!({
                "kind": kind.as_str(),
                "position": [position.x, position.y, position.z],
                "mode": "geo",
                "longitude": event.point.longitude,
                "latitude": event.point.latitude,
            }),
        );
    }
}

// Face attachments requested over RPC carry a raw face index and land on the
// selected structure
pub fn attach_on_face_request(
    mut events: EventReader<AttachFaceEvent>,
    mut active: ResMut<ActiveTemplate>,
    settings: Res<BuilderSettings>,
    parents: Query<&PlacedStructure, With<SelectedStructure>>,
    selected: Query<Entity, With<SelectedStructure>>,
    mut status: ResMut<StatusMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for event in events.read() {
        let Some(template) = active.selected.clone() else {
            status.show("No structure armed for placement");
            continue;
        };
        let Ok(parent) = parents.single() else {
            status.show("Select a structure to attach to first");
            continue;
        };

        let placement = match place_on_face_indexed(
            parent,
            event.face,
            &template,
            settings.rotation_composition,
        ) {
            Ok(placement) => placement,
            Err(error) => {
                status.show(error.to_string());
                rpc_interface.send_notification(
                    "status_message",
                    serde_json::json!({ "text": error.to_string() }),
                );
                continue;
            }
        };

        let mut placed = PlacedStructure::from_template(template, placement.position);
        placed.rotation = placement.rotation;

        let kind = placed.template.kind;
        let parent_kind = parent.template.kind;
        let position = placed.position;
        let entity = spawn_structure(&mut commands, &mut meshes, &mut materials, placed);
        select_only(&mut commands, &selected, entity);
        active.selected = None;

        status.show(format!(
            "Attached {} to {}",
            kind.as_str(),
            parent_kind.as_str()
        ));
        rpc_interface.send_notification(
            "structure_placed",
            serde_json::json!({
                "kind": kind.as_str(),
                "position": [position.x, position.y, position.z],
                "mode": "attach",
                "face": event.face,
            }),
        );
    }
}

/// Arm a template chosen from the panel or over RPC.
pub fn handle_select_template_events(
    mut events: EventReader<SelectTemplateEvent>,
    mut active: ResMut<ActiveTemplate>,
    mut status: ResMut<StatusMessage>,
) {
    for event in events.read() {
        status.show(format!("Armed {} for placement", event.template.name));
        active.selected = Some(event.template.clone());
    }
}

/// Remove every placed structure when a clear-all arrives from the panel or RPC.
pub fn handle_clear_all_events(
    mut events: EventReader<ClearAllEvent>,
    structures: Query<Entity, With<PlacedStructure>>,
    mut status: ResMut<StatusMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut commands: Commands,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    let mut removed = 0;
    for entity in &structures {
        commands.entity(entity).despawn();
        removed += 1;
    }
    status.show(format!("Cleared {removed} structures"));
    rpc_interface.send_notification(
        "structures_cleared",
        serde_json::json!({ "count": removed }),
    );
}

/// Spawn a structure entity with its mesh, material, and bounds in place.
pub fn spawn_structure(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    placed: PlacedStructure,
) -> Entity {
    let material = materials.add(StandardMaterial {
        base_color: placed.template.base_colour(),
        perceptual_roughness: 0.9,
        ..default()
    });
    let name = format!("{}_structure", placed.template.kind.as_str());
    let transform = placed.transform();
    let bounds = StructureBounds(placed.bounds_size());
    let mesh = meshes.add(structure_mesh(&placed));

    commands
        .spawn((
            Mesh3d(mesh),
            MeshMaterial3d(material),
            transform,
            bounds,
            placed,
            Name::new(name),
        ))
        .id()
}

/// Move the selection marker to `entity`, clearing it everywhere else.
pub fn select_only(
    commands: &mut Commands,
    selected: &Query<Entity, With<SelectedStructure>>,
    entity: Entity,
) {
    for previous in selected {
        commands.entity(previous).remove::<SelectedStructure>();
    }
    commands.entity(entity).insert(SelectedStructure);
}

fn snap_to_grid(point: Vec3, grid_step: f32) -> Vec3 {
    if grid_step <= 0.0 {
        return point;
    }
    Vec3::new(
        (point.x / grid_step).round() * grid_step,
        point.y,
        (point.z / grid_step).round() * grid_step,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_snap_rounds_horizontal_axes_only() {
        let snapped = snap_to_grid(Vec3::new(3.6, 1.2, -0.4), 1.0);
        assert_eq!(snapped, Vec3::new(4.0, 1.2, 0.0));

        let half = snap_to_grid(Vec3::new(3.6, 1.2, -0.4), 0.5);
        assert_eq!(half, Vec3::new(3.5, 1.2, -0.5));
    }

    #[test]
    fn non_positive_grid_step_disables_snapping() {
        let point = Vec3::new(3.6, 1.2, -0.4);
        assert_eq!(snap_to_grid(point, 0.0), point);
        assert_eq!(snap_to_grid(point, -1.0), point);
    }
}
