use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use constants::placement::{DUPLICATE_NUDGE, ROTATE_STEP};

use crate::engine::camera::viewport_camera::ViewportCamera;
use crate::settings::BuilderSettings;
use crate::structures::placed::{PlacedStructure, StructureBounds};

use super::placement::{select_only, spawn_structure};
use super::ray::ray_hits_obb;
use super::state::{ActiveTemplate, SelectedStructure, StatusMessage};

// Toggles selection of placed structures on left mouse click (no template armed)
pub fn toggle_select_on_click(
    buttons: Res<ButtonInput<MouseButton>>,
    active: Res<ActiveTemplate>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    structures: Query<(Entity, &GlobalTransform, &StructureBounds, Option<&SelectedStructure>)>,
    selected: Query<Entity, With<SelectedStructure>>,
    mut commands: Commands,
) {
    // An armed template means the click is a placement, not a selection.
    if active.selected.is_some() || !buttons.just_pressed(MouseButton::Left) {
        return;
    }

    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor_pos) = window.cursor_position() else {
        return;
    };
    let Ok((cam_xf, camera)) = cameras.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(cam_xf, cursor_pos) else {
        return;
    };

    let mut best: Option<(Entity, f32, bool)> = None;
    for (e, xf, StructureBounds(size), was_selected) in &structures {
        if let Some(hit) = ray_hits_obb(ray.origin, *ray.direction, xf, *size) {
            if hit.t > 0.0 && best.map_or(true, |(_, t, _)| hit.t < t) {
                best = Some((e, hit.t, was_selected.is_some()));
            }
        }
    }

    match best {
        Some((entity, _, was_selected)) => {
            for previous in &selected {
                commands.entity(previous).remove::<SelectedStructure>();
            }
            if !was_selected {
                commands.entity(entity).insert(SelectedStructure);
            }
        }
        // Clicked empty space: deselect everything.
        None => {
            for previous in &selected {
                commands.entity(previous).remove::<SelectedStructure>();
            }
        }
    }
}

pub fn deselect_on_escape(
    keyboard: Res<ButtonInput<KeyCode>>,
    selected: Query<Entity, With<SelectedStructure>>,
    mut commands: Commands,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        for entity in &selected {
            commands.entity(entity).remove::<SelectedStructure>();
        }
    }
}

pub fn delete_selected(
    keyboard: Res<ButtonInput<KeyCode>>,
    selected: Query<(Entity, &PlacedStructure), With<SelectedStructure>>,
    mut status: ResMut<StatusMessage>,
    mut commands: Commands,
) {
    if !keyboard.any_just_pressed([KeyCode::Delete, KeyCode::Backspace]) {
        return;
    }
    for (entity, placed) in &selected {
        commands.entity(entity).despawn();
        status.show(format!("Deleted {}", placed.template.kind.as_str()));
    }
}

/// Duplicate the selected structure with a slight offset so the copy is
/// visibly its own entity. The copy takes over the selection.
pub fn duplicate_selected(
    keyboard: Res<ButtonInput<KeyCode>>,
    q_selected: Query<&PlacedStructure, With<SelectedStructure>>,
    selected: Query<Entity, With<SelectedStructure>>,
    mut status: ResMut<StatusMessage>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !keyboard.just_pressed(KeyCode::KeyC) {
        return;
    }
    let Ok(original) = q_selected.single() else {
        return;
    };

    let mut copy = original.clone();
    copy.position.x += copy.bounds_size().x + DUPLICATE_NUDGE;

    let kind = copy.template.kind;
    let entity = spawn_structure(&mut commands, &mut meshes, &mut materials, copy);
    select_only(&mut commands, &selected, entity);
    status.show(format!("Duplicated {}", kind.as_str()));
}

// Rotate the selection: Q/E about Y, Z/X about X, one step per press
pub fn rotate_selected(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut selected: Query<&mut PlacedStructure, With<SelectedStructure>>,
) {
    let mut delta = Vec3::ZERO;
    if keyboard.just_pressed(KeyCode::KeyQ) {
        delta.y += ROTATE_STEP;
    }
    if keyboard.just_pressed(KeyCode::KeyE) {
        delta.y -= ROTATE_STEP;
    }
    if keyboard.just_pressed(KeyCode::KeyZ) {
        delta.x += ROTATE_STEP;
    }
    if keyboard.just_pressed(KeyCode::KeyX) {
        delta.x -= ROTATE_STEP;
    }
    if delta == Vec3::ZERO {
        return;
    }
    for mut placed in &mut selected {
        placed.rotation += delta;
    }
}

// Nudge the selection one grid step: WASD relative to camera yaw,
// PageUp/PageDown vertically
pub fn nudge_selected(
    keyboard: Res<ButtonInput<KeyCode>>,
    viewport_camera: Option<Res<ViewportCamera>>,
    settings: Res<BuilderSettings>,
    mut selected: Query<&mut PlacedStructure, With<SelectedStructure>>,
) {
    if selected.is_empty() {
        return;
    }
    let Some(viewport_camera) = viewport_camera else {
        return;
    };

    let yaw_rot = Quat::from_rotation_y(viewport_camera.yaw);
    let forward = yaw_rot * Vec3::NEG_Z;
    let right = yaw_rot * Vec3::X;

    let mut delta = Vec3::ZERO;
    if keyboard.just_pressed(KeyCode::KeyW) {
        delta += forward;
    }
    if keyboard.just_pressed(KeyCode::KeyS) {
        delta -= forward;
    }
    if keyboard.just_pressed(KeyCode::KeyD) {
        delta += right;
    }
    if keyboard.just_pressed(KeyCode::KeyA) {
        delta -= right;
    }
    if keyboard.just_pressed(KeyCode::PageUp) {
        delta += Vec3::Y;
    }
    if keyboard.just_pressed(KeyCode::PageDown) {
        delta -= Vec3::Y;
    }
    if delta == Vec3::ZERO {
        return;
    }

    let step = settings.grid_step.max(0.01);
    for mut placed in &mut selected {
        placed.position += delta * step;
    }
}

// Arrow keys resize the selection within its template ranges:
// Up/Down = height, Left/Right = width (radius for cones), Shift = depth
pub fn adjust_selected_dimensions(
    keyboard: Res<ButtonInput<KeyCode>>,
    settings: Res<BuilderSettings>,
    mut selected: Query<&mut PlacedStructure, With<SelectedStructure>>,
) {
    if selected.is_empty() {
        return;
    }

    let step = (settings.grid_step * 0.25).max(0.05);
    let shift = keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);

    let mut height = 0.0f32;
    let mut horizontal = 0.0f32;
    if keyboard.just_pressed(KeyCode::ArrowUp) {
        height += step;
    }
    if keyboard.just_pressed(KeyCode::ArrowDown) {
        height -= step;
    }
    if keyboard.just_pressed(KeyCode::ArrowRight) {
        horizontal += step;
    }
    if keyboard.just_pressed(KeyCode::ArrowLeft) {
        horizontal -= step;
    }
    if height == 0.0 && horizontal == 0.0 {
        return;
    }

    for mut placed in &mut selected {
        let ranges = placed.template.dimensions;
        if height != 0.0 {
            if let Some(range) = ranges.height {
                let current = placed.dimensions.height.unwrap_or(range.default);
                placed.dimensions.height = Some(range.clamp(current + height));
            }
        }
        if horizontal != 0.0 {
            if let Some(range) = ranges.radius {
                let current = placed.dimensions.radius.unwrap_or(range.default);
                placed.dimensions.radius = Some(range.clamp(current + horizontal));
            } else if shift {
                if let Some(range) = ranges.depth {
                    let current = placed.dimensions.depth.unwrap_or(range.default);
                    placed.dimensions.depth = Some(range.clamp(current + horizontal));
                }
            } else if let Some(range) = ranges.width {
                let current = placed.dimensions.width.unwrap_or(range.default);
                placed.dimensions.width = Some(range.clamp(current + horizontal));
            }
        }
    }
}

/// Reflect selection in the material: selected structures go translucent.
pub fn apply_selection_material(
    newly_selected: Query<
        (&MeshMaterial3d<StandardMaterial>, &PlacedStructure),
        Added<SelectedStructure>,
    >,
    mut deselected: RemovedComponents<SelectedStructure>,
    restore: Query<(&MeshMaterial3d<StandardMaterial>, &PlacedStructure)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (material, placed) in &newly_selected {
        if let Some(mat) = materials.get_mut(&material.0) {
            mat.base_color = placed.template.base_colour().with_alpha(0.7);
            mat.alpha_mode = AlphaMode::Blend;
        }
    }
    for entity in deselected.read() {
        if let Ok((material, placed)) = restore.get(entity) {
            if let Some(mat) = materials.get_mut(&material.0) {
                mat.base_color = placed.template.base_colour();
                mat.alpha_mode = AlphaMode::Opaque;
            }
        }
    }
}
