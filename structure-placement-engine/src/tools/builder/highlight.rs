use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use constants::placement::{FACE_HIGHLIGHT_LIFT, FACE_HIGHLIGHT_PADDING};

use crate::structures::placed::{PlacedStructure, StructureBounds};
use crate::tools::mode::{ModeManager, PlacementMode};

use super::face::{FaceIndex, resolve_face};
use super::ray::{ObbHit, ray_hits_obb};
use super::state::{ActiveTemplate, FaceHighlight};

/// Hover feedback in attach mode: a translucent quad floating just off the
/// face the armed template would land on. Rebuilt from scratch every frame;
/// despawn-first keeps stale quads from lingering when the cursor leaves.
pub fn update_face_highlight(
    mode_manager: Res<ModeManager>,
    active: Res<ActiveTemplate>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    structures: Query<(&GlobalTransform, &StructureBounds, &PlacedStructure)>,
    highlights: Query<Entity, With<FaceHighlight>>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for entity in &highlights {
        commands.entity(entity).despawn();
    }

    if !mode_manager.is_mode_active(PlacementMode::Attach) || active.selected.is_none() {
        return;
    }
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

    let inv = parent_xf.compute_matrix().inverse();
    let local_camera = inv.transform_point3(ray.origin);
    let Some(face) = resolve_face(hit.local_normal, local_camera - hit.local_point) else {
        return;
    };

    let size = parent.bounds_size();
    let (quad_size, local_offset, face_rotation) = face_quad(face, size);

    let parent_quat = parent.quat();
    let translation = parent.position + parent_quat * local_offset;
    let rotation = parent_quat * face_rotation;

    let material = materials.add(StandardMaterial {
        base_color: Color::srgba(0.2, 0.9, 0.3, 0.35),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        cull_mode: None,
        ..default()
    });

    commands.spawn((
        Mesh3d(meshes.add(Rectangle::new(quad_size.x, quad_size.y))),
        MeshMaterial3d(material),
        Transform::from_translation(translation).with_rotation(rotation),
        FaceHighlight,
        Name::new("face_highlight"),
    ));
}

/// Quad dimensions, centre offset, and orientation for one face of a box of
/// the given size. Rectangles face +Z, so side and top faces get turned to
/// look along their normal.
fn face_quad(face: FaceIndex, size: Vec3) -> (Vec2, Vec3, Quat) {
    let pad = FACE_HIGHLIGHT_PADDING * 2.0;
    let lift = FACE_HIGHLIGHT_LIFT;
    let he = size * 0.5;

    match face {
        FaceIndex::PosX => (
            Vec2::new(size.z + pad, size.y + pad),
            Vec3::new(he.x + lift, 0.0, 0.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        ),
        FaceIndex::NegX => (
            Vec2::new(size.z + pad, size.y + pad),
            Vec3::new(-he.x - lift, 0.0, 0.0),
            Quat::from_rotation_y(-std::f32::consts::FRAC_PI_2),
        ),
        FaceIndex::PosY => (
            Vec2::new(size.x + pad, size.z + pad),
            Vec3::new(0.0, he.y + lift, 0.0),
            Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2),
        ),
        FaceIndex::NegY => (
            Vec2::new(size.x + pad, size.z + pad),
            Vec3::new(0.0, -he.y - lift, 0.0),
            Quat::from_rotation_x(std::f32::consts::FRAC_PI_2),
        ),
        FaceIndex::PosZ => (
            Vec2::new(size.x + pad, size.y + pad),
            Vec3::new(0.0, 0.0, he.z + lift),
            Quat::IDENTITY,
        ),
        FaceIndex::NegZ => (
            Vec2::new(size.x + pad, size.y + pad),
            Vec3::new(0.0, 0.0, -he.z - lift),
            Quat::from_rotation_y(std::f32::consts::PI),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quads_sit_just_outside_their_face() {
        let size = Vec3::new(4.0, 2.5, 0.2);
        for face in FaceIndex::ALL {
            let (_, offset, _) = face_quad(face, size);
            let normal = face.normal();
            // Offset points along the face normal, lifted off the surface.
            let along = offset.dot(normal);
            let expected = (size * 0.5).dot(normal.abs()) + FACE_HIGHLIGHT_LIFT;
            assert!((along - expected).abs() < 1e-6, "{face:?}");
            // No sideways component.
            assert!((offset - normal * along).length() < 1e-6, "{face:?}");
        }
    }

    #[test]
    fn quad_rotation_points_the_rectangle_along_the_normal() {
        let size = Vec3::splat(2.0);
        for face in FaceIndex::ALL {
            let (_, _, rotation) = face_quad(face, size);
            let facing = rotation * Vec3::Z;
            assert!((facing - face.normal()).length() < 1e-5, "{face:?}");
        }
    }

    #[test]
    fn quad_size_matches_face_extents_plus_padding() {
        let size = Vec3::new(4.0, 2.5, 0.2);
        let pad = FACE_HIGHLIGHT_PADDING * 2.0;

        let (front, _, _) = face_quad(FaceIndex::PosZ, size);
        assert_eq!(front, Vec2::new(4.0 + pad, 2.5 + pad));

        let (side, _, _) = face_quad(FaceIndex::PosX, size);
        assert_eq!(side, Vec2::new(0.2 + pad, 2.5 + pad));

        let (top, _, _) = face_quad(FaceIndex::PosY, size);
        assert_eq!(top, Vec2::new(4.0 + pad, 0.2 + pad));
    }
}
