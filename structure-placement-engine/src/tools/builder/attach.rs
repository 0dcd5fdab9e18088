use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};

use crate::structures::catalog::StructureTemplate;
use crate::structures::placed::{PlacedStructure, effective_extent};

use super::face::{FaceIndex, PlacementError};

/// How the face rotation offset combines with the parent's rotation.
///
/// `EulerSum` adds Euler angles component-wise. That is not a general rotation
/// composition, but it looks right as long as structures are rotated about a
/// single axis at a time. `Quaternion` composes properly for parents rotated
/// on several axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationComposition {
    #[default]
    EulerSum,
    Quaternion,
}

/// Output of the face placer: where the child goes and how it is oriented
/// (XYZ Euler radians), ready to seed a [`PlacedStructure`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    pub rotation: Vec3,
}

/// Compute the placement that puts `child` flush against the given face of
/// `parent`: surface touching surface, no gap, no overlap.
///
/// The offset along the face normal is half the parent's extent on that axis
/// plus half the child's extent on the axis that meets it (the child's depth
/// for side faces, its height for top/bottom). Openings (windows/doors) get a
/// rotation offset so their front faces outward: on wall side faces and on
/// any top/bottom face. The local offset is carried through the parent's
/// world rotation, so the result is correct however the parent is turned.
pub fn place_on_face(
    parent: &PlacedStructure,
    face: FaceIndex,
    child: &StructureTemplate,
    composition: RotationComposition,
) -> Placement {
    let parent_size = parent.extents();
    let child_size = template_extents(child);

    let opening = child.kind.is_opening();
    let opening_on_wall = opening && parent.template.kind.is_wall();

    let (local_offset, rotation_offset) = match face {
        FaceIndex::PosX => (
            Vec3::new(parent_size.x / 2.0 + child_size.z / 2.0, 0.0, 0.0),
            if opening_on_wall {
                Vec3::new(0.0, FRAC_PI_2, 0.0)
            } else {
                Vec3::ZERO
            },
        ),
        FaceIndex::NegX => (
            Vec3::new(-parent_size.x / 2.0 - child_size.z / 2.0, 0.0, 0.0),
            if opening_on_wall {
                Vec3::new(0.0, -FRAC_PI_2, 0.0)
            } else {
                Vec3::ZERO
            },
        ),
        FaceIndex::PosY => (
            Vec3::new(0.0, parent_size.y / 2.0 + child_size.y / 2.0, 0.0),
            if opening {
                Vec3::new(FRAC_PI_2, 0.0, 0.0)
            } else {
                Vec3::ZERO
            },
        ),
        FaceIndex::NegY => (
            Vec3::new(0.0, -parent_size.y / 2.0 - child_size.y / 2.0, 0.0),
            if opening {
                Vec3::new(-FRAC_PI_2, 0.0, 0.0)
            } else {
                Vec3::ZERO
            },
        ),
        FaceIndex::PosZ => (
            Vec3::new(0.0, 0.0, parent_size.z / 2.0 + child_size.z / 2.0),
            Vec3::ZERO,
        ),
        FaceIndex::NegZ => (
            Vec3::new(0.0, 0.0, -parent_size.z / 2.0 - child_size.z / 2.0),
            if opening_on_wall {
                Vec3::new(0.0, PI, 0.0)
            } else {
                Vec3::ZERO
            },
        ),
    };

    let parent_quat = parent.quat();
    let position = parent.position + parent_quat * local_offset;

    let rotation = match composition {
        RotationComposition::EulerSum => parent.rotation + rotation_offset,
        RotationComposition::Quaternion => {
            let composed = parent_quat
                * Quat::from_euler(
                    EulerRot::XYZ,
                    rotation_offset.x,
                    rotation_offset.y,
                    rotation_offset.z,
                );
            let (x, y, z) = composed.to_euler(EulerRot::XYZ);
            Vec3::new(x, y, z)
        }
    };

    Placement { position, rotation }
}

/// [`place_on_face`] for callers holding a raw face index (RPC, pointer
/// events). Fails with [`PlacementError::InvalidFace`] outside 0..=5.
pub fn place_on_face_indexed(
    parent: &PlacedStructure,
    raw_face: usize,
    child: &StructureTemplate,
    composition: RotationComposition,
) -> Result<Placement, PlacementError> {
    let face = FaceIndex::from_raw(raw_face)?;
    Ok(place_on_face(parent, face, child, composition))
}

/// Child extents straight from the template defaults (a freshly attached
/// structure has no dimension overrides yet).
fn template_extents(template: &StructureTemplate) -> Vec3 {
    let d = &template.dimensions;
    Vec3::new(
        effective_extent(d.width, None),
        effective_extent(d.height, None),
        effective_extent(d.depth, None),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::catalog::{
        DimensionRange, DimensionRanges, StructureKind, StructureTemplate,
    };

    fn range(default: f32) -> Option<DimensionRange> {
        Some(DimensionRange {
            min: 0.05,
            max: 100.0,
            default,
        })
    }

    fn template(kind: StructureKind, width: f32, height: f32, depth: f32) -> StructureTemplate {
        StructureTemplate {
            kind,
            name: kind.as_str().to_string(),
            dimensions: DimensionRanges {
                width: range(width),
                height: range(height),
                depth: range(depth),
                radius: None,
            },
            colour: [1.0, 1.0, 1.0],
        }
    }

    fn wall_at_origin() -> PlacedStructure {
        PlacedStructure::from_template(template(StructureKind::Wall, 4.0, 2.5, 0.2), Vec3::ZERO)
    }

    fn assert_vec3_eq(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-6, "{a:?} != {b:?}");
    }

    #[test]
    fn window_on_wall_front_face_is_pure_translation() {
        let wall = wall_at_origin();
        let window = template(StructureKind::Window, 1.2, 1.0, 0.1);

        let placement = place_on_face(&wall, FaceIndex::PosZ, &window, RotationComposition::EulerSum);

        // depth/2 + depth/2 = 0.1 + 0.05; front/back faces never rotate.
        assert_vec3_eq(placement.position, Vec3::new(0.0, 0.0, 0.15));
        assert_vec3_eq(placement.rotation, Vec3::ZERO);
    }

    #[test]
    fn door_on_wall_right_face_turns_to_face_outward() {
        let wall = wall_at_origin();
        let door = template(StructureKind::Door, 1.0, 2.0, 0.1);

        let placement = place_on_face(&wall, FaceIndex::PosX, &door, RotationComposition::EulerSum);

        // width/2 + depth/2 = 2.0 + 0.05.
        assert_vec3_eq(placement.position, Vec3::new(2.05, 0.0, 0.0));
        assert_vec3_eq(placement.rotation, Vec3::new(0.0, FRAC_PI_2, 0.0));
    }

    #[test]
    fn plain_child_on_plain_parent_never_rotates() {
        let parent =
            PlacedStructure::from_template(template(StructureKind::Box, 2.0, 2.0, 2.0), Vec3::ZERO);
        let child = template(StructureKind::Box, 1.0, 1.0, 1.0);

        for face in FaceIndex::ALL {
            let placement = place_on_face(&parent, face, &child, RotationComposition::EulerSum);
            assert_vec3_eq(placement.rotation, parent.rotation);
        }
    }

    #[test]
    fn opening_on_top_face_lies_flat_even_off_walls() {
        let parent =
            PlacedStructure::from_template(template(StructureKind::Box, 2.0, 2.0, 2.0), Vec3::ZERO);
        let window = template(StructureKind::Window, 1.2, 1.0, 0.1);

        let top = place_on_face(&parent, FaceIndex::PosY, &window, RotationComposition::EulerSum);
        assert_vec3_eq(top.rotation, Vec3::new(FRAC_PI_2, 0.0, 0.0));

        let bottom = place_on_face(&parent, FaceIndex::NegY, &window, RotationComposition::EulerSum);
        assert_vec3_eq(bottom.rotation, Vec3::new(-FRAC_PI_2, 0.0, 0.0));
    }

    #[test]
    fn opposite_faces_produce_antiparallel_offsets() {
        let parent =
            PlacedStructure::from_template(template(StructureKind::Box, 3.0, 2.0, 1.5), Vec3::ZERO);
        let child = template(StructureKind::Box, 1.0, 1.0, 1.0);

        for face in [FaceIndex::PosX, FaceIndex::PosY, FaceIndex::PosZ] {
            let a = place_on_face(&parent, face, &child, RotationComposition::EulerSum);
            let b = place_on_face(&parent, face.opposite(), &child, RotationComposition::EulerSum);
            assert_vec3_eq(a.position, -b.position);
        }
    }

    #[test]
    fn parent_rotation_carries_the_offset_around() {
        let mut wall = wall_at_origin();
        wall.position = Vec3::new(10.0, 1.0, -5.0);
        wall.rotation = Vec3::new(0.0, FRAC_PI_2, 0.0);
        let door = template(StructureKind::Door, 1.0, 2.0, 0.1);

        let placement = place_on_face(&wall, FaceIndex::PosX, &door, RotationComposition::EulerSum);

        // A quarter-turn about Y maps local +X onto world -Z.
        assert_vec3_eq(placement.position, Vec3::new(10.0, 1.0, -5.0 - 2.05));
        assert_vec3_eq(placement.rotation, Vec3::new(0.0, PI, 0.0));
    }

    #[test]
    fn composition_modes_agree_for_single_axis_parents() {
        let mut wall = wall_at_origin();
        wall.rotation = Vec3::new(0.0, 0.7, 0.0);
        let door = template(StructureKind::Door, 1.0, 2.0, 0.1);

        let euler = place_on_face(&wall, FaceIndex::PosX, &door, RotationComposition::EulerSum);
        let quat = place_on_face(&wall, FaceIndex::PosX, &door, RotationComposition::Quaternion);

        assert_vec3_eq(euler.position, quat.position);
        let qa = Quat::from_euler(EulerRot::XYZ, euler.rotation.x, euler.rotation.y, euler.rotation.z);
        let qb = Quat::from_euler(EulerRot::XYZ, quat.rotation.x, quat.rotation.y, quat.rotation.z);
        assert!(qa.angle_between(qb) < 1e-5);
    }

    #[test]
    fn quaternion_mode_composes_multi_axis_parents_properly() {
        let mut parent =
            PlacedStructure::from_template(template(StructureKind::Wall, 4.0, 2.5, 0.2), Vec3::ZERO);
        parent.rotation = Vec3::new(FRAC_PI_2, 0.0, 0.0);
        let door = template(StructureKind::Door, 1.0, 2.0, 0.1);

        let placement = place_on_face(&parent, FaceIndex::PosX, &door, RotationComposition::Quaternion);

        let expected = parent.quat() * Quat::from_euler(EulerRot::XYZ, 0.0, FRAC_PI_2, 0.0);
        let got = Quat::from_euler(
            EulerRot::XYZ,
            placement.rotation.x,
            placement.rotation.y,
            placement.rotation.z,
        );
        assert!(got.angle_between(expected) < 1e-5);
    }

    #[test]
    fn unspecified_child_axes_default_to_one_metre() {
        let wall = wall_at_origin();
        // A child template with no dimensions at all.
        let bare = StructureTemplate {
            kind: StructureKind::Box,
            name: "bare".to_string(),
            dimensions: DimensionRanges::default(),
            colour: [1.0, 1.0, 1.0],
        };

        let placement = place_on_face(&wall, FaceIndex::PosZ, &bare, RotationComposition::EulerSum);
        // wall depth/2 + default extent/2 = 0.1 + 0.5.
        assert_vec3_eq(placement.position, Vec3::new(0.0, 0.0, 0.6));
    }

    #[test]
    fn raw_face_indices_are_validated_at_the_boundary() {
        let wall = wall_at_origin();
        let door = template(StructureKind::Door, 1.0, 2.0, 0.1);

        let ok = place_on_face_indexed(&wall, 0, &door, RotationComposition::EulerSum);
        assert!(ok.is_ok());

        let err = place_on_face_indexed(&wall, 7, &door, RotationComposition::EulerSum);
        assert_eq!(err, Err(PlacementError::InvalidFace(7)));
    }
}
