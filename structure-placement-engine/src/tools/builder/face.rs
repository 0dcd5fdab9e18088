use bevy::prelude::*;
use std::fmt;

use constants::placement::FACE_ACCEPT_DOT;

/// One of the six axis-aligned faces of a structure in its local frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceIndex {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl FaceIndex {
    pub const ALL: [FaceIndex; 6] = [
        Self::PosX,
        Self::NegX,
        Self::PosY,
        Self::NegY,
        Self::PosZ,
        Self::NegZ,
    ];

    /// Validate a raw face index as delivered by a pointer event or RPC call.
    pub fn from_raw(index: usize) -> Result<Self, PlacementError> {
        match index {
            0 => Ok(Self::PosX),
            1 => Ok(Self::NegX),
            2 => Ok(Self::PosY),
            3 => Ok(Self::NegY),
            4 => Ok(Self::PosZ),
            5 => Ok(Self::NegZ),
            other => Err(PlacementError::InvalidFace(other)),
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::PosX => 0,
            Self::NegX => 1,
            Self::PosY => 2,
            Self::NegY => 3,
            Self::PosZ => 4,
            Self::NegZ => 5,
        }
    }

    /// Outward unit normal in the parent's local frame.
    pub fn normal(self) -> Vec3 {
        match self {
            Self::PosX => Vec3::X,
            Self::NegX => Vec3::NEG_X,
            Self::PosY => Vec3::Y,
            Self::NegY => Vec3::NEG_Y,
            Self::PosZ => Vec3::Z,
            Self::NegZ => Vec3::NEG_Z,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::PosX => Self::NegX,
            Self::NegX => Self::PosX,
            Self::PosY => Self::NegY,
            Self::NegY => Self::PosY,
            Self::PosZ => Self::NegZ,
            Self::NegZ => Self::PosZ,
        }
    }
}

/// Errors from the placement pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    /// Raw face index outside 0..=5. Programmer/transport error; resolved
    /// faces can never produce it.
    InvalidFace(usize),
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::InvalidFace(index) => {
                write!(f, "face index {index} out of range (expected 0..=5)")
            }
        }
    }
}

impl std::error::Error for PlacementError {}

/// Resolve which face a click landed on from the local-space surface normal
/// and the local-space direction from the hit point back to the viewer.
///
/// The dominant normal axis picks the face pair, its sign picks the face.
/// The hit only counts as attachable when the normal leans toward the viewer
/// by more than the acceptance threshold; grazing and away-facing hits are
/// ambiguous and return `None` so the caller can re-prompt.
pub fn resolve_face(local_normal: Vec3, local_to_camera: Vec3) -> Option<FaceIndex> {
    let normal = local_normal.normalize_or_zero();
    let to_camera = local_to_camera.normalize_or_zero();
    if normal == Vec3::ZERO || to_camera == Vec3::ZERO {
        return None;
    }

    let abs = normal.abs();
    let face = if abs.x > abs.y && abs.x > abs.z {
        if normal.x > 0.0 { FaceIndex::PosX } else { FaceIndex::NegX }
    } else if abs.y > abs.x && abs.y > abs.z {
        if normal.y > 0.0 { FaceIndex::PosY } else { FaceIndex::NegY }
    } else {
        if normal.z > 0.0 { FaceIndex::PosZ } else { FaceIndex::NegZ }
    };

    (normal.dot(to_camera) > FACE_ACCEPT_DOT).then_some(face)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_indices_map_to_faces_in_order() {
        for (i, face) in FaceIndex::ALL.iter().enumerate() {
            assert_eq!(FaceIndex::from_raw(i), Ok(*face));
            assert_eq!(face.index(), i);
        }
    }

    #[test]
    fn raw_index_out_of_range_is_invalid_face() {
        assert_eq!(FaceIndex::from_raw(6), Err(PlacementError::InvalidFace(6)));
        assert_eq!(
            FaceIndex::from_raw(usize::MAX),
            Err(PlacementError::InvalidFace(usize::MAX))
        );
    }

    #[test]
    fn dominant_axis_and_sign_pick_the_face() {
        // Viewer straight along each normal: always accepted.
        for face in FaceIndex::ALL {
            let n = face.normal();
            assert_eq!(resolve_face(n, n), Some(face));
        }
    }

    #[test]
    fn slightly_tilted_normal_still_resolves_to_dominant_axis() {
        let normal = Vec3::new(0.9, 0.3, 0.2);
        assert_eq!(resolve_face(normal, normal), Some(FaceIndex::PosX));

        let normal = Vec3::new(0.1, -0.8, 0.3);
        assert_eq!(resolve_face(normal, normal), Some(FaceIndex::NegY));
    }

    #[test]
    fn z_wins_exact_ties() {
        // Equal |x| and |z| fall through to the z branch.
        let normal = Vec3::new(0.5, 0.0, 0.5);
        assert_eq!(resolve_face(normal, normal), Some(FaceIndex::PosZ));
    }

    #[test]
    fn face_leaning_away_from_viewer_is_rejected() {
        let normal = Vec3::X;
        // Viewer sits behind the face: dot is negative.
        assert_eq!(resolve_face(normal, Vec3::NEG_X), None);
        // Perpendicular grazing hit: dot is zero, below threshold.
        assert_eq!(resolve_face(normal, Vec3::Y), None);
    }

    #[test]
    fn acceptance_threshold_is_exclusive() {
        let normal = Vec3::X;
        // dot just under the 0.2 threshold.
        let barely_under = Vec3::new(0.19, 0.0, 1.0);
        let dot = normal.dot(barely_under.normalize());
        assert!(dot < FACE_ACCEPT_DOT);
        assert_eq!(resolve_face(normal, barely_under), None);

        // Comfortably over it.
        let over = Vec3::new(0.5, 0.0, 1.0);
        assert_eq!(resolve_face(normal, over), Some(FaceIndex::PosX));
    }

    #[test]
    fn degenerate_inputs_resolve_to_nothing() {
        assert_eq!(resolve_face(Vec3::ZERO, Vec3::X), None);
        assert_eq!(resolve_face(Vec3::X, Vec3::ZERO), None);
    }

    #[test]
    fn opposites_pair_up() {
        for face in FaceIndex::ALL {
            assert_eq!(face.opposite().opposite(), face);
            assert_eq!(face.normal(), -face.opposite().normal());
        }
    }
}
