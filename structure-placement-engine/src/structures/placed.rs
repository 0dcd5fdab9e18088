use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use constants::placement::DEFAULT_EXTENT;

use super::catalog::{DimensionRange, StructureTemplate};

/// Live per-axis overrides applied on top of the template defaults by the
/// dimension controls. `None` means "use the template default".
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CurrentDimensions {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub depth: Option<f32>,
    pub radius: Option<f32>,
}

/// Current value for one axis: override, else template default, else the
/// 1 m fallback extent.
pub fn effective_extent(range: Option<DimensionRange>, current: Option<f32>) -> f32 {
    current
        .or(range.map(|r| r.default))
        .unwrap_or(DEFAULT_EXTENT)
}

/// A structure standing in the scene. Position and XYZ Euler rotation are the
/// source of truth; the entity `Transform` is derived from them so rotation
/// edits stay component-wise the way the placement math expects.
#[derive(Component, Debug, Clone)]
pub struct PlacedStructure {
    pub template: StructureTemplate,
    pub dimensions: CurrentDimensions,
    pub position: Vec3,
    pub rotation: Vec3,
}

/// Half-extent source for OBB raycasts, kept alongside the unscaled transform.
#[derive(Component, Debug, Clone, Copy)]
pub struct StructureBounds(pub Vec3);

impl PlacedStructure {
    pub fn from_template(template: StructureTemplate, position: Vec3) -> Self {
        Self {
            template,
            dimensions: CurrentDimensions::default(),
            position,
            rotation: Vec3::ZERO,
        }
    }

    /// Box extents (width, height, depth) with unspecified axes defaulting to 1 m.
    pub fn extents(&self) -> Vec3 {
        let d = &self.template.dimensions;
        Vec3::new(
            effective_extent(d.width, self.dimensions.width),
            effective_extent(d.height, self.dimensions.height),
            effective_extent(d.depth, self.dimensions.depth),
        )
    }

    /// Axis-aligned bounding size in local space. Cones bound by their
    /// radius in x/z; everything else is its box extents.
    pub fn bounds_size(&self) -> Vec3 {
        let d = &self.template.dimensions;
        if d.radius.is_some() {
            let radius = effective_extent(d.radius, self.dimensions.radius);
            let height = effective_extent(d.height, self.dimensions.height);
            Vec3::new(radius * 2.0, height, radius * 2.0)
        } else {
            self.extents()
        }
    }

    /// World rotation derived from the stored Euler angles (XYZ order).
    pub fn quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).with_rotation(self.quat())
    }
}

/// Keep entity transforms, bounds, and meshes in step with edits to the
/// structure data. Dimension changes rebuild the mesh at the new size.
pub fn sync_structure_visuals(
    mut q: Query<
        (
            &PlacedStructure,
            &mut Transform,
            &mut StructureBounds,
            &mut Mesh3d,
        ),
        Changed<PlacedStructure>,
    >,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    for (placed, mut transform, mut bounds, mut mesh) in &mut q {
        *transform = placed.transform();
        bounds.0 = placed.bounds_size();
        mesh.0 = meshes.add(structure_mesh(placed));
    }
}

/// Build the display mesh for a structure at its current dimensions.
pub fn structure_mesh(placed: &PlacedStructure) -> Mesh {
    let d = &placed.template.dimensions;
    if d.radius.is_some() {
        let radius = effective_extent(d.radius, placed.dimensions.radius);
        let height = effective_extent(d.height, placed.dimensions.height);
        Cone::new(radius, height).into()
    } else {
        let size = placed.extents();
        Cuboid::new(size.x, size.y, size.z).into()
    }
}
