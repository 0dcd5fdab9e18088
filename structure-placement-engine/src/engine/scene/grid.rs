use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::view::NoFrustumCulling;

use constants::render_settings::GRID_LINE_ALPHA;

#[derive(Component)]
pub struct GroundGrid;

#[derive(Resource, Default)]
pub struct GridCreated {
    pub created: bool,
}

/// Create the flat ground grid at y = 0 the builder places onto.
pub fn create_ground_grid(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    half_extent: f32,
    cell_size: f32,
) {
    let grid_material = materials.add(StandardMaterial {
        base_color: Color::srgba(1.0, 1.0, 1.0, GRID_LINE_ALPHA),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    let cell = cell_size.max(0.1);
    let lines = (half_extent * 2.0 / cell).round() as u32;

    let mesh = create_grid_mesh(half_extent, cell, lines);
    commands.spawn((
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(grid_material),
        Visibility::Visible,
        NoFrustumCulling,
        Transform::IDENTITY,
        GroundGrid,
        Name::new("ground_grid"),
    ));
}

/// One LineList mesh holding both grid directions.
fn create_grid_mesh(half_extent: f32, cell: f32, lines: u32) -> Mesh {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for i in 0..=lines {
        let offset = -half_extent + i as f32 * cell;

        // Line running along Z at fixed X
        let start = vertices.len() as u32;
        vertices.push([offset, 0.0, -half_extent]);
        vertices.push([offset, 0.0, half_extent]);
        indices.extend_from_slice(&[start, start + 1]);

        // Line running along X at fixed Z
        let start = vertices.len() as u32;
        vertices.push([-half_extent, 0.0, offset]);
        vertices.push([half_extent, 0.0, offset]);
        indices.extend_from_slice(&[start, start + 1]);
    }

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vertices);
    mesh.insert_indices(bevy::render::mesh::Indices::U32(indices));

    mesh
}
