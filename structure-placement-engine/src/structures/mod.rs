//! Structure data model: the template catalog and placed instances.

/// Template catalog asset loaded from JSON.
pub mod catalog;

/// Placed structure components and visual synchronisation.
pub mod placed;

use bevy::prelude::*;

use catalog::StructureCatalog;

#[derive(Resource)]
pub struct CatalogHandle(pub Handle<StructureCatalog>);

pub fn load_structure_catalog(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(CatalogHandle(
        asset_server.load("structures/builder.catalog.json"),
    ));
}
