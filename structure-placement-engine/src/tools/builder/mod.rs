//! Interactive structure builder: placement, attachment, and manipulation.
//!
//! Provides click-to-place construction on the ground grid, flush face
//! attachment against existing structures, and keyboard manipulation of the
//! selection, with a collapsible UI panel (native only) and RPC integration
//! for frontend control.
//!
//! ## Placement Modes
//!
//! The builder operates in two modes, tracked by `ModeManager`:
//!
//! ### Map Mode (`PlacementMode::Map`)
//! Active by default:
//! - Template buttons (or `select_structure` RPC) arm a template
//! - Left click drops it at the ground-plane intersection, snapped to the grid
//! - `map_click` RPC places it at a geographic coordinate through the
//!   projector instead of the cursor
//! - Structures standing in front of the ground hit swallow the click
//!
//! ### Attach Mode (`PlacementMode::Attach`)
//! Toggled with `M`, the panel button, or `set_placement_mode` RPC:
//! - Hovering an existing structure highlights the face under the cursor
//! - Left click resolves the face from the hit normal and places the armed
//!   template flush against it
//! - Windows and doors rotate to face outward from walls and to lie flat on
//!   top/bottom faces
//! - Grazing and away-facing hits are rejected with a status message
//!
//! ## Selection
//!
//! With no template armed, left click raycasts against structure OBBs:
//! - Selected structures go translucent; clicking again or Escape deselects
//! - `Q`/`E` and `Z`/`X` rotate, WASD nudges one grid step relative to the
//!   camera, PageUp/PageDown moves vertically
//! - Arrow keys resize within the template's dimension ranges
//! - `C` duplicates, Delete/Backspace removes
//!
//! ## Face Resolution
//!
//! Attachment uses oriented bounding box (OBB) intersection:
//! - Camera ray transformed into structure-local space
//! - AABB slab method tests against half-extents, tracking the entry face
//! - Dominant normal axis and sign pick one of the six faces
//! - Hits accepted only when the normal leans toward the viewer

/// Flush placement math: per-face offsets and rotation composition.
///
/// Positions a child template surface-to-surface against a parent face.
pub mod attach;

/// Face identification from local-space hit normals.
///
/// Dominant-axis resolution with a viewer-facing acceptance threshold.
pub mod face;

/// Hover highlight quad over the attach candidate face.
pub mod highlight;

/// UI button interactions for the builder panel (native only).
pub mod interactions;

/// Selection, movement, rotation, resizing, duplication, and deletion.
pub mod manipulation;

/// Placement systems for ground clicks, face attachment, and geographic clicks.
pub mod placement;

/// Ray intersection utilities for oriented bounding box picking.
///
/// Slab method raycast reporting the entry face in structure-local space.
pub mod ray;

/// State resources, components, and events for the builder.
pub mod state;

/// UI spawning and update systems for the builder panel (native only).
pub mod ui;

use bevy::prelude::*;

pub use state::{ActiveTemplate, BuilderPanelState, StatusMessage};

use crate::engine::geo::projector::GeoProjector;
use crate::structures::placed::sync_structure_visuals;
use crate::tools::mode::{
    ModeChangeEvent, ModeManager, handle_mode_change_events, handle_mode_keyboard_shortcut,
};

use highlight::update_face_highlight;
use manipulation::{
    adjust_selected_dimensions, apply_selection_material, delete_selected, deselect_on_escape,
    duplicate_selected, nudge_selected, rotate_selected, toggle_select_on_click,
};
use placement::{
    attach_on_face_request, attach_on_structure_click, handle_clear_all_events,
    handle_select_template_events, place_on_geo_click, place_on_map_click,
};
use state::{AttachFaceEvent, ClearAllEvent, GeoPlaceEvent, SelectTemplateEvent};

use interactions::{
    clear_all_button_interaction, collapse_button_interaction, mode_toggle_button_interaction,
    template_button_interaction,
};
use ui::{
    apply_collapse_state, populate_template_buttons, reflect_armed_template,
    reflect_mode_toggle_label, spawn_builder_ui, update_status_text,
};

// Registers the builder panel, resources, and systems.
pub struct BuilderPlugin;

impl Plugin for BuilderPlugin {
    fn build(&self, app: &mut App) {
        app
            // init resources
            .init_resource::<BuilderPanelState>()
            .init_resource::<ActiveTemplate>()
            .init_resource::<StatusMessage>()
            .init_resource::<ModeManager>()
            .init_resource::<GeoProjector>()
            .add_event::<SelectTemplateEvent>()
            .add_event::<ClearAllEvent>()
            .add_event::<GeoPlaceEvent>()
            .add_event::<AttachFaceEvent>()
            .add_event::<ModeChangeEvent>()
            .add_systems(
                Update,
                (
                    // Mode + arming
                    handle_mode_change_events,
                    handle_select_template_events,
                    // World
                    place_on_map_click,
                    attach_on_structure_click,
                    attach_on_face_request,
                    place_on_geo_click,
                    handle_clear_all_events,
                    toggle_select_on_click,
                    deselect_on_escape,
                    delete_selected,
                    duplicate_selected,
                    rotate_selected,
                    nudge_selected,
                    adjust_selected_dimensions,
                    apply_selection_material,
                    update_face_highlight,
                    sync_structure_visuals,
                ),
            );

        // Keyboard shortcuts and the builder panel only exist on native builds.
        #[cfg(not(target_arch = "wasm32"))]
        {
            app.add_systems(
                Update,
                (
                    handle_mode_keyboard_shortcut,
                    collapse_button_interaction,
                    apply_collapse_state,
                    template_button_interaction,
                    populate_template_buttons,
                    reflect_armed_template,
                    mode_toggle_button_interaction,
                    reflect_mode_toggle_label,
                    clear_all_button_interaction,
                    update_status_text,
                ),
            );
            app.add_systems(Startup, spawn_builder_ui);
        }
    }
}
