use bevy::prelude::*;

use constants::render_settings::{PANEL_CLOSED_WIDTH, PANEL_OPEN_WIDTH, STATUS_MESSAGE_SECS};

use crate::engine::geo::projector::GeoPoint;
use crate::structures::catalog::StructureTemplate;

// Resources
#[derive(Resource)]
pub struct BuilderPanelState {
    pub collapsed: bool,
    pub open_width: f32,
    pub closed_width: f32,
}
impl Default for BuilderPanelState {
    fn default() -> Self {
        Self {
            collapsed: false,
            open_width: PANEL_OPEN_WIDTH,
            closed_width: PANEL_CLOSED_WIDTH,
        }
    }
}

/// Template armed for the next placement click. Cleared once it lands.
#[derive(Resource, Default)]
pub struct ActiveTemplate {
    pub selected: Option<StructureTemplate>,
}

/// Transient status line at the bottom of the viewport.
#[derive(Resource, Default)]
pub struct StatusMessage {
    pub text: Option<String>,
    pub remaining: f32,
}

impl StatusMessage {
    pub fn show(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
        self.remaining = STATUS_MESSAGE_SECS;
    }
}

// Components
#[derive(Component)]
pub struct BuilderPanelRoot;
#[derive(Component)]
pub struct BuilderPanelBody;
#[derive(Component)]
pub struct HeaderNode;
#[derive(Component)]
pub struct TitleText;
#[derive(Component)]
pub struct CollapseButton;
#[derive(Component)]
pub struct CollapseLabel;
#[derive(Component)]
pub struct TemplateList;
#[derive(Component)]
pub struct TemplateButton(pub StructureTemplate);
#[derive(Component)]
pub struct ModeToggleButton;
#[derive(Component)]
pub struct ModeToggleLabel;
#[derive(Component)]
pub struct ClearAllButton;
#[derive(Component)]
pub struct StatusText;

/// Marker on the one structure currently selected for manipulation.
#[derive(Component)]
pub struct SelectedStructure;

/// Marker on the translucent quad hovering over an attach candidate face.
#[derive(Component)]
pub struct FaceHighlight;

// Events
/// Fired when a template is chosen from the panel or over RPC.
#[derive(Event)]
pub struct SelectTemplateEvent {
    pub template: StructureTemplate,
}

/// Fired to remove every placed structure from the scene.
#[derive(Event)]
pub struct ClearAllEvent;

/// Fired when the embedding map reports a click at a geographic coordinate.
#[derive(Event)]
pub struct GeoPlaceEvent {
    pub point: GeoPoint,
}

/// Fired when the frontend requests attachment to an explicit face index of
/// the selected structure.
#[derive(Event)]
pub struct AttachFaceEvent {
    pub face: usize,
}
