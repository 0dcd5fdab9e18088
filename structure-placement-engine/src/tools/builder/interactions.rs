use bevy::prelude::*;

use constants::render_settings::{BUTTON_ACTIVE, BUTTON_HOVERED, BUTTON_IDLE, BUTTON_PRESSED};

use crate::tools::mode::{ModeChangeEvent, ModeChangeSource, ModeManager};

use super::state::*;
use super::ui::button_colour;

// Handles interactions for the Structure Builder UI buttons
// Chevron icon toggles collapse state
pub fn collapse_button_interaction(
    mut q: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>, With<CollapseButton>)>,
    mut state: ResMut<BuilderPanelState>,
) {
    for (interaction, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => { state.collapsed = !state.collapsed; *bg = BackgroundColor(button_colour(BUTTON_PRESSED)); }
            Interaction::Hovered => *bg = BackgroundColor(button_colour(BUTTON_HOVERED)),
            Interaction::None    => *bg = BackgroundColor(button_colour(BUTTON_IDLE)),
        }
    }
}

// Template buttons arm their template for the next placement click;
// pressing the armed one disarms it
pub fn template_button_interaction(
    mut q: Query<(&Interaction, &TemplateButton, &mut BackgroundColor), (Changed<Interaction>, With<Button>)>,
    mut active: ResMut<ActiveTemplate>,
    mut status: ResMut<StatusMessage>,
) {
    for (interaction, button, mut bg) in &mut q {
        let armed = active
            .selected
            .as_ref()
            .is_some_and(|t| t.kind == button.0.kind);
        match *interaction {
            Interaction::Pressed => {
                if armed {
                    active.selected = None;
                    status.show(format!("Disarmed {}", button.0.name));
                } else {
                    active.selected = Some(button.0.clone());
                    status.show(format!("Armed {} for placement", button.0.name));
                }
                *bg = BackgroundColor(button_colour(BUTTON_PRESSED));
            }
            Interaction::Hovered => *bg = BackgroundColor(button_colour(BUTTON_HOVERED)),
            Interaction::None => {
                *bg = BackgroundColor(button_colour(if armed { BUTTON_ACTIVE } else { BUTTON_IDLE }));
            }
        }
    }
}

// Mode toggle button flips between map and attach placement
pub fn mode_toggle_button_interaction(
    mut q: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>, With<ModeToggleButton>)>,
    mode_manager: Res<ModeManager>,
    mut mode_events: EventWriter<ModeChangeEvent>,
) {
    for (interaction, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                mode_events.write(ModeChangeEvent {
                    mode: mode_manager.active_mode().toggled(),
                    source: ModeChangeSource::Ui,
                });
                *bg = BackgroundColor(button_colour(BUTTON_PRESSED));
            }
            Interaction::Hovered => *bg = BackgroundColor(button_colour(BUTTON_HOVERED)),
            Interaction::None    => *bg = BackgroundColor(button_colour(BUTTON_IDLE)),
        }
    }
}

// Clear All button removes every placed structure
pub fn clear_all_button_interaction(
    mut q: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>, With<ClearAllButton>)>,
    mut clear_events: EventWriter<ClearAllEvent>,
) {
    for (interaction, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                clear_events.write(ClearAllEvent);
                *bg = BackgroundColor(Color::srgb(0.20, 0.12, 0.12));
            }
            Interaction::Hovered => *bg = BackgroundColor(Color::srgb(0.34, 0.14, 0.14)),
            Interaction::None    => *bg = BackgroundColor(Color::srgb(0.28, 0.10, 0.10)),
        }
    }
}
