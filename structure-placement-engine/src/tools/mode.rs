use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Enumeration of placement modes in the builder.
///
/// `Map` drops new structures where a ground click (or a geographic click
/// relayed from the embedding map) lands. `Attach` snaps the armed template
/// flush onto a clicked face of an existing structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    Map,
    Attach,
}

impl PlacementMode {
    /// Convert string identifier to mode for RPC compatibility.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "map" => Some(Self::Map),
            "attach" => Some(Self::Attach),
            _ => None,
        }
    }

    /// Convert mode to string identifier for frontend communication.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Map => "map",
            Self::Attach => "attach",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Map => Self::Attach,
            Self::Attach => Self::Map,
        }
    }
}

/// Resource tracking the currently active placement mode.
#[derive(Resource)]
pub struct ModeManager {
    active_mode: PlacementMode,
}

impl Default for ModeManager {
    fn default() -> Self {
        Self {
            active_mode: PlacementMode::Map,
        }
    }
}

impl ModeManager {
    /// Switch to the specified mode. Returns false when it was already active.
    pub fn activate_mode(&mut self, mode: PlacementMode) -> bool {
        if self.active_mode == mode {
            return false;
        }
        self.active_mode = mode;
        info!("Placement mode activated: {}", mode.as_str());
        true
    }

    pub fn active_mode(&self) -> PlacementMode {
        self.active_mode
    }

    pub fn is_mode_active(&self, mode: PlacementMode) -> bool {
        self.active_mode == mode
    }
}

/// Event fired when the placement mode changes via RPC, UI, or keyboard.
#[derive(Event)]
pub struct ModeChangeEvent {
    pub mode: PlacementMode,
    pub source: ModeChangeSource,
}

/// Source of a mode change for debugging and conditional logic.
#[derive(Debug, Clone, Copy)]
pub enum ModeChangeSource {
    Rpc,
    Keyboard,
    Ui,
}

/// System handling mode change events with frontend notification.
pub fn handle_mode_change_events(
    mut events: EventReader<ModeChangeEvent>,
    mut mode_manager: ResMut<ModeManager>,
    mut rpc_interface: ResMut<crate::rpc::web_rpc::WebRpcInterface>,
) {
    for event in events.read() {
        if !mode_manager.activate_mode(event.mode) {
            continue;
        }

        info!("Placement mode set to {} via {:?}", event.mode.as_str(), event.source);

        rpc_interface.send_notification(
            "placement_mode_changed",
            serde_json::json!({
                "mode": event.mode.as_str(),
            }),
        );
    }
}

/// System handling the keyboard shortcut for mode toggling.
pub fn handle_mode_keyboard_shortcut(
    keyboard: Res<ButtonInput<KeyCode>>,
    mode_manager: Res<ModeManager>,
    mut mode_events: EventWriter<ModeChangeEvent>,
) {
    if keyboard.just_pressed(KeyCode::KeyM) {
        mode_events.write(ModeChangeEvent {
            mode: mode_manager.active_mode().toggled(),
            source: ModeChangeSource::Keyboard,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_strings_round_trip() {
        for mode in [PlacementMode::Map, PlacementMode::Attach] {
            assert_eq!(PlacementMode::from_string(mode.as_str()), Some(mode));
        }
        assert_eq!(PlacementMode::from_string("ATTACH"), Some(PlacementMode::Attach));
        assert_eq!(PlacementMode::from_string("orbit"), None);
    }

    #[test]
    fn toggling_alternates_between_the_two_modes() {
        assert_eq!(PlacementMode::Map.toggled(), PlacementMode::Attach);
        assert_eq!(PlacementMode::Attach.toggled(), PlacementMode::Map);
    }

    #[test]
    fn activating_the_current_mode_is_a_no_op() {
        let mut manager = ModeManager::default();
        assert_eq!(manager.active_mode(), PlacementMode::Map);
        assert!(!manager.activate_mode(PlacementMode::Map));
        assert!(manager.activate_mode(PlacementMode::Attach));
        assert!(manager.is_mode_active(PlacementMode::Attach));
    }
}
