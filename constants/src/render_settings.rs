/// Builder panel width when expanded (px).
pub const PANEL_OPEN_WIDTH: f32 = 280.0;

/// Builder panel width when collapsed to the chevron strip (px).
pub const PANEL_CLOSED_WIDTH: f32 = 32.0;

// Button colour states (sRGB components).
pub const BUTTON_IDLE: [f32; 3] = [0.22, 0.24, 0.28];
pub const BUTTON_HOVERED: [f32; 3] = [0.26, 0.28, 0.32];
pub const BUTTON_PRESSED: [f32; 3] = [0.18, 0.20, 0.24];
pub const BUTTON_ACTIVE: [f32; 3] = [0.30, 0.34, 0.40];

/// Ground grid line alpha.
pub const GRID_LINE_ALPHA: f32 = 0.35;

/// How long a status message stays on screen (seconds).
pub const STATUS_MESSAGE_SECS: f32 = 3.0;
