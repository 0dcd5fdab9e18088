/// Fallback extent in metres for any axis a structure template leaves unset.
pub const DEFAULT_EXTENT: f32 = 1.0;

/// Minimum dot(face normal, to-camera vector) for a clicked face to count as attachable.
/// Hits below this are ambiguous (grazing or facing away) and get rejected.
pub const FACE_ACCEPT_DOT: f32 = 0.2;

/// Rotation step for the manual rotate controls (radians).
pub const ROTATE_STEP: f32 = std::f32::consts::FRAC_PI_4;

/// X offset applied to duplicated structures so the copy is distinguishable.
pub const DUPLICATE_NUDGE: f32 = 0.01;

/// Padding added around the hovered-face highlight quad (metres).
pub const FACE_HIGHLIGHT_PADDING: f32 = 0.01;

/// Lift of the highlight quad off the face surface to avoid z-fighting.
pub const FACE_HIGHLIGHT_LIFT: f32 = 0.001;
