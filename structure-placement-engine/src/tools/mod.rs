//! Interactive tools for structure construction.
//!
//! Provides the structure builder (ground placement, face attachment, and
//! selection manipulation) and the placement mode manager coordinating it,
//! with RPC integration for frontend control.
//!
//! ## Mode Manager Architecture
//!
//! The `ModeManager` resource tracks the exclusive placement mode:
//! - `map` places armed templates on the ground (cursor or geographic click)
//! - `attach` snaps them flush onto faces of existing structures
//! - Modes switch via the `M` key (native), the panel button, or the
//!   `set_placement_mode` RPC method
//!
//! ### Mode Change Flow
//!
//! ```text
//! Keyboard/UI/RPC Input
//!   └─> ModeChangeEvent
//!       └─> handle_mode_change_events()
//!           ├─> Update ModeManager
//!           └─> Send RPC notification to frontend
//! ```

/// Structure builder tool: placement, attachment, manipulation, and panel UI.
pub mod builder;

/// Placement mode manager coordinating map and attach placement.
///
/// Handles mode change events from keyboard, UI, and RPC with frontend notifications.
pub mod mode;
