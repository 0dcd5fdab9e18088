//! JSON-RPC 2.0 communication layer for map frontend integration.
//!
//! Implements bidirectional messaging between the Bevy engine and the
//! embedding map page via iframe postMessage, supporting both
//! request-response and notification patterns.
//!
//! ## Architecture
//!
//! The RPC system uses standard JSON-RPC 2.0 protocol with:
//! - **Requests**: Expect responses with matching IDs
//! - **Notifications**: One-way messages without responses
//! - **Responses**: Reply to requests with results or errors
//!
//! ## Message Flow
//!
//! ```text
//! Map page (Parent Window)  <──postMessage──>  Bevy (iframe)
//!        │                                           │
//!        ├─ Request (with ID) ─────────────────────> │
//!        │                                           ├─ Process request
//!        │ <──────────────────── Response (with ID) ─┤
//!        │                                           │
//!        │ <───────────── Notification (no ID) ──────┤
//! ```
//!
//! ## Existing Methods
//!
//! ### Builder Control
//! - `select_structure`: Arm a catalog template for the next placement
//! - `set_placement_mode`: Switch between `map` and `attach` placement
//! - `map_click`: Place the armed template at a geographic coordinate
//! - `attach_structure`: Attach the armed template to a face (by index) of
//!   the selected structure
//! - `clear_all`: Remove every placed structure
//! - `get_structures`: List the loaded catalog
//!
//! ### Diagnostics
//! - `get_fps`: Retrieve current frame rate
//!
//! ## Outgoing Notifications
//!
//! - `structure_placed`: A structure landed (kind, position, placement mode)
//! - `placement_mode_changed`: The active mode switched
//! - `structures_cleared`: A clear-all completed
//! - `status_message`: User-facing status line (e.g. face rejection)
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32600`: Invalid request
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error

/// JSON-RPC 2.0 bidirectional communication system for frontend integration.
///
/// Handles request-response patterns, notifications, and WASM message listeners.
pub mod web_rpc;
