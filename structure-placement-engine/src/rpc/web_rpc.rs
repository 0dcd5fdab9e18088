use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::geo::projector::GeoPoint;
use crate::structures::CatalogHandle;
use crate::structures::catalog::{StructureCatalog, StructureKind};
use crate::tools::builder::face::FaceIndex;
use crate::tools::builder::state::{
    AttachFaceEvent, ClearAllEvent, GeoPlaceEvent, SelectTemplateEvent,
};
use crate::tools::mode::{ModeChangeEvent, ModeChangeSource, PlacementMode};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC error structure following specification.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication between the embedding
/// map frontend and Bevy. Handles both request-response patterns and
/// notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the frontend without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to the frontend.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing WebRPC communication layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Filter messages to ensure they contain string data.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            // Attempt JSON parsing to validate RPC format before queuing.
            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        window
            .add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            .expect("Failed to register message listener");
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing incoming RPC message from the frontend.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// Event writers available to RPC method handlers.
struct RpcEventWriters<'a, 'w1, 'w2, 'w3, 'w4, 'w5> {
    select: &'a mut EventWriter<'w1, SelectTemplateEvent>,
    mode: &'a mut EventWriter<'w2, ModeChangeEvent>,
    geo: &'a mut EventWriter<'w3, GeoPlaceEvent>,
    clear: &'a mut EventWriter<'w4, ClearAllEvent>,
    attach: &'a mut EventWriter<'w5, AttachFaceEvent>,
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    diagnostics: Res<DiagnosticsStore>,
    catalog_handle: Option<Res<CatalogHandle>>,
    catalogs: Res<Assets<StructureCatalog>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut select_events: EventWriter<SelectTemplateEvent>,
    mut mode_events: EventWriter<ModeChangeEvent>,
    mut geo_events: EventWriter<GeoPlaceEvent>,
    mut clear_events: EventWriter<ClearAllEvent>,
    mut attach_events: EventWriter<AttachFaceEvent>,
) {
    let catalog = catalog_handle.and_then(|handle| catalogs.get(&handle.0));

    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                let mut writers = RpcEventWriters {
                    select: &mut select_events,
                    mode: &mut mode_events,
                    geo: &mut geo_events,
                    clear: &mut clear_events,
                    attach: &mut attach_events,
                };
                if let Some(response) =
                    handle_rpc_request(&request, &diagnostics, catalog, &mut writers)
                {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                rpc_interface.send_notification(
                    "debug_message",
                    serde_json::json!({
                        "message": format!("Parse error: {}", parse_error)
                    }),
                );
            }
        }
    }
}

/// Handle individual RPC request and generate response based on method.
fn handle_rpc_request(
    request: &RpcRequest,
    diagnostics: &DiagnosticsStore,
    catalog: Option<&StructureCatalog>,
    writers: &mut RpcEventWriters,
) -> Option<RpcResponse> {
    // Only generate responses for requests with IDs (notifications have no ID).
    let id = request.id.clone()?;

    let result = match request.method.as_str() {
        "select_structure" => handle_select_structure(&request.params, catalog, writers),
        "set_placement_mode" => handle_set_placement_mode(&request.params, writers),
        "map_click" => handle_map_click(&request.params, writers),
        "attach_structure" => handle_attach_structure(&request.params, writers),
        "clear_all" => handle_clear_all(writers),
        "get_structures" => handle_get_structures(catalog),
        "get_fps" => handle_get_fps(diagnostics),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            return Some(create_error_response(
                id,
                -32601,
                "Method not found",
                Some(serde_json::json!({"method": request.method})),
            ));
        }
    };

    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

/// Arm a catalog template for placement via its kind identifier.
fn handle_select_structure(
    params: &serde_json::Value,
    catalog: Option<&StructureCatalog>,
    writers: &mut RpcEventWriters,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct SelectStructureParams {
        structure: String,
    }

    let parsed = serde_json::from_value::<SelectStructureParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'structure' parameter"))?;

    let kind = StructureKind::from_string(&parsed.structure).ok_or_else(|| {
        RpcError::invalid_params(&format!("Unknown structure: {}", parsed.structure))
    })?;

    let catalog = catalog.ok_or_else(|| RpcError::internal_error("Catalog not loaded yet"))?;
    let template = catalog
        .by_kind(kind)
        .ok_or_else(|| RpcError::internal_error("Structure missing from catalog"))?;

    writers.select.write(SelectTemplateEvent {
        template: template.clone(),
    });

    info!("Structure armed via RPC: {}", kind.as_str());

    Ok(serde_json::json!({
        "success": true,
        "structure": kind.as_str()
    }))
}

/// Switch between map and attach placement modes.
fn handle_set_placement_mode(
    params: &serde_json::Value,
    writers: &mut RpcEventWriters,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct SetModeParams {
        mode: String,
    }

    let parsed = serde_json::from_value::<SetModeParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'mode' parameter"))?;

    let mode = PlacementMode::from_string(&parsed.mode)
        .ok_or_else(|| RpcError::invalid_params(&format!("Unknown mode: {}", parsed.mode)))?;

    writers.mode.write(ModeChangeEvent {
        mode,
        source: ModeChangeSource::Rpc,
    });

    Ok(serde_json::json!({
        "success": true,
        "mode": mode.as_str()
    }))
}

/// Place the armed template at a geographic coordinate from the map layer.
fn handle_map_click(
    params: &serde_json::Value,
    writers: &mut RpcEventWriters,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct MapClickParams {
        longitude: f64,
        latitude: f64,
        #[serde(default)]
        altitude: Option<f64>,
    }

    let parsed = serde_json::from_value::<MapClickParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'longitude' and 'latitude' parameters"))?;

    if !parsed.longitude.is_finite() || !parsed.latitude.is_finite() {
        return Err(RpcError::invalid_params("Coordinates must be finite"));
    }

    let mut point = GeoPoint::new(parsed.longitude, parsed.latitude);
    point.altitude = parsed.altitude;
    writers.geo.write(GeoPlaceEvent { point });

    Ok(serde_json::json!({
        "success": true
    }))
}

/// Attach the armed template to a face of the selected structure.
fn handle_attach_structure(
    params: &serde_json::Value,
    writers: &mut RpcEventWriters,
) -> Result<serde_json::Value, RpcError> {
    let face = parse_attach_face(params)?;
    writers.attach.write(AttachFaceEvent { face });

    Ok(serde_json::json!({
        "success": true,
        "face": face
    }))
}

/// Validate the raw face index at the transport boundary so a bad index
/// turns into an invalid-params response instead of a silent no-op.
fn parse_attach_face(params: &serde_json::Value) -> Result<usize, RpcError> {
    #[derive(serde::Deserialize)]
    struct AttachParams {
        face: usize,
    }

    let parsed = serde_json::from_value::<AttachParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'face' parameter"))?;

    FaceIndex::from_raw(parsed.face)
        .map_err(|error| RpcError::invalid_params(&error.to_string()))?;

    Ok(parsed.face)
}

fn handle_clear_all(writers: &mut RpcEventWriters) -> Result<serde_json::Value, RpcError> {
    writers.clear.write(ClearAllEvent);
    Ok(serde_json::json!({
        "success": true
    }))
}

/// List the catalog for the frontend inventory.
fn handle_get_structures(
    catalog: Option<&StructureCatalog>,
) -> Result<serde_json::Value, RpcError> {
    let catalog = catalog.ok_or_else(|| RpcError::internal_error("Catalog not loaded yet"))?;
    let structures: Vec<_> = catalog
        .structures
        .iter()
        .map(|t| {
            serde_json::json!({
                "kind": t.kind.as_str(),
                "name": t.name,
            })
        })
        .collect();

    Ok(serde_json::json!({ "structures": structures }))
}

/// Handle FPS retrieval with diagnostic system integration.
fn handle_get_fps(diagnostics: &DiagnosticsStore) -> Result<serde_json::Value, RpcError> {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps_diagnostic| fps_diagnostic.smoothed())
        .unwrap_or(0.0) as f32;

    Ok(serde_json::json!({
        "fps": fps
    }))
}

/// Create standardized error response with optional data payload.
fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the frontend.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to parent window (the map frontend).
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op for non-WASM targets.
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_face_indices_within_range_pass_the_boundary() {
        for face in 0..6usize {
            let params = serde_json::json!({ "face": face });
            assert_eq!(parse_attach_face(&params).ok(), Some(face));
        }
    }

    #[test]
    fn out_of_range_attach_face_is_an_invalid_params_error() {
        let error = parse_attach_face(&serde_json::json!({ "face": 7 }))
            .expect_err("index 7 has no face");
        assert_eq!(error.code, -32602);
        assert!(error.message.contains('7'), "{}", error.message);
    }

    #[test]
    fn missing_attach_face_parameter_is_an_invalid_params_error() {
        let error = parse_attach_face(&serde_json::json!({}))
            .expect_err("no face parameter");
        assert_eq!(error.code, -32602);
    }
}
