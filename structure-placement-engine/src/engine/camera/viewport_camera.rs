use crate::tools::builder::state::SelectedStructure;
use bevy::input::mouse::MouseScrollUnit;
use bevy::math::EulerRot;
use bevy::{
    input::mouse::{MouseMotion, MouseWheel},
    prelude::*,
};

#[derive(Resource)]
pub struct ViewportCamera {
    pub focus_point: Vec3,
    pub height: f32,
    pub is_panning: bool,
    pub last_mouse_pos: Vec2,
    pub ground_height: f32,
    pub pitch: f32,
    pub yaw: f32,
    // Smoothing for ground intersection
    pub last_intersection: Option<Vec3>,
    pub intersection_smooth_factor: f32,
}

impl ViewportCamera {
    pub fn new(center: Vec3, ground_height: f32) -> Self {
        Self {
            focus_point: center,
            height: 40.0,
            is_panning: false,
            last_mouse_pos: Vec2::ZERO,
            ground_height,
            pitch: -0.6,
            yaw: 0.0,
            last_intersection: None,
            intersection_smooth_factor: 0.15,
        }
    }

    pub fn mouse_to_ground_plane(
        &mut self,
        cursor_pos: Vec2,
        camera: &Camera,
        camera_transform: &GlobalTransform,
    ) -> Option<Vec3> {
        let ray = camera
            .viewport_to_world(camera_transform, cursor_pos)
            .ok()?;

        let intersection = self.flat_plane_intersection(&ray);

        // Apply temporal smoothing to reduce jitter
        match (intersection, self.last_intersection) {
            (Some(new_pos), Some(last_pos)) => {
                let smoothed = last_pos.lerp(new_pos, self.intersection_smooth_factor);
                self.last_intersection = Some(smoothed);
                Some(smoothed)
            }
            (Some(new_pos), None) => {
                self.last_intersection = Some(new_pos);
                Some(new_pos)
            }
            _ => None,
        }
    }

    fn flat_plane_intersection(&self, ray: &Ray3d) -> Option<Vec3> {
        let plane_y = self.ground_height;
        if ray.direction.y.abs() < 0.001 {
            return None;
        }
        let t = (plane_y - ray.origin.y) / ray.direction.y;
        if t > 0.0 {
            Some(ray.origin + ray.direction * t)
        } else {
            None
        }
    }
}

impl Default for ViewportCamera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 25.0, 35.0), 0.0)
    }
}

pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut viewport_camera: ResMut<ViewportCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    mut cursor_moved: EventReader<CursorMoved>,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    selection: Query<(), With<SelectedStructure>>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    // Update cursor position
    for cursor in cursor_moved.read() {
        viewport_camera.last_mouse_pos = cursor.position;
    }

    // Read mouse motion
    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    // Mouse motion with right click (look around)
    if mouse_button.pressed(MouseButton::Right) && mouse_delta != Vec2::ZERO {
        let yaw_sens = 0.0035;
        let pitch_sens = 0.0030;
        viewport_camera.yaw += -mouse_delta.x * yaw_sens;
        viewport_camera.pitch += -mouse_delta.y * pitch_sens;
        viewport_camera.pitch = viewport_camera.pitch.clamp(-1.55, 1.55);
    }

    // Mouse wheel scroll accumulation (pixel and line scroll)
    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y * 1.0,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }

    // Mouse wheel scroll along dolly with camera view
    if scroll_accum.abs() > f32::EPSILON {
        let dolly_speed = (viewport_camera.height * 0.2).clamp(0.5, 500.0);
        let view_rot = Quat::from_euler(
            EulerRot::YXZ,
            viewport_camera.yaw,
            viewport_camera.pitch,
            0.0,
        );
        let forward = (view_rot * Vec3::Z).normalize();
        viewport_camera.focus_point -= forward * (scroll_accum * dolly_speed);
    }

    // Keyboard movement input. A selected structure owns the letter keys, so
    // camera flight pauses while one is active.
    if selection.is_empty() {
        let mut move_input = Vec3::ZERO;
        if keyboard.pressed(KeyCode::KeyW) {
            move_input.z -= 1.0;
        }
        if keyboard.pressed(KeyCode::KeyS) {
            move_input.z += 1.0;
        }
        if keyboard.pressed(KeyCode::KeyD) {
            move_input.x += 1.0;
        }
        if keyboard.pressed(KeyCode::KeyA) {
            move_input.x -= 1.0;
        }
        if keyboard.pressed(KeyCode::KeyE) {
            move_input.y += 1.0; // Up
        }
        if keyboard.pressed(KeyCode::KeyQ) {
            move_input.y -= 1.0; // Down
        }

        if move_input != Vec3::ZERO {
            let view_rot = Quat::from_euler(
                EulerRot::YXZ,
                viewport_camera.yaw,
                viewport_camera.pitch,
                0.0,
            );
            let forward = (view_rot * Vec3::Z).normalize();
            let right = (view_rot * Vec3::X).normalize();
            let up = Vec3::Y;

            // Adjust speed, shift = faster, ctrl = slower
            let mut speed = (viewport_camera.height * 1.0).clamp(2.0, 200.0);
            if keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) {
                speed *= 3.5;
            }
            if keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]) {
                speed *= 0.25;
            }

            let world_delta = right * move_input.x + up * move_input.y + forward * move_input.z;
            viewport_camera.focus_point += world_delta.normalize() * speed * time.delta_secs();
        }
    }

    let target_rot = Quat::from_euler(
        EulerRot::YXZ,
        viewport_camera.yaw,
        viewport_camera.pitch,
        0.0,
    );
    let target_pos = viewport_camera.focus_point;

    let lerp_speed = 12.0 * time.delta_secs();
    camera_transform.translation = camera_transform
        .translation
        .lerp(target_pos, lerp_speed.min(1.0));
    camera_transform.rotation = camera_transform
        .rotation
        .slerp(target_rot, lerp_speed.min(1.0));
}
