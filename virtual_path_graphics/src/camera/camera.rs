/// Camera - fly-through perspective camera.
///
/// Position plus yaw/pitch Euler angles. Angles are stored in radians and
/// exposed in degrees; the basis vectors are recomputed whenever an angle
/// changes. Owned and driven by the caller (drawing services), never by
/// the renderer.

use glam::{Mat4, Vec3};

/// Near clip plane distance
pub const NEAR_PLANE: f32 = 0.1;
/// Far clip plane distance
pub const FAR_PLANE: f32 = 1000.0;

const PITCH_LIMIT_DEGREES: f32 = 89.0;
const MIN_FOV_DEGREES: f32 = 1.0;
const MAX_FOV_DEGREES: f32 = 90.0;

#[derive(Debug, Clone)]
pub struct Camera {
    /// Viewport width in pixels (drives the aspect ratio)
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
    pub position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    pitch: f32,
    yaw: f32,
    fov: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            position: Vec3::ZERO,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            pitch: 0.0,
            yaw: -std::f32::consts::FRAC_PI_2,
            fov: std::f32::consts::FRAC_PI_2,
        }
    }
}

impl Camera {
    /// Camera at `position` looking down -Z
    pub fn new(position: Vec3) -> Self {
        Self { position, ..Self::default() }
    }

    // ===== ANGLES (degrees) =====

    pub fn pitch(&self) -> f32 {
        self.pitch.to_degrees()
    }

    /// Set pitch in degrees, clamped to [-89, 89]
    pub fn set_pitch(&mut self, degrees: f32) {
        self.pitch = degrees.clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES).to_radians();
        self.update_vectors();
    }

    pub fn yaw(&self) -> f32 {
        self.yaw.to_degrees()
    }

    /// Set yaw in degrees (unclamped)
    pub fn set_yaw(&mut self, degrees: f32) {
        self.yaw = degrees.to_radians();
        self.update_vectors();
    }

    /// Vertical field of view in degrees
    pub fn fov(&self) -> f32 {
        self.fov.to_degrees()
    }

    /// Set the vertical field of view in degrees, clamped to [1, 90]
    pub fn set_fov(&mut self, degrees: f32) {
        self.fov = degrees.clamp(MIN_FOV_DEGREES, MAX_FOV_DEGREES).to_radians();
    }

    // ===== BASIS =====

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    // ===== MATRICES =====

    /// Look-at from `position` along `front`
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Perspective projection (GL clip space, depth in [-1, 1])
    ///
    /// An unsized camera (0x0) gives a NaN aspect ratio; callers size the
    /// camera before drawing.
    pub fn projection_matrix(&self) -> Mat4 {
        let aspect = self.width as f32 / self.height as f32;
        Mat4::perspective_rh_gl(self.fov, aspect, NEAR_PLANE, FAR_PLANE)
    }

    /// Combined view-projection matrix (projection * view)
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    fn update_vectors(&mut self) {
        self.front = Vec3::new(
            self.pitch.cos() * self.yaw.cos(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.sin(),
        )
        .normalize();
        self.right = self.front.cross(Vec3::Y).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
