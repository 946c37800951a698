//! Free-flying camera and reverse-Z projection.

use glam::{Mat4, Quat, Vec3};

use crate::toggles::SceneToggles;

/// Camera position and orientation in world space.
///
/// Starts at the origin looking down `-Z` with `+Y` up. Rotations are applied
/// in the camera's own frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    pub position: Vec3,
    pub orientation: Quat,
}

/// Per-tick rotation request. Each axis is -1, 0 or +1.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraInput {
    /// +1 tips the view up.
    pub pitch: f32,
    /// +1 rolls the view to the left.
    pub roll: f32,
}

/// Camera motion rates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRates {
    /// Units per second.
    pub forward_speed: f32,
    pub boost_factor: f32,
    /// Radians per second.
    pub pitch_rate: f32,
    /// Radians per second.
    pub roll_rate: f32,
}

impl Default for CameraRates {
    fn default() -> Self {
        Self {
            forward_speed: 0.6,
            boost_factor: 5.0,
            pitch_rate: 60f32.to_radians(),
            roll_rate: 180f32.to_radians(),
        }
    }
}

impl CameraFrame {
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    pub fn move_forward(&mut self, distance: f32) {
        self.position += self.forward() * distance;
    }

    /// Pitch about the camera's right axis.
    pub fn rotate_local_x(&mut self, radians: f32) {
        self.orientation = (self.orientation * Quat::from_rotation_x(radians)).normalize();
    }

    /// Roll about the viewing axis.
    pub fn rotate_local_z(&mut self, radians: f32) {
        self.orientation = (self.orientation * Quat::from_rotation_z(radians)).normalize();
    }

    /// Apply one tick of rotation and forward drift.
    pub fn step(&mut self, dt: f32, input: CameraInput, toggles: &SceneToggles, rates: &CameraRates) {
        if input.pitch != 0.0 {
            self.rotate_local_x(input.pitch * rates.pitch_rate * dt);
        }
        if input.roll != 0.0 {
            self.rotate_local_z(input.roll * rates.roll_rate * dt);
        }
        if !toggles.camera_stopped {
            let boost = if toggles.speed_boost {
                rates.boost_factor
            } else {
                1.0
            };
            self.move_forward(rates.forward_speed * boost * dt);
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position).inverse()
    }
}

impl Default for CameraFrame {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

/// Perspective projection with reverse-Z depth: the near plane maps to 1 and
/// the far plane to 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn new(fov_y_deg: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y_deg,
            aspect: 1.0,
            near,
            far,
        }
    }

    /// Recompute the aspect ratio after a resize; zero-sized surfaces are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), self.aspect, self.far, self.near)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(35.0, 0.1, 160.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_default_view_is_identity() {
        assert!(CameraFrame::default().view_matrix().abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn test_move_forward_follows_orientation() {
        let mut camera = CameraFrame::default();
        camera.move_forward(2.0);
        assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 0.0, -2.0), 1e-6));

        camera.rotate_local_x(FRAC_PI_2);
        camera.move_forward(1.0);
        assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 1.0, -2.0), 1e-5));
    }

    #[test]
    fn test_pitch_up_raises_forward() {
        let mut camera = CameraFrame::default();
        camera.rotate_local_x(0.1);
        assert!(camera.forward().y > 0.0);
    }

    #[test]
    fn test_roll_keeps_forward() {
        let mut camera = CameraFrame::default();
        camera.rotate_local_z(FRAC_PI_2);
        assert!(camera.forward().abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!(camera.up().abs_diff_eq(Vec3::NEG_X, 1e-6));
    }

    #[test]
    fn test_view_maps_camera_to_origin() {
        let mut camera = CameraFrame::default();
        camera.rotate_local_x(0.4);
        camera.rotate_local_z(-1.1);
        camera.move_forward(3.0);
        let p = camera.view_matrix().transform_point3(camera.position);
        assert!(p.abs_diff_eq(Vec3::ZERO, 1e-5));
        let ahead = camera.position + camera.forward();
        let q = camera.view_matrix().transform_point3(ahead);
        assert!(q.abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }

    #[test]
    fn test_step_drift_and_toggles() {
        let rates = CameraRates::default();
        let mut camera = CameraFrame::default();
        camera.step(1.0, CameraInput::default(), &SceneToggles::default(), &rates);
        assert!((camera.position.z + 0.6).abs() < 1e-6);

        let boosted = SceneToggles {
            speed_boost: true,
            ..SceneToggles::default()
        };
        camera.step(1.0, CameraInput::default(), &boosted, &rates);
        assert!((camera.position.z + 3.6).abs() < 1e-5);

        let stopped = SceneToggles {
            camera_stopped: true,
            speed_boost: true,
            ..SceneToggles::default()
        };
        let before = camera.position;
        let input = CameraInput {
            pitch: 1.0,
            roll: 0.0,
        };
        camera.step(0.5, input, &stopped, &rates);
        assert_eq!(camera.position, before);
        assert!((camera.forward().angle_between(Vec3::NEG_Z) - 30f32.to_radians()).abs() < 1e-4);
    }

    #[test]
    fn test_reverse_z_depth() {
        let projection = Projection::default();
        let m = projection.matrix();
        let near = m * Vec4::new(0.0, 0.0, -projection.near, 1.0);
        let far = m * Vec4::new(0.0, 0.0, -projection.far, 1.0);
        assert!((near.z / near.w - 1.0).abs() < 1e-5);
        assert!((far.z / far.w).abs() < 1e-5);
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut projection = Projection::default();
        projection.resize(1024, 600);
        assert!((projection.aspect - 1024.0 / 600.0).abs() < 1e-6);
        projection.resize(0, 600);
        assert!((projection.aspect - 1024.0 / 600.0).abs() < 1e-6);
    }
}
