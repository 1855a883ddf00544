//! Camera and perspective projection
//!
//! World points are moved into camera space (translate, then rotate by the
//! transpose of the camera orientation) and divided by depth in fixed point.
//! +X is right, +Y is down, +Z is forward.

use crate::math::{Angle, Fixed, Mat3, Vec3};

/// Points closer than this are rejected rather than projected
pub const NEAR_PLANE: Fixed = Fixed::from_raw(1 << 20);

/// Projected coordinates are clamped to +/- this many pixels
pub const SCREEN_LIMIT: i32 = 8192;

/// A projected point: physical screen pixel plus camera-space depth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projected {
    pub x: i32,
    pub y: i32,
    pub depth: Fixed,
}

/// Camera state
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub pitch: Angle,
    pub yaw: Angle,

    /// Computed from pitch/yaw
    pub orientation: Mat3,
    /// Inverse of `orientation` (its transpose)
    view: Mat3,

    /// Physical viewport size in pixels
    pub width: i32,
    pub height: i32,
    /// Focal length in pixels
    pub focal: i32,
}

impl Camera {
    pub fn new(width: usize, height: usize) -> Self {
        let mut cam = Self {
            position: Vec3::ZERO,
            pitch: 0,
            yaw: 0,
            orientation: Mat3::IDENTITY,
            view: Mat3::IDENTITY,
            width: width as i32,
            height: height as i32,
            focal: (width / 2).max(1) as i32,
        };
        cam.update_basis();
        cam
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn set_rotation(&mut self, pitch: Angle, yaw: Angle) {
        self.pitch = pitch;
        self.yaw = yaw;
        self.update_basis();
    }

    pub fn update_basis(&mut self) {
        self.orientation = Mat3::rotation(self.pitch, self.yaw);
        self.view = self.orientation.transpose();
    }

    /// Turn by the given angle deltas (wrapping)
    pub fn rotate(&mut self, d_pitch: Angle, d_yaw: Angle) {
        self.set_rotation(self.pitch.wrapping_add(d_pitch), self.yaw.wrapping_add(d_yaw));
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation.column(2)
    }

    pub fn right(&self) -> Vec3 {
        self.orientation.column(0)
    }

    pub fn move_forward(&mut self, distance: Fixed) {
        self.position = self.position + self.forward().scale(distance);
    }

    pub fn strafe(&mut self, distance: Fixed) {
        self.position = self.position + self.right().scale(distance);
    }

    pub fn to_camera_space(&self, world: Vec3) -> Vec3 {
        self.view.transform(world - self.position)
    }

    /// Project a camera-space point; None if it is at or behind the near plane
    pub fn project_camera_space(&self, p: Vec3) -> Option<Projected> {
        if p.z <= NEAR_PLANE {
            return None;
        }
        let px = p.x / p.z;
        let py = p.y / p.z;
        let scale = |ratio: Fixed| {
            let pixels = (ratio.raw() as i64 * self.focal as i64) >> 24;
            pixels.clamp(-(SCREEN_LIMIT as i64), SCREEN_LIMIT as i64) as i32
        };
        Some(Projected {
            x: self.width / 2 + scale(px),
            y: self.height / 2 + scale(py),
            depth: p.z,
        })
    }

    /// World point to screen
    pub fn project(&self, world: Vec3) -> Option<Projected> {
        self.project_camera_space(self.to_camera_space(world))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{angle_from_degrees, QUARTER_TURN};

    fn v(x: i32, y: i32, z: i32) -> Vec3 {
        Vec3::new(Fixed::from_int(x), Fixed::from_int(y), Fixed::from_int(z))
    }

    #[test]
    fn test_center_projects_to_middle() {
        let cam = Camera::new(320, 256);
        let p = cam.project(v(0, 0, 4)).unwrap();
        assert_eq!((p.x, p.y), (160, 128));
        assert_eq!(p.depth, Fixed::from_int(4));
    }

    #[test]
    fn test_perspective_divide() {
        let cam = Camera::new(320, 256);
        // x/z = 1/2, focal 160 -> 80 pixels right
        let p = cam.project(v(1, -1, 2)).unwrap();
        assert_eq!((p.x, p.y), (240, 48));
    }

    #[test]
    fn test_rejects_points_behind_camera() {
        let cam = Camera::new(320, 256).with_position(v(0, 0, 5));
        assert!(cam.project(v(0, 0, 5)).is_none());
        assert!(cam.project(v(0, 0, 2)).is_none());
        assert!(cam.project(Vec3::new(Fixed::ZERO, Fixed::ZERO, Fixed::from_raw(0x0500_8000))).is_none());
        assert!(cam.project(v(0, 0, 6)).is_some());
    }

    #[test]
    fn test_near_plane_clamps_extremes() {
        let cam = Camera::new(320, 256);
        let p = cam
            .project(Vec3::new(Fixed::from_int(100), Fixed::ZERO, Fixed::from_raw(NEAR_PLANE.raw() + 1)))
            .unwrap();
        assert_eq!(p.x, 160 + SCREEN_LIMIT);
    }

    #[test]
    fn test_yawed_camera_sees_side() {
        let mut cam = Camera::new(320, 256);
        cam.set_rotation(0, QUARTER_TURN);
        // Looking down +X now
        let p = cam.project(v(3, 0, 0)).unwrap();
        assert_eq!((p.x, p.y), (160, 128));
        assert!(cam.project(v(0, 0, 3)).is_none());
        assert_eq!(cam.forward(), Vec3::new(Fixed::ONE, Fixed::ZERO, Fixed::ZERO));
    }

    #[test]
    fn test_camera_space_round_trip() {
        let mut cam = Camera::new(64, 64).with_position(v(2, -3, 1));
        cam.set_rotation(angle_from_degrees(20), angle_from_degrees(-35));
        let world = v(5, 1, 9);
        let local = cam.to_camera_space(world);
        let back = cam.orientation.transform(local) + cam.position;
        assert!((back.x.raw() - world.x.raw()).abs() < 0x200);
        assert!((back.y.raw() - world.y.raw()).abs() < 0x200);
        assert!((back.z.raw() - world.z.raw()).abs() < 0x200);
    }
}
