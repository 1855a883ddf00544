//! Fixed-point vectors and rotation matrices

use std::ops::{Add, Neg, Sub};
use serde::{Serialize, Deserialize};
use super::fixed::Fixed;
use super::trig::{cos, sin, Angle};

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: Fixed::ZERO, y: Fixed::ZERO, z: Fixed::ZERO };

    pub const fn new(x: Fixed, y: Fixed, z: Fixed) -> Self {
        Self { x, y, z }
    }

    /// Build from raw 8.24 components (handy for blueprint tables)
    pub const fn from_raw(x: i32, y: i32, z: i32) -> Self {
        Self {
            x: Fixed::from_raw(x),
            y: Fixed::from_raw(y),
            z: Fixed::from_raw(z),
        }
    }

    pub fn dot(self, other: Vec3) -> Fixed {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn scale(self, s: Fixed) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    pub fn length(self) -> Fixed {
        // Sum of squares in 16.48 so short vectors keep their precision
        let sq = |v: Fixed| (v.raw() as i64 * v.raw() as i64) as u64;
        let sum = sq(self.x).saturating_add(sq(self.y)).saturating_add(sq(self.z));
        let root = super::fixed::isqrt(sum);
        Fixed::from_raw(root.min(i32::MAX as u64) as i32)
    }

    pub fn normalize(self) -> Vec3 {
        let l = self.length();
        if l == Fixed::ZERO {
            return Vec3::ZERO;
        }
        Vec3 {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3 { x: -self.x, y: -self.y, z: -self.z }
    }
}

/// 3x3 matrix, stored as rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mat3 {
    pub rows: [Vec3; 3],
}

impl Mat3 {
    pub const IDENTITY: Mat3 = Mat3 {
        rows: [
            Vec3::new(Fixed::ONE, Fixed::ZERO, Fixed::ZERO),
            Vec3::new(Fixed::ZERO, Fixed::ONE, Fixed::ZERO),
            Vec3::new(Fixed::ZERO, Fixed::ZERO, Fixed::ONE),
        ],
    };

    pub const fn from_rows(r0: Vec3, r1: Vec3, r2: Vec3) -> Self {
        Self { rows: [r0, r1, r2] }
    }

    /// Rotation about the X axis (pitch)
    pub fn rotation_x(angle: Angle) -> Self {
        let (s, c) = (sin(angle), cos(angle));
        Mat3::from_rows(
            Vec3::new(Fixed::ONE, Fixed::ZERO, Fixed::ZERO),
            Vec3::new(Fixed::ZERO, c, -s),
            Vec3::new(Fixed::ZERO, s, c),
        )
    }

    /// Rotation about the Y axis (yaw)
    pub fn rotation_y(angle: Angle) -> Self {
        let (s, c) = (sin(angle), cos(angle));
        Mat3::from_rows(
            Vec3::new(c, Fixed::ZERO, s),
            Vec3::new(Fixed::ZERO, Fixed::ONE, Fixed::ZERO),
            Vec3::new(-s, Fixed::ZERO, c),
        )
    }

    /// Combined rotation: yaw applied after pitch (Ry * Rx), written out
    /// directly so it costs four multiplies instead of a full product
    pub fn rotation(pitch: Angle, yaw: Angle) -> Self {
        let (sp, cp) = (sin(pitch), cos(pitch));
        let (sy, cy) = (sin(yaw), cos(yaw));
        Mat3::from_rows(
            Vec3::new(cy, sy * sp, sy * cp),
            Vec3::new(Fixed::ZERO, cp, -sp),
            Vec3::new(-sy, cy * sp, cy * cp),
        )
    }

    pub fn column(&self, i: usize) -> Vec3 {
        let pick = |v: Vec3| match i {
            0 => v.x,
            1 => v.y,
            _ => v.z,
        };
        Vec3::new(pick(self.rows[0]), pick(self.rows[1]), pick(self.rows[2]))
    }

    pub fn transpose(&self) -> Mat3 {
        Mat3::from_rows(self.column(0), self.column(1), self.column(2))
    }

    /// Matrix product `self * other`
    pub fn mul(&self, other: &Mat3) -> Mat3 {
        let cols = [other.column(0), other.column(1), other.column(2)];
        let row = |r: Vec3| Vec3::new(r.dot(cols[0]), r.dot(cols[1]), r.dot(cols[2]));
        Mat3::from_rows(row(self.rows[0]), row(self.rows[1]), row(self.rows[2]))
    }

    /// Transform a vector (`self * v`)
    pub fn transform(&self, v: Vec3) -> Vec3 {
        Vec3::new(self.rows[0].dot(v), self.rows[1].dot(v), self.rows[2].dot(v))
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Mat3::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::trig::{angle_from_degrees, QUARTER_TURN};

    fn close(a: Vec3, b: Vec3, tolerance: i32) -> bool {
        (a.x.raw() - b.x.raw()).abs() <= tolerance
            && (a.y.raw() - b.y.raw()).abs() <= tolerance
            && (a.z.raw() - b.z.raw()).abs() <= tolerance
    }

    #[test]
    fn test_vec3_dot() {
        let a = Vec3::new(Fixed::from_int(1), Fixed::from_int(2), Fixed::from_int(3));
        let b = Vec3::new(Fixed::from_int(4), Fixed::from_int(5), Fixed::from_int(6));
        assert_eq!(a.dot(b), Fixed::from_int(32));
    }

    #[test]
    fn test_vec3_cross() {
        let a = Vec3::new(Fixed::ONE, Fixed::ZERO, Fixed::ZERO);
        let b = Vec3::new(Fixed::ZERO, Fixed::ONE, Fixed::ZERO);
        assert_eq!(a.cross(b), Vec3::new(Fixed::ZERO, Fixed::ZERO, Fixed::ONE));
    }

    #[test]
    fn test_normalize() {
        let v = Vec3::new(Fixed::from_int(3), Fixed::ZERO, Fixed::from_int(4));
        assert_eq!(v.length(), Fixed::from_int(5));
        let n = v.normalize();
        assert!(close(n, Vec3::from_raw(0x0099_999A, 0, 0x00CC_CCCD), 1));
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
    }

    #[test]
    fn test_rotation_identity() {
        assert_eq!(Mat3::rotation(0, 0), Mat3::IDENTITY);
        let v = Vec3::from_raw(0x0123_0000, -0x0200_0000, 0x0050_0000);
        assert_eq!(Mat3::IDENTITY.transform(v), v);
    }

    #[test]
    fn test_yaw_quarter_turn() {
        // +Z swings round to +X
        let m = Mat3::rotation(0, QUARTER_TURN);
        let v = m.transform(Vec3::new(Fixed::ZERO, Fixed::ZERO, Fixed::ONE));
        assert!(close(v, Vec3::new(Fixed::ONE, Fixed::ZERO, Fixed::ZERO), 1));
    }

    #[test]
    fn test_combined_matches_product() {
        let pitch = angle_from_degrees(30);
        let yaw = angle_from_degrees(-70);
        let direct = Mat3::rotation(pitch, yaw);
        let product = Mat3::rotation_y(yaw).mul(&Mat3::rotation_x(pitch));
        for i in 0..3 {
            assert!(close(direct.rows[i], product.rows[i], 2));
        }
    }

    #[test]
    fn test_transpose_inverts_rotation() {
        let m = Mat3::rotation(angle_from_degrees(25), angle_from_degrees(140));
        let v = Vec3::from_raw(0x0180_0000, -0x0040_0000, 0x0270_0000);
        let back = m.transpose().transform(m.transform(v));
        assert!(close(back, v, 0x100));
    }
}
