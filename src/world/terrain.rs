//! Procedural landscape height field
//!
//! The landscape is a sum of six sine waves. The Y axis points down, so a
//! *smaller* altitude value is physically higher: the sea clamp keeps values
//! from rising above `SEA_LEVEL`, and the launchpad sits above mid height.

use serde::{Serialize, Deserialize};
use crate::math::{sin, Angle, Fixed, Vec3};

/// World size of one tile at landscape scale 1
pub const TILE_SIZE: Fixed = Fixed::ONE;

/// Visible tile grid at landscape scale 1
pub const TILES_X: i32 = 13;
pub const TILES_Z: i32 = 11;

/// Altitude the sine terms oscillate around
pub const LAND_MID_HEIGHT: Fixed = Fixed::from_int(5);

/// Anything lower than this (numerically larger) is water
pub const SEA_LEVEL: Fixed = Fixed::from_raw(0x0550_0000);

pub const LAUNCHPAD_ALTITUDE: Fixed = Fixed::from_raw(0x0350_0000);

/// The launchpad covers 0 <= x, z < LAUNCHPAD_SIZE
pub const LAUNCHPAD_SIZE: Fixed = Fixed::from_raw(0x0800_0000);

/// Raw coordinate -> angle: one tile is 1/32 of a turn for frequency 1
const ANGLE_SHIFT: u32 = 3;

/// One Fourier term: `amplitude * sin(fx * x + fz * z + phase)`
struct Wave {
    fx: i32,
    fz: i32,
    amplitude: Fixed,
    phase: Angle,
}

const fn wave(fx: i32, fz: i32, amplitude: i32, phase: Angle) -> Wave {
    Wave { fx, fz, amplitude: Fixed::from_raw(amplitude), phase }
}

const WAVES: [Wave; 6] = [
    wave(1, -2, 0x0040_0000, 0x0000_0000),
    wave(4, 3, 0x0040_0000, 0x2000_0000),
    wave(-5, 3, 0x0040_0000, 0x5555_0000),
    wave(3, 3, 0x0040_0000, 0x9000_0000),
    wave(5, 11, 0x0020_0000, 0xC000_0000),
    wave(10, 7, 0x0020_0000, 0xE400_0000),
];

/// Altitude of the landscape at world position (x, z)
pub fn altitude(x: Fixed, z: Fixed) -> Fixed {
    if is_launchpad(x, z) {
        return LAUNCHPAD_ALTITUDE;
    }

    let mut offset = Fixed::ZERO;
    for w in &WAVES {
        // Wrapping is fine here: the angle only matters modulo one turn
        let turn = x.raw().wrapping_mul(w.fx).wrapping_add(z.raw().wrapping_mul(w.fz)) as u32;
        let angle = turn.wrapping_shl(ANGLE_SHIFT).wrapping_add(w.phase);
        offset += w.amplitude * sin(angle);
    }

    let height = LAND_MID_HEIGHT - offset;

    // Larger is lower: clamp anything under the water surface
    if height > SEA_LEVEL {
        SEA_LEVEL
    } else {
        height
    }
}

/// Unsigned compare, so negative coordinates are never on the pad
pub fn is_launchpad(x: Fixed, z: Fixed) -> bool {
    let size = LAUNCHPAD_SIZE.raw() as u32;
    (x.raw() as u32) < size && (z.raw() as u32) < size
}

/// Runtime landscape detail: each step doubles the grid and halves the tiles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LandscapeScale {
    #[default]
    X1,
    X2,
    X4,
    X8,
}

impl LandscapeScale {
    pub const ALL: [LandscapeScale; 4] = [
        LandscapeScale::X1,
        LandscapeScale::X2,
        LandscapeScale::X4,
        LandscapeScale::X8,
    ];

    pub fn factor(self) -> i32 {
        match self {
            LandscapeScale::X1 => 1,
            LandscapeScale::X2 => 2,
            LandscapeScale::X4 => 4,
            LandscapeScale::X8 => 8,
        }
    }

    pub fn from_factor(factor: i32) -> Option<Self> {
        LandscapeScale::ALL.iter().copied().find(|s| s.factor() == factor)
    }

    pub fn next(self) -> Self {
        match self {
            LandscapeScale::X1 => LandscapeScale::X2,
            LandscapeScale::X2 => LandscapeScale::X4,
            LandscapeScale::X4 => LandscapeScale::X8,
            LandscapeScale::X8 => LandscapeScale::X1,
        }
    }
}

/// Terrain parameters shared by the height queries and the landscape renderer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Landscape {
    pub scale: LandscapeScale,
}

impl Landscape {
    pub fn new(scale: LandscapeScale) -> Self {
        Self { scale }
    }

    pub fn tiles_x(&self) -> i32 {
        TILES_X * self.scale.factor()
    }

    pub fn tiles_z(&self) -> i32 {
        TILES_Z * self.scale.factor()
    }

    pub fn tile_size(&self) -> Fixed {
        Fixed::from_raw(TILE_SIZE.raw() / self.scale.factor())
    }

    /// World coordinate of a tile corner along one axis. Tiles shrink as the
    /// landscape scale grows (`TILE_SIZE / factor`), so the world extent of
    /// the grid stays fixed and only the tessellation gets finer.
    pub fn tile_to_world(&self, tile: i32) -> Fixed {
        Fixed::from_raw(tile.wrapping_mul(self.tile_size().raw()))
    }

    /// Tile containing a world coordinate (floors)
    pub fn world_to_tile(&self, coord: Fixed) -> i32 {
        coord.raw().div_euclid(self.tile_size().raw())
    }

    /// Altitude at a tile corner
    pub fn tile_altitude(&self, tile_x: i32, tile_z: i32) -> Fixed {
        altitude(self.tile_to_world(tile_x), self.tile_to_world(tile_z))
    }

    /// World position of a tile corner, sitting on the surface
    pub fn tile_corner(&self, tile_x: i32, tile_z: i32) -> Vec3 {
        let x = self.tile_to_world(tile_x);
        let z = self.tile_to_world(tile_z);
        Vec3::new(x, altitude(x, z), z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_altitude_deterministic() {
        let samples = [
            (Fixed::from_int(20), Fixed::from_int(3)),
            (Fixed::from_raw(0x0C34_5678), Fixed::from_raw(-0x0321_0000)),
            (Fixed::from_int(-40), Fixed::from_int(90)),
        ];
        for (x, z) in samples {
            assert_eq!(altitude(x, z), altitude(x, z));
        }
    }

    #[test]
    fn test_launchpad_is_flat() {
        for (x, z) in [(0, 0), (1, 7), (0x07FF_FFFF, 0x07FF_FFFF), (0x0400_0000, 0)] {
            assert_eq!(altitude(Fixed::from_raw(x), Fixed::from_raw(z)), LAUNCHPAD_ALTITUDE);
        }
        assert!(!is_launchpad(LAUNCHPAD_SIZE, Fixed::ZERO));
        assert!(!is_launchpad(Fixed::from_int(-1), Fixed::ZERO));
    }

    #[test]
    fn test_origin_is_launchpad() {
        for _ in 0..3 {
            assert_eq!(altitude(Fixed::ZERO, Fixed::ZERO), LAUNCHPAD_ALTITUDE);
        }
    }

    #[test]
    fn test_never_below_sea_level() {
        let mut clamped = 0;
        for tx in -64..64 {
            for tz in -64..64 {
                let h = altitude(Fixed::from_raw(tx << 22), Fixed::from_raw(tz << 22));
                assert!(h <= SEA_LEVEL);
                if h == SEA_LEVEL {
                    clamped += 1;
                }
            }
        }
        assert!(clamped > 0, "expected some sea in a 32x32 tile area");
    }

    #[test]
    fn test_terrain_varies_off_the_pad() {
        let a = altitude(Fixed::from_int(20), Fixed::from_int(20));
        let b = altitude(Fixed::from_int(21), Fixed::from_int(23));
        let c = altitude(Fixed::from_int(-9), Fixed::from_int(14));
        assert!(a != b || b != c);
    }

    #[test]
    fn test_tile_altitude_matches_world_query() {
        for scale in LandscapeScale::ALL {
            let land = Landscape::new(scale);
            for (tx, tz) in [(3, 4), (-2, 9), (40, -17)] {
                let x = land.tile_to_world(tx);
                let z = land.tile_to_world(tz);
                assert_eq!(land.tile_altitude(tx, tz), altitude(x, z));
            }
        }
    }

    #[test]
    fn test_scale_refines_grid() {
        let coarse = Landscape::new(LandscapeScale::X1);
        let fine = Landscape::new(LandscapeScale::X4);
        assert_eq!(fine.tiles_x(), TILES_X * 4);
        assert_eq!(fine.tiles_z(), TILES_Z * 4);
        assert_eq!(fine.tile_to_world(8), coarse.tile_to_world(2));
        assert_eq!(fine.tile_altitude(12, 20), coarse.tile_altitude(3, 5));
        assert_eq!(fine.world_to_tile(Fixed::from_raw(-1)), -1);
        assert_eq!(LandscapeScale::from_factor(8), Some(LandscapeScale::X8));
        assert_eq!(LandscapeScale::from_factor(3), None);
    }
}
