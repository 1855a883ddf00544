//! Landscape renderer
//!
//! The visible patch of tiles sits in front of the camera (which looks along
//! +Z) and is walked from the far row to the near one. Each tile row gets its
//! own triangle bucket, so draining buckets in order paints far to near.

use crate::math::{Fixed, Vec3};
use crate::rasterizer::{Camera, Color, Framebuffer, Projected, ScreenTriangle, TriangleBuffer};
use crate::world::{altitude, Landscape, LAND_MID_HEIGHT, LAUNCHPAD_ALTITUDE, SEA_LEVEL};
use super::{brightness, submit_triangle, FrameStats};

const SEA: Color = Color::new(30, 70, 200);
const LAUNCHPAD: Color = Color::new(150, 150, 150);
const GRASS: [Color; 4] = [
    Color::new(60, 160, 40),
    Color::new(80, 170, 30),
    Color::new(50, 140, 50),
    Color::new(100, 150, 40),
];
const ROCK: [Color; 4] = [
    Color::new(140, 110, 70),
    Color::new(120, 100, 60),
    Color::new(160, 130, 80),
    Color::new(110, 90, 70),
];

/// Tiles whose average altitude is above (less than) this are rocky
const ROCK_LINE: Fixed = Fixed::from_raw(LAND_MID_HEIGHT.raw() - 0x00A0_0000);

/// World-space rectangle the landscape edges are clamped to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipWindow {
    pub min_x: Fixed,
    pub max_x: Fixed,
    pub min_z: Fixed,
    pub max_z: Fixed,
}

/// Tiles covered by one frame's landscape pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandscapeView {
    /// Tile index of the leftmost column
    pub first_x: i32,
    /// Tile index of the nearest row
    pub first_z: i32,
    pub columns: i32,
    pub rows: i32,
    /// Set when smooth clipping is on
    pub window: Option<ClipWindow>,
}

impl LandscapeView {
    pub fn new(landscape: &Landscape, camera_position: Vec3, smooth: bool) -> Self {
        let tiles_x = landscape.tiles_x();
        let tiles_z = landscape.tiles_z();

        if !smooth {
            return Self {
                first_x: landscape.world_to_tile(camera_position.x) - tiles_x / 2,
                first_z: landscape.world_to_tile(camera_position.z),
                columns: tiles_x,
                rows: tiles_z,
                window: None,
            };
        }

        // Same footprint, but sliding with the camera instead of snapping
        let half_width = Fixed::from_raw(landscape.tile_to_world(tiles_x).raw() / 2);
        let window = ClipWindow {
            min_x: camera_position.x - half_width,
            max_x: camera_position.x + half_width,
            min_z: camera_position.z,
            max_z: camera_position.z + landscape.tile_to_world(tiles_z),
        };
        Self {
            first_x: landscape.world_to_tile(window.min_x),
            first_z: landscape.world_to_tile(window.min_z),
            columns: tiles_x + 1,
            rows: tiles_z + 1,
            window: Some(window),
        }
    }

    /// Most rows any view of this landscape can have
    pub fn max_rows(landscape: &Landscape) -> usize {
        (landscape.tiles_z() + 1) as usize
    }

    /// Bucket for a tile row: the farthest row is bucket 0
    pub fn bucket_for_row(&self, tile_z: i32) -> i32 {
        (self.rows - 1 - (tile_z - self.first_z)).clamp(0, self.rows - 1)
    }

    /// Bucket for an object standing in a tile row. It draws after the row
    /// in front of it, since its base overlaps that row's far edge.
    pub fn bucket_for_object(&self, tile_z: i32) -> i32 {
        (self.bucket_for_row(tile_z) + 1).min(self.rows - 1)
    }

    fn corner(&self, landscape: &Landscape, tile_x: i32, tile_z: i32) -> Vec3 {
        match self.window {
            None => landscape.tile_corner(tile_x, tile_z),
            Some(w) => {
                let x = landscape.tile_to_world(tile_x).clamp(w.min_x, w.max_x);
                let z = landscape.tile_to_world(tile_z).clamp(w.min_z, w.max_z);
                Vec3::new(x, altitude(x, z), z)
            }
        }
    }

    fn corner_line(&self, landscape: &Landscape, camera: &Camera, tile_z: i32) -> Vec<(Vec3, Option<Projected>)> {
        (0..=self.columns)
            .map(|i| {
                let world = self.corner(landscape, self.first_x + i, tile_z);
                (world, camera.project(world))
            })
            .collect()
    }
}

/// Base color of a tile before lighting
fn tile_color(tile_x: i32, tile_z: i32, heights: [Fixed; 4]) -> Color {
    if heights.iter().all(|h| *h == SEA_LEVEL) {
        return SEA;
    }
    if heights.iter().all(|h| *h == LAUNCHPAD_ALTITUDE) {
        return LAUNCHPAD;
    }
    let sum: i64 = heights.iter().map(|h| h.raw() as i64).sum();
    let average = Fixed::from_raw((sum / 4) as i32);
    let speckle = ((tile_x.wrapping_mul(0x2F1B) ^ tile_z.wrapping_mul(0x51A3)) >> 3) & 3;
    let palette = if average < ROCK_LINE { &ROCK } else { &GRASS };
    palette[speckle as usize]
}

/// Light and queue one terrain triangle
fn submit_tile_triangle(
    corners: [(Vec3, Option<Projected>); 3],
    color: Color,
    bucket: i32,
    framebuffer: &Framebuffer,
    buffer: &mut TriangleBuffer,
    stats: &mut FrameStats,
) {
    let [(a, pa), (b, pb), (c, pc)] = corners;
    let (Some(pa), Some(pb), Some(pc)) = (pa, pb, pc) else {
        stats.discarded += 1;
        return;
    };

    let mut normal = (b - a).cross(c - a).normalize();
    // Terrain always faces up (-Y)
    if normal.y > Fixed::ZERO {
        normal = -normal;
    }

    let tri = ScreenTriangle::new((pa.x, pa.y), (pb.x, pb.y), (pc.x, pc.y), color.shade(brightness(normal)));
    submit_triangle(buffer, framebuffer, bucket, tri, stats);
}

/// Queue every visible landscape triangle, far rows first
pub fn submit_landscape(
    landscape: &Landscape,
    view: &LandscapeView,
    camera: &Camera,
    framebuffer: &Framebuffer,
    buffer: &mut TriangleBuffer,
    stats: &mut FrameStats,
) {
    let mut far_line = view.corner_line(landscape, camera, view.first_z + view.rows);

    for row in (0..view.rows).rev() {
        let tile_z = view.first_z + row;
        let near_line = view.corner_line(landscape, camera, tile_z);
        let bucket = view.bucket_for_row(tile_z);

        for col in 0..view.columns as usize {
            let (fl, fr) = (far_line[col], far_line[col + 1]);
            let (nl, nr) = (near_line[col], near_line[col + 1]);

            // Smooth clipping can squash edge tiles to nothing
            if fl.0.x == fr.0.x || fl.0.z == nl.0.z {
                continue;
            }

            let tile_x = view.first_x + col as i32;
            let color = tile_color(tile_x, tile_z, [fl.0.y, fr.0.y, nl.0.y, nr.0.y]);
            submit_tile_triangle([fl, fr, nl], color, bucket, framebuffer, buffer, stats);
            submit_tile_triangle([fr, nr, nl], color, bucket, framebuffer, buffer, stats);
        }

        far_line = near_line;
    }
}
