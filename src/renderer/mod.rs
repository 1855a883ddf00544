//! Frame orchestration
//!
//! One frame: clear the pixel buffer, submit landscape tiles far to near,
//! submit objects, then drain the triangle buckets. Buckets follow landscape
//! tile rows, farthest first, so draining them in order paints far to near.

mod landscape;
mod object;

pub use landscape::*;
pub use object::*;

use std::path::Path;
use crate::config::RenderSettings;
use crate::math::{Fixed, Vec3};
use crate::rasterizer::{Camera, Color, Framebuffer, FramebufferError, ScreenTriangle, TriangleBuffer};
use crate::world::{Landscape, ObjectCatalog, SceneObject};

/// Share of light every face gets regardless of orientation
pub const AMBIENT: Fixed = Fixed::from_raw(1 << 22);

/// Per-frame counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Triangles queued into a bucket
    pub submitted: usize,
    /// Faces dropped by backface culling
    pub culled: usize,
    /// Triangles dropped for crossing the near plane or lying off screen
    pub discarded: usize,
}

/// Brightness of a face from its world-space unit normal.
/// Y points down, so a normal of (0, -1, 0) faces straight up into the light.
pub fn brightness(normal: Vec3) -> Fixed {
    let facing = (Fixed::ONE - normal.y) * Fixed::HALF;
    AMBIENT + (Fixed::ONE - AMBIENT) * facing.clamp(Fixed::ZERO, Fixed::ONE)
}

/// Queue a triangle unless it lies entirely off screen
pub(crate) fn submit_triangle(
    buffer: &mut TriangleBuffer,
    framebuffer: &Framebuffer,
    bucket: i32,
    tri: ScreenTriangle,
    stats: &mut FrameStats,
) {
    let xs = tri.points.map(|p| p.0);
    let ys = tri.points.map(|p| p.1);
    let (w, h) = (framebuffer.width as i32, framebuffer.height as i32);
    let off_screen = xs.iter().all(|&x| x < 0)
        || xs.iter().all(|&x| x >= w)
        || ys.iter().all(|&y| y < 0)
        || ys.iter().all(|&y| y >= h);
    if off_screen {
        stats.discarded += 1;
        return;
    }

    let last = buffer.bucket_count() as i32 - 1;
    buffer.add_triangle(bucket.clamp(0, last.max(0)), tri);
    stats.submitted += 1;
}

pub struct Renderer {
    framebuffer: Framebuffer,
    triangles: TriangleBuffer,
    catalog: ObjectCatalog,
    settings: RenderSettings,
    landscape: Landscape,
    pub background: Color,
}

impl Renderer {
    pub fn new(settings: RenderSettings) -> Result<Self, FramebufferError> {
        let framebuffer = Framebuffer::new(settings.logical_width, settings.logical_height, settings.display_scale)?;
        let landscape = Landscape::new(settings.landscape_scale);
        let triangles = TriangleBuffer::new(LandscapeView::max_rows(&landscape));
        log::info!(
            "Renderer ready: {}x{} physical, {} buckets, landscape {:?}",
            framebuffer.width,
            framebuffer.height,
            triangles.bucket_count(),
            settings.landscape_scale
        );
        Ok(Self {
            framebuffer,
            triangles,
            catalog: ObjectCatalog::new(),
            landscape,
            settings,
            background: Color::BLACK,
        })
    }

    pub fn landscape(&self) -> &Landscape {
        &self.landscape
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Swap settings, reallocating the pixel buffer if the resolution changed
    pub fn apply_settings(&mut self, settings: RenderSettings) -> Result<(), FramebufferError> {
        let resized = settings.physical_width() != self.framebuffer.width
            || settings.physical_height() != self.framebuffer.height
            || settings.display_scale != self.framebuffer.scale;
        if resized {
            self.framebuffer = Framebuffer::new(settings.logical_width, settings.logical_height, settings.display_scale)?;
        }
        if settings.landscape_scale != self.landscape.scale {
            self.landscape = Landscape::new(settings.landscape_scale);
            self.triangles = TriangleBuffer::new(LandscapeView::max_rows(&self.landscape));
        }
        log::debug!("Applied settings: {:?}", settings);
        self.settings = settings;
        Ok(())
    }

    /// A camera matching the physical viewport
    pub fn camera(&self) -> Camera {
        Camera::new(self.framebuffer.width, self.framebuffer.height)
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Triangles queued here before `render_frame` are drawn with the frame
    pub fn triangle_buffer_mut(&mut self) -> &mut TriangleBuffer {
        &mut self.triangles
    }

    pub fn triangle_buffer(&self) -> &TriangleBuffer {
        &self.triangles
    }

    pub fn render_frame(&mut self, camera: &Camera, objects: &[SceneObject]) -> FrameStats {
        let mut stats = FrameStats::default();
        self.framebuffer.clear(self.background);

        let view = LandscapeView::new(&self.landscape, camera.position, self.settings.smooth_clipping);
        submit_landscape(
            &self.landscape,
            &view,
            camera,
            &self.framebuffer,
            &mut self.triangles,
            &mut stats,
        );

        for obj in objects {
            let row = self.landscape.world_to_tile(obj.position.z);
            submit_object(
                obj,
                self.catalog.get(obj.kind),
                view.bucket_for_object(row),
                camera,
                &self.framebuffer,
                &mut self.triangles,
                &mut stats,
            );
        }

        self.triangles.draw_and_clear_all(&mut self.framebuffer);
        log::trace!("Frame: {:?}", stats);
        stats
    }

    pub fn save_frame<P: AsRef<Path>>(&self, path: P) -> Result<(), FramebufferError> {
        self.framebuffer.save_png(path)
    }
}
