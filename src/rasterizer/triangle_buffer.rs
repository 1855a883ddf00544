//! Depth-bucketed triangle buffer
//!
//! Painter's algorithm without a depth buffer: triangles are parked in a
//! bucket per ordering index and drawn bucket by bucket, index 0 (farthest)
//! first. Within a bucket triangles draw in submission order.

use super::framebuffer::Framebuffer;
use super::types::ScreenTriangle;

pub struct TriangleBuffer {
    buckets: Vec<Vec<ScreenTriangle>>,
}

impl TriangleBuffer {
    pub fn new(bucket_count: usize) -> Self {
        Self {
            buckets: vec![Vec::new(); bucket_count],
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn bucket_mut(&mut self, index: i32) -> Option<&mut Vec<ScreenTriangle>> {
        usize::try_from(index).ok().and_then(|i| self.buckets.get_mut(i))
    }

    /// Queue a triangle. Out-of-range buckets silently drop it.
    pub fn add_triangle(&mut self, index: i32, triangle: ScreenTriangle) {
        match self.bucket_mut(index) {
            Some(bucket) => bucket.push(triangle),
            None => log::trace!("Dropped triangle for bucket {}", index),
        }
    }

    /// Pending triangles in one bucket (0 when out of range)
    pub fn triangle_count(&self, index: i32) -> usize {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.buckets.get(i))
            .map_or(0, Vec::len)
    }

    pub fn total_triangle_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// Rasterize one bucket in submission order, then empty it
    pub fn draw_and_clear_row(&mut self, index: i32, target: &mut Framebuffer) {
        if let Some(bucket) = self.bucket_mut(index) {
            for tri in bucket.drain(..) {
                target.draw_screen_triangle(&tri);
            }
        }
    }

    /// Drain every bucket, far (row 0) to near
    pub fn draw_and_clear_all(&mut self, target: &mut Framebuffer) {
        for bucket in &mut self.buckets {
            for tri in bucket.drain(..) {
                target.draw_screen_triangle(&tri);
            }
        }
    }

    /// Empty every bucket without drawing
    pub fn clear_all(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::Color;

    fn tri(color: Color) -> ScreenTriangle {
        ScreenTriangle::new((1, 1), (6, 2), (3, 6), color)
    }

    fn counts(buf: &TriangleBuffer) -> Vec<usize> {
        (0..buf.bucket_count() as i32).map(|i| buf.triangle_count(i)).collect()
    }

    #[test]
    fn test_add_touches_one_bucket() {
        let mut buf = TriangleBuffer::new(8);
        buf.add_triangle(3, tri(Color::RED));
        let before = counts(&buf);
        buf.add_triangle(5, tri(Color::RED));
        let after = counts(&buf);
        for i in 0..8 {
            let expected = before[i] + usize::from(i == 5);
            assert_eq!(after[i], expected);
        }
        assert_eq!(buf.total_triangle_count(), 2);
    }

    #[test]
    fn test_out_of_range_is_noop() {
        let mut buf = TriangleBuffer::new(4);
        let mut fb = Framebuffer::new(8, 8, 1).unwrap();
        buf.add_triangle(1, tri(Color::RED));
        buf.add_triangle(-1, tri(Color::RED));
        buf.add_triangle(4, tri(Color::RED));
        buf.add_triangle(i32::MAX, tri(Color::RED));
        buf.draw_and_clear_row(-3, &mut fb);
        buf.draw_and_clear_row(99, &mut fb);
        assert_eq!(counts(&buf), vec![0, 1, 0, 0]);
        assert_eq!(buf.triangle_count(-1), 0);
        assert_eq!(buf.triangle_count(4), 0);
    }

    #[test]
    fn test_draw_and_clear_row_keeps_other_buckets() {
        // add to 5, drain 5, bucket 7 untouched
        let mut buf = TriangleBuffer::new(16);
        let mut fb = Framebuffer::new(8, 8, 1).unwrap();
        fb.clear(Color::BLACK);
        buf.add_triangle(7, tri(Color::GREEN));
        buf.add_triangle(7, tri(Color::GREEN));
        buf.add_triangle(5, tri(Color::RED));
        buf.draw_and_clear_row(5, &mut fb);
        assert_eq!(buf.triangle_count(5), 0);
        assert_eq!(buf.triangle_count(7), 2);
        assert_eq!(fb.pixel(3, 3), Some(Color::RED));
    }

    #[test]
    fn test_submission_order_within_bucket() {
        let mut buf = TriangleBuffer::new(2);
        let mut fb = Framebuffer::new(8, 8, 1).unwrap();
        buf.add_triangle(0, tri(Color::RED));
        buf.add_triangle(0, tri(Color::BLUE));
        buf.draw_and_clear_row(0, &mut fb);
        assert_eq!(fb.pixel(3, 3), Some(Color::BLUE));
    }

    #[test]
    fn test_far_buckets_drawn_first() {
        let mut buf = TriangleBuffer::new(4);
        let mut fb = Framebuffer::new(8, 8, 1).unwrap();
        buf.add_triangle(3, tri(Color::GREEN));
        buf.add_triangle(0, tri(Color::RED));
        buf.draw_and_clear_all(&mut fb);
        assert_eq!(fb.pixel(3, 3), Some(Color::GREEN));
        assert_eq!(buf.total_triangle_count(), 0);
    }

    #[test]
    fn test_clear_all_discards() {
        let mut buf = TriangleBuffer::new(4);
        let mut fb = Framebuffer::new(8, 8, 1).unwrap();
        fb.clear(Color::BLACK);
        buf.add_triangle(0, tri(Color::RED));
        buf.add_triangle(2, tri(Color::RED));
        buf.clear_all();
        assert_eq!(buf.total_triangle_count(), 0);
        buf.draw_and_clear_all(&mut fb);
        assert_eq!(fb.pixel(3, 3), Some(Color::BLACK));
    }
}
