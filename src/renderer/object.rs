//! Object renderer - transforms a blueprint into world space, culls faces
//! pointing away from the camera, lights and queues the rest

use crate::math::{Fixed, Vec3};
use crate::rasterizer::{Camera, Framebuffer, ScreenTriangle, TriangleBuffer};
use crate::world::{Blueprint, SceneObject};
use super::{brightness, submit_triangle, FrameStats};

/// Queue every visible face of one object into `bucket`
pub fn submit_object(
    obj: &SceneObject,
    blueprint: &Blueprint,
    bucket: i32,
    camera: &Camera,
    framebuffer: &Framebuffer,
    buffer: &mut TriangleBuffer,
    stats: &mut FrameStats,
) {
    let world: Vec<Vec3> = blueprint
        .vertices
        .iter()
        .map(|v| obj.position + obj.rotation.transform(*v))
        .collect();
    let projected: Vec<_> = world.iter().map(|v| camera.project(*v)).collect();

    for face in &blueprint.faces {
        let [a, b, c] = face.indices;
        let normal = obj.rotation.transform(face.normal);

        if normal.dot(camera.position - world[a]) <= Fixed::ZERO {
            stats.culled += 1;
            continue;
        }

        let (Some(pa), Some(pb), Some(pc)) = (projected[a], projected[b], projected[c]) else {
            stats.discarded += 1;
            continue;
        };

        let color = face.color.shade(brightness(normal));
        let tri = ScreenTriangle::new((pa.x, pa.y), (pb.x, pb.y), (pc.x, pc.y), color);
        submit_triangle(buffer, framebuffer, bucket, tri, stats);
    }
}
