use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lander_engine::config::RenderSettings;
use lander_engine::math::{angle_from_degrees, Fixed, Vec3};
use lander_engine::rasterizer::{Color, Framebuffer};
use lander_engine::renderer::Renderer;
use lander_engine::world::{altitude, demo_scene, LandscapeScale};

fn bench_render_frame(c: &mut Criterion) {
    let scene = demo_scene();

    for (name, smooth, scale) in [
        ("render_frame_x1", false, LandscapeScale::X1),
        ("render_frame_x1_smooth", true, LandscapeScale::X1),
        ("render_frame_x4_smooth", true, LandscapeScale::X4),
    ] {
        let settings = RenderSettings {
            smooth_clipping: smooth,
            landscape_scale: scale,
            ..RenderSettings::default()
        };
        let Ok(mut renderer) = Renderer::new(settings) else {
            return;
        };
        let mut camera = renderer
            .camera()
            .with_position(Vec3::new(Fixed::from_ratio(13, 2), Fixed::from_ratio(3, 2), Fixed::from_int(-3)));
        camera.set_rotation(angle_from_degrees(-20), 0);

        c.bench_function(name, |b| {
            b.iter(|| renderer.render_frame(black_box(&camera), black_box(&scene)))
        });
    }
}

fn bench_altitude(c: &mut Criterion) {
    c.bench_function("altitude_grid", |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for z in -16..16 {
                for x in -16..16 {
                    sum += altitude(Fixed::from_raw(x << 22), Fixed::from_raw(z << 22)).raw() as i64;
                }
            }
            black_box(sum)
        })
    });
}

fn bench_triangle_fill(c: &mut Criterion) {
    let Ok(mut fb) = Framebuffer::new(320, 256, 2) else {
        return;
    };
    c.bench_function("fill_large_triangle", |b| {
        b.iter(|| {
            fb.draw_triangle(
                black_box(10),
                black_box(5),
                black_box(600),
                black_box(200),
                black_box(150),
                black_box(500),
                Color::WHITE,
            )
        })
    });
}

criterion_group!(benches, bench_render_frame, bench_altitude, bench_triangle_fill);
criterion_main!(benches);
