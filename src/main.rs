//! Lander Engine viewer
//!
//! Flies a camera over the procedural landscape and shows the software
//! rendered frame in a macroquad window.
//!
//! Usage:
//!   lander-engine [--config <settings.ron>] [--export <frame.png>]
//!
//! With `--export` a single frame is rendered and saved without opening a
//! window.

use std::path::{Path, PathBuf};
use macroquad::prelude::*;
use lander_engine::config::{load_settings, save_settings, RenderSettings, MAX_DISPLAY_SCALE};
use lander_engine::math::{angle_from_degrees, Fixed, Vec3};
use lander_engine::rasterizer::Camera;
use lander_engine::renderer::{FrameStats, Renderer};
use lander_engine::world::{demo_scene, SceneObject};
use lander_engine::VERSION;

const DEFAULT_CONFIG: &str = "lander.ron";
const SCREENSHOT: &str = "lander-frame.png";

/// Per-frame camera step: 1/16 tile
const MOVE_STEP: Fixed = Fixed::from_raw(1 << 20);
/// Keep the camera well inside the fixed-point range
const WORLD_LIMIT: Fixed = Fixed::from_int(100);
const PITCH_LIMIT: i32 = 80;
const YAW_LIMIT: i32 = 60;

struct Args {
    config: PathBuf,
    export: Option<PathBuf>,
}

fn parse_args() -> Args {
    let mut args = Args {
        config: PathBuf::from(DEFAULT_CONFIG),
        export: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                if let Some(path) = iter.next() {
                    args.config = PathBuf::from(path);
                }
            }
            "--export" => args.export = iter.next().map(PathBuf::from),
            other => println!("Ignoring unknown argument: {}", other),
        }
    }
    args
}

/// Settings from disk, or defaults when the file is missing or broken
fn load_or_default(path: &Path) -> RenderSettings {
    if !path.exists() {
        return RenderSettings::default();
    }
    match load_settings(path) {
        Ok(settings) => settings,
        Err(e) => {
            println!("Failed to load {}: {}, using defaults", path.display(), e);
            RenderSettings::default()
        }
    }
}

const START_HEADING: (i32, i32) = (-20, 0);

fn start_camera(renderer: &Renderer) -> Camera {
    let mut camera = renderer
        .camera()
        .with_position(Vec3::new(Fixed::from_ratio(13, 2), Fixed::from_ratio(3, 2), Fixed::from_int(-3)));
    camera.set_rotation(angle_from_degrees(START_HEADING.0), angle_from_degrees(START_HEADING.1));
    camera
}

fn export_frame(settings: RenderSettings, path: &Path) -> Result<(), String> {
    let mut renderer = Renderer::new(settings).map_err(|e| e.to_string())?;
    let camera = start_camera(&renderer);
    let stats = renderer.render_frame(&camera, &demo_scene());
    renderer.save_frame(path).map_err(|e| e.to_string())?;
    println!(
        "Saved {} ({} triangles, {} culled, {} discarded)",
        path.display(),
        stats.submitted,
        stats.culled,
        stats.discarded
    );
    Ok(())
}

fn window_conf(settings: &RenderSettings) -> Conf {
    Conf {
        window_title: format!("Lander Engine v{}", VERSION),
        window_width: settings.physical_width() as i32,
        window_height: settings.physical_height() as i32,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn main() {
    let args = parse_args();
    let settings = load_or_default(&args.config);

    if let Some(path) = args.export {
        if let Err(e) = export_frame(settings, &path) {
            eprintln!("Export failed: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let conf = window_conf(&settings);
    macroquad::Window::from_config(conf, run_viewer(settings, args.config));
}

fn clamp_to_world(camera: &mut Camera) {
    let p = camera.position;
    camera.position = Vec3::new(
        p.x.clamp(-WORLD_LIMIT, WORLD_LIMIT),
        p.y.clamp(-WORLD_LIMIT, WORLD_LIMIT),
        p.z.clamp(-WORLD_LIMIT, WORLD_LIMIT),
    );
}

/// Keyboard flight; `heading` is (pitch, yaw) in degrees
fn update_camera(camera: &mut Camera, heading: &mut (i32, i32)) {
    if is_key_down(KeyCode::W) || is_key_down(KeyCode::Up) {
        camera.move_forward(MOVE_STEP);
    }
    if is_key_down(KeyCode::S) || is_key_down(KeyCode::Down) {
        camera.move_forward(-MOVE_STEP);
    }
    if is_key_down(KeyCode::D) {
        camera.strafe(MOVE_STEP);
    }
    if is_key_down(KeyCode::A) {
        camera.strafe(-MOVE_STEP);
    }
    // Y points down
    if is_key_down(KeyCode::R) {
        camera.position.y -= MOVE_STEP;
    }
    if is_key_down(KeyCode::F) {
        camera.position.y += MOVE_STEP;
    }
    clamp_to_world(camera);

    let (mut pitch, mut yaw) = *heading;
    if is_key_down(KeyCode::Q) {
        pitch += 1;
    }
    if is_key_down(KeyCode::E) {
        pitch -= 1;
    }
    if is_key_down(KeyCode::Right) {
        yaw += 1;
    }
    if is_key_down(KeyCode::Left) {
        yaw -= 1;
    }
    // The landscape is laid out ahead along +Z, so the heading stays forward
    let clamped = (pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT), yaw.clamp(-YAW_LIMIT, YAW_LIMIT));
    if clamped != *heading {
        *heading = clamped;
        camera.set_rotation(angle_from_degrees(clamped.0), angle_from_degrees(clamped.1));
    }
}

/// Settings changes from the keyboard; returns true if anything changed
fn update_settings(settings: &mut RenderSettings) -> bool {
    let mut changed = false;
    if is_key_pressed(KeyCode::C) {
        settings.smooth_clipping = !settings.smooth_clipping;
        changed = true;
    }
    if is_key_pressed(KeyCode::L) {
        settings.landscape_scale = settings.landscape_scale.next();
        changed = true;
    }
    let scale_keys = [KeyCode::Key1, KeyCode::Key2, KeyCode::Key3, KeyCode::Key4];
    for (i, key) in scale_keys.iter().enumerate().take(MAX_DISPLAY_SCALE) {
        if is_key_pressed(*key) && settings.display_scale != i + 1 {
            settings.display_scale = i + 1;
            changed = true;
        }
    }
    changed
}

fn draw_frame(renderer: &Renderer) {
    let fb = renderer.framebuffer();
    let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, fb.pixels());
    texture.set_filter(FilterMode::Nearest);

    // Fit to the window, keeping the aspect ratio
    let scale = (screen_width() / fb.width as f32).min(screen_height() / fb.height as f32);
    let (draw_w, draw_h) = (fb.width as f32 * scale, fb.height as f32 * scale);
    draw_texture_ex(
        &texture,
        (screen_width() - draw_w) / 2.0,
        (screen_height() - draw_h) / 2.0,
        WHITE,
        DrawTextureParams {
            dest_size: Some(Vec2::new(draw_w, draw_h)),
            ..Default::default()
        },
    );
}

fn draw_overlay(settings: &RenderSettings, camera: &Camera, heading: (i32, i32), stats: &FrameStats) {
    let lines = [
        format!(
            "pos {} {} {}  pitch {} yaw {}",
            camera.position.x,
            camera.position.y,
            camera.position.z,
            heading.0,
            heading.1
        ),
        format!(
            "tris {} culled {} discarded {}",
            stats.submitted, stats.culled, stats.discarded
        ),
        format!(
            "[C] smooth {}  [L] landscape {:?}  [1-4] scale {}  [P] screenshot  [O] save settings",
            settings.smooth_clipping, settings.landscape_scale, settings.display_scale
        ),
    ];
    for (i, line) in lines.iter().enumerate() {
        draw_text(line, 8.0, 18.0 + i as f32 * 16.0, 16.0, Color::from_rgba(255, 255, 255, 220));
    }
}

async fn run_viewer(mut settings: RenderSettings, config_path: PathBuf) {
    let mut renderer = match Renderer::new(settings.clone()) {
        Ok(renderer) => renderer,
        Err(e) => {
            eprintln!("Failed to create renderer: {}", e);
            return;
        }
    };
    let mut camera = start_camera(&renderer);
    let mut heading = START_HEADING;
    let scene: Vec<SceneObject> = demo_scene();

    println!("=== Lander Engine v{} ===", VERSION);

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        if update_settings(&mut settings) {
            match renderer.apply_settings(settings.clone()) {
                Ok(()) => {
                    let (position, pitch, yaw) = (camera.position, camera.pitch, camera.yaw);
                    camera = renderer.camera().with_position(position);
                    camera.set_rotation(pitch, yaw);
                }
                Err(e) => {
                    eprintln!("Failed to apply settings: {}", e);
                    settings = renderer.settings().clone();
                }
            }
        }
        update_camera(&mut camera, &mut heading);

        let stats = renderer.render_frame(&camera, &scene);

        if is_key_pressed(KeyCode::P) {
            match renderer.save_frame(SCREENSHOT) {
                Ok(()) => println!("Saved {}", SCREENSHOT),
                Err(e) => eprintln!("Screenshot failed: {}", e),
            }
        }
        if is_key_pressed(KeyCode::O) {
            match save_settings(&settings, &config_path) {
                Ok(()) => println!("Saved settings to {}", config_path.display()),
                Err(e) => eprintln!("Failed to save settings: {}", e),
            }
        }

        clear_background(Color::from_rgba(0, 0, 0, 255));
        draw_frame(&renderer);
        draw_overlay(&settings, &camera, heading, &stats);

        next_frame().await;
    }
}
