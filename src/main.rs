use std::time::{Duration, Instant};

mod color;
mod math;
mod mesh;
mod model;
mod rasterizer;
mod render;
mod texture;

use crate::color::Color;
use crate::math::{mul, rotation, translation};
use crate::model::Model;
use crate::render::Renderer;

const WIDTH: usize = 800;
const HEIGHT: usize = 600;
const DEFAULT_FOV: f32 = 60.0;

struct Args {
    model_path: Option<String>,
    fov: f32,
}

fn parse_args() -> Args {
    let mut ret = Args {
        model_path: None,
        fov: DEFAULT_FOV,
    };

    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--fov" && i + 1 < args.len() {
            ret.fov = args[i + 1].parse().unwrap_or(DEFAULT_FOV);
            i += 2;
        } else {
            // A path prefix: <prefix>.obj and <prefix>.png are loaded.
            ret.model_path = Some(args[i].clone());
            i += 1;
        }
    }

    ret
}

fn main() {
    env_logger::init();
    let args = parse_args();

    let model = match &args.model_path {
        Some(path) => match Model::load(path) {
            Ok(model) => model,
            Err(e) => {
                log::error!("failed to load {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Model::demo_cube(),
    };

    let mut renderer = Renderer::new(WIDTH, HEIGHT, Color::white());

    let start = Instant::now();
    let mut last_frame = Instant::now();
    let mut last_title_refresh = Instant::now();
    let mut fps = 0u32;

    loop {
        renderer.handle_resize();
        renderer.clear();

        // A fixed tilt composed with a slow spin around the view axis. All
        // animation state lives out here; the rasterizer is stateless
        // between frames.
        let tilt = rotation(1.0, 0.0, 0.0, 1.6);
        let spin = rotation(0.0, 0.0, 1.0, start.elapsed().as_secs_f32() / 5.0);
        let rot = mul(&tilt, &spin);
        let trans = translation(0.0, 0.0, 50.0);

        renderer.draw_mesh(model.mesh(), model.texture(), &rot, &trans, args.fov);

        if !renderer.present() {
            return;
        }

        let delta_ms = last_frame.elapsed().as_millis() as u32;
        last_frame = Instant::now();
        if delta_ms > 0 {
            fps = 1000 / delta_ms;
        }
        // Refreshing the title every frame makes it unreadable; once a
        // second is plenty.
        if last_title_refresh.elapsed() >= Duration::from_secs(1) {
            renderer.set_fps_title(fps);
            log::debug!("frame time {} ms ({} FPS)", delta_ms, fps);
            last_title_refresh = Instant::now();
        }
    }
}
