// src/main.rs
use nannou::prelude::*;
use std::time::Instant;

use typovis::{
    config::Config,
    controllers::{OrbitCamera, OscController, ParamCommand},
    models::{ParamSnapshot, SceneMode, StructuralKey, POSTERIZE_STEPS},
    services::{LabelRasterizer, TextureCache},
    views::{Backdrop, SceneInstance},
};

/// Two primary presses within this window reset the camera.
const DOUBLE_PRESS_SECS: f32 = 0.3;

struct Model {
    // Core components:
    params: ParamSnapshot,
    structural: StructuralKey,
    raw_speed: f32,
    posterize_idx: usize,

    rasterizer: LabelRasterizer,
    cache: TextureCache,
    scene: SceneInstance,
    backdrop: Backdrop,

    // Camera & pointer state:
    camera: OrbitCamera,
    last_mouse: Point2,
    last_primary_press: f32,

    // Comms components:
    osc_controller: OscController,

    // FPS
    last_update: Instant,
    fps: f32,

    debug_flag: bool,
}

fn main() {
    nannou::app(model).update(update).run();
}

fn model(app: &App) -> Model {
    // Load config
    let config = Config::load().expect("Failed to load config file");

    // Create OSC controller
    let osc_controller =
        OscController::new(config.osc.rx_port).expect("Failed to create OSC Controller");

    // Create window
    app.new_window()
        .title("typovis 0.1.0")
        .size(config.window.width, config.window.height)
        .view(view)
        .key_pressed(key_pressed)
        .mouse_pressed(mouse_pressed)
        .mouse_released(mouse_released)
        .mouse_moved(mouse_moved)
        .mouse_wheel(mouse_wheel)
        .resized(window_resized)
        .build()
        .unwrap();

    let rasterizer = LabelRasterizer::new(&config.resolve_font_path());

    let raw_speed = config.scene.raw_speed;
    let params = ParamSnapshot {
        text: config.scene.text.clone(),
        mode: SceneMode::from_name(&config.scene.mode).unwrap_or(SceneMode::Dials),
        seed: config.scene.seed,
        speed: ParamSnapshot::map_speed(raw_speed),
        phase: config.scene.phase,
        depth: config.scene.depth,
        rot_speed: config.scene.rot_speed,
        posterize: config.scene.posterize,
        accent_color: rgb(
            config.scene.accent_color[0],
            config.scene.accent_color[1],
            config.scene.accent_color[2],
        ),
        color_enabled: config.scene.color_enabled,
        speed_enabled: config.scene.speed_enabled,
        rotation_enabled: config.scene.rotation_enabled,
        wander_enabled: config.scene.wander_enabled,
        font_family: rasterizer.font_name.clone(),
    };
    let posterize_idx = POSTERIZE_STEPS
        .iter()
        .position(|&s| s >= params.posterize)
        .unwrap_or(POSTERIZE_STEPS.len() - 1);

    // Build the initial scene before the first frame
    let structural = params.structural_key();
    let mut cache = TextureCache::new();
    let mut scene = SceneInstance::new();
    let rect = app.window_rect();
    scene.rebuild(&params, &mut cache, &rasterizer, rect.w() / rect.h());

    let backdrop = Backdrop::new(rgb(
        config.style.background_color[0],
        config.style.background_color[1],
        config.style.background_color[2],
    ));

    Model {
        params,
        structural,
        raw_speed,
        posterize_idx,

        rasterizer,
        cache,
        scene,
        backdrop,

        camera: OrbitCamera::new(),
        last_mouse: pt2(0.0, 0.0),
        last_primary_press: -1.0,

        osc_controller,

        // FPS
        last_update: Instant::now(),
        fps: 0.0,

        debug_flag: false,
    }
}

fn update(app: &App, model: &mut Model, _update: Update) {
    let now = Instant::now();
    let duration = now - model.last_update;
    model.last_update = now;
    // FPS calculation
    if model.debug_flag {
        model.fps = 1.0 / duration.as_secs_f32();
    }

    // Process OSC messages
    model.osc_controller.process_messages();
    launch_commands(model);

    // Structural changes flush the texture cache and rebuild the scene
    // between frames.
    let key = model.params.structural_key();
    if key != model.structural {
        model.cache.clear_all();
        let rect = app.window_rect();
        model.scene.rebuild(
            &model.params,
            &mut model.cache,
            &model.rasterizer,
            rect.w() / rect.h(),
        );
        model.structural = key;
    }

    // Upload any new textures while the model is still mutable; the view
    // pass only borrows.
    let window = app.main_window();
    model.backdrop.ensure_gpu(&window);
    model.scene.ensure_gpu(&mut model.cache, &window);
}

// Draw the state of Model into the given Frame
fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let rect = app.window_rect();

    model.backdrop.draw(&draw, rect);
    model.scene.draw(
        &draw,
        &model.cache,
        &model.params,
        &model.camera,
        app.time,
        vec2(rect.w() / 2.0, rect.h() / 2.0),
    );

    // Visualize FPS (Optional)
    if model.debug_flag {
        draw.text(&format!(
            "FPS: {:.1}  mode: {}  blocks: {}",
            model.fps,
            model.params.mode.name(),
            model.scene.blocks.len()
        ))
        .x_y(rect.left() + 160.0, rect.top() - 20.0)
        .color(RED);
    }

    draw.to_frame(app, &frame).unwrap();
}

// ******************************* Input Handlers *****************************

fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    match key {
        // cycle through the visual modes
        Key::Space => {
            model.params.mode = model.params.mode.next();
        }
        Key::Key1 => model.params.mode = SceneMode::Dials,
        Key::Key2 => model.params.mode = SceneMode::ZRipple,
        Key::Key3 => model.params.mode = SceneMode::Pulsing,
        Key::Key4 => model.params.mode = SceneMode::SpiralWrap,
        Key::Key5 => model.params.mode = SceneMode::Radial,
        Key::Key6 => model.params.mode = SceneMode::Horizontal,
        Key::Key7 => model.params.mode = SceneMode::Ticker,
        Key::Key8 => model.params.mode = SceneMode::Matrix,
        Key::Key9 => model.params.mode = SceneMode::Fractal,
        Key::Key0 => model.params.mode = SceneMode::Snake,

        // cycle the posterize step table
        Key::P => {
            model.posterize_idx = (model.posterize_idx + 1) % POSTERIZE_STEPS.len();
            model.params.posterize = POSTERIZE_STEPS[model.posterize_idx];
        }
        Key::Up => {
            model.raw_speed = (model.raw_speed + 0.1).min(4.0);
            model.params.speed = ParamSnapshot::map_speed(model.raw_speed);
        }
        Key::Down => {
            model.raw_speed = (model.raw_speed - 0.1).max(0.0);
            model.params.speed = ParamSnapshot::map_speed(model.raw_speed);
        }
        Key::Right => set_rot_speed(model, model.params.rot_speed + 0.25),
        Key::Left => set_rot_speed(model, model.params.rot_speed - 0.25),
        Key::LBracket => model.params.phase = (model.params.phase - 0.02).max(0.0),
        Key::RBracket => model.params.phase = (model.params.phase + 0.02).min(1.0),
        Key::Minus => model.params.depth = (model.params.depth - 0.02).max(0.0),
        Key::Equals => model.params.depth = (model.params.depth + 0.02).min(1.0),
        Key::C => model.params.color_enabled = !model.params.color_enabled,
        Key::S => model.params.speed_enabled = !model.params.speed_enabled,
        Key::R => model.params.rotation_enabled = !model.params.rotation_enabled,
        Key::W => model.params.wander_enabled = !model.params.wander_enabled,
        Key::Home => model.camera.reset(),
        Key::D => {
            model.debug_flag = !model.debug_flag;
        }
        _ => (),
    }
}

/// Small magnitudes snap to a hard stop so the dial has a dead zone.
fn set_rot_speed(model: &mut Model, value: f32) {
    let value = value.clamp(-4.0, 4.0);
    model.params.rot_speed = if value.abs() < 0.2 { 0.0 } else { value };
}

fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    match button {
        MouseButton::Left => {
            if app.time - model.last_primary_press < DOUBLE_PRESS_SECS {
                model.camera.reset();
            }
            model.last_primary_press = app.time;
            model.camera.begin_rotate();
        }
        MouseButton::Right | MouseButton::Middle => model.camera.begin_pan(),
        _ => (),
    }
}

fn mouse_released(_app: &App, model: &mut Model, _button: MouseButton) {
    model.camera.end_drag();
}

fn mouse_moved(_app: &App, model: &mut Model, pos: Point2) {
    let delta = pos - model.last_mouse;
    model.last_mouse = pos;
    // nannou's y points up; drags use screen-down convention.
    model.camera.pointer_delta(delta.x, -delta.y);
}

fn mouse_wheel(_app: &App, model: &mut Model, delta: MouseScrollDelta, _phase: TouchPhase) {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => model.camera.zoom(y * 0.8),
        MouseScrollDelta::PixelDelta(pos) => model.camera.zoom(pos.y as f32 * 0.01),
    }
}

fn window_resized(app: &App, model: &mut Model, _dim: Vec2) {
    // Ring count and grid density depend on the viewport aspect.
    let rect = app.window_rect();
    model.scene.rebuild(
        &model.params,
        &mut model.cache,
        &model.rasterizer,
        rect.w() / rect.h(),
    );
}

// ******************************* OSC Launcher *******************************

fn launch_commands(model: &mut Model) {
    for command in model.osc_controller.take_commands() {
        match command {
            ParamCommand::SetText { text } => model.params.text = text,
            ParamCommand::SetMode { name } => {
                if let Some(mode) = SceneMode::from_name(&name) {
                    model.params.mode = mode;
                } else {
                    println!("unknown scene mode: {}", name);
                }
            }
            ParamCommand::SetSeed { seed } => model.params.seed = seed,
            ParamCommand::SetSpeed { raw } => {
                model.raw_speed = raw.clamp(0.0, 4.0);
                model.params.speed = ParamSnapshot::map_speed(model.raw_speed);
            }
            ParamCommand::SetPhase { phase } => model.params.phase = phase.clamp(0.0, 1.0),
            ParamCommand::SetDepth { depth } => model.params.depth = depth.clamp(0.0, 1.0),
            ParamCommand::SetRotSpeed { value } => set_rot_speed(model, value),
            ParamCommand::SetPosterize { steps } => model.params.posterize = steps.max(1.0),
            ParamCommand::SetAccent { r, g, b } => model.params.accent_color = rgb(r, g, b),
            ParamCommand::SetColorEnabled { on } => model.params.color_enabled = on,
            ParamCommand::SetSpeedEnabled { on } => model.params.speed_enabled = on,
            ParamCommand::SetRotationEnabled { on } => model.params.rotation_enabled = on,
            ParamCommand::SetWanderEnabled { on } => model.params.wander_enabled = on,
            ParamCommand::ResetCamera => model.camera.reset(),
        }
    }
}
