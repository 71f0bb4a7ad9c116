/*
 * Application Module
 *
 * The nannou model wrapping one Flock. The viewer never touches agent
 * state directly: it reads snapshots through the flock's accessors and
 * replaces settings through `Flock::set_settings`.
 *
 * Physics runs on a fixed timestep. Each frame adds its elapsed time to an
 * accumulator and runs as many ticks as fit, capped so a slow frame cannot
 * snowball into a longer one.
 */

use std::time::{Duration, Instant};

use nannou::prelude::*;
use nannou_egui::Egui;
use quadboids::{AgentId, BoidParams, BoidSettings, Flock, FlockError, TracingObserver, WorldConfig};
use tracing::{error, info, warn};

use super::camera::Camera;
use super::input::{mouse_moved, mouse_pressed, mouse_released, mouse_wheel, raw_window_event};
use super::renderer::view;
use super::ui;

// Upper bound on ticks run in a single frame
const MAX_TICKS_PER_FRAME: u32 = 4;

// Tick statistics are logged this often
const LOG_INTERVAL: u64 = 120;

// One tick is one step of motion with no frame delta, so the per-second
// defaults are divided down to a 60 Hz step
fn viewer_params() -> BoidParams {
    let defaults = BoidParams::default();
    BoidParams {
        max_speed: defaults.max_speed / 60.0,
        max_force: defaults.max_force / 20.0,
        ..defaults
    }
}

// Viewer-only switches, none of which affect the simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOptions {
    pub show_tree: bool,
    pub show_radii: bool,
    pub follow_selected: bool,
    pub pause_simulation: bool,
    pub parallel: bool,
    pub ticks_per_second: f32,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            show_tree: true,
            show_radii: true,
            follow_selected: false,
            pause_simulation: false,
            parallel: false,
            ticks_per_second: 60.0,
        }
    }
}

impl ViewOptions {
    pub fn get_ticks_per_second_range() -> std::ops::RangeInclusive<f32> {
        1.0..=120.0
    }
}

pub struct Model {
    pub flock: Flock,
    pub params: BoidParams,
    pub num_boids: usize,
    pub options: ViewOptions,
    pub egui: Egui,
    pub camera: Camera,
    pub mouse_position: Vec2,
    pub selected: Option<AgentId>,
    pub settings_error: Option<String>,
    pub fps: f32,
    pub ticks_last_frame: u32,
    pub tick_accumulator: Duration,
    pub last_update_time: Instant,
}

impl Model {
    pub fn tick_step(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.options.ticks_per_second)
    }
}

pub fn model(app: &App) -> Model {
    let (window_width, window_height) = match app.primary_monitor() {
        Some(monitor) => {
            let size = monitor.size();
            (size.width as f32 * 0.8, size.height as f32 * 0.8)
        }
        None => (1280.0, 800.0),
    };

    let window_id = match app
        .new_window()
        .title("Quadtree Boids")
        .size(window_width as u32, window_height as u32)
        .view(view)
        .mouse_moved(mouse_moved)
        .mouse_pressed(mouse_pressed)
        .mouse_released(mouse_released)
        .mouse_wheel(mouse_wheel)
        .raw_event(raw_window_event)
        .build()
    {
        Ok(id) => id,
        Err(err) => {
            error!(?err, "failed to open window");
            std::process::exit(1);
        }
    };
    let Some(window) = app.window(window_id) else {
        error!("window closed during startup");
        std::process::exit(1);
    };
    let egui = Egui::from_window(&window);

    let config = WorldConfig {
        initial_boids: 300,
        ..WorldConfig::default()
    };
    let flock = match BoidSettings::new(viewer_params(), config.scale)
        .map_err(FlockError::from)
        .and_then(|settings| Flock::new(config, settings))
    {
        Ok(flock) => flock.with_observer(Box::new(TracingObserver::new(LOG_INTERVAL))),
        Err(err) => {
            error!(%err, "invalid world configuration");
            std::process::exit(1);
        }
    };

    let mut camera = Camera::new();
    camera.fit(config.world_size, window.rect());

    info!(boids = flock.len(), "viewer ready");

    Model {
        params: *flock.settings().params(),
        num_boids: flock.len(),
        options: ViewOptions {
            parallel: config.parallel,
            ..ViewOptions::default()
        },
        flock,
        egui,
        camera,
        mouse_position: Vec2::ZERO,
        selected: None,
        settings_error: None,
        fps: 0.0,
        ticks_last_frame: 0,
        tick_accumulator: Duration::ZERO,
        last_update_time: Instant::now(),
    }
}

pub fn update(app: &App, model: &mut Model, _update: Update) {
    model.fps = app.fps();

    let actions = ui::update_ui(model);

    if actions.params_changed {
        apply_params(model);
    }
    if actions.reset_boids {
        model.flock.reset();
        model.flock.resize(model.num_boids);
        model.selected = None;
    } else if actions.num_boids_changed {
        model.flock.resize(model.num_boids);
    }
    if actions.reset_camera {
        model.camera.fit(model.flock.config().world_size, app.window_rect());
    }
    model.flock.set_parallel(model.options.parallel);

    let now = Instant::now();
    let elapsed = now.duration_since(model.last_update_time);
    model.last_update_time = now;

    model.ticks_last_frame = 0;
    if model.options.pause_simulation {
        model.tick_accumulator = Duration::ZERO;
    } else {
        model.tick_accumulator += elapsed;
        let step = model.tick_step();
        while model.tick_accumulator >= step && model.ticks_last_frame < MAX_TICKS_PER_FRAME {
            model.flock.tick();
            model.tick_accumulator -= step;
            model.ticks_last_frame += 1;
        }
        // Drop whatever the cap left behind
        if model.ticks_last_frame == MAX_TICKS_PER_FRAME {
            model.tick_accumulator = Duration::ZERO;
        }
    }

    // A removed or reset agent clears the selection
    if let Some(id) = model.selected {
        match model.flock.view(id) {
            Some(agent) if model.options.follow_selected => {
                model.camera.follow(vec2(agent.position.x, agent.position.z));
            }
            Some(_) => {}
            None => model.selected = None,
        }
    }
}

// Rebuild settings from the sliders; invalid combinations keep the old ones
fn apply_params(model: &mut Model) {
    let scale = model.flock.config().scale;
    let result = BoidSettings::new(model.params, scale)
        .map_err(FlockError::from)
        .and_then(|settings| model.flock.set_settings(settings));
    match result {
        Ok(()) => model.settings_error = None,
        Err(err) => {
            warn!(%err, "rejected boid parameters");
            model.settings_error = Some(err.to_string());
        }
    }
}
