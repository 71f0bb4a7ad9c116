/*
 * Input Module
 *
 * Mouse handling for the viewer:
 * - Camera panning with mouse drag
 * - Camera zooming with mouse wheel
 * - Boid selection by clicking, resolved through the quadtree
 */

use nannou::prelude::*;
use nannou::winit::event::{MouseButton, MouseScrollDelta, TouchPhase, WindowEvent};
use quadboids::AgentId;

use super::app::Model;
use super::BOID_SIZE;

pub fn mouse_moved(_app: &App, model: &mut Model, pos: Point2) {
    let new_pos = Vec2::new(pos.x, pos.y);
    if model.camera.is_dragging {
        model.camera.drag(new_pos);
    }
    model.mouse_position = new_pos;
}

pub fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    if button != MouseButton::Left || model.egui.ctx().is_pointer_over_area() {
        return;
    }

    let world_pos = model.camera.screen_to_world(model.mouse_position, app.window_rect());
    // Selection area scales with zoom so boids stay clickable when small
    let pick_radius = BOID_SIZE * 2.0 / model.camera.zoom;

    match pick_agent(model, world_pos, pick_radius) {
        Some(id) => model.selected = Some(id),
        None => {
            model.camera.start_drag(model.mouse_position);
            model.options.follow_selected = false;
        }
    }
}

// Nearest agent to a world point, searched through the partition. Records
// trail the drawn positions by one step of motion.
fn pick_agent(model: &Model, world_pos: Vec2, radius: f32) -> Option<AgentId> {
    let scale = model.flock.config().scale;
    let x = scale.to_fixed(world_pos.x);
    let y = scale.to_fixed(world_pos.y);
    model
        .flock
        .tree()
        .query_radius(x, y, radius)
        .into_iter()
        .min_by_key(|record| record.distance_squared(x, y))
        .map(|record| record.id)
}

pub fn mouse_released(_app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left {
        model.camera.end_drag();
    }
}

pub fn mouse_wheel(app: &App, model: &mut Model, delta: MouseScrollDelta, _phase: TouchPhase) {
    let window_rect = app.window_rect();
    match delta {
        MouseScrollDelta::LineDelta(x, y) => {
            model.camera.zoom(vec2(x, y), model.mouse_position, window_rect);
        }
        MouseScrollDelta::PixelDelta(pos) => {
            model.camera.zoom(vec2(pos.x as f32, pos.y as f32) * 0.01, model.mouse_position, window_rect);
        }
    }
}

// Pass events to egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &WindowEvent) {
    model.egui.handle_raw_event(event);
}
