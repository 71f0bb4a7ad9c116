/*
 * Renderer Module
 *
 * Draws one frame from a read-only look at the flock:
 * - World boundary and quadtree node outlines
 * - Every boid inside the visible area, as a triangle along its heading
 * - For the selected boid, its search and separation radii, a velocity
 *   arrow and lines to the neighbors it currently steers by
 */

use nannou::prelude::*;
use quadboids::{AgentId, AgentView, Flock, QuadTree};
use tracing::error;

use super::app::Model;
use super::camera::Camera;
use super::BOID_SIZE;

pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(BLACK);

    let window_rect = app.window_rect();
    let camera = &model.camera;
    let flock = &model.flock;

    // World boundary
    let half = flock.config().world_size / 2.0;
    let world = Rect::from_x_y_w_h(0.0, 0.0, half * 2.0, half * 2.0);
    outline_world_rect(&draw, camera, window_rect, world, rgba(0.3, 0.3, 0.3, 1.0));

    // Cull with a margin so boids on the edge don't pop
    let margin = BOID_SIZE * 2.0 / camera.zoom;
    let visible = camera.visible_area(window_rect).pad(-margin);

    if model.options.show_tree {
        draw_tree(&draw, camera, window_rect, visible, flock.tree());
    }

    for agent in flock.views() {
        let pos = vec2(agent.position.x, agent.position.z);
        if !visible.contains(pos) {
            continue;
        }
        let selected = model.selected == Some(agent.id);
        draw_boid(&draw, camera, window_rect, &agent, selected);
    }

    if let Some(id) = model.selected {
        if model.options.show_radii {
            draw_selection(&draw, camera, window_rect, flock, id);
        }
    }

    if let Err(err) = draw.to_frame(app, &frame) {
        error!(?err, "failed to draw frame");
    }
    if let Err(err) = model.egui.draw_to_frame(&frame) {
        error!(?err, "failed to draw ui");
    }
}

// Outline of a world-space rectangle
fn outline_world_rect(draw: &Draw, camera: &Camera, window_rect: Rect, world: Rect, color: Rgba) {
    let bottom_left = camera.world_to_screen(vec2(world.left(), world.bottom()), window_rect);
    let top_right = camera.world_to_screen(vec2(world.right(), world.top()), window_rect);
    let screen = Rect::from_corners(bottom_left, top_right);
    draw.rect()
        .xy(screen.xy())
        .wh(screen.wh())
        .no_fill()
        .stroke_weight(1.0)
        .stroke(color);
}

// Node outlines, fainter with depth; nodes off screen are skipped
fn draw_tree(draw: &Draw, camera: &Camera, window_rect: Rect, visible: Rect, tree: &QuadTree) {
    let scale = tree.scale();
    tree.for_each_node(|depth, node| {
        let region = node.region();
        let world = Rect::from_corners(
            vec2(scale.to_world(region.min_x()), scale.to_world(region.min_y())),
            vec2(scale.to_world(region.max_x()), scale.to_world(region.max_y())),
        );
        if world.overlap(visible).is_none() {
            return;
        }
        let alpha = (0.6 - depth as f32 * 0.06).max(0.15);
        outline_world_rect(draw, camera, window_rect, world, rgba(0.2, 0.6, 0.9, alpha));
    });
}

fn draw_boid(draw: &Draw, camera: &Camera, window_rect: Rect, agent: &AgentView, selected: bool) {
    let screen_pos = camera.world_to_screen(vec2(agent.position.x, agent.position.z), window_rect);
    let angle = agent.velocity.z.atan2(agent.velocity.x);
    let size = if selected { BOID_SIZE * 1.5 } else { BOID_SIZE };
    let color = if selected { rgb(1.0, 0.85, 0.2) } else { rgb(0.86, 0.86, 0.86) };

    let points = [pt2(size, 0.0), pt2(-size, size / 2.0), pt2(-size, -size / 2.0)];
    draw.polygon()
        .color(color)
        .points(points)
        .xy(screen_pos)
        .rotate(angle);
}

fn draw_selection(draw: &Draw, camera: &Camera, window_rect: Rect, flock: &Flock, id: AgentId) {
    let Some(boid) = flock.get(id) else {
        return;
    };
    let scale = flock.config().scale;
    let settings = boid.settings();
    let params = settings.params();

    let world_pos = scale.vec_to_world(boid.position);
    let screen_pos = camera.world_to_screen(vec2(world_pos.x, world_pos.z), window_rect);

    // Search radius
    draw.ellipse()
        .xy(screen_pos)
        .radius(params.search_radius * camera.zoom)
        .no_fill()
        .stroke(GREEN)
        .stroke_weight(1.0);

    // Separation radius
    draw.ellipse()
        .xy(screen_pos)
        .radius(params.separation_radius * camera.zoom)
        .no_fill()
        .stroke(RED)
        .stroke_weight(1.0);

    // Neighbors the boid actually sees
    let record = boid.record();
    for found in flock.tree().query_radius_fixed(record.x, record.y, settings.search_radius_fixed()) {
        if found.id == id {
            continue;
        }
        let Some(other) = flock.get(found.id) else {
            continue;
        };
        if !boid.is_in_field_of_view(other.position) {
            continue;
        }
        let other_pos = scale.vec_to_world(other.position);
        draw.line()
            .start(screen_pos)
            .end(camera.world_to_screen(vec2(other_pos.x, other_pos.z), window_rect))
            .color(rgba(0.4, 0.9, 0.4, 0.6))
            .stroke_weight(1.0);
    }

    // Velocity vector, stretched so slow boids still show a heading
    let velocity = scale.vec_to_world(boid.velocity);
    draw.arrow()
        .start(screen_pos)
        .end(screen_pos + vec2(velocity.x, velocity.z) * 10.0 * camera.zoom)
        .color(YELLOW)
        .stroke_weight(2.0);
}
