/*
 * Camera Module
 *
 * Zooming and panning over the ground plane. World coordinates are the
 * simulation's world units with the agent's z axis drawn as screen y.
 */

use nannou::prelude::*;

// Share of the window the world occupies after a fit
const FIT_MARGIN: f32 = 0.9;

pub struct Camera {
    pub position: Vec2,
    pub zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub is_dragging: bool,
    pub last_cursor_pos: Vec2,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.05,
            max_zoom: 50.0,
            is_dragging: false,
            last_cursor_pos: Vec2::ZERO,
        }
    }

    // Center on the origin with the whole world in view
    pub fn fit(&mut self, world_size: f32, window_rect: Rect) {
        let span = window_rect.w().min(window_rect.h()) * FIT_MARGIN;
        self.position = Vec2::ZERO;
        self.zoom = (span / world_size).clamp(self.min_zoom, self.max_zoom);
    }

    // Convert a point from world space to screen space
    pub fn world_to_screen(&self, point: Vec2, window_rect: Rect) -> Vec2 {
        (point - self.position) * self.zoom + window_rect.xy()
    }

    // Convert a point from screen space to world space
    pub fn screen_to_world(&self, point: Vec2, window_rect: Rect) -> Vec2 {
        (point - window_rect.xy()) / self.zoom + self.position
    }

    // World-space rectangle currently on screen
    pub fn visible_area(&self, window_rect: Rect) -> Rect {
        let bottom_left = self.screen_to_world(pt2(window_rect.left(), window_rect.bottom()), window_rect);
        let top_right = self.screen_to_world(pt2(window_rect.right(), window_rect.top()), window_rect);
        Rect::from_corners(bottom_left, top_right)
    }

    // Zoom around the cursor so the world point under it stays put
    pub fn zoom(&mut self, scroll_delta: Vec2, cursor_position: Vec2, window_rect: Rect) {
        let zoom_factor = 1.0 + scroll_delta.y * 0.1;
        let cursor_world_before = self.screen_to_world(cursor_position, window_rect);
        self.zoom = (self.zoom * zoom_factor).clamp(self.min_zoom, self.max_zoom);
        let cursor_world_after = self.screen_to_world(cursor_position, window_rect);
        self.position += cursor_world_before - cursor_world_after;
    }

    pub fn start_drag(&mut self, position: Vec2) {
        self.last_cursor_pos = position;
        self.is_dragging = true;
    }

    // Move by the delta since the last cursor event
    pub fn drag(&mut self, position: Vec2) {
        if !self.is_dragging {
            return;
        }
        let delta = position - self.last_cursor_pos;
        if delta.length_squared() > 0.0 {
            self.position -= delta / self.zoom;
            self.last_cursor_pos = position;
        }
    }

    pub fn end_drag(&mut self) {
        self.is_dragging = false;
    }

    pub fn follow(&mut self, target: Vec2) {
        self.position = target;
    }
}
