/*
 * Viewer
 *
 * nannou window and egui panel on top of the simulation core. Nothing in
 * here mutates agents except through the Flock's public API.
 */

pub mod app;
pub mod camera;
pub mod input;
pub mod renderer;
pub mod ui;

// Boid triangle half-length in pixels
pub const BOID_SIZE: f32 = 6.0;
