/*
 * Quadtree Boid Simulation
 *
 * This application runs a fixed-point flocking simulation in which each boid
 * finds its neighbors through a quadtree rebuilt every tick. Boids follow
 * three rules:
 * 1. Separation: Avoid crowding neighbors
 * 2. Alignment: Steer towards the average heading of neighbors
 * 3. Cohesion: Steer towards the average position of neighbors
 *
 * Interactive sliders adjust the parameters in real time; the quadtree and
 * a selected boid's neighborhood can be drawn on top.
 *
 * Logging goes through tracing; set RUST_LOG (e.g. RUST_LOG=quadboids=debug)
 * to see per-tick statistics.
 */

mod viewer;

use tracing_subscriber::EnvFilter;

fn main() {
    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    nannou::app(viewer::app::model)
        .update(viewer::app::update)
        .run();
}
