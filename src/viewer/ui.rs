/*
 * UI Module
 *
 * The egui control panel. Sliders edit a BoidParams copy held by the model;
 * the app turns a changed copy into new settings. The panel reports what
 * changed and leaves acting on it to the app.
 */

use nannou_egui::egui;
use quadboids::{BoidParams, WorldConfig};

use super::app::{Model, ViewOptions};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiActions {
    pub reset_boids: bool,
    pub num_boids_changed: bool,
    pub params_changed: bool,
    pub reset_camera: bool,
}

pub fn update_ui(model: &mut Model) -> UiActions {
    let mut actions = UiActions::default();
    let params_before = model.params;
    let num_boids_before = model.num_boids;

    let stats = *model.flock.last_stats();
    let world_size = model.flock.config().world_size;
    let agent_count = model.flock.len();
    let selected = model.selected.and_then(|id| model.flock.view(id));

    let params = &mut model.params;
    let num_boids = &mut model.num_boids;
    let options = &mut model.options;
    let camera = &model.camera;
    let settings_error = model.settings_error.as_deref();
    let fps = model.fps;
    let ticks_last_frame = model.ticks_last_frame;

    let ctx = model.egui.begin_frame();

    egui::Window::new("Simulation Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Boid Parameters", |ui| {
                ui.add(egui::Slider::new(&mut *num_boids, WorldConfig::get_num_boids_range()).text("Number of Boids"));
                if ui.button("Reset Boids").clicked() {
                    actions.reset_boids = true;
                }
                ui.add(egui::Slider::new(&mut params.max_speed, BoidParams::max_speed_range()).text("Max Speed"));
                ui.add(egui::Slider::new(&mut params.max_force, BoidParams::max_force_range()).text("Max Force"));
            });

            ui.collapsing("Flocking Behavior", |ui| {
                ui.add(egui::Slider::new(&mut params.separation_weight, BoidParams::weight_range()).text("Separation Weight"));
                ui.add(egui::Slider::new(&mut params.alignment_weight, BoidParams::weight_range()).text("Alignment Weight"));
                ui.add(egui::Slider::new(&mut params.cohesion_weight, BoidParams::weight_range()).text("Cohesion Weight"));
                ui.add(egui::Slider::new(&mut params.search_radius, BoidParams::radius_range()).text("Search Radius"));
                ui.add(egui::Slider::new(&mut params.separation_radius, BoidParams::radius_range()).text("Separation Radius"));
                ui.add(egui::Slider::new(&mut params.field_of_view, BoidParams::field_of_view_range()).text("Field of View"));
                if let Some(message) = settings_error {
                    ui.colored_label(egui::Color32::LIGHT_RED, message);
                }
            });

            ui.collapsing("Camera Controls", |ui| {
                ui.label("Zoom: mouse wheel or trackpad pinch");
                ui.label("Pan: click and drag empty space");
                ui.label("Select: click a boid");
                ui.checkbox(&mut options.follow_selected, "Follow Selected Boid");
                if ui.button("Reset Camera").clicked() {
                    actions.reset_camera = true;
                }
                ui.label(format!("Zoom Level: {:.2}x", camera.zoom));
                ui.label(format!("Camera Position: ({:.1}, {:.1})", camera.position.x, camera.position.y));
            });

            ui.collapsing("Quadtree", |ui| {
                ui.checkbox(&mut options.show_tree, "Show Quadtree");
                ui.checkbox(&mut options.show_radii, "Show Selected Radii");
                ui.label(format!("Nodes: {} ({} leaves)", stats.node_count, stats.leaf_count));
                ui.label(format!("Records: {}", stats.record_count));
                ui.label(format!("Max Depth: {}", stats.max_depth));
                ui.label(format!("Rejected Inserts: {}", stats.rejected_inserts));
            });

            ui.collapsing("Performance", |ui| {
                ui.checkbox(&mut options.parallel, "Parallel Flocking");
                ui.add(
                    egui::Slider::new(&mut options.ticks_per_second, ViewOptions::get_ticks_per_second_range())
                        .text("Ticks per Second"),
                );
                ui.separator();
                ui.label(format!("FPS: {:.1}", fps));
                ui.label(format!("Ticks this frame: {}", ticks_last_frame));
                ui.label(format!("Tick: {}", stats.tick));
                ui.label(format!("Tick time: {:.2} ms", stats.frame_time_ms()));
                ui.label(format!(
                    "Rebuild / Flock / Integrate: {:.2} / {:.2} / {:.2} ms",
                    stats.rebuild_time.as_secs_f64() * 1000.0,
                    stats.flock_time.as_secs_f64() * 1000.0,
                    stats.integrate_time.as_secs_f64() * 1000.0,
                ));
                ui.label(format!("Total Boids: {}", agent_count));
                ui.label(format!("World Size: {:.0}x{:.0}", world_size, world_size));
            });

            if let Some(agent) = selected {
                ui.separator();
                ui.label(format!("Selected {}", agent.id));
                ui.label(format!("Position: ({:.2}, {:.2})", agent.position.x, agent.position.z));
                ui.label(format!("Speed: {:.2}", agent.velocity.length()));
            }

            ui.checkbox(&mut options.pause_simulation, "Pause Simulation");
        });

    actions.params_changed = model.params != params_before;
    actions.num_boids_changed = model.num_boids != num_boids_before;
    actions
}
