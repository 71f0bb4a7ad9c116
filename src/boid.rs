/*
 * Boid Module
 *
 * This module defines the Boid struct and its behavior.
 * Each boid follows three main rules:
 * 1. Separation: Avoid crowding neighbors
 * 2. Alignment: Steer towards the average heading of neighbors
 * 3. Cohesion: Steer towards the average position of neighbors
 *
 * All kinematic state is fixed-point (see the fixed module). y is the
 * vertical axis; the quadtree indexes the x/z ground plane.
 */

use std::f64::consts::TAU;
use std::sync::Arc;

use glam::{DVec3, I64Vec3, IVec3};
use rand::Rng;

use crate::fixed::{clamp_length, resize, FixedVec};
use crate::params::{half_world, BoidSettings};
use crate::quadtree::{AgentId, AgentRecord, QuadTree};

// Distance floor for inverse-distance weighting, in fixed units
const SEPARATION_EPSILON: f64 = 1e-4;

// Tolerance on the field-of-view cosine comparison
const FOV_EPSILON: f64 = 1e-9;

// Kinematic snapshot of another agent, as seen by a boid computing forces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor {
    pub position: IVec3,
    pub velocity: IVec3,
}

// Resolves quadtree record ids back to agent state
pub trait NeighborSource {
    fn neighbor(&self, id: AgentId) -> Option<Neighbor>;
}

#[derive(Debug, Clone)]
pub struct Boid {
    id: AgentId,
    pub position: IVec3,
    pub velocity: IVec3,
    acceleration: IVec3,
    settings: Arc<BoidSettings>,
}

impl Boid {
    // Random heading on the ground plane at max speed
    pub fn new<R: Rng>(
        id: AgentId,
        position: IVec3,
        settings: Arc<BoidSettings>,
        rng: &mut R,
    ) -> Self {
        let angle = rng.gen_range(0.0..TAU);
        let heading = DVec3::new(angle.cos(), 0.0, angle.sin());
        let velocity = resize(heading, settings.max_speed_fixed());
        Self::with_velocity(id, position, velocity, settings)
    }

    pub fn with_velocity(
        id: AgentId,
        position: IVec3,
        velocity: IVec3,
        settings: Arc<BoidSettings>,
    ) -> Self {
        Self {
            id,
            position,
            velocity,
            acceleration: IVec3::ZERO,
            settings,
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn acceleration(&self) -> IVec3 {
        self.acceleration
    }

    pub fn settings(&self) -> &Arc<BoidSettings> {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Arc<BoidSettings>) {
        self.settings = settings;
    }

    // Quadtree entry for the current position
    pub fn record(&self) -> AgentRecord {
        AgentRecord::new(self.id, self.position.x, self.position.z)
    }

    pub fn as_neighbor(&self) -> Neighbor {
        Neighbor {
            position: self.position,
            velocity: self.velocity,
        }
    }

    // Apply a force to the boid
    pub fn apply_force(&mut self, force: IVec3) {
        self.acceleration = self.acceleration.saturating_add(force);
    }

    // Query the tree, drop self and anything outside the field of view
    pub fn nearby<S: NeighborSource + ?Sized>(&self, tree: &QuadTree, source: &S) -> Vec<Neighbor> {
        let me = self.record();
        tree.query_radius_fixed(me.x, me.y, self.settings.search_radius_fixed())
            .into_iter()
            .filter(|record| record.id != self.id)
            .filter_map(|record| source.neighbor(record.id))
            .filter(|other| self.is_in_field_of_view(other.position))
            .collect()
    }

    // Weighted sum of the three steering rules; does not touch self
    pub fn flocking_force<S: NeighborSource + ?Sized>(&self, tree: &QuadTree, source: &S) -> IVec3 {
        let nearby = self.nearby(tree, source);
        let sum = self.alignment(&nearby).scaled(self.settings.alignment_weight()).as_i64vec3()
            + self.cohesion(&nearby).scaled(self.settings.cohesion_weight()).as_i64vec3()
            + self.separation(&nearby).scaled(self.settings.separation_weight()).as_i64vec3();
        sum.clamp(I64Vec3::splat(i32::MIN as i64), I64Vec3::splat(i32::MAX as i64))
            .as_ivec3()
    }

    pub fn flock<S: NeighborSource + ?Sized>(&mut self, tree: &QuadTree, source: &S) {
        let force = self.flocking_force(tree, source);
        self.apply_force(force);
    }

    // Reynolds steering: desired velocity minus current, clamped to max force
    fn steer_towards(&self, direction: DVec3) -> IVec3 {
        if direction == DVec3::ZERO {
            return IVec3::ZERO;
        }
        let desired = resize(direction, self.settings.max_speed_fixed());
        clamp_length(desired.as_dvec3() - self.velocity.as_dvec3(), self.settings.max_force_fixed())
    }

    // Steer towards the average heading of neighbors
    pub fn alignment(&self, nearby: &[Neighbor]) -> IVec3 {
        if nearby.is_empty() {
            return IVec3::ZERO;
        }
        let heading: DVec3 = nearby.iter().map(|n| n.velocity.as_dvec3()).sum();
        self.steer_towards(heading / nearby.len() as f64)
    }

    // Steer towards the centroid of neighbors
    pub fn cohesion(&self, nearby: &[Neighbor]) -> IVec3 {
        if nearby.is_empty() {
            return IVec3::ZERO;
        }
        let sum: DVec3 = nearby.iter().map(|n| n.position.as_dvec3()).sum();
        let centroid = sum / nearby.len() as f64;
        self.steer_towards(centroid - self.position.as_dvec3())
    }

    // Steer away from neighbors inside the separation radius, each weighted
    // by inverse distance
    pub fn separation(&self, nearby: &[Neighbor]) -> IVec3 {
        let radius = self.settings.separation_radius_fixed();
        let mut steering = DVec3::ZERO;
        let mut count = 0;

        for other in nearby {
            let diff = (self.position.as_i64vec3() - other.position.as_i64vec3()).as_dvec3();
            let distance = diff.length();
            if distance < radius {
                steering += diff.normalize_or_zero() / distance.max(SEPARATION_EPSILON);
                count += 1;
            }
        }

        if count == 0 {
            return IVec3::ZERO;
        }
        self.steer_towards(steering / count as f64)
    }

    // Angle between heading and the offset to `other` is within half the
    // field of view. A stationary boid, or a coincident neighbor, always passes.
    pub fn is_in_field_of_view(&self, other: IVec3) -> bool {
        if self.velocity == IVec3::ZERO {
            return true;
        }
        let offset = (other.as_i64vec3() - self.position.as_i64vec3()).as_dvec3();
        let distance = offset.length();
        if distance == 0.0 {
            return true;
        }
        let heading = self.velocity.as_dvec3();
        let cos_angle = heading.dot(offset) / (heading.length() * distance);
        cos_angle >= self.settings.cos_half_fov() - FOV_EPSILON
    }

    // Explicit Euler step of one tick
    pub fn update_movement(&mut self) {
        self.velocity = clamp_length(
            self.velocity.as_dvec3() + self.acceleration.as_dvec3(),
            self.settings.max_speed_fixed(),
        );
        self.position += self.velocity;
        self.acceleration = IVec3::ZERO;
    }

    // World size in world units; the bound is half of it in fixed units
    pub fn wrap_position(&mut self, world_size: f32) {
        self.wrap_to(half_world(world_size, self.settings.scale()));
    }

    // Toroidal wrap into [-half, half]; one full range shift at most
    pub fn wrap_to(&mut self, half: i32) {
        let range = half * 2;
        for axis in 0..3 {
            let c = self.position[axis];
            if c > half {
                self.position[axis] = c - range;
            } else if c < -half {
                self.position[axis] = c + range;
            }
        }
    }
}
