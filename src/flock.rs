/*
 * Flock Module
 *
 * The simulation orchestrator. It owns every boid and the quadtree, and
 * runs one tick as three passes:
 * 1. Rebuild: clear the tree and insert every boid's current position
 * 2. Flock: each boid queries the tree and computes its steering force
 * 3. Integrate: move, clamp speed, wrap around the world edges
 *
 * Every insert finishes before any query, and every force is computed from
 * the same snapshot before anyone moves. With `parallel` enabled the flock
 * pass runs on rayon while the tree and boid list are read-only.
 */

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use glam::{IVec3, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::boid::{Boid, Neighbor, NeighborSource};
use crate::debug::{TickObserver, TickStats};
use crate::error::FlockError;
use crate::fixed::FixedVec;
use crate::params::{BoidSettings, WorldConfig};
use crate::quadtree::{AgentId, QuadTree};

// Read-only view of one agent in world units, for renderers and tooling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentView {
    pub id: AgentId,
    pub position: Vec3,
    pub velocity: Vec3,
}

// Id lookup over the boid list, valid for one flock pass
struct BoidIndex<'a> {
    boids: &'a [Boid],
    slots: &'a HashMap<AgentId, usize>,
}

impl NeighborSource for BoidIndex<'_> {
    fn neighbor(&self, id: AgentId) -> Option<Neighbor> {
        self.slots
            .get(&id)
            .and_then(|&slot| self.boids.get(slot))
            .map(Boid::as_neighbor)
    }
}

pub struct Flock {
    boids: Vec<Boid>,
    slots: HashMap<AgentId, usize>,
    tree: QuadTree,
    settings: Arc<BoidSettings>,
    config: WorldConfig,
    next_id: u32,
    rng: StdRng,
    tick: u64,
    last_stats: TickStats,
    observer: Option<Box<dyn TickObserver>>,
}

impl Flock {
    pub fn new(config: WorldConfig, settings: BoidSettings) -> Result<Self, FlockError> {
        config.validate()?;
        check_scale(&config, &settings)?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut flock = Self {
            boids: Vec::with_capacity(config.initial_boids),
            slots: HashMap::with_capacity(config.initial_boids),
            tree: QuadTree::covering(config.half_world(), config.capacity, config.scale),
            settings: Arc::new(settings),
            config,
            next_id: 0,
            rng,
            tick: 0,
            last_stats: TickStats::default(),
            observer: None,
        };
        flock.seed_boids();

        info!(
            boids = flock.boids.len(),
            world_size = config.world_size,
            root_half_size = flock.tree.region().half_size,
            capacity = config.capacity,
            "created flock"
        );
        Ok(flock)
    }

    pub fn with_observer(mut self, observer: Box<dyn TickObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    // Run one full simulation step
    pub fn tick(&mut self) -> TickStats {
        let start = Instant::now();
        let rejected = self.rebuild_partition();
        let rebuilt = Instant::now();
        self.flock_all();
        let flocked = Instant::now();
        self.integrate();
        let done = Instant::now();

        self.tick += 1;
        let shape = self.tree.stats();
        let stats = TickStats {
            tick: self.tick,
            agent_count: self.boids.len(),
            node_count: shape.nodes,
            leaf_count: shape.leaves,
            record_count: shape.records,
            max_depth: shape.max_depth,
            rejected_inserts: rejected,
            rebuild_time: rebuilt - start,
            flock_time: flocked - rebuilt,
            integrate_time: done - flocked,
            frame_time: done - start,
        };

        if let Some(observer) = self.observer.as_mut() {
            observer.on_tick(&stats);
        }
        self.last_stats = stats;
        stats
    }

    // Clear and refill the quadtree; returns how many records it refused
    pub fn rebuild_partition(&mut self) -> usize {
        self.tree.clear();
        let mut rejected = 0;
        for boid in &self.boids {
            if !self.tree.insert(boid.record()) {
                warn!(id = %boid.id(), x = boid.position.x, z = boid.position.z, "boid outside quadtree root");
                rejected += 1;
            }
        }
        debug!(records = self.boids.len() - rejected, rejected, "rebuilt quadtree");
        rejected
    }

    // Compute every force against the current tree, then apply them all
    pub fn flock_all(&mut self) {
        let forces: Vec<IVec3> = {
            let tree = &self.tree;
            let index = BoidIndex {
                boids: &self.boids,
                slots: &self.slots,
            };
            if self.config.parallel {
                self.boids
                    .par_iter()
                    .map(|boid| boid.flocking_force(tree, &index))
                    .collect()
            } else {
                self.boids
                    .iter()
                    .map(|boid| boid.flocking_force(tree, &index))
                    .collect()
            }
        };

        for (boid, force) in self.boids.iter_mut().zip(forces) {
            boid.apply_force(force);
        }
    }

    pub fn integrate(&mut self) {
        let world_size = self.config.world_size;
        for boid in &mut self.boids {
            boid.update_movement();
            boid.wrap_position(world_size);
        }
    }

    // Random position inside the world, random heading
    pub fn add_boid(&mut self) -> AgentId {
        let half = self.config.world_size / 2.0;
        let x = self.rng.gen_range(-half..half);
        let z = self.rng.gen_range(-half..half);
        let position = self.config.scale.vec_to_fixed(Vec3::new(x, 0.0, z));

        let id = self.allocate_id();
        let boid = Boid::new(id, position, Arc::clone(&self.settings), &mut self.rng);
        self.push(boid);
        id
    }

    // World units; the position is wrapped into the world and the velocity
    // clamped to max speed. Positions beyond the root region are pulled onto
    // its edge first, so a single wrap always lands inside.
    pub fn add_boid_at(&mut self, position: Vec3, velocity: Vec3) -> AgentId {
        let scale = self.config.scale;
        let id = self.allocate_id();
        let bound = IVec3::splat(self.tree.region().half_size);
        let position = scale.vec_to_fixed(position).clamp(-bound, bound);
        let velocity = scale
            .vec_to_fixed(velocity)
            .limit_length(self.settings.max_speed_fixed());
        let mut boid = Boid::with_velocity(id, position, velocity, Arc::clone(&self.settings));
        boid.wrap_to(self.config.half_world());
        self.push(boid);
        id
    }

    pub fn remove_boid(&mut self, id: AgentId) -> Result<Boid, FlockError> {
        let slot = self.slots.remove(&id).ok_or(FlockError::UnknownAgent(id))?;
        let removed = self.boids.swap_remove(slot);
        if let Some(moved) = self.boids.get(slot) {
            self.slots.insert(moved.id(), slot);
        }
        Ok(removed)
    }

    // Drop every boid and seed `initial_boids` fresh ones; ids keep counting up
    pub fn reset(&mut self) {
        self.boids.clear();
        self.slots.clear();
        self.tree.clear();
        self.seed_boids();
        info!(boids = self.boids.len(), "reset flock");
    }

    // Grow or shrink to `count` boids. Shrinking keeps the `count` oldest
    // (lowest ids), whatever order earlier removals left the storage in.
    pub fn resize(&mut self, count: usize) {
        if self.boids.len() > count {
            let mut ids: Vec<AgentId> = self.boids.iter().map(Boid::id).collect();
            ids.sort_unstable();
            let cutoff = ids[count];
            self.boids.retain(|boid| boid.id() < cutoff);
            self.slots = self
                .boids
                .iter()
                .enumerate()
                .map(|(slot, boid)| (boid.id(), slot))
                .collect();
            debug!(boids = self.boids.len(), "shrank flock");
        }
        while self.boids.len() < count {
            self.add_boid();
        }
    }

    // Swap in a new immutable settings value for every boid
    pub fn set_settings(&mut self, settings: BoidSettings) -> Result<(), FlockError> {
        check_scale(&self.config, &settings)?;
        self.settings = Arc::new(settings);
        for boid in &mut self.boids {
            boid.set_settings(Arc::clone(&self.settings));
        }
        info!(params = ?self.settings.params(), "applied boid settings");
        Ok(())
    }

    pub fn set_parallel(&mut self, parallel: bool) {
        self.config.parallel = parallel;
    }

    pub fn get(&self, id: AgentId) -> Option<&Boid> {
        self.slots.get(&id).and_then(|&slot| self.boids.get(slot))
    }

    pub fn view(&self, id: AgentId) -> Option<AgentView> {
        self.get(id).map(|boid| self.to_view(boid))
    }

    pub fn views(&self) -> impl Iterator<Item = AgentView> + '_ {
        self.boids.iter().map(|boid| self.to_view(boid))
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    pub fn tree(&self) -> &QuadTree {
        &self.tree
    }

    pub fn settings(&self) -> &Arc<BoidSettings> {
        &self.settings
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn last_stats(&self) -> &TickStats {
        &self.last_stats
    }

    fn to_view(&self, boid: &Boid) -> AgentView {
        let scale = self.config.scale;
        AgentView {
            id: boid.id(),
            position: scale.vec_to_world(boid.position),
            velocity: scale.vec_to_world(boid.velocity),
        }
    }

    fn seed_boids(&mut self) {
        for _ in 0..self.config.initial_boids {
            self.add_boid();
        }
    }

    fn allocate_id(&mut self) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        id
    }

    fn push(&mut self, boid: Boid) {
        self.slots.insert(boid.id(), self.boids.len());
        self.boids.push(boid);
    }
}

fn check_scale(config: &WorldConfig, settings: &BoidSettings) -> Result<(), FlockError> {
    if settings.scale() != config.scale {
        return Err(FlockError::ScaleMismatch {
            settings: settings.scale().get(),
            world: config.scale.get(),
        });
    }
    Ok(())
}
