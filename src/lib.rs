/*
 * Quadtree Boid Simulation - Module Definitions
 *
 * This file defines the module structure for the headless simulation core.
 * The nannou viewer lives with the binary and only talks to the public API.
 */

// Re-export key components for easier access
pub use boid::{Boid, Neighbor, NeighborSource};
pub use debug::{TickObserver, TickStats, TracingObserver};
pub use error::{FlockError, SettingsError};
pub use fixed::{FixedScale, FixedVec, SCALE};
pub use flock::{AgentView, Flock};
pub use params::{BoidParams, BoidSettings, WorldConfig};
pub use quadtree::{AgentId, AgentRecord, QuadTree, TreeStats};
pub use region::BoundedRegion;

// Define modules
pub mod boid;
pub mod debug;
pub mod error;
pub mod fixed;
pub mod flock;
pub mod params;
pub mod quadtree;
pub mod region;
