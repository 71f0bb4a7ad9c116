/*
 * Error Module
 *
 * Configuration problems are rejected when settings or a flock are
 * constructed, never discovered mid-tick. Read lookups by agent id return
 * Option instead; only mutating calls on an unknown id produce an error.
 */

use thiserror::Error;

use crate::quadtree::AgentId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f32 },
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("field of view must be in (0, 360] degrees, got {0}")]
    FieldOfView(f32),
    #[error("{field} of {value} rounds to zero at fixed-point scale {scale}")]
    BelowResolution {
        field: &'static str,
        value: f32,
        scale: i32,
    },
    #[error("{field} of {value} exceeds the fixed-point range at scale {scale}")]
    AboveRange {
        field: &'static str,
        value: f32,
        scale: i32,
    },
    #[error("weights totalling {total} push the steering force past the fixed-point range at scale {scale}")]
    WeightedForce { total: f32, scale: i32 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlockError {
    #[error("invalid boid settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("world size must be a positive finite number, got {0}")]
    WorldSize(f32),
    #[error("world size {world_size} at scale {scale} overflows fixed-point coordinates")]
    WorldTooLarge { world_size: f32, scale: i32 },
    #[error("quadtree node capacity must be at least 1")]
    Capacity,
    #[error("settings use scale {settings} but the world uses scale {world}")]
    ScaleMismatch { settings: i32, world: i32 },
    #[error("no agent with id {0}")]
    UnknownAgent(AgentId),
}
