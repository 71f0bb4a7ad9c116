/*
 * Debug Information Module
 *
 * Per-tick performance counters produced by the flock, plus the observer
 * seam a profiling collaborator plugs into. The flock holds its observer
 * explicitly; there is no process-wide profiler.
 *
 * Includes metrics for:
 * - Active agent count
 * - Quadtree shape (nodes, leaves, records, depth)
 * - Records rejected by the quadtree
 * - Time spent rebuilding, flocking and integrating
 */

use std::time::Duration;

use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickStats {
    pub tick: u64,
    pub agent_count: usize,
    pub node_count: usize,
    pub leaf_count: usize,
    pub record_count: usize,
    pub max_depth: usize,
    pub rejected_inserts: usize,
    pub rebuild_time: Duration,
    pub flock_time: Duration,
    pub integrate_time: Duration,
    pub frame_time: Duration,
}

impl TickStats {
    pub fn frame_time_ms(&self) -> f64 {
        self.frame_time.as_secs_f64() * 1000.0
    }
}

// Receives the counters at the end of every tick
pub trait TickObserver {
    fn on_tick(&mut self, stats: &TickStats);
}

// Logs the counters through tracing every `interval` ticks
#[derive(Debug, Clone)]
pub struct TracingObserver {
    interval: u64,
}

impl TracingObserver {
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
        }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new(60)
    }
}

impl TickObserver for TracingObserver {
    fn on_tick(&mut self, stats: &TickStats) {
        if stats.tick % self.interval != 0 {
            return;
        }
        debug!(
            tick = stats.tick,
            agents = stats.agent_count,
            nodes = stats.node_count,
            records = stats.record_count,
            depth = stats.max_depth,
            rebuild_us = stats.rebuild_time.as_micros() as u64,
            flock_us = stats.flock_time.as_micros() as u64,
            integrate_us = stats.integrate_time.as_micros() as u64,
            "flock tick"
        );
    }
}

// Closures work as observers
impl<F: FnMut(&TickStats)> TickObserver for F {
    fn on_tick(&mut self, stats: &TickStats) {
        (*self)(stats)
    }
}
