/*
 * Flock Benchmark
 *
 * Measures the three costs that dominate a tick: rebuilding the quadtree,
 * answering radius queries against it, and the full rebuild/flock/integrate
 * loop, both sequential and with the rayon flock pass.
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quadboids::{AgentId, AgentRecord, BoidSettings, FixedScale, Flock, QuadTree, WorldConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

const AGENT_COUNTS: [usize; 4] = [100, 500, 1000, 2000];
const WORLD_SIZE: f32 = 250.0;

fn random_records(n: usize, half: i32) -> Vec<AgentRecord> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..n)
        .map(|i| {
            let x = rng.gen_range(-half..=half);
            let y = rng.gen_range(-half..=half);
            AgentRecord::new(AgentId(i as u32), x, y)
        })
        .collect()
}

fn world(n: usize, parallel: bool) -> WorldConfig {
    WorldConfig {
        world_size: WORLD_SIZE,
        initial_boids: n,
        seed: Some(11),
        parallel,
        ..WorldConfig::default()
    }
}

// Clear and refill the tree, as every tick does
fn bench_quadtree_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_rebuild");
    let scale = FixedScale::DEFAULT;
    let half = scale.to_fixed(WORLD_SIZE) / 2;

    for &n in AGENT_COUNTS.iter() {
        let records = random_records(n, half);
        let mut tree = QuadTree::covering(half, 4, scale);
        group.bench_with_input(BenchmarkId::from_parameter(n), &records, |b, records| {
            b.iter(|| {
                tree.clear();
                for record in records {
                    tree.insert(*record);
                }
                black_box(tree.stats())
            });
        });
    }

    group.finish();
}

// One search-radius query per agent against a populated tree
fn bench_radius_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("radius_queries");
    let scale = FixedScale::DEFAULT;
    let half = scale.to_fixed(WORLD_SIZE) / 2;
    let radius = BoidSettings::default().search_radius();

    for &n in AGENT_COUNTS.iter() {
        let records = random_records(n, half);
        let mut tree = QuadTree::covering(half, 4, scale);
        for record in &records {
            tree.insert(*record);
        }
        group.bench_with_input(BenchmarkId::from_parameter(n), &records, |b, records| {
            b.iter(|| {
                let found: usize = records
                    .iter()
                    .map(|record| tree.query_radius(record.x, record.y, radius).len())
                    .sum();
                black_box(found)
            });
        });
    }

    group.finish();
}

// Full tick, sequential and parallel
fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for &n in AGENT_COUNTS.iter() {
        for (label, parallel) in [("sequential", false), ("parallel", true)] {
            let mut flock = match Flock::new(world(n, parallel), BoidSettings::default()) {
                Ok(flock) => flock,
                Err(err) => panic!("benchmark world is invalid: {err}"),
            };
            group.bench_with_input(BenchmarkId::new(label, n), &n, |b, _| {
                b.iter(|| black_box(flock.tick()));
            });
        }
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(10)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1));
    targets = bench_quadtree_rebuild, bench_radius_queries, bench_tick
}

criterion_main!(benches);
