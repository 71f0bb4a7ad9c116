/*
 * Quadtree Module
 *
 * A region quadtree over agent positions in fixed-point units, rebuilt
 * from scratch every simulation tick and queried once per agent.
 *
 * Node lifecycle:
 * - Leaf: stores up to `capacity` records
 * - Divided: the four children own every later insert
 *
 * Records already stored in a node stay there when it divides; queries scan
 * the own list of every node they reach, so nothing is missed. An insert
 * that reaches a divided node goes to the first child containing the point
 * in NE, NW, SE, SW order, so each record is stored exactly once.
 */

use std::fmt;

use crate::fixed::FixedScale;
use crate::region::BoundedRegion;

// Stable agent identifier, used to map a record back to its agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// The unit of storage inside the quadtree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AgentRecord {
    pub id: AgentId,
    pub x: i32,
    pub y: i32,
}

impl AgentRecord {
    pub fn new(id: AgentId, x: i32, y: i32) -> Self {
        Self { id, x, y }
    }

    #[inline]
    pub fn distance_squared(&self, x: i32, y: i32) -> i64 {
        let dx = self.x as i64 - x as i64;
        let dy = self.y as i64 - y as i64;
        dx * dx + dy * dy
    }
}

// Shape counters for a whole tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub nodes: usize,
    pub leaves: usize,
    pub records: usize,
    pub max_depth: usize,
}

#[derive(Debug, Clone)]
pub struct QuadTree {
    region: BoundedRegion,
    capacity: usize,
    scale: FixedScale,
    records: Vec<AgentRecord>,
    // NE, NW, SE, SW
    children: Option<Box<[QuadTree; 4]>>,
}

impl QuadTree {
    pub fn new(region: BoundedRegion, capacity: usize, scale: FixedScale) -> Self {
        debug_assert!(capacity > 0, "quadtree capacity must be positive");
        Self {
            region,
            capacity,
            scale,
            records: Vec::with_capacity(capacity),
            children: None,
        }
    }

    // Root square centered on the origin covering [-half_world, half_world].
    // The half-size is rounded up to a power of two so that every level
    // halves exactly.
    pub fn covering(half_world: i32, capacity: usize, scale: FixedScale) -> Self {
        let half_size = (half_world.max(1) as u32).next_power_of_two().min(1 << 30) as i32;
        Self::new(BoundedRegion::new(0, 0, half_size), capacity, scale)
    }

    pub fn insert(&mut self, record: AgentRecord) -> bool {
        if !self.region.contains(record.x, record.y) {
            return false;
        }

        // Room left in this leaf, or a leaf too small to split
        if self.children.is_none()
            && (self.records.len() < self.capacity || !self.region.can_subdivide())
        {
            self.records.push(record);
            return true;
        }

        let scale = self.scale;
        let capacity = self.capacity;
        let region = self.region;
        let children = self.children.get_or_insert_with(|| {
            Box::new(region.quadrants().map(|q| QuadTree::new(q, capacity, scale)))
        });

        children.iter_mut().any(|child| child.insert(record))
    }

    // Radius given in world units
    pub fn query_radius(&self, x: i32, y: i32, world_radius: f32) -> Vec<AgentRecord> {
        // Truncated like every other fixed-point length, so a world-unit query
        // sees exactly what a boid with the same search radius sees
        self.query_radius_fixed(x, y, self.scale.to_fixed(world_radius))
    }

    // Radius already in fixed-point units
    pub fn query_radius_fixed(&self, x: i32, y: i32, radius: i32) -> Vec<AgentRecord> {
        let radius = radius.max(0) as i64;
        let mut found = Vec::new();
        self.collect_within(x, y, radius * radius, &mut found);
        found
    }

    fn collect_within(&self, x: i32, y: i32, squared_radius: i64, found: &mut Vec<AgentRecord>) {
        if !self.region.intersects_circle(x, y, squared_radius) {
            return;
        }

        found.extend(
            self.records
                .iter()
                .filter(|r| r.distance_squared(x, y) <= squared_radius),
        );

        if let Some(children) = &self.children {
            for child in children.iter() {
                child.collect_within(x, y, squared_radius, found);
            }
        }
    }

    // Back to an empty leaf; children are dropped with the box
    pub fn clear(&mut self) {
        self.records.clear();
        self.children = None;
    }

    pub fn region(&self) -> BoundedRegion {
        self.region
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn scale(&self) -> FixedScale {
        self.scale
    }

    pub fn records(&self) -> &[AgentRecord] {
        &self.records
    }

    pub fn is_divided(&self) -> bool {
        self.children.is_some()
    }

    pub fn children(&self) -> Option<&[QuadTree; 4]> {
        self.children.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.children.is_none()
    }

    // Pre-order walk, root at depth 0
    pub fn for_each_node<F: FnMut(usize, &QuadTree)>(&self, mut visit: F) {
        self.walk(0, &mut visit);
    }

    fn walk<F: FnMut(usize, &QuadTree)>(&self, depth: usize, visit: &mut F) {
        visit(depth, self);
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.walk(depth + 1, visit);
            }
        }
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        self.for_each_node(|depth, node| {
            stats.nodes += 1;
            stats.records += node.records.len();
            stats.max_depth = stats.max_depth.max(depth);
            if !node.is_divided() {
                stats.leaves += 1;
            }
        });
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;

    fn tree(half_size: i32, capacity: usize) -> QuadTree {
        QuadTree::new(BoundedRegion::new(0, 0, half_size), capacity, FixedScale::DEFAULT)
    }

    fn ids(records: &[AgentRecord]) -> HashSet<AgentId> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn rejects_points_outside_root() {
        let mut qt = tree(100, 4);
        assert!(!qt.insert(AgentRecord::new(AgentId(0), 101, 0)));
        assert!(!qt.insert(AgentRecord::new(AgentId(1), 0, -200)));
        assert!(qt.is_empty());
    }

    #[test]
    fn leaf_holds_up_to_capacity() {
        let mut qt = tree(1024, 4);
        for i in 0..4 {
            assert!(qt.insert(AgentRecord::new(AgentId(i), i as i32 * 10, 0)));
        }
        assert!(!qt.is_divided());
        assert_eq!(qt.records().len(), qt.capacity());
    }

    #[test]
    fn insert_past_capacity_divides() {
        let mut qt = tree(1024, 4);
        for i in 0..5 {
            qt.insert(AgentRecord::new(AgentId(i), 100 + i as i32, 100));
        }
        assert!(qt.is_divided());
        // Existing records stay in the parent
        assert_eq!(qt.records().len(), 4);
        let ne = &qt.children().unwrap()[0];
        assert_eq!(ne.records(), &[AgentRecord::new(AgentId(4), 104, 100)]);
    }

    #[test]
    fn edge_point_goes_to_first_matching_quadrant() {
        let mut qt = tree(1024, 1);
        qt.insert(AgentRecord::new(AgentId(0), 500, 500));
        // On the shared edge of all four quadrants
        qt.insert(AgentRecord::new(AgentId(1), 0, 0));
        let children = qt.children().unwrap();
        assert_eq!(children[0].records().len(), 1);
        assert!(children[1..].iter().all(|c| c.is_empty()));
        assert_eq!(qt.stats().records, 2);
    }

    #[test]
    fn coincident_points_stop_splitting_at_unit_half_size() {
        let mut qt = tree(8, 1);
        for i in 0..50 {
            assert!(qt.insert(AgentRecord::new(AgentId(i), 3, 3)));
        }
        let stats = qt.stats();
        assert_eq!(stats.records, 50);
        assert!(stats.max_depth <= 3);
        assert_eq!(qt.query_radius_fixed(3, 3, 0).len(), 50);
    }

    #[test]
    fn query_on_empty_tree_is_empty() {
        let qt = tree(1024, 4);
        assert!(qt.query_radius(0, 0, 1000.0).is_empty());
    }

    #[test]
    fn query_scales_world_radius() {
        let mut qt = tree(1 << 16, 4);
        qt.insert(AgentRecord::new(AgentId(0), 0, 0));
        qt.insert(AgentRecord::new(AgentId(1), 2000, 0));
        qt.insert(AgentRecord::new(AgentId(2), 2001, 0));
        // 2.0 world units at the default scale is 2000 fixed units
        let found = ids(&qt.query_radius(0, 0, 2.0));
        assert_eq!(found, HashSet::from([AgentId(0), AgentId(1)]));
    }

    #[test]
    fn world_radius_truncates_like_fixed_radius() {
        let mut qt = tree(1 << 16, 4);
        qt.insert(AgentRecord::new(AgentId(0), 0, 0));
        qt.insert(AgentRecord::new(AgentId(1), 1999, 0));
        // Distance about 1999.7: inside 1.9999 world units, outside 1999 fixed
        qt.insert(AgentRecord::new(AgentId(2), 1414, 1414));

        let found = ids(&qt.query_radius(0, 0, 1.9999));
        assert_eq!(found, HashSet::from([AgentId(0), AgentId(1)]));
        assert_eq!(found, ids(&qt.query_radius_fixed(0, 0, 1999)));
    }

    #[test]
    fn radius_query_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut qt = tree(1 << 14, 4);
        let mut all = Vec::new();
        for i in 0..2000 {
            let record = AgentRecord::new(
                AgentId(i),
                rng.gen_range(-(1 << 14)..=(1 << 14)),
                rng.gen_range(-(1 << 14)..=(1 << 14)),
            );
            assert!(qt.insert(record));
            all.push(record);
        }

        for _ in 0..200 {
            let (x, y) = (rng.gen_range(-20000..20000), rng.gen_range(-20000..20000));
            let radius: i32 = rng.gen_range(0..4000);
            let squared = radius as i64 * radius as i64;
            let expected: HashSet<AgentId> = all
                .iter()
                .filter(|r| r.distance_squared(x, y) <= squared)
                .map(|r| r.id)
                .collect();
            let found = qt.query_radius_fixed(x, y, radius);
            assert_eq!(found.len(), expected.len(), "duplicate or missing records");
            assert_eq!(ids(&found), expected);
        }
    }

    #[test]
    fn clear_is_idempotent() {
        let mut qt = tree(1024, 2);
        for i in 0..20 {
            qt.insert(AgentRecord::new(AgentId(i), i as i32 * 30 - 300, 0));
        }
        assert!(qt.is_divided());
        qt.clear();
        let once = qt.stats();
        qt.clear();
        assert_eq!(qt.stats(), once);
        assert_eq!(once, TreeStats { nodes: 1, leaves: 1, records: 0, max_depth: 0 });
        assert!(qt.query_radius(0, 0, 10_000.0).is_empty());
    }

    #[test]
    fn covering_root_rounds_up_to_power_of_two() {
        let qt = QuadTree::covering(125_000, 4, FixedScale::DEFAULT);
        assert_eq!(qt.region(), BoundedRegion::new(0, 0, 131_072));
        assert!(qt.region().contains(125_000, -125_000));
    }

    #[test]
    fn for_each_node_reports_depths() {
        let mut qt = tree(1024, 1);
        qt.insert(AgentRecord::new(AgentId(0), 10, 10));
        qt.insert(AgentRecord::new(AgentId(1), 20, 20));
        qt.insert(AgentRecord::new(AgentId(2), 30, 30));
        let mut depths = Vec::new();
        qt.for_each_node(|depth, _| depths.push(depth));
        assert_eq!(depths, vec![0, 1, 2, 2, 2, 2, 1, 1, 1]);
        assert_eq!(qt.stats().max_depth, 2);
    }
}
