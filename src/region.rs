/*
 * Bounded Region Module
 *
 * An axis-aligned square in fixed-point units, described by its center and
 * half-size. Every quadtree node owns one. Boundaries are closed, so two
 * adjacent regions both contain the points on their shared edge.
 */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundedRegion {
    pub center_x: i32,
    pub center_y: i32,
    pub half_size: i32,
}

impl BoundedRegion {
    pub fn new(center_x: i32, center_y: i32, half_size: i32) -> Self {
        debug_assert!(half_size > 0, "region half-size must be positive");
        Self {
            center_x,
            center_y,
            half_size,
        }
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let dx = (x as i64 - self.center_x as i64).abs();
        let dy = (y as i64 - self.center_y as i64).abs();
        dx <= self.half_size as i64 && dy <= self.half_size as i64
    }

    // Closest-point test against a circle given its squared radius
    #[inline]
    pub fn intersects_circle(&self, x: i32, y: i32, squared_radius: i64) -> bool {
        let (min_x, max_x) = (self.min_x() as i64, self.max_x() as i64);
        let (min_y, max_y) = (self.min_y() as i64, self.max_y() as i64);

        let closest_x = (x as i64).clamp(min_x, max_x);
        let closest_y = (y as i64).clamp(min_y, max_y);

        let dx = x as i64 - closest_x;
        let dy = y as i64 - closest_y;
        dx * dx + dy * dy <= squared_radius
    }

    // The four quadrants, in NE, NW, SE, SW order. An odd half-size rounds
    // up so the children still cover the whole parent.
    pub fn quadrants(&self) -> [BoundedRegion; 4] {
        let h = (self.half_size + 1) / 2;
        let (x, y) = (self.center_x, self.center_y);
        [
            BoundedRegion::new(x + h, y + h, h),
            BoundedRegion::new(x - h, y + h, h),
            BoundedRegion::new(x + h, y - h, h),
            BoundedRegion::new(x - h, y - h, h),
        ]
    }

    // A half-size of 1 would produce zero-sized children
    #[inline]
    pub fn can_subdivide(&self) -> bool {
        self.half_size >= 2
    }

    #[inline]
    pub fn min_x(&self) -> i32 {
        self.center_x.saturating_sub(self.half_size)
    }

    #[inline]
    pub fn max_x(&self) -> i32 {
        self.center_x.saturating_add(self.half_size)
    }

    #[inline]
    pub fn min_y(&self) -> i32 {
        self.center_y.saturating_sub(self.half_size)
    }

    #[inline]
    pub fn max_y(&self) -> i32 {
        self.center_y.saturating_add(self.half_size)
    }
}
