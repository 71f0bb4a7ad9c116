/*
 * Fixed-Point Module
 *
 * All spatial state in the simulation is stored as integers. World
 * coordinates (floats) are multiplied by a scale factor before they enter
 * the quadtree or an agent's kinematic state, so containment and distance
 * tests are exact integer comparisons.
 *
 * Velocities and accelerations share the position unit, so position and
 * velocity can be added directly.
 */

use glam::{DVec3, I64Vec3, IVec3, Vec3};

// Default world-to-fixed multiplier
pub const SCALE: i32 = 1000;

// Scale factor used for every float <-> integer conversion in a simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedScale(i32);

impl FixedScale {
    pub const DEFAULT: FixedScale = FixedScale(SCALE);
    // World units are already fixed units
    pub const UNIT: FixedScale = FixedScale(1);

    // Returns None for a non-positive factor
    pub fn new(factor: i32) -> Option<Self> {
        (factor > 0).then_some(Self(factor))
    }

    #[inline]
    pub fn get(self) -> i32 {
        self.0
    }

    // Truncates toward zero, saturating at the i32 range
    #[inline]
    pub fn to_fixed(self, world: f32) -> i32 {
        (world as f64 * self.0 as f64) as i32
    }

    // Same as to_fixed but keeps the fractional part
    #[inline]
    pub fn to_fixed_f64(self, world: f32) -> f64 {
        world as f64 * self.0 as f64
    }

    #[inline]
    pub fn to_world(self, fixed: i32) -> f32 {
        (fixed as f64 / self.0 as f64) as f32
    }

    pub fn vec_to_fixed(self, world: Vec3) -> IVec3 {
        IVec3::new(
            self.to_fixed(world.x),
            self.to_fixed(world.y),
            self.to_fixed(world.z),
        )
    }

    pub fn vec_to_world(self, fixed: IVec3) -> Vec3 {
        Vec3::new(
            self.to_world(fixed.x),
            self.to_world(fixed.y),
            self.to_world(fixed.z),
        )
    }
}

impl Default for FixedScale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// Vector helpers for integer kinematics. Any operation that needs a square
// root goes through f64 and truncates back toward zero.
pub trait FixedVec: Sized {
    fn length_f64(self) -> f64;
    fn distance_squared_i64(self, other: Self) -> i64;
    fn with_length(self, length: f64) -> Self;
    fn limit_length(self, max: f64) -> Self;
    fn scaled(self, factor: f64) -> Self;
}

impl FixedVec for IVec3 {
    // Through f64 so saturated components cannot overflow the square
    #[inline]
    fn length_f64(self) -> f64 {
        self.as_dvec3().length()
    }

    // 64-bit so large scaled coordinates cannot overflow
    #[inline]
    fn distance_squared_i64(self, other: Self) -> i64 {
        let d: I64Vec3 = self.as_i64vec3() - other.as_i64vec3();
        d.length_squared()
    }

    fn with_length(self, length: f64) -> Self {
        resize(self.as_dvec3(), length)
    }

    fn limit_length(self, max: f64) -> Self {
        clamp_length(self.as_dvec3(), max)
    }

    fn scaled(self, factor: f64) -> Self {
        (self.as_dvec3() * factor).as_ivec3()
    }
}

// Clamps a wide intermediate (a sum of fixed vectors) to `max` and
// truncates back into fixed units. Shorter vectors pass through unchanged.
pub fn clamp_length(v: DVec3, max: f64) -> IVec3 {
    let current = v.length();
    if current <= max || current == 0.0 {
        return v.as_ivec3();
    }
    (v * (max / current)).as_ivec3()
}

// Rescales a float direction to `length` and truncates into fixed units.
// A zero direction stays zero.
pub fn resize(direction: DVec3, length: f64) -> IVec3 {
    let current = direction.length();
    if current == 0.0 {
        return IVec3::ZERO;
    }
    (direction * (length / current)).as_ivec3()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_rejects_non_positive_factor() {
        assert!(FixedScale::new(0).is_none());
        assert!(FixedScale::new(-5).is_none());
        assert_eq!(FixedScale::new(100).map(FixedScale::get), Some(100));
    }

    #[test]
    fn conversions_truncate_toward_zero() {
        let scale = FixedScale::DEFAULT;
        assert_eq!(scale.to_fixed(1.2345), 1234);
        assert_eq!(scale.to_fixed(-1.2345), -1234);
        assert_eq!(scale.to_world(2500), 2.5);
        assert_eq!(
            scale.vec_to_fixed(Vec3::new(1.0, 0.0, -2.0)),
            IVec3::new(1000, 0, -2000)
        );
    }

    #[test]
    fn limit_length_clamps_only_longer_vectors() {
        assert_eq!(IVec3::new(200, 0, 0).limit_length(100.0), IVec3::new(100, 0, 0));
        assert_eq!(IVec3::new(0, 0, 200).limit_length(100.0), IVec3::new(0, 0, 100));
        assert_eq!(IVec3::new(30, 40, 0).limit_length(100.0), IVec3::new(30, 40, 0));
        assert_eq!(IVec3::ZERO.limit_length(10.0), IVec3::ZERO);
    }

    #[test]
    fn limited_length_never_exceeds_max() {
        let v = IVec3::new(1000, 1000, 1000).limit_length(50.0);
        assert_eq!(v, IVec3::new(28, 28, 28));
        assert!(v.length_f64() <= 50.0);
    }

    #[test]
    fn clamp_length_handles_saturated_sums() {
        let sum = IVec3::splat(i32::MIN).as_dvec3() + IVec3::splat(i32::MIN).as_dvec3();
        let v = clamp_length(sum, 300.0);
        assert_eq!(v, IVec3::splat(-173));
        assert!(IVec3::new(i32::MIN, i32::MIN, 0).length_f64().is_finite());
    }

    #[test]
    fn with_length_keeps_direction() {
        assert_eq!(IVec3::new(100, 0, 0).with_length(50.0), IVec3::new(50, 0, 0));
        assert_eq!(IVec3::new(-3, 0, 4).with_length(500.0), IVec3::new(-300, 0, 400));
        assert_eq!(IVec3::ZERO.with_length(50.0), IVec3::ZERO);
    }

    #[test]
    fn squared_distance_does_not_overflow() {
        let a = IVec3::new(i32::MAX / 2, 0, 0);
        let b = IVec3::new(-(i32::MAX / 2), 0, 0);
        let expected = (a.x as i64 - b.x as i64).pow(2);
        assert_eq!(a.distance_squared_i64(b), expected);
    }
}
