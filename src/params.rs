/*
 * Simulation Parameters Module
 *
 * BoidParams is the plain float record the outside world hands in (all
 * values in world units, field of view in degrees). BoidSettings is the
 * validated, immutable form shared by every agent through an Arc; it also
 * carries the fixed-point equivalents so nothing is rescaled per tick.
 *
 * WorldConfig sizes the root quadtree region and seeds the initial agents.
 */

use crate::error::{FlockError, SettingsError};
use crate::fixed::FixedScale;

// Largest half-world or per-tick length in fixed units. A wrapped position
// plus one max-speed step stays well inside i32.
pub const MAX_FIXED_LENGTH: i32 = 1 << 28;

// Parameters for the boids that can be adjusted via UI
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoidParams {
    pub search_radius: f32,
    pub max_speed: f32,
    pub max_force: f32,
    pub separation_radius: f32,
    pub field_of_view: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub separation_weight: f32,
}

impl Default for BoidParams {
    fn default() -> Self {
        Self {
            search_radius: 10.0,
            max_speed: 50.0,
            max_force: 1.0,
            separation_radius: 5.0,
            field_of_view: 120.0,
            alignment_weight: 0.3,
            cohesion_weight: 0.3,
            separation_weight: 1.3,
        }
    }
}

impl BoidParams {
    // Get parameter ranges for UI sliders
    pub fn max_speed_range() -> std::ops::RangeInclusive<f32> {
        0.1..=100.0
    }

    pub fn max_force_range() -> std::ops::RangeInclusive<f32> {
        0.01..=10.0
    }

    pub fn weight_range() -> std::ops::RangeInclusive<f32> {
        0.01..=3.0
    }

    pub fn radius_range() -> std::ops::RangeInclusive<f32> {
        0.5..=50.0
    }

    pub fn field_of_view_range() -> std::ops::RangeInclusive<f32> {
        1.0..=360.0
    }
}

// Validated, immutable boid configuration
#[derive(Debug, Clone, PartialEq)]
pub struct BoidSettings {
    params: BoidParams,
    scale: FixedScale,
    search_radius_fixed: i32,
    separation_radius_fixed: f64,
    max_speed_fixed: f64,
    max_force_fixed: f64,
    cos_half_fov: f64,
}

impl BoidSettings {
    pub fn new(params: BoidParams, scale: FixedScale) -> Result<Self, SettingsError> {
        let fields = [
            ("search radius", params.search_radius),
            ("max speed", params.max_speed),
            ("max force", params.max_force),
            ("separation radius", params.separation_radius),
            ("field of view", params.field_of_view),
            ("alignment weight", params.alignment_weight),
            ("cohesion weight", params.cohesion_weight),
            ("separation weight", params.separation_weight),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(SettingsError::NotFinite { field, value });
            }
            if value <= 0.0 {
                return Err(SettingsError::NotPositive { field, value });
            }
        }
        if params.field_of_view > 360.0 {
            return Err(SettingsError::FieldOfView(params.field_of_view));
        }

        // Anything that truncates to zero fixed units would silently freeze
        // agents; anything past MAX_FIXED_LENGTH could overflow a position.
        for (field, value) in [
            ("search radius", params.search_radius),
            ("max speed", params.max_speed),
            ("max force", params.max_force),
            ("separation radius", params.separation_radius),
        ] {
            let fixed = scale.to_fixed_f64(value);
            if fixed < 1.0 {
                return Err(SettingsError::BelowResolution {
                    field,
                    value,
                    scale: scale.get(),
                });
            }
            if fixed > MAX_FIXED_LENGTH as f64 {
                return Err(SettingsError::AboveRange {
                    field,
                    value,
                    scale: scale.get(),
                });
            }
        }

        // Max speed plus one tick of fully weighted force must fit the fixed range
        let total = params.alignment_weight + params.cohesion_weight + params.separation_weight;
        let reach = scale.to_fixed_f64(params.max_force) * total as f64
            + scale.to_fixed_f64(params.max_speed);
        if !reach.is_finite() || reach > MAX_FIXED_LENGTH as f64 {
            return Err(SettingsError::WeightedForce {
                total,
                scale: scale.get(),
            });
        }

        let half_fov = (params.field_of_view as f64 / 2.0).to_radians();

        Ok(Self {
            params,
            scale,
            search_radius_fixed: scale.to_fixed(params.search_radius),
            separation_radius_fixed: scale.to_fixed_f64(params.separation_radius),
            max_speed_fixed: scale.to_fixed_f64(params.max_speed),
            max_force_fixed: scale.to_fixed_f64(params.max_force),
            cos_half_fov: half_fov.cos(),
        })
    }

    // Convenience for tests and callers that already think in fixed units:
    // every length is given directly in fixed-point units at scale 1.
    pub fn from_fixed(params: BoidParams) -> Result<Self, SettingsError> {
        Self::new(params, FixedScale::UNIT)
    }

    pub fn params(&self) -> &BoidParams {
        &self.params
    }

    pub fn scale(&self) -> FixedScale {
        self.scale
    }

    // World units
    pub fn search_radius(&self) -> f32 {
        self.params.search_radius
    }

    pub fn search_radius_fixed(&self) -> i32 {
        self.search_radius_fixed
    }

    pub fn separation_radius_fixed(&self) -> f64 {
        self.separation_radius_fixed
    }

    pub fn max_speed_fixed(&self) -> f64 {
        self.max_speed_fixed
    }

    pub fn max_force_fixed(&self) -> f64 {
        self.max_force_fixed
    }

    pub fn cos_half_fov(&self) -> f64 {
        self.cos_half_fov
    }

    pub fn alignment_weight(&self) -> f64 {
        self.params.alignment_weight as f64
    }

    pub fn cohesion_weight(&self) -> f64 {
        self.params.cohesion_weight as f64
    }

    pub fn separation_weight(&self) -> f64 {
        self.params.separation_weight as f64
    }
}

impl Default for BoidSettings {
    fn default() -> Self {
        // The defaults are known to validate, so build the struct directly
        let params = BoidParams::default();
        let scale = FixedScale::DEFAULT;
        Self {
            params,
            scale,
            search_radius_fixed: scale.to_fixed(params.search_radius),
            separation_radius_fixed: scale.to_fixed_f64(params.separation_radius),
            max_speed_fixed: scale.to_fixed_f64(params.max_speed),
            max_force_fixed: scale.to_fixed_f64(params.max_force),
            cos_half_fov: (params.field_of_view as f64 / 2.0).to_radians().cos(),
        }
    }
}

// World setup, used once to size the root region and seed agents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldConfig {
    pub world_size: f32,
    pub initial_boids: usize,
    pub capacity: usize,
    pub scale: FixedScale,
    pub seed: Option<u64>,
    pub parallel: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            world_size: 250.0,
            initial_boids: 10,
            capacity: 4,
            scale: FixedScale::DEFAULT,
            seed: None,
            parallel: false,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), FlockError> {
        if !self.world_size.is_finite() || self.world_size <= 0.0 {
            return Err(FlockError::WorldSize(self.world_size));
        }
        if self.capacity == 0 {
            return Err(FlockError::Capacity);
        }
        let half = self.scale.to_fixed_f64(self.world_size) / 2.0;
        if half < 1.0 || half > MAX_FIXED_LENGTH as f64 {
            return Err(FlockError::WorldTooLarge {
                world_size: self.world_size,
                scale: self.scale.get(),
            });
        }
        Ok(())
    }

    // Wrap bound in fixed units
    pub fn half_world(&self) -> i32 {
        half_world(self.world_size, self.scale)
    }

    pub fn get_num_boids_range() -> std::ops::RangeInclusive<usize> {
        1..=5000
    }
}

pub fn half_world(world_size: f32, scale: FixedScale) -> i32 {
    scale.to_fixed(world_size) / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_validate() {
        let built = BoidSettings::new(BoidParams::default(), FixedScale::DEFAULT).unwrap();
        assert_eq!(built, BoidSettings::default());
        assert_eq!(built.max_speed_fixed(), 50_000.0);
        assert_eq!(built.search_radius_fixed(), 10_000);
        assert!((built.cos_half_fov() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_positive_values() {
        let params = BoidParams { max_speed: 0.0, ..BoidParams::default() };
        assert_eq!(
            BoidSettings::new(params, FixedScale::DEFAULT),
            Err(SettingsError::NotPositive { field: "max speed", value: 0.0 })
        );

        let params = BoidParams { separation_radius: -1.0, ..BoidParams::default() };
        assert!(matches!(
            BoidSettings::new(params, FixedScale::DEFAULT),
            Err(SettingsError::NotPositive { field: "separation radius", .. })
        ));

        let params = BoidParams { cohesion_weight: 0.0, ..BoidParams::default() };
        assert!(BoidSettings::new(params, FixedScale::DEFAULT).is_err());
    }

    #[test]
    fn rejects_nan_and_wide_field_of_view() {
        let params = BoidParams { max_force: f32::NAN, ..BoidParams::default() };
        assert!(matches!(
            BoidSettings::new(params, FixedScale::DEFAULT),
            Err(SettingsError::NotFinite { field: "max force", .. })
        ));

        let params = BoidParams { field_of_view: 361.0, ..BoidParams::default() };
        assert_eq!(
            BoidSettings::new(params, FixedScale::DEFAULT),
            Err(SettingsError::FieldOfView(361.0))
        );
    }

    #[test]
    fn rejects_values_below_fixed_resolution() {
        let params = BoidParams { max_force: 0.0001, ..BoidParams::default() };
        assert!(matches!(
            BoidSettings::new(params, FixedScale::DEFAULT),
            Err(SettingsError::BelowResolution { field: "max force", .. })
        ));
    }

    #[test]
    fn rejects_values_past_fixed_range() {
        let params = BoidParams { search_radius: 1.0e6, ..BoidParams::default() };
        assert!(matches!(
            BoidSettings::new(params, FixedScale::DEFAULT),
            Err(SettingsError::AboveRange { field: "search radius", .. })
        ));
    }

    #[test]
    fn rejects_weights_that_overflow_the_steering_force() {
        let params = BoidParams {
            alignment_weight: 1.0e7,
            cohesion_weight: 1.0e7,
            separation_weight: 1.0e7,
            ..BoidParams::default()
        };
        assert!(matches!(
            BoidSettings::new(params, FixedScale::DEFAULT),
            Err(SettingsError::WeightedForce { scale: 1000, .. })
        ));

        // Largest slider values stay well inside the range
        let params = BoidParams {
            max_speed: *BoidParams::max_speed_range().end(),
            max_force: *BoidParams::max_force_range().end(),
            alignment_weight: *BoidParams::weight_range().end(),
            cohesion_weight: *BoidParams::weight_range().end(),
            separation_weight: *BoidParams::weight_range().end(),
            ..BoidParams::default()
        };
        assert!(BoidSettings::new(params, FixedScale::DEFAULT).is_ok());
    }

    #[test]
    fn world_config_validation() {
        assert!(WorldConfig::default().validate().is_ok());
        assert_eq!(WorldConfig::default().half_world(), 125_000);

        let config = WorldConfig { world_size: -5.0, ..WorldConfig::default() };
        assert_eq!(config.validate(), Err(FlockError::WorldSize(-5.0)));

        let config = WorldConfig { capacity: 0, ..WorldConfig::default() };
        assert_eq!(config.validate(), Err(FlockError::Capacity));

        let config = WorldConfig { world_size: 1.0e9, ..WorldConfig::default() };
        assert!(matches!(config.validate(), Err(FlockError::WorldTooLarge { .. })));
    }

    #[test]
    fn half_world_matches_scale() {
        let scale = FixedScale::new(100).unwrap();
        assert_eq!(half_world(10.0, scale), 500);
        assert_eq!(half_world(10.0, FixedScale::DEFAULT), 5000);
    }
}
