//! # Simulation Configuration
//!
//! Tunables for one simulation, loadable from TOML:
//!
//! ```toml
//! cell_size = 200.0
//! bullet_capacity = 50000
//! particle_capacity = 90000
//! nearest_ring_bound = 20
//! ```
//!
//! Every field is optional; missing fields take the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Default grid cell edge length, in world units.
pub const DEFAULT_CELL_SIZE: f32 = 200.0;
/// Default projectile pool capacity.
pub const DEFAULT_BULLET_CAPACITY: usize = 50_000;
/// Default particle pool capacity.
pub const DEFAULT_PARTICLE_CAPACITY: usize = 90_000;
/// Default number of rings examined by the nearest-opposing search.
pub const DEFAULT_NEAREST_RING_BOUND: u32 = 20;
/// Default simulation event channel capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 4096;
/// Default upper clamp for a host frame delta, in seconds.
pub const DEFAULT_MAX_FRAME_DT: f32 = 0.1;

/// Simulation configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Grid cell edge length.
    pub cell_size: f32,
    /// Projectile pool capacity.
    pub bullet_capacity: usize,
    /// Particle pool capacity.
    pub particle_capacity: usize,
    /// Rings examined by the nearest-opposing search (radii `0..bound`).
    pub nearest_ring_bound: u32,
    /// Bounded event channel capacity. Events are dropped when full.
    pub event_capacity: usize,
    /// Seed for particle burst randomness.
    pub seed: u64,
    /// Host loop delta clamp, in seconds.
    pub max_frame_dt: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            bullet_capacity: DEFAULT_BULLET_CAPACITY,
            particle_capacity: DEFAULT_PARTICLE_CAPACITY,
            nearest_ring_bound: DEFAULT_NEAREST_RING_BOUND,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            seed: 0x5EED,
            max_frame_dt: DEFAULT_MAX_FRAME_DT,
        }
    }
}

impl SimConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] on a parse failure or an unknown
    /// key, and any error from [`Self::validate`].
    pub fn from_toml_str(text: &str) -> CoreResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| CoreError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ConfigIo`] when the file cannot be read, and any
    /// error from [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| CoreError::ConfigIo {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Serializes to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if serialization fails.
    pub fn to_toml_string(&self) -> CoreResult<String> {
        toml::to_string(self).map_err(|e| CoreError::InvalidConfig(e.to_string()))
    }

    /// Checks every field for a usable value.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidCellSize`] for a non-positive or non-finite cell size
    /// - [`CoreError::ZeroCapacity`] for an empty pool or event channel
    /// - [`CoreError::ZeroRingBound`] when the nearest search has no rings
    /// - [`CoreError::InvalidConfig`] for a non-positive frame clamp
    pub fn validate(&self) -> CoreResult<()> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(CoreError::InvalidCellSize(self.cell_size));
        }
        if self.bullet_capacity == 0 {
            return Err(CoreError::ZeroCapacity { what: "bullet pool" });
        }
        if self.particle_capacity == 0 {
            return Err(CoreError::ZeroCapacity { what: "particle pool" });
        }
        if self.event_capacity == 0 {
            return Err(CoreError::ZeroCapacity { what: "event channel" });
        }
        if self.nearest_ring_bound == 0 {
            return Err(CoreError::ZeroRingBound);
        }
        if !self.max_frame_dt.is_finite() || self.max_frame_dt <= 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "max_frame_dt must be positive, got {}",
                self.max_frame_dt
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cell_size, 200.0);
        assert_eq!(config.bullet_capacity, 50_000);
        assert_eq!(config.particle_capacity, 90_000);
        assert_eq!(config.nearest_ring_bound, 20);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = SimConfig::from_toml_str("cell_size = 64.0\nseed = 7\n").unwrap();
        assert_eq!(config.cell_size, 64.0);
        assert_eq!(config.seed, 7);
        assert_eq!(config.bullet_capacity, DEFAULT_BULLET_CAPACITY);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = SimConfig::from_toml_str("cell_sise = 64.0\n");
        assert!(matches!(result, Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(matches!(
            SimConfig::from_toml_str("cell_size = 0.0"),
            Err(CoreError::InvalidCellSize(_))
        ));
        assert!(matches!(
            SimConfig::from_toml_str("bullet_capacity = 0"),
            Err(CoreError::ZeroCapacity { .. })
        ));
        assert!(matches!(
            SimConfig::from_toml_str("nearest_ring_bound = 0"),
            Err(CoreError::ZeroRingBound)
        ));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = SimConfig {
            seed: 99,
            ..SimConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(SimConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = SimConfig::load("/nonexistent/skirmish.toml").unwrap_err();
        assert!(matches!(err, CoreError::ConfigIo { ref path, .. } if path.contains("skirmish.toml")));
    }
}
