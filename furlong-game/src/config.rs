//! Simulation tuning for the race engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_SIM_DATA: &str = include_str!("../assets/data/sim.json");

/// Tunable parameters for schedule construction and the tick loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Tick cadence for wall-clock drivers, in milliseconds.
    #[serde(default = "SimConfig::default_tick_ms")]
    pub tick_ms: u64,
    /// Distance units a perfectly conditioned horse covers per tick before jitter.
    #[serde(default = "SimConfig::default_base_speed")]
    pub base_speed: f64,
    /// Upper bound of the uniform per-tick speed bonus.
    #[serde(default = "SimConfig::default_speed_jitter")]
    pub speed_jitter: f64,
    /// Target distances in meters, one round per entry, in running order.
    #[serde(default = "SimConfig::default_distances")]
    pub distances: Vec<f64>,
    /// Horses drawn into each round.
    #[serde(default = "SimConfig::default_field_size")]
    pub field_size: usize,
    /// Horses in the master roster.
    #[serde(default = "SimConfig::default_roster_size")]
    pub roster_size: usize,
    /// Hard tick cap per round; a round hitting it is force-completed.
    #[serde(default = "SimConfig::default_max_round_ticks")]
    pub max_round_ticks: u32,
}

/// Validation failures for [`SimConfig`].
#[derive(Debug, Error, PartialEq)]
pub enum SimConfigError {
    #[error("tick interval must be within 1..=10000 ms, got {0}")]
    TickInterval(u64),
    #[error("base speed must be positive and finite, got {0}")]
    BaseSpeed(f64),
    #[error("speed jitter must be non-negative and finite, got {0}")]
    SpeedJitter(f64),
    #[error("distances must be non-empty, finite, positive, and strictly increasing")]
    Distances,
    #[error("field size {field} must be within 2..={roster}")]
    FieldSize { field: usize, roster: usize },
    #[error("round tick cap must be at least 100, got {0}")]
    MaxRoundTicks(u32),
}

impl SimConfig {
    #[must_use]
    pub const fn default_tick_ms() -> u64 {
        100
    }

    #[must_use]
    pub const fn default_base_speed() -> f64 {
        5.0
    }

    #[must_use]
    pub const fn default_speed_jitter() -> f64 {
        3.0
    }

    #[must_use]
    pub fn default_distances() -> Vec<f64> {
        vec![1200.0, 1400.0, 1600.0, 1800.0, 2000.0, 2200.0]
    }

    #[must_use]
    pub const fn default_field_size() -> usize {
        10
    }

    #[must_use]
    pub const fn default_roster_size() -> usize {
        20
    }

    #[must_use]
    pub const fn default_max_round_ticks() -> u32 {
        20_000
    }

    /// Load the tuning embedded in the crate.
    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_SIM_DATA).unwrap_or_default()
    }

    /// Validate configuration invariants before sanitization.
    ///
    /// # Errors
    ///
    /// Returns `SimConfigError` when any field violates the documented bounds.
    pub fn validate(&self) -> Result<(), SimConfigError> {
        if !(1..=10_000).contains(&self.tick_ms) {
            return Err(SimConfigError::TickInterval(self.tick_ms));
        }
        if !self.base_speed.is_finite() || self.base_speed <= 0.0 {
            return Err(SimConfigError::BaseSpeed(self.base_speed));
        }
        if !self.speed_jitter.is_finite() || self.speed_jitter < 0.0 {
            return Err(SimConfigError::SpeedJitter(self.speed_jitter));
        }
        let distances_ok = !self.distances.is_empty()
            && self.distances.iter().all(|d| d.is_finite() && *d > 0.0)
            && self.distances.windows(2).all(|pair| pair[0] < pair[1]);
        if !distances_ok {
            return Err(SimConfigError::Distances);
        }
        if self.field_size < 2 || self.field_size > self.roster_size {
            return Err(SimConfigError::FieldSize {
                field: self.field_size,
                roster: self.roster_size,
            });
        }
        if self.max_round_ticks < 100 {
            return Err(SimConfigError::MaxRoundTicks(self.max_round_ticks));
        }
        Ok(())
    }

    /// Clamp recoverable values into their working ranges.
    pub fn sanitize(&mut self) {
        self.tick_ms = self.tick_ms.clamp(1, 10_000);
        self.speed_jitter = self.speed_jitter.max(0.0);
        self.max_round_ticks = self.max_round_ticks.max(100);
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_ms: Self::default_tick_ms(),
            base_speed: Self::default_base_speed(),
            speed_jitter: Self::default_speed_jitter(),
            distances: Self::default_distances(),
            field_size: Self::default_field_size(),
            roster_size: Self::default_roster_size(),
            max_round_ticks: Self::default_max_round_ticks(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_matches_reference_tuning() {
        let cfg = SimConfig::load_from_static();
        assert_eq!(cfg.tick_ms, 100);
        assert!((cfg.base_speed - 5.0).abs() < f64::EPSILON);
        assert!((cfg.speed_jitter - 3.0).abs() < f64::EPSILON);
        assert_eq!(
            cfg.distances,
            vec![1200.0, 1400.0, 1600.0, 1800.0, 2000.0, 2200.0]
        );
        assert_eq!(cfg.field_size, 10);
        assert_eq!(cfg.roster_size, 20);
        cfg.validate().unwrap();
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: SimConfig = serde_json::from_str(r#"{ "tick_ms": 50 }"#).unwrap();
        assert_eq!(cfg.tick_ms, 50);
        assert_eq!(cfg.distances.len(), 6);
        assert_eq!(cfg.field_size, 10);
    }

    #[test]
    fn validate_rejects_out_of_range_fields() {
        let base = SimConfig::default();

        let mut cfg = base.clone();
        cfg.tick_ms = 0;
        assert_eq!(cfg.validate(), Err(SimConfigError::TickInterval(0)));

        let mut cfg = base.clone();
        cfg.base_speed = 0.0;
        assert!(matches!(cfg.validate(), Err(SimConfigError::BaseSpeed(_))));

        let mut cfg = base.clone();
        cfg.speed_jitter = -1.0;
        assert!(matches!(cfg.validate(), Err(SimConfigError::SpeedJitter(_))));

        let mut cfg = base.clone();
        cfg.distances = vec![1200.0, 1200.0];
        assert_eq!(cfg.validate(), Err(SimConfigError::Distances));

        let mut cfg = base.clone();
        cfg.distances.clear();
        assert_eq!(cfg.validate(), Err(SimConfigError::Distances));

        let mut cfg = base.clone();
        cfg.field_size = 25;
        assert_eq!(
            cfg.validate(),
            Err(SimConfigError::FieldSize {
                field: 25,
                roster: 20
            })
        );

        let mut cfg = base;
        cfg.max_round_ticks = 10;
        assert_eq!(cfg.validate(), Err(SimConfigError::MaxRoundTicks(10)));
    }

    #[test]
    fn sanitize_clamps_recoverable_values() {
        let mut cfg = SimConfig {
            tick_ms: 0,
            speed_jitter: -2.0,
            max_round_ticks: 1,
            ..SimConfig::default()
        };
        cfg.sanitize();
        assert_eq!(cfg.tick_ms, 1);
        assert!((cfg.speed_jitter - 0.0).abs() < f64::EPSILON);
        assert_eq!(cfg.max_round_ticks, 100);
    }
}
