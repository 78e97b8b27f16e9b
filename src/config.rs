use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SimResult;
use crate::types::ObjectId;

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // ── Kinematics ──
    pub safety_floor: f64,
    pub default_speed: f64,
    pub chest_height: f64,
    pub walk_and_pick_object: ObjectId,

    // ── Scalar Kalman estimator ──
    pub process_variance: f64,
    pub measurement_variance: f64,
    pub initial_estimate: f64,
    pub initial_error: f64,

    // ── Exponential smoother stand-in ──
    pub smoother_weight: f64,

    // ── Arm sweep (safety checks) ──
    pub sweep_steps: usize,
    pub sweep_clearance: f64,

    // ── Scenario expectations ──
    pub position_tolerance: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            safety_floor: 0.2,
            default_speed: 0.1,
            chest_height: 0.5,
            walk_and_pick_object: 1,
            process_variance: 1e-5,
            measurement_variance: 1e-2,
            initial_estimate: 0.0,
            initial_error: 1.0,
            smoother_weight: 0.3,
            sweep_steps: 50,
            sweep_clearance: 0.1,
            position_tolerance: 1e-6,
        }
    }
}

impl SimConfig {
    /// Load a config from JSON. Missing fields fall back to defaults.
    pub fn load(path: &Path) -> SimResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimConfig::default();
        assert_eq!(config.safety_floor, 0.2);
        assert_eq!(config.walk_and_pick_object, 1);
        assert_eq!(config.sweep_steps, 50);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: SimConfig =
            serde_json::from_str(r#"{ "default_speed": 0.25, "safety_floor": 0.3 }"#).unwrap();
        assert_eq!(config.default_speed, 0.25);
        assert_eq!(config.safety_floor, 0.3);
        assert_eq!(config.measurement_variance, 1e-2);
        assert_eq!(config.chest_height, 0.5);
    }
}
