use crate::config::SimConfig;
use crate::types::Vec3;

/// Exponential moving average over a 3-vector.
///
/// Cheap stand-in for the per-axis Kalman filter in behaviour checks: each
/// update moves the estimate `weight` of the way toward the measurement.
#[derive(Clone, Debug)]
pub struct ExponentialSmoother {
    estimate: Vec3,
    weight: f64,
    updates: u64,
}

impl Default for ExponentialSmoother {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}

impl ExponentialSmoother {
    /// `weight` is clamped to [0, 1]
    pub fn new(initial: Vec3, weight: f64) -> Self {
        ExponentialSmoother {
            estimate: initial,
            weight: weight.clamp(0.0, 1.0),
            updates: 0,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(Vec3::zeros(), config.smoother_weight)
    }

    /// Blend one measurement in and return the smoothed value
    pub fn update(&mut self, measurement: &Vec3) -> Vec3 {
        self.estimate += (measurement - self.estimate) * self.weight;
        self.updates += 1;
        self.estimate
    }

    /// Feed the same measurement `iterations` times
    pub fn converge(&mut self, measurement: &Vec3, iterations: usize) -> Vec3 {
        for _ in 0..iterations {
            self.update(measurement);
        }
        self.estimate
    }

    pub fn estimate(&self) -> Vec3 {
        self.estimate
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn len(&self) -> u64 {
        self.updates
    }

    pub fn is_empty(&self) -> bool {
        self.updates == 0
    }
}
