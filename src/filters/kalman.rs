use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::types::{Vec3, AXIS_COUNT};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScalarEstimatorState {
    pub estimate: f64,
    pub error_covariance: f64,
    pub kalman_gain: f64,
    pub updates: u64,
}

/// Single-variable Kalman filter tracking one noisy measurement stream.
///
/// Constant-state model: predict only inflates the covariance by the
/// process variance. There is no reset; build a new filter to restart.
#[derive(Clone, Debug)]
pub struct ScalarEstimator {
    estimate: f64,
    error_covariance: f64,
    process_variance: f64,
    measurement_variance: f64,
    kalman_gain: f64,
    update_count: u64,
}

impl Default for ScalarEstimator {
    fn default() -> Self {
        Self::new(1e-5, 1e-2, 0.0, 1.0)
    }
}

impl ScalarEstimator {
    pub fn new(
        process_variance: f64,
        measurement_variance: f64,
        initial_estimate: f64,
        initial_error: f64,
    ) -> Self {
        Self {
            estimate: initial_estimate,
            error_covariance: initial_error.max(0.0),
            process_variance: process_variance.max(0.0),
            measurement_variance: measurement_variance.max(0.0),
            kalman_gain: 0.0,
            update_count: 0,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(
            config.process_variance,
            config.measurement_variance,
            config.initial_estimate,
            config.initial_error,
        )
    }

    /// Fold one measurement into the estimate and return the new estimate.
    pub fn update(&mut self, measurement: f64) -> f64 {
        // Predict
        self.error_covariance += self.process_variance;

        // Gain in [0, 1]; zero total variance means nothing to correct
        let innovation_variance = self.error_covariance + self.measurement_variance;
        self.kalman_gain = if innovation_variance > 0.0 {
            self.error_covariance / innovation_variance
        } else {
            0.0
        };

        // Correct
        self.estimate += self.kalman_gain * (measurement - self.estimate);
        self.error_covariance *= 1.0 - self.kalman_gain;

        self.update_count += 1;
        self.estimate
    }

    pub fn estimate(&self) -> f64 {
        self.estimate
    }

    pub fn error_covariance(&self) -> f64 {
        self.error_covariance
    }

    /// Gain applied by the most recent update (0 before the first one).
    pub fn kalman_gain(&self) -> f64 {
        self.kalman_gain
    }

    pub fn process_variance(&self) -> f64 {
        self.process_variance
    }

    pub fn measurement_variance(&self) -> f64 {
        self.measurement_variance
    }

    pub fn get_state(&self) -> ScalarEstimatorState {
        ScalarEstimatorState {
            estimate: self.estimate,
            error_covariance: self.error_covariance,
            kalman_gain: self.kalman_gain,
            updates: self.update_count,
        }
    }
}

/// Three independent scalar filters, one per axis, sharing noise parameters.
#[derive(Clone, Debug)]
pub struct AxisEstimator {
    axes: [ScalarEstimator; AXIS_COUNT],
}

impl Default for AxisEstimator {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}

impl AxisEstimator {
    pub fn new(
        process_variance: f64,
        measurement_variance: f64,
        initial_estimate: Vec3,
        initial_error: f64,
    ) -> Self {
        let axis = |i: usize| {
            ScalarEstimator::new(
                process_variance,
                measurement_variance,
                initial_estimate[i],
                initial_error,
            )
        };
        Self {
            axes: [axis(0), axis(1), axis(2)],
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(
            config.process_variance,
            config.measurement_variance,
            Vec3::repeat(config.initial_estimate),
            config.initial_error,
        )
    }

    pub fn update(&mut self, measurement: &Vec3) -> Vec3 {
        for (axis, value) in self.axes.iter_mut().zip(measurement.iter()) {
            axis.update(*value);
        }
        self.estimate()
    }

    pub fn estimate(&self) -> Vec3 {
        Vec3::new(
            self.axes[0].estimate(),
            self.axes[1].estimate(),
            self.axes[2].estimate(),
        )
    }

    pub fn error_covariance(&self) -> Vec3 {
        Vec3::new(
            self.axes[0].error_covariance(),
            self.axes[1].error_covariance(),
            self.axes[2].error_covariance(),
        )
    }

    pub fn axis(&self, index: usize) -> Option<&ScalarEstimator> {
        self.axes.get(index)
    }
}
