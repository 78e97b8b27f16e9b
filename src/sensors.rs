//! Sensor models for the simulated robot
//!
//! Noisy scalar readings for filter checks and a range-limited proximity
//! scan over object positions.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::types::{distance, Vec3};

/// Scalar sensor with zero-mean Gaussian noise.
///
/// Seeded so a test run is reproducible.
#[derive(Debug, Clone)]
pub struct NoisySensor {
    noise_std: f64,
    rng: StdRng,
    readings: u64,
}

impl NoisySensor {
    pub fn new(noise_std: f64, seed: u64) -> Self {
        Self {
            noise_std: noise_std.abs(),
            rng: StdRng::seed_from_u64(seed),
            readings: 0,
        }
    }

    /// Reading of `true_value` with noise applied
    pub fn read(&mut self, true_value: f64) -> f64 {
        self.readings += 1;
        if self.noise_std == 0.0 {
            return true_value;
        }
        true_value + self.next_gaussian() * self.noise_std
    }

    /// One reading per axis, each with independent noise
    pub fn read_vec3(&mut self, true_value: &Vec3) -> Vec3 {
        Vec3::new(
            self.read(true_value.x),
            self.read(true_value.y),
            self.read(true_value.z),
        )
    }

    pub fn noise_std(&self) -> f64 {
        self.noise_std
    }

    pub fn readings(&self) -> u64 {
        self.readings
    }

    fn next_gaussian(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Detection {
    pub position: Vec3,
    pub distance: f64,
}

/// Proximity sensor that sees everything within `range` of its origin.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RangeSensor {
    pub origin: Vec3,
    pub range: f64,
}

impl Default for RangeSensor {
    fn default() -> Self {
        Self {
            origin: Vec3::zeros(),
            range: 1.0,
        }
    }
}

impl RangeSensor {
    pub fn new(origin: Vec3, range: f64) -> Self {
        Self { origin, range }
    }

    pub fn detects(&self, object: &Vec3) -> bool {
        distance(&self.origin, object) <= self.range
    }

    /// Objects within range, in the order given (boundary inclusive)
    pub fn scan(&self, objects: &[Vec3]) -> Vec<Detection> {
        objects
            .iter()
            .filter_map(|object| {
                let d = distance(&self.origin, object);
                (d <= self.range).then(|| Detection {
                    position: *object,
                    distance: d,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::ScalarEstimator;
    use crate::types::vec3;

    #[test]
    fn test_zero_noise_is_exact() {
        let mut sensor = NoisySensor::new(0.0, 7);
        assert_eq!(sensor.read(1.25), 1.25);
        assert_eq!(sensor.readings(), 1);
    }

    #[test]
    fn test_same_seed_same_readings() {
        let mut a = NoisySensor::new(0.1, 42);
        let mut b = NoisySensor::new(0.1, 42);
        for _ in 0..10 {
            assert_eq!(a.read(0.5), b.read(0.5));
        }
    }

    #[test]
    fn test_noise_is_scaled_standard_normal() {
        let mut sensor = NoisySensor::new(0.3, 5);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..5 {
            let draw: f64 = rng.sample(StandardNormal);
            assert_eq!(sensor.read(2.0), 2.0 + draw * 0.3);
        }
    }

    #[test]
    fn test_noise_statistics() {
        let mut sensor = NoisySensor::new(0.2, 1234);
        let n = 5000;
        let samples: Vec<f64> = (0..n).map(|_| sensor.read(3.0)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n as f64;

        assert!((mean - 3.0).abs() < 0.02);
        assert!((var.sqrt() - 0.2).abs() < 0.02);
    }

    #[test]
    fn test_kalman_filters_noisy_readings() {
        let mut sensor = NoisySensor::new(0.05, 99);
        let mut kf = ScalarEstimator::default();
        for _ in 0..200 {
            kf.update(sensor.read(1.0));
        }
        assert!((kf.estimate() - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_range_sensor_detects_within_range() {
        let sensor = RangeSensor::new(Vec3::zeros(), 1.0);
        let near = vec3([0.3, 0.4, 0.0]);
        let far = vec3([1.0, 1.0, 0.0]);

        let detected = sensor.scan(&[near, far]);

        assert_eq!(detected.len(), 1);
        assert_eq!(detected[0].position, near);
        assert!((detected[0].distance - 0.5).abs() < 1e-12);
        assert!(!sensor.detects(&far));
    }

    #[test]
    fn test_range_boundary_inclusive() {
        let sensor = RangeSensor::new(Vec3::zeros(), 2.0);
        assert!(sensor.detects(&vec3([2.0, 0.0, 0.0])));
    }

    #[test]
    fn test_scan_preserves_order() {
        let sensor = RangeSensor::new(vec3([1.0, 0.0, 0.0]), 5.0);
        let objects = [vec3([3.0, 0.0, 0.0]), vec3([1.5, 0.0, 0.0])];
        let detected: Vec<Vec3> = sensor.scan(&objects).into_iter().map(|d| d.position).collect();
        assert_eq!(detected, objects.to_vec());
    }
}
