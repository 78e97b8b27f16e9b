//! Workspace limits and collision-checked arm sweeps
//!
//! `KinematicState` only gates the arm on its safety floor. These helpers add
//! the box boundary and the obstacle-proximity sweep used by the safety checks.

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::types::{lerp, within_on_all_axes, Vec3};

/// Axis-aligned workspace boundary (unit cube by default)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: Vec3::zeros(),
            max: Vec3::repeat(1.0),
        }
    }
}

impl Bounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Nearest point inside the boundary
    pub fn clamp(&self, point: &Vec3) -> Vec3 {
        Vec3::from_fn(|i, _| point[i].min(self.max[i]).max(self.min[i]))
    }

    pub fn contains(&self, point: &Vec3) -> bool {
        (0..3).all(|i| self.min[i] <= point[i] && point[i] <= self.max[i])
    }
}

#[derive(Clone, Debug)]
pub struct ArmSweep {
    pub steps: usize,
    pub clearance: f64,
}

impl Default for ArmSweep {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SweepResult {
    pub position: Vec3,
    pub collided: bool,
    pub completed_steps: usize,
}

impl ArmSweep {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            steps: config.sweep_steps.max(1),
            clearance: config.sweep_clearance,
        }
    }

    /// Walk the arm from `from` toward `target`.
    ///
    /// Waypoint `i` lies `i/steps` of the way from the current arm position
    /// (not the start) to the target, so increments shrink as the arm closes
    /// in and the last one lands on the target. Stops on the last waypoint that
    /// is clear of every obstacle; a waypoint collides when it is within
    /// `clearance` of an obstacle on all axes.
    pub fn sweep(&self, from: &Vec3, target: &Vec3, obstacles: &[Vec3]) -> SweepResult {
        let steps = self.steps.max(1);
        let mut position = *from;

        for i in 1..=steps {
            let waypoint = lerp(&position, target, i as f64 / steps as f64);
            if let Some(obstacle) = obstacles
                .iter()
                .find(|obstacle| within_on_all_axes(&waypoint, obstacle, self.clearance))
            {
                log::warn!(
                    "Arm sweep stopped at step {}/{} before obstacle {:?}",
                    i - 1,
                    steps,
                    obstacle
                );
                return SweepResult {
                    position,
                    collided: true,
                    completed_steps: i - 1,
                };
            }
            position = waypoint;
        }

        SweepResult {
            position,
            collided: false,
            completed_steps: steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{distance, vec3};

    #[test]
    fn test_clamp_into_unit_cube() {
        let bounds = Bounds::default();
        let clamped = bounds.clamp(&vec3([2.0, -0.5, 0.5]));
        assert_eq!(clamped, vec3([1.0, 0.0, 0.5]));
        assert!(bounds.contains(&clamped));
        assert!(!bounds.contains(&vec3([1.01, 0.0, 0.0])));
    }

    #[test]
    fn test_clamp_keeps_inside_points() {
        let bounds = Bounds::new(vec3([-1.0, -1.0, 0.0]), vec3([1.0, 1.0, 2.0]));
        let p = vec3([0.25, -0.75, 1.5]);
        assert_eq!(bounds.clamp(&p), p);
    }

    #[test]
    fn test_unobstructed_sweep_reaches_target() {
        let sweep = ArmSweep::default();
        let target = vec3([0.5, 0.5, 0.5]);
        let result = sweep.sweep(&Vec3::zeros(), &target, &[]);
        assert!(!result.collided);
        assert_eq!(result.completed_steps, 50);
        assert!((result.position - target).norm() < 1e-12);
    }

    #[test]
    fn test_sweep_stops_before_obstacle() {
        let sweep = ArmSweep::default();
        let obstacle = vec3([0.5, 0.5, 0.5]);
        let result = sweep.sweep(&Vec3::zeros(), &vec3([1.0, 1.0, 1.0]), &[obstacle]);

        assert!(result.collided);
        assert!(distance(&result.position, &obstacle) >= 0.1);
        assert!(result.completed_steps < 50);
    }

    #[test]
    fn test_sweep_stops_before_nearest_of_several() {
        let sweep = ArmSweep::default();
        let near = vec3([0.3, 0.3, 0.3]);
        let far = vec3([0.7, 0.7, 0.7]);
        let result = sweep.sweep(&Vec3::zeros(), &vec3([1.0, 1.0, 1.0]), &[far, near]);

        assert!(result.collided);
        assert!(result.position.x < near.x);
        let min_dist = [near, far]
            .iter()
            .map(|o| distance(&result.position, o))
            .fold(f64::INFINITY, f64::min);
        assert!(min_dist >= 0.1);
    }

    #[test]
    fn test_waypoints_advance_from_current_arm_position() {
        // 0.25, 0.625, 0.90625, 1.0 along x; the third waypoint is too close
        let sweep = ArmSweep {
            steps: 4,
            clearance: 0.1,
        };
        let result = sweep.sweep(
            &Vec3::zeros(),
            &vec3([1.0, 0.0, 0.0]),
            &[vec3([0.95, 0.0, 0.0])],
        );

        assert!(result.collided);
        assert_eq!(result.completed_steps, 2);
        assert!((result.position.x - 0.625).abs() < 1e-12);
    }

    #[test]
    fn test_obstacle_off_path_is_ignored() {
        let sweep = ArmSweep::default();
        let result = sweep.sweep(
            &Vec3::zeros(),
            &vec3([1.0, 0.0, 0.0]),
            &[vec3([0.5, 0.5, 0.0])],
        );
        assert!(!result.collided);
    }
}
