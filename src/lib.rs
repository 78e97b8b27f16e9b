//! Kinematic robot simulation and scalar Kalman estimation for behaviour tests.
//!
//! Test code builds a fresh [`KinematicState`] (or filter) per test, drives it
//! through commands and asserts on the resulting state.

pub mod config;
pub mod error;
pub mod filters;
pub mod navigation;
pub mod robot;
pub mod safety;
pub mod scenario;
pub mod sensors;
pub mod types;

pub use config::SimConfig;
pub use error::{SimError, SimResult};
pub use filters::{AxisEstimator, ExponentialSmoother, ScalarEstimator};
pub use robot::{KinematicSnapshot, KinematicState, RobotControl};
pub use types::{ObjectId, SimEvent, Vec3};
