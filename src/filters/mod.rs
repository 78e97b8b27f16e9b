/// State estimators used by the sensor-fusion checks
///
/// A scalar Kalman filter, its per-axis variant, and the exponential
/// smoother used as a lightweight stand-in.
pub mod kalman;
pub mod smoothing;

pub use kalman::{AxisEstimator, ScalarEstimator, ScalarEstimatorState};
pub use smoothing::ExponentialSmoother;
