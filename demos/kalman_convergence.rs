/// Example: Kalman Convergence Demo
///
/// Feeds a noisy constant position into the per-axis Kalman estimator and an
/// exponential smoother, printing estimate, gain and covariance as they settle.
///
/// Outputs kalman_convergence.csv for plotting.

use robot_sim_rs::filters::{AxisEstimator, ExponentialSmoother, ScalarEstimator};
use robot_sim_rs::sensors::NoisySensor;
use robot_sim_rs::types::{distance, vec3};
use std::fs::File;
use std::io::Write;

fn main() -> std::io::Result<()> {
    println!("=== Kalman Convergence Demo ===\n");

    let iterations = 50;

    // Scalar: constant 0.5 seen through 0.1 std dev noise
    println!("--- Scalar estimator ---");
    let truth = 0.5;
    let mut sensor = NoisySensor::new(0.1, 42);
    let mut kf = ScalarEstimator::default();

    let mut file = File::create("kalman_convergence.csv")?;
    writeln!(file, "step,measurement,estimate,gain,covariance")?;

    for i in 0..iterations {
        let z = sensor.read(truth);
        let est = kf.update(z);
        writeln!(
            file,
            "{},{:.6},{:.6},{:.6},{:.6e}",
            i,
            z,
            est,
            kf.kalman_gain(),
            kf.error_covariance()
        )?;

        if i % 10 == 0 || i == iterations - 1 {
            println!(
                "  [{:>2}] z={:+.4} est={:.4} K={:.4} P={:.2e}",
                i,
                z,
                est,
                kf.kalman_gain(),
                kf.error_covariance()
            );
        }
    }
    println!("  Final error: {:.4}\n", (kf.estimate() - truth).abs());

    // Per-axis: Kalman vs exponential smoothing on a 3-D position
    println!("--- Axis estimator vs smoother ---");
    let target = vec3([0.3, 0.6, 0.9]);
    let mut axis = AxisEstimator::default();
    let mut smoother = ExponentialSmoother::default();

    for _ in 0..iterations {
        let z = sensor.read_vec3(&target);
        axis.update(&z);
        smoother.update(&z);
    }

    println!("  Truth:    {:?}", target.as_slice());
    println!(
        "  Kalman:   {:?} (err {:.4})",
        axis.estimate().as_slice(),
        distance(&axis.estimate(), &target)
    );
    println!(
        "  Smoother: {:?} (err {:.4})",
        smoother.estimate().as_slice(),
        distance(&smoother.estimate(), &target)
    );

    println!("\nWrote kalman_convergence.csv");
    Ok(())
}
