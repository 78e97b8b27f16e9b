/// Example: Obstacle Course Demo
///
/// Drives the kinematic robot toward a target past an obstacle, then runs a
/// pick-and-place and a sensor scan, printing the state after each phase.

use robot_sim_rs::robot::{KinematicState, RobotControl};
use robot_sim_rs::safety::ArmSweep;
use robot_sim_rs::sensors::RangeSensor;
use robot_sim_rs::types::vec3;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    println!("=== Obstacle Course Demo ===\n");

    let mut robot = KinematicState::default();
    robot.load_robot(true);

    // Phase 1: drive toward x = 2.0 with an obstacle at x = 1.0
    println!("--- Phase 1: Blocked Navigation ---");
    robot.add_obstacle(&vec3([1.0, 0.0, 0.0]));
    robot.move_to(&vec3([2.0, 0.0, 0.0]), 0.1);
    println!("  Base x: {:.2} (target 2.0)", robot.position().x);
    for event in robot.drain_events() {
        println!("  event: {:?}", event);
    }

    // Phase 2: clear run on a fresh robot
    println!("\n--- Phase 2: Clear Run ---");
    robot.reset();
    robot.load_robot(true);
    robot.move_to(&vec3([1.5, 0.0, 0.0]), 0.1);
    println!("  Base x: {:.2}", robot.position().x);
    println!("  Arm:    {:?}", robot.arm_position().as_slice());

    // Phase 3: pick and place
    println!("\n--- Phase 3: Pick and Place ---");
    let id = robot.pick_and_place_full(&vec3([0.5, 0.5, 0.5]), &vec3([0.8, 0.8, 0.8]))?;
    println!(
        "  Cube {} now at {:?}",
        id,
        robot.object_position(id).map(|p| p.as_slice().to_vec())
    );
    println!("  Held object: {:?}", robot.held_object());

    // Phase 4: swept arm motion and proximity scan
    println!("\n--- Phase 4: Sweep and Scan ---");
    let obstacle = vec3([0.5, 0.5, 0.5]);
    let sweep = ArmSweep::default().sweep(&vec3([0.0, 0.0, 0.0]), &vec3([1.0, 1.0, 1.0]), &[obstacle]);
    println!(
        "  Sweep stopped={} after {} steps at {:?}",
        sweep.collided,
        sweep.completed_steps,
        sweep.position.as_slice()
    );

    let sensor = RangeSensor::new(robot.position(), 2.0);
    let cubes: Vec<_> = robot.objects().values().map(|o| o.position).collect();
    for detection in sensor.scan(&cubes) {
        println!(
            "  detected {:?} at {:.3}",
            detection.position.as_slice(),
            detection.distance
        );
    }

    println!("\n=== Final State ===");
    println!("{}", serde_json::to_string_pretty(&robot.get_state())?);
    Ok(())
}
