//! Scripted scenarios
//!
//! A scenario is a JSON (or gzip-compressed JSON) script of robot commands
//! followed by expectations on the final state. Each run starts from a fresh
//! `KinematicState`; nothing is shared between scenarios.
//!
//! ```json
//! {
//!   "name": "obstacle halt",
//!   "commands": [
//!     { "op": "load_robot", "arm": false },
//!     { "op": "add_obstacle", "position": [0.5, 0.0, 0.05] },
//!     { "op": "move_to", "target": [2.0, 0.0, 0.0], "speed": 0.1 }
//!   ],
//!   "expectations": [
//!     { "check": "position_x", "expected": 0.4, "tolerance": 1e-9 }
//!   ]
//! }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::Utc;
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::error::SimResult;
use crate::robot::{KinematicSnapshot, KinematicState, RobotControl};
use crate::types::{ObjectId, SimEvent, Vec3};

// ─── Script format ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Reset,
    LoadRobot {
        #[serde(default)]
        arm: bool,
    },
    StepForward {
        speed: Option<f64>,
    },
    StepBackward {
        speed: Option<f64>,
    },
    MoveTo {
        target: Vec3,
        speed: Option<f64>,
    },
    AddObstacle {
        position: Vec3,
    },
    AddCube {
        position: Vec3,
    },
    MoveArmTo {
        position: Vec3,
    },
    CloseGripper {
        object_id: ObjectId,
    },
    OpenGripper,
    PickAndPlaceFull {
        start: Vec3,
        end: Vec3,
    },
    WalkAndPick {
        walk_target: Vec3,
        pick_position: Vec3,
    },
    /// Run `command` `times` times, stopping at the first error
    Repeat {
        times: usize,
        command: Box<Command>,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Reset => "reset",
            Command::LoadRobot { .. } => "load_robot",
            Command::StepForward { .. } => "step_forward",
            Command::StepBackward { .. } => "step_backward",
            Command::MoveTo { .. } => "move_to",
            Command::AddObstacle { .. } => "add_obstacle",
            Command::AddCube { .. } => "add_cube",
            Command::MoveArmTo { .. } => "move_arm_to",
            Command::CloseGripper { .. } => "close_gripper",
            Command::OpenGripper => "open_gripper",
            Command::PickAndPlaceFull { .. } => "pick_and_place_full",
            Command::WalkAndPick { .. } => "walk_and_pick",
            Command::Repeat { .. } => "repeat",
        }
    }

    fn apply(&self, sim: &mut KinematicState) -> SimResult<()> {
        let default_speed = sim.default_speed();

        match self {
            Command::Reset => sim.reset(),
            Command::LoadRobot { arm } => sim.load_robot(*arm),
            Command::StepForward { speed } => {
                sim.step_forward(speed.unwrap_or(default_speed));
            }
            Command::StepBackward { speed } => {
                sim.step_backward(speed.unwrap_or(default_speed));
            }
            Command::MoveTo { target, speed } => {
                sim.move_to(target, speed.unwrap_or(default_speed));
            }
            Command::AddObstacle { position } => sim.add_obstacle(position),
            Command::AddCube { position } => {
                sim.add_cube(position);
            }
            Command::MoveArmTo { position } => sim.move_arm_to(position)?,
            Command::CloseGripper { object_id } => sim.close_gripper(*object_id),
            Command::OpenGripper => sim.open_gripper(),
            Command::PickAndPlaceFull { start, end } => {
                sim.pick_and_place_full(start, end)?;
            }
            Command::WalkAndPick {
                walk_target,
                pick_position,
            } => sim.walk_and_pick(walk_target, pick_position)?,
            Command::Repeat { times, command } => {
                for _ in 0..*times {
                    command.apply(sim)?;
                }
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Step {
    #[serde(flatten)]
    pub command: Command,
    /// The command is supposed to fail hard (e.g. arm use on an armless robot)
    #[serde(default)]
    pub expect_error: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum Expectation {
    Position {
        expected: Vec3,
        tolerance: Option<f64>,
    },
    PositionX {
        expected: f64,
        tolerance: Option<f64>,
    },
    ArmPosition {
        expected: Vec3,
        tolerance: Option<f64>,
    },
    ObjectPosition {
        object_id: ObjectId,
        expected: Option<Vec3>,
        tolerance: Option<f64>,
    },
    HeldObject {
        expected: Option<ObjectId>,
    },
    ObjectCount {
        expected: usize,
    },
    /// Number of soft rejections (obstacle stops, safety floor, unknown ids)
    Rejections {
        expected: usize,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(alias = "steps")]
    pub commands: Vec<Step>,
    #[serde(default)]
    pub expectations: Vec<Expectation>,
}

impl Scenario {
    /// Load a scenario from `.json` or `.json.gz`
    pub fn load(path: &Path) -> SimResult<Self> {
        let file = File::open(path)?;
        if path.extension().map(|e| e == "gz").unwrap_or(false) {
            let reader = BufReader::new(GzDecoder::new(file));
            Ok(serde_json::from_reader(reader)?)
        } else {
            Ok(serde_json::from_reader(BufReader::new(file))?)
        }
    }
}

// ─── Reports ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub index: usize,
    pub op: String,
    pub error: Option<String>,
    /// `SimError::kind` tag of `error`
    pub error_kind: Option<String>,
    pub expect_error: bool,
    pub events: Vec<SimEvent>,
}

impl CommandOutcome {
    pub fn passed(&self) -> bool {
        self.error.is_some() == self.expect_error
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExpectationOutcome {
    pub check: Expectation,
    pub passed: bool,
    pub actual: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub name: String,
    pub passed: bool,
    pub commands: Vec<CommandOutcome>,
    pub expectations: Vec<ExpectationOutcome>,
    pub final_state: KinematicSnapshot,
}

impl ScenarioReport {
    pub fn rejection_count(&self) -> usize {
        self.commands
            .iter()
            .flat_map(|c| c.events.iter())
            .filter(|e| e.is_rejection())
            .count()
    }

    pub fn failures(&self) -> Vec<String> {
        let commands = self.commands.iter().filter(|c| !c.passed()).map(|c| {
            match &c.error {
                Some(err) => format!("command #{} {} failed: {}", c.index, c.op, err),
                None => format!("command #{} {} succeeded but an error was expected", c.index, c.op),
            }
        });
        let checks = self
            .expectations
            .iter()
            .filter(|e| !e.passed)
            .map(|e| format!("{:?} not met (actual {})", e.check, e.actual));
        commands.chain(checks).collect()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub generated_at: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub scenarios: Vec<ScenarioReport>,
}

impl RunSummary {
    pub fn new(scenarios: Vec<ScenarioReport>) -> Self {
        let passed = scenarios.iter().filter(|s| s.passed).count();
        Self {
            generated_at: Utc::now().to_rfc3339(),
            total: scenarios.len(),
            passed,
            failed: scenarios.len() - passed,
            scenarios,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

// ─── Runner ──────────────────────────────────────────────────────────────────

/// Run `scenario` against a fresh robot.
///
/// A hard failure is recorded against its command and the script carries on,
/// mirroring how a test step error would be reported.
pub fn run(scenario: &Scenario, config: &SimConfig) -> ScenarioReport {
    let mut sim = KinematicState::new(config);
    let mut commands = Vec::with_capacity(scenario.commands.len());

    for (index, step) in scenario.commands.iter().enumerate() {
        let result = step.command.apply(&mut sim);
        let error_kind = result.as_ref().err().map(|e| e.kind().to_string());
        let error = result.err().map(|e| e.to_string());
        if let Some(err) = &error {
            if step.expect_error {
                log::debug!("[{}] #{} {} failed as expected: {}", scenario.name, index, step.command.name(), err);
            } else {
                log::warn!("[{}] #{} {} failed: {}", scenario.name, index, step.command.name(), err);
            }
        }
        commands.push(CommandOutcome {
            index,
            op: step.command.name().to_string(),
            error,
            error_kind,
            expect_error: step.expect_error,
            events: sim.drain_events(),
        });
    }

    let rejections = commands
        .iter()
        .flat_map(|c| c.events.iter())
        .filter(|e| e.is_rejection())
        .count();

    let expectations: Vec<ExpectationOutcome> = scenario
        .expectations
        .iter()
        .map(|check| evaluate(check, &sim, rejections, config.position_tolerance))
        .collect();

    let passed = commands.iter().all(CommandOutcome::passed)
        && expectations.iter().all(|e| e.passed);

    ScenarioReport {
        name: scenario.name.clone(),
        passed,
        commands,
        expectations,
        final_state: sim.get_state(),
    }
}

fn close_to(actual: &Vec3, expected: &Vec3, tolerance: f64) -> bool {
    (actual - expected).iter().all(|d| d.abs() <= tolerance)
}

fn evaluate(
    check: &Expectation,
    sim: &KinematicState,
    rejections: usize,
    default_tolerance: f64,
) -> ExpectationOutcome {
    let tol = |t: &Option<f64>| t.unwrap_or(default_tolerance);

    let (passed, actual) = match check {
        Expectation::Position { expected, tolerance } => {
            let actual = sim.position();
            (close_to(&actual, expected, tol(tolerance)), format!("{:?}", actual.as_slice()))
        }
        Expectation::PositionX { expected, tolerance } => {
            let actual = sim.position().x;
            ((actual - expected).abs() <= tol(tolerance), actual.to_string())
        }
        Expectation::ArmPosition { expected, tolerance } => {
            let actual = sim.arm_position();
            (close_to(&actual, expected, tol(tolerance)), format!("{:?}", actual.as_slice()))
        }
        Expectation::ObjectPosition {
            object_id,
            expected,
            tolerance,
        } => {
            let actual = sim.object_position(*object_id);
            let passed = match (&actual, expected) {
                (Some(a), Some(e)) => close_to(a, e, tol(tolerance)),
                (None, None) => true,
                _ => false,
            };
            (passed, format!("{:?}", actual.as_ref().map(|p| p.as_slice().to_vec())))
        }
        Expectation::HeldObject { expected } => {
            let actual = sim.held_object();
            (actual == *expected, format!("{:?}", actual))
        }
        Expectation::ObjectCount { expected } => {
            let actual = sim.objects().len();
            (actual == *expected, actual.to_string())
        }
        Expectation::Rejections { expected } => (rejections == *expected, rejections.to_string()),
    };

    ExpectationOutcome {
        check: check.clone(),
        passed,
        actual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;

    fn parse(json: &str) -> Scenario {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_obstacle_scenario_passes() {
        let scenario = parse(
            r#"{
                "name": "obstacle halt",
                "commands": [
                    { "op": "load_robot" },
                    { "op": "add_obstacle", "position": [0.5, 0.0, 0.05] },
                    { "op": "repeat", "times": 20, "command": { "op": "step_forward", "speed": 0.1 } }
                ],
                "expectations": [
                    { "check": "position_x", "expected": 0.4, "tolerance": 1e-9 },
                    { "check": "rejections", "expected": 16 }
                ]
            }"#,
        );

        let report = run(&scenario, &SimConfig::default());

        assert!(report.passed, "{:?}", report.failures());
        assert_eq!(report.rejection_count(), 16);
    }

    #[test]
    fn test_expected_hard_failure_counts_as_pass() {
        let scenario = parse(
            r#"{
                "name": "no arm",
                "commands": [
                    { "op": "load_robot", "arm": false },
                    { "op": "pick_and_place_full", "start": [0.3, 0.0, 0.25], "end": [0.6, 0.0, 0.3], "expect_error": true }
                ],
                "expectations": [ { "check": "object_count", "expected": 0 } ]
            }"#,
        );

        let report = run(&scenario, &SimConfig::default());

        assert!(report.passed);
        assert_eq!(report.commands[1].error.as_deref(), Some("Arm not enabled"));
        assert_eq!(report.commands[1].error_kind.as_deref(), Some("arm_disabled"));
    }

    #[test]
    fn test_unexpected_failure_and_unmet_expectation_fail_report() {
        let scenario = parse(
            r#"{
                "name": "broken",
                "commands": [
                    { "op": "move_arm_to", "position": [0.3, 0.0, 0.3] },
                    { "op": "move_to", "target": [0.5, 0.0, 0.0] }
                ],
                "expectations": [ { "check": "position", "expected": [1.0, 0.0, 0.0] } ]
            }"#,
        );

        let report = run(&scenario, &SimConfig::default());

        assert!(!report.passed);
        // The script continues past the hard failure
        assert_eq!(report.final_state.position.x, 0.5);
        assert_eq!(report.failures().len(), 2);
    }

    #[test]
    fn test_transport_scenario() {
        let scenario = parse(
            r#"{
                "name": "carry cube",
                "commands": [
                    { "op": "load_robot", "arm": true },
                    { "op": "add_cube", "position": [0.5, 0.0, 0.25] },
                    { "op": "close_gripper", "object_id": 1 },
                    { "op": "move_to", "target": [1.5, 0.0, 0.0] }
                ],
                "expectations": [
                    { "check": "object_position", "object_id": 1, "expected": [2.0, 0.0, 0.25], "tolerance": 1e-9 },
                    { "check": "held_object", "expected": 1 },
                    { "check": "object_position", "object_id": 5, "expected": null }
                ]
            }"#,
        );

        let report = run(&scenario, &SimConfig::default());
        assert!(report.passed, "{:?}", report.failures());
    }

    #[test]
    fn test_walk_and_pick_scenario_holds_first_cube() {
        let scenario = parse(
            r#"{
                "name": "walk and pick",
                "steps": [
                    { "op": "load_robot", "arm": true },
                    { "op": "add_cube", "position": [0.1, 0.0, 0.3] },
                    { "op": "add_cube", "position": [0.8, 0.0, 0.3] },
                    { "op": "walk_and_pick", "walk_target": [0.8, 0.0, 0.0], "pick_position": [0.8, 0.0, 0.3] }
                ],
                "expectations": [ { "check": "held_object", "expected": 1 } ]
            }"#,
        );

        assert!(run(&scenario, &SimConfig::default()).passed);
    }

    #[test]
    fn test_unknown_op_is_parse_error() {
        let result: Result<Scenario, _> =
            serde_json::from_str(r#"{ "name": "x", "commands": [ { "op": "fly" } ] }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_gzip_scenario() {
        let json = r#"{ "name": "gz", "commands": [ { "op": "step_forward" } ],
                        "expectations": [ { "check": "position_x", "expected": 0.1 } ] }"#;
        let path = std::env::temp_dir().join(format!("robot_sim_{}.json.gz", std::process::id()));
        {
            let file = File::create(&path).unwrap();
            let mut encoder = GzEncoder::new(file, Compression::default());
            encoder.write_all(json.as_bytes()).unwrap();
            encoder.finish().unwrap();
        }

        let scenario = Scenario::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(scenario.name, "gz");
        assert!(run(&scenario, &SimConfig::default()).passed);
    }

    #[test]
    fn test_summary_counts() {
        let ok = parse(r#"{ "name": "ok", "commands": [] }"#);
        let bad = parse(
            r#"{ "name": "bad", "commands": [], "expectations": [ { "check": "object_count", "expected": 1 } ] }"#,
        );
        let config = SimConfig::default();
        let summary = RunSummary::new(vec![run(&ok, &config), run(&bad, &config)]);

        assert_eq!(summary.total, 2);
        assert_eq!(summary.passed, 1);
        assert!(!summary.all_passed());
        assert!(chrono::DateTime::parse_from_rfc3339(&summary.generated_at).is_ok());
    }
}
