//! Kinematic robot state: base, arm, gripper, obstacles and placed objects.
//!
//! Motion is forward-only along x with an all-or-nothing obstacle check per
//! step. The arm and any held object ride along with the base in x.
//!
//! Two failure tiers:
//!   - arm operations on a robot loaded without an arm return `SimError::ArmDisabled`
//!   - obstacle stops, safety-floor refusals and unknown object ids leave state
//!     untouched and are only reported through `SimEvent`s and the log

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::error::{SimError, SimResult};
use crate::types::{origin, ObjectId, ObjectKind, SimEvent, SimObject, Vec3, FIRST_OBJECT_ID};

pub const DEFAULT_SPEED: f64 = 0.1;

/// Operations a test drives a robot through.
///
/// `KinematicState` is the real implementation; tests can plug in a stub to
/// observe call sequences of the composite operations.
pub trait RobotControl {
    fn arm_enabled(&self) -> bool;
    fn position(&self) -> Vec3;
    fn chest_height(&self) -> f64;

    fn step_forward(&mut self, speed: f64);
    fn step_backward(&mut self, speed: f64);
    fn move_to(&mut self, target: &Vec3, speed: f64);

    fn add_cube(&mut self, position: &Vec3) -> ObjectId;
    fn object_position(&self, object_id: ObjectId) -> Option<Vec3>;

    fn move_arm_to(&mut self, position: &Vec3) -> SimResult<()>;
    fn close_gripper(&mut self, object_id: ObjectId);
    fn open_gripper(&mut self);

    /// Step size used by `walk_and_pick`.
    fn default_speed(&self) -> f64 {
        DEFAULT_SPEED
    }

    /// Object `walk_and_pick` grabs. Always the first cube, not the latest one.
    fn walk_and_pick_object(&self) -> ObjectId {
        FIRST_OBJECT_ID
    }

    /// Add a cube at `start`, carry it to `end` and release it.
    ///
    /// Fails before creating the cube when the arm is disabled.
    fn pick_and_place_full(&mut self, start: &Vec3, end: &Vec3) -> SimResult<ObjectId> {
        if !self.arm_enabled() {
            return Err(SimError::ArmDisabled);
        }

        log::info!("Starting full pick and place sequence");
        let cube_id = self.add_cube(start);
        self.move_arm_to(start)?;
        self.close_gripper(cube_id);
        self.move_arm_to(end)?;
        self.open_gripper();
        log::info!("Pick and place sequence completed");
        Ok(cube_id)
    }

    /// Walk to `walk_target`, reach for `pick_position`, close on the first cube.
    ///
    /// The walk happens even when the arm is disabled; the error comes from
    /// the arm move afterwards.
    fn walk_and_pick(&mut self, walk_target: &Vec3, pick_position: &Vec3) -> SimResult<()> {
        let speed = self.default_speed();
        self.move_to(walk_target, speed);
        self.move_arm_to(pick_position)?;
        let object_id = self.walk_and_pick_object();
        self.close_gripper(object_id);
        log::info!("Walk and pick sequence completed");
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KinematicSnapshot {
    pub position: Vec3,
    pub arm_enabled: bool,
    pub arm_position: Vec3,
    pub held_object: Option<ObjectId>,
    pub obstacles: Vec<Vec3>,
    pub objects: BTreeMap<ObjectId, SimObject>,
    pub chest_height: f64,
}

#[derive(Clone, Debug)]
pub struct KinematicState {
    base_position: Vec3,
    arm_enabled: bool,
    arm_position: Vec3,
    obstacles: Vec<Vec3>,
    objects: BTreeMap<ObjectId, SimObject>,
    next_object_id: ObjectId,
    held_object: Option<ObjectId>,
    chest_height: f64,
    events: Vec<SimEvent>,

    // Fixed at construction
    safety_floor: f64,
    default_speed: f64,
    nominal_chest_height: f64,
    walk_and_pick_object: ObjectId,
}

impl Default for KinematicState {
    fn default() -> Self {
        Self::new(&SimConfig::default())
    }
}

impl KinematicState {
    pub fn new(config: &SimConfig) -> Self {
        let mut state = Self {
            base_position: origin(),
            arm_enabled: false,
            arm_position: origin(),
            obstacles: Vec::new(),
            objects: BTreeMap::new(),
            next_object_id: FIRST_OBJECT_ID,
            held_object: None,
            chest_height: config.chest_height,
            events: Vec::new(),
            safety_floor: config.safety_floor,
            default_speed: config.default_speed,
            nominal_chest_height: config.chest_height,
            walk_and_pick_object: config.walk_and_pick_object,
        };
        state.reset();
        state
    }

    /// Back to a freshly constructed robot: origin, no arm, empty world.
    pub fn reset(&mut self) {
        self.base_position = origin();
        self.arm_position = origin();
        self.arm_enabled = false;
        self.obstacles.clear();
        self.objects.clear();
        self.next_object_id = FIRST_OBJECT_ID;
        self.held_object = None;
        self.chest_height = self.nominal_chest_height;
        self.events.clear();
        log::debug!("Simulator state has been reset");
    }

    pub fn load_robot(&mut self, arm_enabled: bool) {
        self.arm_enabled = arm_enabled;
        log::info!("Robot loaded with arm={}", arm_enabled);
        self.events.push(SimEvent::RobotLoaded { arm_enabled });
    }

    pub fn add_obstacle(&mut self, position: &Vec3) {
        self.obstacles.push(*position);
        log::info!("Added obstacle {} at {:?}", self.obstacles.len(), position);
    }

    pub fn arm_position(&self) -> Vec3 {
        self.arm_position
    }

    pub fn held_object(&self) -> Option<ObjectId> {
        self.held_object
    }

    pub fn obstacles(&self) -> &[Vec3] {
        &self.obstacles
    }

    pub fn objects(&self) -> &BTreeMap<ObjectId, SimObject> {
        &self.objects
    }

    pub fn safety_floor(&self) -> f64 {
        self.safety_floor
    }

    /// Diagnostics recorded since the last drain or reset.
    ///
    /// The log is unbounded: a caller that drives one state for a long run
    /// should call `drain_events` periodically (the scenario runner drains
    /// after every command).
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Take every recorded event, leaving the log empty.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn get_state(&self) -> KinematicSnapshot {
        KinematicSnapshot {
            position: self.base_position,
            arm_enabled: self.arm_enabled,
            arm_position: self.arm_position,
            held_object: self.held_object,
            obstacles: self.obstacles.clone(),
            objects: self.objects.clone(),
            chest_height: self.chest_height,
        }
    }

    pub fn disconnect(&self) {
        log::info!("Simulator disconnected");
    }

    /// First obstacle (in insertion order) that a base at `candidate_x` would reach.
    fn blocking_obstacle(&self, candidate_x: f64) -> Option<Vec3> {
        self.obstacles
            .iter()
            .find(|obstacle| candidate_x >= obstacle.x)
            .copied()
    }

    /// Shift the arm and any held object by the base's x displacement.
    fn carry_attached(&mut self, delta_x: f64) {
        self.arm_position.x += delta_x;
        if let Some(object) = self
            .held_object
            .and_then(|id| self.objects.get_mut(&id))
        {
            object.position.x += delta_x;
        }
    }
}

impl RobotControl for KinematicState {
    fn arm_enabled(&self) -> bool {
        self.arm_enabled
    }

    fn position(&self) -> Vec3 {
        self.base_position
    }

    fn chest_height(&self) -> f64 {
        self.chest_height
    }

    fn step_forward(&mut self, speed: f64) {
        let candidate_x = self.base_position.x + speed;
        if let Some(obstacle) = self.blocking_obstacle(candidate_x) {
            log::warn!("Obstacle detected at {:?}, stopping", obstacle);
            self.events.push(SimEvent::ObstacleBlocked {
                candidate_x,
                obstacle,
            });
            return;
        }
        self.base_position.x = candidate_x;
        log::debug!("Robot stepped forward to {:?}", self.base_position);
    }

    fn step_backward(&mut self, speed: f64) {
        self.base_position.x -= speed;
        log::debug!("Robot stepped backward to {:?}", self.base_position);
    }

    fn move_to(&mut self, target: &Vec3, speed: f64) {
        // A non-positive step never reaches the target
        if !speed.is_finite() || speed <= 0.0 {
            log::warn!("Refusing to navigate with speed {}", speed);
            self.events.push(SimEvent::InvalidSpeed { speed });
            return;
        }

        log::info!("Moving robot to target {:?}", target);
        while self.base_position.x < target.x {
            let old_x = self.base_position.x;
            self.step_forward(speed);

            if self.base_position.x == old_x {
                log::warn!(
                    "Position did not change at x={:.3}, path blocked; stopping navigation",
                    old_x
                );
                self.events.push(SimEvent::NavigationHalted {
                    position_x: old_x,
                    target_x: target.x,
                });
                break;
            }

            // Arm and held object take the full step; only the base snaps
            self.carry_attached(self.base_position.x - old_x);

            if self.base_position.x >= target.x {
                self.base_position.x = target.x;
                self.events.push(SimEvent::TargetReached {
                    position_x: self.base_position.x,
                });
                break;
            }
        }
    }

    fn add_cube(&mut self, position: &Vec3) -> ObjectId {
        let object_id = self.next_object_id;
        self.objects.insert(
            object_id,
            SimObject {
                kind: ObjectKind::Cube,
                position: *position,
            },
        );
        self.next_object_id += 1;
        log::info!("Added cube {} at {:?}", object_id, position);
        self.events.push(SimEvent::CubeAdded {
            object_id,
            position: *position,
        });
        object_id
    }

    fn object_position(&self, object_id: ObjectId) -> Option<Vec3> {
        self.objects.get(&object_id).map(|object| object.position)
    }

    fn move_arm_to(&mut self, position: &Vec3) -> SimResult<()> {
        if !self.arm_enabled {
            return Err(SimError::ArmDisabled);
        }
        if position.z < self.safety_floor {
            log::warn!(
                "Arm movement blocked: arm cannot go below z={}",
                self.safety_floor
            );
            self.events.push(SimEvent::ArmBelowSafetyFloor {
                requested: *position,
                floor: self.safety_floor,
            });
            return Ok(());
        }

        self.arm_position = *position;
        log::info!("Arm moved to {:?}", self.arm_position);
        self.events.push(SimEvent::ArmMoved {
            position: *position,
        });
        if let Some(object) = self
            .held_object
            .and_then(|id| self.objects.get_mut(&id))
        {
            object.position = *position;
        }
        Ok(())
    }

    fn close_gripper(&mut self, object_id: ObjectId) {
        if !self.objects.contains_key(&object_id) {
            log::warn!("Gripper closed on unknown object {}", object_id);
            self.events.push(SimEvent::UnknownObject { object_id });
            return;
        }
        self.held_object = Some(object_id);
        log::info!("Gripper closed and attached object {}", object_id);
        self.events.push(SimEvent::GripperClosed { object_id });
    }

    fn open_gripper(&mut self) {
        if let Some(object_id) = self.held_object.take() {
            log::info!("Gripper released object {}", object_id);
            self.events.push(SimEvent::GripperReleased { object_id });
        }
    }

    fn default_speed(&self) -> f64 {
        self.default_speed
    }

    fn walk_and_pick_object(&self) -> ObjectId {
        self.walk_and_pick_object
    }
}
