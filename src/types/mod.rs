pub mod linalg;

pub use linalg::*;

use serde::{Deserialize, Serialize};

/// Identifier handed out by `add_cube`, starting at 1.
pub type ObjectId = u32;

pub const FIRST_OBJECT_ID: ObjectId = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Cube,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimObject {
    pub kind: ObjectKind,
    pub position: Vec3,
}

/// Diagnostics emitted by the simulator. Soft rejections never surface as
/// errors; they show up here (and in the log) with state left unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    RobotLoaded { arm_enabled: bool },
    ObstacleBlocked { candidate_x: f64, obstacle: Vec3 },
    NavigationHalted { position_x: f64, target_x: f64 },
    TargetReached { position_x: f64 },
    InvalidSpeed { speed: f64 },
    ArmBelowSafetyFloor { requested: Vec3, floor: f64 },
    ArmMoved { position: Vec3 },
    UnknownObject { object_id: ObjectId },
    GripperClosed { object_id: ObjectId },
    GripperReleased { object_id: ObjectId },
    CubeAdded { object_id: ObjectId, position: Vec3 },
}

impl SimEvent {
    /// Soft rejections: the command was refused without raising an error.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            SimEvent::ObstacleBlocked { .. }
                | SimEvent::InvalidSpeed { .. }
                | SimEvent::ArmBelowSafetyFloor { .. }
                | SimEvent::UnknownObject { .. }
        )
    }
}
