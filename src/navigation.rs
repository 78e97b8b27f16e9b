//! Free-pose navigation for walking checks
//!
//! Unlike `KinematicState`, a `Pose` moves in any direction and knows nothing
//! about obstacles. Forward/backward act on y, left/right on x, up/down on z.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::types::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Unit offset for one unit of travel in this direction
    pub fn unit(self) -> Vec3 {
        match self {
            Direction::Forward => Vec3::new(0.0, 1.0, 0.0),
            Direction::Backward => Vec3::new(0.0, -1.0, 0.0),
            Direction::Left => Vec3::new(-1.0, 0.0, 0.0),
            Direction::Right => Vec3::new(1.0, 0.0, 0.0),
            Direction::Up => Vec3::new(0.0, 0.0, 1.0),
            Direction::Down => Vec3::new(0.0, 0.0, -1.0),
        }
    }
}

impl FromStr for Direction {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "forward" => Ok(Direction::Forward),
            "backward" => Ok(Direction::Backward),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            _ => Err(SimError::UnknownDirection(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZigZag {
    ForwardAndRight,
    BackwardAndLeft,
}

impl FromStr for ZigZag {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "forward and right" => Ok(ZigZag::ForwardAndRight),
            "backward and left" => Ok(ZigZag::BackwardAndLeft),
            _ => Err(SimError::UnknownPattern(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub walking: bool,
    pub crouched: bool,
}

impl Pose {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn move_in(&mut self, direction: Direction, distance: f64) {
        self.position += direction.unit() * distance;
    }

    /// Parse-and-move helper for textual commands ("Forward", "up", ...)
    pub fn move_named(&mut self, direction: &str, distance: f64) -> SimResult<()> {
        let direction: Direction = direction.parse()?;
        self.move_in(direction, distance);
        Ok(())
    }

    pub fn move_by(&mut self, offset: &Vec3) {
        self.position += offset;
    }

    /// Two legs of the pattern, repeated twice
    pub fn zig_zag(&mut self, pattern: ZigZag, forward_leg: f64, side_leg: f64) {
        let sign = match pattern {
            ZigZag::ForwardAndRight => 1.0,
            ZigZag::BackwardAndLeft => -1.0,
        };
        self.position.x += sign * 2.0 * side_leg;
        self.position.y += sign * 2.0 * forward_leg;
    }

    /// A full circle ends where it started; modelled as a return to origin.
    pub fn circle(&mut self, radius: f64) {
        log::debug!("Completing circle of radius {}", radius);
        self.position = Vec3::zeros();
    }

    pub fn start_walking(&mut self) {
        self.walking = true;
    }

    pub fn crouch(&mut self) {
        self.crouched = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::vec3;

    #[test]
    fn test_direction_parsing_is_case_insensitive() {
        assert_eq!("Forward".parse::<Direction>().unwrap(), Direction::Forward);
        assert_eq!(" DOWN ".parse::<Direction>().unwrap(), Direction::Down);
        assert!(matches!(
            "sideways".parse::<Direction>(),
            Err(SimError::UnknownDirection(_))
        ));
    }

    #[test]
    fn test_axis_mapping() {
        let mut pose = Pose::default();
        pose.move_in(Direction::Forward, 2.0);
        pose.move_in(Direction::Right, 1.0);
        pose.move_in(Direction::Up, 0.5);
        assert_eq!(pose.position, vec3([1.0, 2.0, 0.5]));

        pose.move_in(Direction::Backward, 2.0);
        pose.move_in(Direction::Left, 1.0);
        pose.move_in(Direction::Down, 0.5);
        assert_eq!(pose.position, Vec3::zeros());
    }

    #[test]
    fn test_move_named_rejects_unknown() {
        let mut pose = Pose::at(vec3([1.0, 1.0, 1.0]));
        assert!(pose.move_named("north", 1.0).is_err());
        assert_eq!(pose.position, vec3([1.0, 1.0, 1.0]));
    }

    #[test]
    fn test_diagonal_move() {
        let mut pose = Pose::at(vec3([1.0, 1.0, 0.0]));
        pose.move_by(&vec3([0.5, -0.5, 0.25]));
        assert_eq!(pose.position, vec3([1.5, 0.5, 0.25]));
    }

    #[test]
    fn test_zig_zag_patterns() {
        let mut pose = Pose::default();
        pose.zig_zag(ZigZag::ForwardAndRight, 1.0, 0.5);
        assert_eq!(pose.position, vec3([1.0, 2.0, 0.0]));
        pose.zig_zag(ZigZag::BackwardAndLeft, 1.0, 0.5);
        assert_eq!(pose.position, Vec3::zeros());
        assert!("left and up".parse::<ZigZag>().is_err());
        assert_eq!(
            "Forward and Right".parse::<ZigZag>().unwrap(),
            ZigZag::ForwardAndRight
        );
    }

    #[test]
    fn test_circle_returns_to_origin() {
        let mut pose = Pose::default();
        pose.circle(2.0);
        assert_eq!(pose.position, Vec3::zeros());
    }

    #[test]
    fn test_posture_flags() {
        let mut pose = Pose::default();
        assert!(!pose.walking && !pose.crouched);
        pose.start_walking();
        pose.crouch();
        assert!(pose.walking && pose.crouched);
    }
}
