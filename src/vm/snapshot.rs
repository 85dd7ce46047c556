//! Snapshot Types for Introspection
//!
//! A serializable view of the active pistons, in list order.

use super::piston::{Direction, Piston, PistonId};
use super::register::REGISTER_COUNT;
use serde::{Deserialize, Serialize};

/// Observable state of one piston
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PistonSnapshot {
    pub id: PistonId,
    pub x: u32,
    pub y: u32,
    pub direction: Direction,
    pub registers: [u32; REGISTER_COUNT],
    pub priority: i32,
    pub ended: bool,
}

impl From<&Piston> for PistonSnapshot {
    fn from(piston: &Piston) -> Self {
        Self {
            id: piston.id(),
            x: piston.pos_x(),
            y: piston.pos_y(),
            direction: piston.direction(),
            registers: *piston.registers(),
            priority: piston.priority(),
            ended: piston.is_ended(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::register::{Register, RegisterOptions};

    #[test]
    fn test_snapshot_serialization() {
        let mut piston = Piston::new(3, 4, 5, Direction::Down);
        piston.set_register(Register::R1, 11, RegisterOptions::default());
        let snapshot = PistonSnapshot::from(&piston);

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"direction\":\"down\""));
        let restored: PistonSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, snapshot);
        assert_eq!(restored.registers[1], 11);
    }
}
