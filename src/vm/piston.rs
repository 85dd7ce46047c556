//! Piston - An execution cursor on the program grid
//!
//! A piston has a position, a heading, eight registers, a priority and an
//! ended flag. Each cycle the engine asks every active piston to fetch the
//! word under it, decode it and run the resolved handler. Movement, register
//! writes and termination are entirely up to the handler.
//!
//! Coordinates and register values wrap at [`MAX_INTEGER`].

use super::engine::Shared;
use super::handler::{StepContext, StepResult};
use super::instruction::decode;
use super::register::{wrap, Register, RegisterOptions, MAX_INTEGER, REGISTER_COUNT};
use super::registry::HandlerRegistry;
use crate::error::DecodeError;
use crate::grid::ProgramGrid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Engine-assigned piston identity
pub type PistonId = u64;

/// Piston heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    #[default]
    Right,
    Down,
    Left,
}

impl Direction {
    /// Decode from 2 bits, clockwise from up
    pub const fn from_bits(bits: u32) -> Self {
        match bits & 0b11 {
            0 => Self::Up,
            1 => Self::Right,
            2 => Self::Down,
            _ => Self::Left,
        }
    }

    /// Rotate 90° counter-clockwise
    pub const fn left(self) -> Self {
        match self {
            Self::Up => Self::Left,
            Self::Left => Self::Down,
            Self::Down => Self::Right,
            Self::Right => Self::Up,
        }
    }

    /// Rotate 90° clockwise
    pub const fn right(self) -> Self {
        match self {
            Self::Up => Self::Right,
            Self::Right => Self::Down,
            Self::Down => Self::Left,
            Self::Left => Self::Up,
        }
    }

    pub const fn reverse(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit step (dx, dy); y grows downward
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Up => "up",
            Self::Right => "right",
            Self::Down => "down",
            Self::Left => "left",
        };
        f.write_str(name)
    }
}

/// Turn applied to a forked copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Turn {
    Left,
    Right,
    Reverse,
}

/// An autonomous execution cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piston {
    id: PistonId,
    x: u32,
    y: u32,
    direction: Direction,
    registers: [u32; REGISTER_COUNT],
    options: [RegisterOptions; REGISTER_COUNT],
    priority: i32,
    ended: bool,
    executed: u64,
}

impl Piston {
    pub fn new(id: PistonId, x: u32, y: u32, direction: Direction) -> Self {
        Self {
            id,
            x: wrap(x as i64),
            y: wrap(y as i64),
            direction,
            registers: [0; REGISTER_COUNT],
            options: [RegisterOptions::default(); REGISTER_COUNT],
            priority: 0,
            ended: false,
            executed: 0,
        }
    }

    // === Accessors ===

    pub fn id(&self) -> PistonId {
        self.id
    }

    pub fn pos_x(&self) -> u32 {
        self.x
    }

    pub fn pos_y(&self) -> u32 {
        self.y
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Instructions this piston has executed since it was created
    pub fn executed(&self) -> u64 {
        self.executed
    }

    pub fn register(&self, register: Register) -> u32 {
        self.registers[register.index()]
    }

    pub fn register_options(&self, register: Register) -> RegisterOptions {
        self.options[register.index()]
    }

    pub fn registers(&self) -> &[u32; REGISTER_COUNT] {
        &self.registers
    }

    // === Movement ===

    /// Advance `n` cells along the current heading (negative moves backwards)
    pub fn move_by(&mut self, n: i64) {
        let (dx, dy) = self.direction.delta();
        let n = n.rem_euclid(MAX_INTEGER as i64);
        self.x = wrap(self.x as i64 + dx * n);
        self.y = wrap(self.y as i64 + dy * n);
    }

    pub fn turn_left(&mut self) {
        self.direction = self.direction.left();
    }

    pub fn turn_right(&mut self) {
        self.direction = self.direction.right();
    }

    pub fn reverse(&mut self) {
        self.direction = self.direction.reverse();
    }

    pub fn turn(&mut self, turn: Turn) {
        match turn {
            Turn::Left => self.turn_left(),
            Turn::Right => self.turn_right(),
            Turn::Reverse => self.reverse(),
        }
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn set_position(&mut self, x: i64, y: i64) {
        self.x = wrap(x);
        self.y = wrap(y);
    }

    // === State ===

    /// Store `value mod MAX_INTEGER` with its options hint
    pub fn set_register(&mut self, register: Register, value: i64, options: RegisterOptions) {
        self.registers[register.index()] = wrap(value);
        self.options[register.index()] = options;
    }

    pub(crate) fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    /// Mark for pruning at the end of the current cycle
    pub fn end(&mut self) {
        self.ended = true;
    }

    /// Independent copy carrying a fresh identity.
    ///
    /// The copy is always active, even if this piston has already ended.
    pub(crate) fn fork_copy(&self, id: PistonId) -> Self {
        Self {
            id,
            ended: false,
            executed: 0,
            ..self.clone()
        }
    }

    // === Execution ===

    /// Fetch, decode and run the word under this piston.
    ///
    /// A piston standing outside the grid ends without running anything.
    ///
    /// # Errors
    /// Returns the `DecodeError` for an unresolvable word; the piston is left
    /// untouched.
    pub(crate) fn run_one_instruction(
        &mut self,
        grid: &dyn ProgramGrid,
        registry: &HandlerRegistry,
        shared: &mut Shared,
    ) -> Result<StepResult, DecodeError> {
        let Some(word) = grid.instruction_at(self.x, self.y) else {
            log::trace!("piston {} left the grid at ({}, {})", self.id, self.x, self.y);
            self.end();
            return Ok(StepResult::End);
        };

        let call = decode(word, registry)?;
        log::trace!(
            "piston {} at ({}, {}) {} -> {}",
            self.id,
            self.x,
            self.y,
            word,
            call.handler.mnemonic()
        );

        self.executed += 1;
        let result = {
            let mut ctx = StepContext::new(self, shared);
            call.handler.run(&mut ctx, call.args)
        };
        if result == StepResult::End {
            self.end();
        }
        Ok(result)
    }
}

impl fmt::Display for Piston {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Piston#{} ({}, {}) {} p={}{}",
            self.id,
            self.x,
            self.y,
            self.direction,
            self.priority,
            if self.ended { " ended" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_turns() {
        assert_eq!(Direction::Up.left(), Direction::Left);
        assert_eq!(Direction::Up.right(), Direction::Right);
        assert_eq!(Direction::Left.reverse(), Direction::Right);
        for d in [Direction::Up, Direction::Right, Direction::Down, Direction::Left] {
            assert_eq!(d.left().right(), d);
            assert_eq!(d.reverse().reverse(), d);
            assert_eq!(d.left().left(), d.reverse());
        }
    }

    #[test]
    fn test_direction_from_bits() {
        assert_eq!(Direction::from_bits(0), Direction::Up);
        assert_eq!(Direction::from_bits(1), Direction::Right);
        assert_eq!(Direction::from_bits(2), Direction::Down);
        assert_eq!(Direction::from_bits(7), Direction::Left);
    }

    #[test]
    fn test_move_wraps_at_zero() {
        let mut p = Piston::new(0, 0, 0, Direction::Up);
        p.move_by(1);
        assert_eq!(p.pos_y(), MAX_INTEGER - 1);
        assert_eq!(p.pos_x(), 0);

        p.reverse();
        p.move_by(2);
        assert_eq!(p.pos_y(), 1);
    }

    #[test]
    fn test_move_along_heading() {
        let mut p = Piston::new(0, 3, 3, Direction::Right);
        p.move_by(2);
        assert_eq!((p.pos_x(), p.pos_y()), (5, 3));
        p.turn_right();
        p.move_by(1);
        assert_eq!((p.pos_x(), p.pos_y()), (5, 4));
        p.turn(Turn::Reverse);
        p.move_by(4);
        assert_eq!((p.pos_x(), p.pos_y()), (5, 0));
    }

    #[test]
    fn test_set_register_wraps_and_keeps_options() {
        let mut p = Piston::new(0, 0, 0, Direction::Right);
        p.set_register(Register::R2, MAX_INTEGER as i64 + 7, RegisterOptions::POSITION);
        assert_eq!(p.register(Register::R2), 7);
        assert_eq!(p.register_options(Register::R2), RegisterOptions::POSITION);

        p.set_register(Register::R0, -2, RegisterOptions::default());
        assert_eq!(p.register(Register::R0), MAX_INTEGER - 2);
    }

    #[test]
    fn test_fork_copy_is_independent() {
        let mut p = Piston::new(4, 1, 2, Direction::Down);
        p.set_register(Register::R1, 99, RegisterOptions::default());
        p.set_priority(3);

        let mut copy = p.fork_copy(9);
        assert_eq!(copy.id(), 9);
        assert_eq!(copy.register(Register::R1), 99);
        assert_eq!(copy.priority(), 3);

        copy.set_register(Register::R1, 1, RegisterOptions::default());
        copy.move_by(1);
        assert_eq!(p.register(Register::R1), 99);
        assert_eq!(p.pos_y(), 2);
    }

    #[test]
    fn test_fork_copy_of_ended_piston_is_active() {
        let mut p = Piston::new(0, 0, 0, Direction::Right);
        p.end();
        let copy = p.fork_copy(1);
        assert!(p.is_ended());
        assert!(!copy.is_ended());
        assert_eq!(copy.executed(), 0);
    }

    proptest! {
        #[test]
        fn register_writes_stay_in_range(v in any::<i64>(), r in 0u8..8) {
            let reg = Register::new(r).unwrap();
            let mut p = Piston::new(0, 0, 0, Direction::Right);
            p.set_register(reg, v, RegisterOptions::default());
            prop_assert!(p.register(reg) < MAX_INTEGER);
            prop_assert_eq!(p.register(reg) as i64, v.rem_euclid(MAX_INTEGER as i64));
        }

        #[test]
        fn position_writes_stay_in_range(x in any::<i64>(), y in any::<i64>()) {
            let mut p = Piston::new(0, 0, 0, Direction::Right);
            p.set_position(x, y);
            prop_assert!(p.pos_x() < MAX_INTEGER && p.pos_y() < MAX_INTEGER);
            prop_assert_eq!(p.pos_x() as i64, x.rem_euclid(MAX_INTEGER as i64));
        }
    }
}
