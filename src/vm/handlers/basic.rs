//! Plain instructions: movement, forking and termination.
//!
//! Each of these reads its arguments from the 20-bit payload.

use crate::vm::handler::{Handler, StepContext, StepResult};
use crate::vm::instruction::DecodedArgs;
use crate::vm::piston::Turn;

use super::{CC_BLANK, CC_DIRECTION, CC_END, CC_FORK, CC_START};

/// No-op; moves one cell.
pub struct Blank;

impl Handler for Blank {
    fn control_code(&self) -> u8 {
        CC_BLANK
    }

    fn glyph(&self) -> char {
        '.'
    }

    fn mnemonic(&self) -> &'static str {
        "BLANK"
    }

    fn description(&self) -> &'static str {
        "Do nothing and move one cell"
    }

    fn run(&self, ctx: &mut StepContext<'_>, _args: DecodedArgs) -> StepResult {
        ctx.piston_mut().move_by(1);
        StepResult::Continue
    }
}

/// Start marker; behaves like a blank once running.
pub struct Start;

impl Handler for Start {
    fn control_code(&self) -> u8 {
        CC_START
    }

    fn glyph(&self) -> char {
        'S'
    }

    fn mnemonic(&self) -> &'static str {
        "START"
    }

    fn description(&self) -> &'static str {
        "Start point marker, moves one cell"
    }

    fn run(&self, ctx: &mut StepContext<'_>, _args: DecodedArgs) -> StepResult {
        ctx.piston_mut().move_by(1);
        StepResult::Continue
    }
}

/// Turn the piston, then move one cell.
///
/// Payload bits 1..0: 0 keep heading, 1 left, 2 right, 3 reverse.
pub struct Redirect;

impl Handler for Redirect {
    fn control_code(&self) -> u8 {
        CC_DIRECTION
    }

    fn glyph(&self) -> char {
        'D'
    }

    fn mnemonic(&self) -> &'static str {
        "DIRECTION"
    }

    fn description(&self) -> &'static str {
        "Turn left, right or around, then move one cell"
    }

    fn run(&self, ctx: &mut StepContext<'_>, args: DecodedArgs) -> StepResult {
        let piston = ctx.piston_mut();
        match args.argument() & 0b11 {
            0 => {}
            1 => piston.turn(Turn::Left),
            2 => piston.turn(Turn::Right),
            _ => piston.turn(Turn::Reverse),
        }
        piston.move_by(1);
        StepResult::Continue
    }
}

/// Split the piston; the original keeps its heading and moves one cell.
///
/// Payload bits 1..0: 0 fork left, 1 fork right, 2-3 fork reverse.
pub struct Fork;

impl Fork {
    pub fn turn_for(payload: u32) -> Turn {
        match payload & 0b11 {
            0 => Turn::Left,
            1 => Turn::Right,
            _ => Turn::Reverse,
        }
    }
}

impl Handler for Fork {
    fn control_code(&self) -> u8 {
        CC_FORK
    }

    fn glyph(&self) -> char {
        'F'
    }

    fn mnemonic(&self) -> &'static str {
        "FORK"
    }

    fn description(&self) -> &'static str {
        "Fork a copy turned left, right or around; both move one cell"
    }

    fn run(&self, ctx: &mut StepContext<'_>, args: DecodedArgs) -> StepResult {
        ctx.fork(Self::turn_for(args.argument()));
        ctx.piston_mut().move_by(1);
        StepResult::Continue
    }
}

/// Terminate the piston.
pub struct End;

impl Handler for End {
    fn control_code(&self) -> u8 {
        CC_END
    }

    fn glyph(&self) -> char {
        'X'
    }

    fn mnemonic(&self) -> &'static str {
        "END"
    }

    fn description(&self) -> &'static str {
        "End this piston"
    }

    fn run(&self, _ctx: &mut StepContext<'_>, _args: DecodedArgs) -> StepResult {
        StepResult::End
    }
}
