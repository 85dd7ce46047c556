//! Piston meta family (0xD): introspection of the stepping piston.
//!
//! ```text
//! 0bCCCCMMMRRROOAAAAAAAAAAAA
//! C = Control Code (Instruction)    [4 bits]
//! M = Meta Command                  [3 bits]
//! R = Register                      [3 bits]
//! O = Register Options              [2 bits]
//! A = Meta Command Arguments        [12 bits]
//! ```
//!
//! These handlers leave the piston where it is.

use crate::vm::handler::{Handler, StepContext, StepResult};
use crate::vm::instruction::{DecodedArgs, Family, MetaLayout};
use crate::vm::register::{RegisterOptions, MAX_INTEGER};

use super::CC_PISTON_META;

const FAMILY: Family = Family::Meta(MetaLayout::Register);

/// Copy the piston's x coordinate into a register.
pub struct PosX;

impl Handler for PosX {
    fn control_code(&self) -> u8 {
        CC_PISTON_META
    }

    fn meta_command(&self) -> Option<u8> {
        Some(4)
    }

    fn family(&self) -> Family {
        FAMILY
    }

    fn glyph(&self) -> char {
        'P'
    }

    fn mnemonic(&self) -> &'static str {
        "POS_X"
    }

    fn description(&self) -> &'static str {
        "Put this piston's x position into a register"
    }

    fn run(&self, ctx: &mut StepContext<'_>, args: DecodedArgs) -> StepResult {
        let DecodedArgs::Register { register, .. } = args else {
            return StepResult::Continue;
        };
        let piston = ctx.piston_mut();
        let x = piston.pos_x() % MAX_INTEGER;
        // Options are fixed rather than taken from the OPTIONS field
        piston.set_register(register, x as i64, RegisterOptions::POSITION);
        StepResult::Continue
    }
}

/// Copy the piston's y coordinate into a register.
pub struct PosY;

impl Handler for PosY {
    fn control_code(&self) -> u8 {
        CC_PISTON_META
    }

    fn meta_command(&self) -> Option<u8> {
        Some(5)
    }

    fn family(&self) -> Family {
        FAMILY
    }

    fn glyph(&self) -> char {
        'P'
    }

    fn mnemonic(&self) -> &'static str {
        "POS_Y"
    }

    fn description(&self) -> &'static str {
        "Put this piston's y position into a register"
    }

    fn run(&self, ctx: &mut StepContext<'_>, args: DecodedArgs) -> StepResult {
        let DecodedArgs::Register { register, .. } = args else {
            return StepResult::Continue;
        };
        let piston = ctx.piston_mut();
        let y = piston.pos_y() % MAX_INTEGER;
        // Options are fixed rather than taken from the OPTIONS field
        piston.set_register(register, y as i64, RegisterOptions::POSITION);
        StepResult::Continue
    }
}

/// Set the piston's priority to the 12-bit argument.
///
/// The piston is moved to its place in the priority-ordered list at the
/// end of the cycle.
pub struct Priority;

impl Handler for Priority {
    fn control_code(&self) -> u8 {
        CC_PISTON_META
    }

    fn meta_command(&self) -> Option<u8> {
        Some(6)
    }

    fn family(&self) -> Family {
        FAMILY
    }

    fn glyph(&self) -> char {
        'P'
    }

    fn mnemonic(&self) -> &'static str {
        "PRIORITY"
    }

    fn description(&self) -> &'static str {
        "Set this piston's priority and reorder it among the others"
    }

    fn run(&self, ctx: &mut StepContext<'_>, args: DecodedArgs) -> StepResult {
        ctx.change_priority(args.argument() as i32);
        StepResult::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::engine::Shared;
    use crate::vm::piston::{Direction, Piston};
    use crate::vm::register::Register;

    fn args(register: Register, options: u32, argument: u32) -> DecodedArgs {
        DecodedArgs::Register {
            register,
            options: RegisterOptions::from_bits(options),
            argument,
        }
    }

    #[test]
    fn test_pos_y_only_touches_register() {
        let mut shared = Shared::new("");
        let mut p = Piston::new(3, 17, 42, Direction::Left);
        let before = p.clone();

        let result = {
            let mut ctx = StepContext::new(&mut p, &mut shared);
            PosY.run(&mut ctx, args(Register::R4, 0, 0))
        };

        assert_eq!(result, StepResult::Continue);
        assert_eq!(p.register(Register::R4), 42);
        assert_eq!(p.register_options(Register::R4), RegisterOptions::POSITION);
        assert_eq!((p.pos_x(), p.pos_y(), p.direction()), (17, 42, Direction::Left));
        for r in Register::all().filter(|&r| r != Register::R4) {
            assert_eq!(p.register(r), before.register(r));
        }
        assert!(shared.merges.is_empty());
    }

    #[test]
    fn test_pos_options_ignore_decoded_field() {
        let mut shared = Shared::new("");
        let mut p = Piston::new(0, 9, 1, Direction::Up);
        {
            let mut ctx = StepContext::new(&mut p, &mut shared);
            PosX.run(&mut ctx, args(Register::R0, 3, 0));
        }
        assert_eq!(p.register(Register::R0), 9);
        assert_eq!(p.register_options(Register::R0), RegisterOptions::POSITION);
    }

    #[test]
    fn test_priority_queues_reorder() {
        let mut shared = Shared::new("");
        let mut p = Piston::new(0, 0, 0, Direction::Up);
        {
            let mut ctx = StepContext::new(&mut p, &mut shared);
            Priority.run(&mut ctx, args(Register::R0, 0, 12));
        }
        assert_eq!(p.priority(), 12);
        assert_eq!(shared.merges.len(), 1);
    }
}
