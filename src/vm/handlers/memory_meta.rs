//! Memory meta family (0xB): register <-> shared memory transfers.
//!
//! The 12-bit argument is the memory address. Both handlers move one cell.

use crate::vm::handler::{Handler, StepContext, StepResult};
use crate::vm::instruction::{DecodedArgs, Family, MetaLayout};

use super::CC_MEMORY_META;

const FAMILY: Family = Family::Meta(MetaLayout::Register);

/// `R <- memory[A]`
pub struct Load;

impl Handler for Load {
    fn control_code(&self) -> u8 {
        CC_MEMORY_META
    }

    fn meta_command(&self) -> Option<u8> {
        Some(0)
    }

    fn family(&self) -> Family {
        FAMILY
    }

    fn glyph(&self) -> char {
        'M'
    }

    fn mnemonic(&self) -> &'static str {
        "LOAD"
    }

    fn description(&self) -> &'static str {
        "Read a memory address into a register"
    }

    fn run(&self, ctx: &mut StepContext<'_>, args: DecodedArgs) -> StepResult {
        if let DecodedArgs::Register { register, options, argument } = args {
            let value = ctx.memory().get(argument);
            ctx.piston_mut().set_register(register, value as i64, options);
        }
        ctx.piston_mut().move_by(1);
        StepResult::Continue
    }
}

/// `memory[A] <- R`
pub struct Store;

impl Handler for Store {
    fn control_code(&self) -> u8 {
        CC_MEMORY_META
    }

    fn meta_command(&self) -> Option<u8> {
        Some(1)
    }

    fn family(&self) -> Family {
        FAMILY
    }

    fn glyph(&self) -> char {
        'M'
    }

    fn mnemonic(&self) -> &'static str {
        "STORE"
    }

    fn description(&self) -> &'static str {
        "Write a register to a memory address"
    }

    fn run(&self, ctx: &mut StepContext<'_>, args: DecodedArgs) -> StepResult {
        if let DecodedArgs::Register { register, argument, .. } = args {
            let value = ctx.piston().register(register);
            ctx.memory_mut().set(argument, value as i64);
        }
        ctx.piston_mut().move_by(1);
        StepResult::Continue
    }
}
