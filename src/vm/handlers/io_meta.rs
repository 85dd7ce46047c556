//! IO meta family (0xC): the shared input/output channel.
//!
//! All four handlers move one cell afterwards.

use crate::vm::handler::{Handler, StepContext, StepResult};
use crate::vm::instruction::{DecodedArgs, Family, MetaLayout};

use super::CC_IO_META;

const FAMILY: Family = Family::Meta(MetaLayout::Register);

/// Read a decimal number from input into a register.
pub struct InNumber;

impl Handler for InNumber {
    fn control_code(&self) -> u8 {
        CC_IO_META
    }

    fn meta_command(&self) -> Option<u8> {
        Some(0)
    }

    fn family(&self) -> Family {
        FAMILY
    }

    fn glyph(&self) -> char {
        'I'
    }

    fn mnemonic(&self) -> &'static str {
        "IN_NUMBER"
    }

    fn description(&self) -> &'static str {
        "Read leading digits from input into a register (0 if none)"
    }

    fn run(&self, ctx: &mut StepContext<'_>, args: DecodedArgs) -> StepResult {
        if let DecodedArgs::Register { register, options, .. } = args {
            let value = ctx.channel_mut().grab_input_number();
            ctx.piston_mut().set_register(register, value as i64, options);
        }
        ctx.piston_mut().move_by(1);
        StepResult::Continue
    }
}

/// Read one character's code point from input into a register.
pub struct InChar;

impl Handler for InChar {
    fn control_code(&self) -> u8 {
        CC_IO_META
    }

    fn meta_command(&self) -> Option<u8> {
        Some(1)
    }

    fn family(&self) -> Family {
        FAMILY
    }

    fn glyph(&self) -> char {
        'I'
    }

    fn mnemonic(&self) -> &'static str {
        "IN_CHAR"
    }

    fn description(&self) -> &'static str {
        "Read one character code from input into a register (0 if exhausted)"
    }

    fn run(&self, ctx: &mut StepContext<'_>, args: DecodedArgs) -> StepResult {
        if let DecodedArgs::Register { register, options, .. } = args {
            let value = ctx.channel_mut().grab_input_char();
            ctx.piston_mut().set_register(register, value as i64, options);
        }
        ctx.piston_mut().move_by(1);
        StepResult::Continue
    }
}

/// Write a register to output as a decimal number.
pub struct OutNumber;

impl Handler for OutNumber {
    fn control_code(&self) -> u8 {
        CC_IO_META
    }

    fn meta_command(&self) -> Option<u8> {
        Some(2)
    }

    fn family(&self) -> Family {
        FAMILY
    }

    fn glyph(&self) -> char {
        'I'
    }

    fn mnemonic(&self) -> &'static str {
        "OUT_NUMBER"
    }

    fn description(&self) -> &'static str {
        "Write a register to output as a number"
    }

    fn run(&self, ctx: &mut StepContext<'_>, args: DecodedArgs) -> StepResult {
        if let Some(register) = args.register() {
            let value = ctx.piston().register(register);
            ctx.channel_mut().write_output(value);
        }
        ctx.piston_mut().move_by(1);
        StepResult::Continue
    }
}

/// Write a register to output as a character.
///
/// Values that are not valid code points are written as U+FFFD.
pub struct OutChar;

impl Handler for OutChar {
    fn control_code(&self) -> u8 {
        CC_IO_META
    }

    fn meta_command(&self) -> Option<u8> {
        Some(3)
    }

    fn family(&self) -> Family {
        FAMILY
    }

    fn glyph(&self) -> char {
        'I'
    }

    fn mnemonic(&self) -> &'static str {
        "OUT_CHAR"
    }

    fn description(&self) -> &'static str {
        "Write a register to output as a character"
    }

    fn run(&self, ctx: &mut StepContext<'_>, args: DecodedArgs) -> StepResult {
        if let Some(register) = args.register() {
            let value = ctx.piston().register(register);
            let c = char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER);
            ctx.channel_mut().write_output(c);
        }
        ctx.piston_mut().move_by(1);
        StepResult::Continue
    }
}
