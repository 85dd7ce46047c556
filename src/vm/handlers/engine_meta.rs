//! Engine meta family (0xE): whole-engine control.
//!
//! ```text
//! 0bCCCCMMMAAAAAAAAAAAAAAAAA
//! C = Control Code (Instruction)    [4 bits]
//! M = Meta Command                  [3 bits]
//! A = Meta Command Arguments        [17 bits]
//! ```

use crate::vm::handler::{Handler, StepContext, StepResult};
use crate::vm::instruction::{DecodedArgs, Family, MetaLayout};

use super::CC_ENGINE_META;

/// Stop the engine: every piston and every queued merge is discarded.
pub struct Kill;

impl Handler for Kill {
    fn control_code(&self) -> u8 {
        CC_ENGINE_META
    }

    fn meta_command(&self) -> Option<u8> {
        Some(0)
    }

    fn family(&self) -> Family {
        Family::Meta(MetaLayout::Generic)
    }

    fn glyph(&self) -> char {
        'E'
    }

    fn mnemonic(&self) -> &'static str {
        "KILL"
    }

    fn description(&self) -> &'static str {
        "Stop the engine immediately"
    }

    fn run(&self, _ctx: &mut StepContext<'_>, _args: DecodedArgs) -> StepResult {
        StepResult::Kill
    }
}
