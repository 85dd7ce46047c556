//! Standard Handler Catalog
//!
//! | CC  | Family         | Handlers                         |
//! |-----|----------------|----------------------------------|
//! | 0x0 | plain          | BLANK                            |
//! | 0x1 | plain          | START                            |
//! | 0x3 | plain          | DIRECTION                        |
//! | 0x4 | plain          | FORK                             |
//! | 0xB | register meta  | LOAD, STORE                      |
//! | 0xC | register meta  | IN_NUMBER, IN_CHAR, OUT_NUMBER, OUT_CHAR |
//! | 0xD | register meta  | POS_X, POS_Y, PRIORITY           |
//! | 0xE | generic meta   | KILL                             |
//! | 0xF | plain          | END                              |
//!
//! Unlisted control codes have no family and fail to decode.

pub mod basic;
pub mod engine_meta;
pub mod io_meta;
pub mod memory_meta;
pub mod piston_meta;

pub use basic::{Blank, End, Fork, Redirect, Start};
pub use engine_meta::Kill;
pub use io_meta::{InChar, InNumber, OutChar, OutNumber};
pub use memory_meta::{Load, Store};
pub use piston_meta::{PosX, PosY, Priority};

use crate::vm::handler::Handler;
use crate::vm::instruction::{Family, MetaLayout};

pub const CC_BLANK: u8 = 0x0;
pub const CC_START: u8 = 0x1;
pub const CC_DIRECTION: u8 = 0x3;
pub const CC_FORK: u8 = 0x4;
pub const CC_MEMORY_META: u8 = 0xB;
pub const CC_IO_META: u8 = 0xC;
pub const CC_PISTON_META: u8 = 0xD;
pub const CC_ENGINE_META: u8 = 0xE;
pub const CC_END: u8 = 0xF;

/// Families of the standard catalog, ascending by control code.
pub fn standard_families() -> Vec<(u8, Family)> {
    vec![
        (CC_BLANK, Family::Plain),
        (CC_START, Family::Plain),
        (CC_DIRECTION, Family::Plain),
        (CC_FORK, Family::Plain),
        (CC_MEMORY_META, Family::Meta(MetaLayout::Register)),
        (CC_IO_META, Family::Meta(MetaLayout::Register)),
        (CC_PISTON_META, Family::Meta(MetaLayout::Register)),
        (CC_ENGINE_META, Family::Meta(MetaLayout::Generic)),
        (CC_END, Family::Plain),
    ]
}

/// Create every standard handler.
pub fn standard_handlers() -> Vec<Box<dyn Handler>> {
    vec![
        Box::new(Blank),
        Box::new(Start),
        Box::new(Redirect),
        Box::new(Fork),
        Box::new(Load),
        Box::new(Store),
        Box::new(InNumber),
        Box::new(InChar),
        Box::new(OutNumber),
        Box::new(OutChar),
        Box::new(PosX),
        Box::new(PosY),
        Box::new(Priority),
        Box::new(Kill),
        Box::new(End),
    ]
}
