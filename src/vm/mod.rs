//! Pixel VM - Lock-step execution of pistons over a program grid
//!
//! A program is a 2D grid of 24-bit instruction words. Pistons walk the grid;
//! every cycle each active piston fetches the word under it, the word is
//! decoded against a [`HandlerRegistry`] and the resolved [`Handler`] runs.
//!
//! ## Format: 24-bit words
//!
//! ```text
//! Plain:          [CC:4][ARGUMENT:20]
//! Register meta:  [CC:4][MC:3][REG:3][OPT:2][ARGUMENT:12]
//! Generic meta:   [CC:4][MC:3][ARGUMENT:17]
//! ```
//!
//! - CC: Control code, selects the instruction family
//! - MC: Meta command within a meta family
//! - REG: Target register (R0-R7)
//! - OPT: Register options hint stored alongside the value
//!
//! ## Shared State
//!
//! ```text
//! Memory   address -> value, unwritten reads 0
//! Channel  consumable input, append-only output, last output value
//! Merges   forks and priority changes, applied after the step pass
//! ```
//!
//! All numeric state wraps at [`MAX_INTEGER`] (2^20).
//!
//! ## Example
//!
//! ```ignore
//! use pixel_lang::{Engine, Grid};
//!
//! let mut engine = Engine::new(grid, "12")?;
//! engine.run()?;
//! println!("{}", engine.output());
//! ```

mod channel;
mod engine;
mod handler;
pub mod handlers;
mod instruction;
mod memory;
mod merge;
mod piston;
mod register;
mod registry;
mod snapshot;

pub use channel::{Channel, OutputItem};
pub use engine::{Engine, EngineState};
pub use handler::{reference_card, Handler, StepContext, StepResult};
pub use instruction::{decode, DecodedArgs, DecodedCall, Family, InstructionWord, MetaLayout};
pub use memory::Memory;
pub use merge::{MergeQueue, MergeRequest, Side};
pub use piston::{Direction, Piston, PistonId, Turn};
pub use register::{wrap, Register, RegisterOptions, MAX_INTEGER, REGISTER_COUNT};
pub use registry::{HandlerRegistry, RegistrationError};
pub use snapshot::PistonSnapshot;
