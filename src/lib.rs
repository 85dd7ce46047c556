//! # pixel_lang - Image-Encoded Piston Engine
//!
//! Programs are grids of 24-bit words (one per pixel). Execution cursors
//! called pistons walk the grid in lock-step, sharing one memory and one
//! text input/output channel.
//!
//! ## Core Components
//!
//! - **InstructionWord**: A 24-bit word, control code in the top nibble
//! - **HandlerRegistry**: Maps control code / meta command to a [`Handler`]
//! - **Piston**: Position, heading, eight registers and a priority
//! - **Engine**: Steps every piston once per cycle, then applies queued
//!   forks and priority moves
//!
//! ## Design Principles
//!
//! - **Wrapping arithmetic**: Registers, coordinates and memory wrap at 2^20
//! - **Deterministic**: Piston list order decides who runs first
//! - **Extensible**: New instructions are registered, not hard-coded
//!
//! ## Example
//!
//! ```ignore
//! use pixel_lang::{Direction, Engine, Grid, InstructionWord};
//!
//! let mut grid = Grid::new(4, 1).with_start(0, 0, Direction::Right);
//! grid.set(1, 0, InstructionWord::plain(0xF, 0));
//!
//! let mut engine = Engine::new(grid, "")?;
//! engine.run()?;
//! ```

// Pixel VM - pistons, handlers, engine
pub mod vm;
pub use vm::{
    // Core types
    Engine, EngineState, Piston, PistonId, Direction, Turn,
    InstructionWord, Register, RegisterOptions, MAX_INTEGER,
    // Handlers
    Handler, HandlerRegistry, RegistrationError, StepContext, StepResult,
    // Shared state
    Memory, Channel, OutputItem, PistonSnapshot,
};

// Program grid and start points
pub mod grid;
pub use grid::{Grid, ProgramGrid, StartPoint};

// Engine configuration
pub mod config;
pub use config::EngineConfig;

// Error types
mod error;
pub use error::{DecodeError, EngineError, Result};
