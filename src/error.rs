//! Error types for pixel_lang

use crate::vm::RegistrationError;
use thiserror::Error;

/// An instruction word that the registry cannot resolve to a handler
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// No family is registered for the control code
    #[error("Unknown control code 0x{control_code:X} in word 0x{word:06X}")]
    UnknownControlCode { control_code: u8, word: u32 },

    /// The control code is a meta family but the meta command has no handler
    #[error("Unknown meta command {meta_command} for control code 0x{control_code:X} in word 0x{word:06X}")]
    UnknownMetaCommand {
        control_code: u8,
        meta_command: u8,
        word: u32,
    },
}

/// Engine error type
#[derive(Debug, Error)]
pub enum EngineError {
    /// The handler registry could not be built
    #[error("Registration error: {0}")]
    Registration(#[from] RegistrationError),

    /// A piston fetched a word that does not decode; the run is aborted
    #[error("Decode error in piston {piston_id} at ({x}, {y}): {source}")]
    Decode {
        piston_id: u64,
        x: u32,
        y: u32,
        #[source]
        source: DecodeError,
    },

    /// The engine was aborted by an earlier decode error and needs a reset
    #[error("Engine aborted: {0}")]
    Aborted(DecodeError),

    /// The configured cycle limit was reached before the engine ended
    #[error("Cycle limit of {0} reached")]
    CycleLimit(u64),

    /// Configuration could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
