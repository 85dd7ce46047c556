//! Instruction - 24-bit instruction words and their decoder
//!
//! ## Format
//!
//! Every cell of a program grid holds one 24-bit word (one RGB pixel).
//! The top nibble always selects the handler family:
//!
//! ```text
//! Plain family:          [CONTROL:4][PAYLOAD:20]
//! Register meta family:  [CONTROL:4][META:3][REGISTER:3][OPTIONS:2][ARGUMENT:12]
//! Generic meta family:   [CONTROL:4][META:3][ARGUMENT:17]
//! ```
//!
//! ## Examples
//!
//! ```text
//! 0xDA4003   piston meta, pos y -> R1
//!   CONTROL  = 0xD
//!   META     = 5
//!   REGISTER = 1
//!   OPTIONS  = 0
//!   ARGUMENT = 3
//! ```

use super::handler::Handler;
use super::register::{Register, RegisterOptions};
use super::registry::HandlerRegistry;
use crate::error::DecodeError;
use std::fmt;

/// A raw 24-bit instruction word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InstructionWord(u32);

impl InstructionWord {
    /// Mask for the 24 significant bits
    pub const MASK: u32 = 0xFF_FFFF;

    const CONTROL_SHIFT: u32 = 20;
    const META_SHIFT: u32 = 17;
    const REGISTER_SHIFT: u32 = 14;
    const OPTIONS_SHIFT: u32 = 12;

    /// Create a word, discarding anything above bit 23
    pub const fn new(raw: u32) -> Self {
        Self(raw & Self::MASK)
    }

    /// Pack an RGB pixel into a word (R is the high byte)
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Build a plain-family word
    pub const fn plain(control_code: u8, payload: u32) -> Self {
        Self::new(((control_code as u32 & 0xF) << Self::CONTROL_SHIFT) | (payload & 0xF_FFFF))
    }

    /// Build a register-meta word
    pub const fn register_meta(
        control_code: u8,
        meta_command: u8,
        register: Register,
        options: RegisterOptions,
        argument: u32,
    ) -> Self {
        Self::new(
            ((control_code as u32 & 0xF) << Self::CONTROL_SHIFT)
                | ((meta_command as u32 & 0b111) << Self::META_SHIFT)
                | ((register.index() as u32) << Self::REGISTER_SHIFT)
                | ((options.bits() as u32) << Self::OPTIONS_SHIFT)
                | (argument & 0xFFF),
        )
    }

    /// Build a generic-meta word
    pub const fn generic_meta(control_code: u8, meta_command: u8, argument: u32) -> Self {
        Self::new(
            ((control_code as u32 & 0xF) << Self::CONTROL_SHIFT)
                | ((meta_command as u32 & 0b111) << Self::META_SHIFT)
                | (argument & 0x1_FFFF),
        )
    }

    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// Top 4 bits
    pub const fn control_code(&self) -> u8 {
        (self.0 >> Self::CONTROL_SHIFT) as u8 & 0xF
    }

    /// Low 20 bits (plain families)
    pub const fn payload(&self) -> u32 {
        self.0 & 0xF_FFFF
    }

    /// Bits 19..17
    pub const fn meta_command(&self) -> u8 {
        (self.0 >> Self::META_SHIFT) as u8 & 0b111
    }

    /// Bits 16..14
    pub const fn register(&self) -> Register {
        Register::from_bits(self.0 >> Self::REGISTER_SHIFT)
    }

    /// Bits 13..12
    pub const fn register_options(&self) -> RegisterOptions {
        RegisterOptions::from_bits(self.0 >> Self::OPTIONS_SHIFT)
    }

    /// Bits 11..0 (register meta layout)
    pub const fn short_argument(&self) -> u32 {
        self.0 & 0xFFF
    }

    /// Bits 16..0 (generic meta layout)
    pub const fn long_argument(&self) -> u32 {
        self.0 & 0x1_FFFF
    }
}

impl From<u32> for InstructionWord {
    fn from(raw: u32) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for InstructionWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:06X}", self.0)
    }
}

/// Argument layout of a meta family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaLayout {
    /// `[META:3][REGISTER:3][OPTIONS:2][ARGUMENT:12]`
    Register,
    /// `[META:3][ARGUMENT:17]`
    Generic,
}

/// How a control code's remaining 20 bits are decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// One handler per control code, 20-bit payload
    Plain,
    /// Up to eight handlers multiplexed by the meta command
    Meta(MetaLayout),
}

/// Arguments extracted from a word according to its family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedArgs {
    Plain {
        payload: u32,
    },
    Register {
        register: Register,
        options: RegisterOptions,
        argument: u32,
    },
    Generic {
        argument: u32,
    },
}

impl DecodedArgs {
    /// Extract the arguments of `word` for a family
    pub fn extract(word: InstructionWord, family: Family) -> Self {
        match family {
            Family::Plain => Self::Plain { payload: word.payload() },
            Family::Meta(MetaLayout::Register) => Self::Register {
                register: word.register(),
                options: word.register_options(),
                argument: word.short_argument(),
            },
            Family::Meta(MetaLayout::Generic) => Self::Generic {
                argument: word.long_argument(),
            },
        }
    }

    /// The numeric argument regardless of layout
    pub fn argument(&self) -> u32 {
        match *self {
            Self::Plain { payload } => payload,
            Self::Register { argument, .. } | Self::Generic { argument } => argument,
        }
    }

    /// The register field, if the layout carries one
    pub fn register(&self) -> Option<Register> {
        match *self {
            Self::Register { register, .. } => Some(register),
            _ => None,
        }
    }
}

/// A fully resolved instruction, ready to run against a piston
#[derive(Clone, Copy)]
pub struct DecodedCall<'r> {
    pub word: InstructionWord,
    pub handler: &'r dyn Handler,
    pub args: DecodedArgs,
}

impl fmt::Debug for DecodedCall<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedCall")
            .field("word", &self.word)
            .field("handler", &self.handler.mnemonic())
            .field("args", &self.args)
            .finish()
    }
}

/// Decode a word against a registry.
///
/// # Errors
/// `UnknownControlCode` if no family owns the control code,
/// `UnknownMetaCommand` if a meta family has no handler for the meta command.
pub fn decode(word: InstructionWord, registry: &HandlerRegistry) -> Result<DecodedCall<'_>, DecodeError> {
    let control_code = word.control_code();
    let family = registry
        .family(control_code)
        .ok_or(DecodeError::UnknownControlCode {
            control_code,
            word: word.raw(),
        })?;

    let handler = match family {
        Family::Plain => registry.handler(control_code, None),
        Family::Meta(_) => registry.handler(control_code, Some(word.meta_command())),
    };

    let handler = match (handler, family) {
        (Some(h), _) => h,
        (None, Family::Meta(_)) => {
            return Err(DecodeError::UnknownMetaCommand {
                control_code,
                meta_command: word.meta_command(),
                word: word.raw(),
            })
        }
        (None, Family::Plain) => {
            return Err(DecodeError::UnknownControlCode {
                control_code,
                word: word.raw(),
            })
        }
    };

    Ok(DecodedCall {
        word,
        handler,
        args: DecodedArgs::extract(word, family),
    })
}
