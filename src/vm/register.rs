//! Register - Named piston registers and wraparound arithmetic
//!
//! ## Register File
//!
//! ```text
//! R0-R7: general purpose, selected by the 3-bit REGISTER field
//! ```
//!
//! Every value stored in a register (and every coordinate) is reduced modulo
//! [`MAX_INTEGER`] first, so stored values always satisfy `0 <= v < MAX_INTEGER`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Modulus applied to every register and position write (2^20).
pub const MAX_INTEGER: u32 = 1 << 20;

/// Number of registers carried by each piston.
pub const REGISTER_COUNT: usize = 8;

/// Reduce any integer into `0..MAX_INTEGER`.
///
/// Negative values wrap from the top, so `wrap(-1) == MAX_INTEGER - 1`.
pub fn wrap(value: i64) -> u32 {
    value.rem_euclid(MAX_INTEGER as i64) as u32
}

/// A piston register reference (R0-R7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Register(u8);

impl Register {
    pub const R0: Self = Self(0);
    pub const R1: Self = Self(1);
    pub const R2: Self = Self(2);
    pub const R3: Self = Self(3);
    pub const R4: Self = Self(4);
    pub const R5: Self = Self(5);
    pub const R6: Self = Self(6);
    pub const R7: Self = Self(7);

    /// Create a register from its index, `None` past R7
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < REGISTER_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Create a register from the 3-bit REGISTER field (high bits ignored)
    pub const fn from_bits(bits: u32) -> Self {
        Self((bits & 0b111) as u8)
    }

    /// Index into the register file (0-7)
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// All registers in index order
    pub fn all() -> impl Iterator<Item = Register> {
        (0..REGISTER_COUNT as u8).map(Register)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// Auxiliary 2-bit hint stored next to a register value.
///
/// Meaning is handler-specific (display/formatting hints); the engine never
/// interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RegisterOptions(u8);

impl RegisterOptions {
    /// Options value used by the piston-meta position handlers.
    pub const POSITION: Self = Self(1);

    /// Create from the 2-bit OPTIONS field (high bits ignored)
    pub const fn from_bits(bits: u32) -> Self {
        Self((bits & 0b11) as u8)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wrap_basics() {
        assert_eq!(wrap(0), 0);
        assert_eq!(wrap(5), 5);
        assert_eq!(wrap(MAX_INTEGER as i64), 0);
        assert_eq!(wrap(MAX_INTEGER as i64 + 3), 3);
        assert_eq!(wrap(-1), MAX_INTEGER - 1);
    }

    #[test]
    fn test_register_bounds() {
        assert_eq!(Register::new(7), Some(Register::R7));
        assert_eq!(Register::new(8), None);
        assert_eq!(Register::from_bits(0b1_101), Register::R5);
        assert_eq!(Register::all().count(), REGISTER_COUNT);
        assert_eq!(Register::R3.to_string(), "R3");
    }

    #[test]
    fn test_register_options_mask() {
        assert_eq!(RegisterOptions::from_bits(0b111).bits(), 0b11);
        assert_eq!(RegisterOptions::default().bits(), 0);
        assert_eq!(RegisterOptions::POSITION.bits(), 1);
    }

    proptest! {
        #[test]
        fn wrap_always_in_range(v in any::<i64>()) {
            let w = wrap(v);
            prop_assert!(w < MAX_INTEGER);
            prop_assert_eq!(w as i64, v.rem_euclid(MAX_INTEGER as i64));
        }
    }
}
