//! Memory - Address-keyed storage shared by every piston
//!
//! Addresses that were never written read as 0. Values are wrapped at
//! `MAX_INTEGER` on write like registers.

use super::register::wrap;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Memory {
    cells: HashMap<u32, u32>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value at `address`, 0 if never written
    pub fn get(&self, address: u32) -> u32 {
        self.cells.get(&address).copied().unwrap_or(0)
    }

    /// Store `value mod MAX_INTEGER` at `address`
    pub fn set(&mut self, address: u32, value: i64) {
        self.cells.insert(address, wrap(value));
    }

    /// Number of addresses that have been written
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Written cells in address order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let mut cells: Vec<(u32, u32)> = self.cells.iter().map(|(&a, &v)| (a, v)).collect();
        cells.sort_unstable();
        cells.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::register::MAX_INTEGER;

    #[test]
    fn test_unwritten_reads_zero() {
        let memory = Memory::new();
        assert_eq!(memory.get(0), 0);
        assert_eq!(memory.get(12345), 0);
        assert!(memory.is_empty());
    }

    #[test]
    fn test_set_wraps() {
        let mut memory = Memory::new();
        memory.set(3, MAX_INTEGER as i64 + 5);
        memory.set(1, -1);
        assert_eq!(memory.get(3), 5);
        assert_eq!(memory.get(1), MAX_INTEGER - 1);
        assert_eq!(memory.len(), 2);
        assert_eq!(memory.iter().collect::<Vec<_>>(), vec![(1, MAX_INTEGER - 1), (3, 5)]);
    }

    #[test]
    fn test_clear() {
        let mut memory = Memory::new();
        memory.set(7, 7);
        memory.clear();
        assert_eq!(memory.get(7), 0);
    }
}
