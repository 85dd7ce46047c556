//! Program Grid - The collaborator that supplies instruction words
//!
//! Decoding an image into words is left to the caller: anything that can
//! answer `instruction_at` and list its start points can drive an engine.
//! [`Grid`] is a plain in-memory implementation.

use crate::vm::{Direction, InstructionWord};
use serde::{Deserialize, Serialize};

/// Where a piston is spawned on reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StartPoint {
    pub x: u32,
    pub y: u32,
    pub direction: Direction,
}

impl StartPoint {
    pub const fn new(x: u32, y: u32, direction: Direction) -> Self {
        Self { x, y, direction }
    }
}

/// Source of instruction words for the engine
pub trait ProgramGrid {
    /// Word at a cell, `None` outside the grid
    fn instruction_at(&self, x: u32, y: u32) -> Option<InstructionWord>;

    /// Start points in spawn order
    fn start_points(&self) -> &[StartPoint];
}

/// Row-major in-memory grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<InstructionWord>,
    start_points: Vec<StartPoint>,
}

impl Grid {
    /// A grid filled with blank (0x000000) words
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![InstructionWord::default(); width as usize * height as usize],
            start_points: Vec::new(),
        }
    }

    /// Build from rows of raw 24-bit words; short rows are padded with blanks
    pub fn from_rows(rows: &[Vec<u32>]) -> Self {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut grid = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, &raw) in row.iter().enumerate() {
                grid.set(x as u32, y as u32, InstructionWord::new(raw));
            }
        }
        grid
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Overwrite a cell; writes outside the grid are ignored
    pub fn set(&mut self, x: u32, y: u32, word: InstructionWord) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = word;
        }
    }

    pub fn add_start_point(&mut self, start: StartPoint) {
        self.start_points.push(start);
    }

    /// Builder form of [`Grid::add_start_point`]
    pub fn with_start(mut self, x: u32, y: u32, direction: Direction) -> Self {
        self.add_start_point(StartPoint::new(x, y, direction));
        self
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }
}

impl ProgramGrid for Grid {
    fn instruction_at(&self, x: u32, y: u32) -> Option<InstructionWord> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    fn start_points(&self) -> &[StartPoint] {
        &self.start_points
    }
}
