//! Handler System: Pluggable Instruction Behaviours
//!
//! A handler implements one instruction. It is keyed by its control code and,
//! inside a meta family, by its meta command. Handlers run against a single
//! piston through a [`StepContext`], which is also their only route to the
//! engine: memory, the IO channel, forks and priority changes. Handlers never
//! touch the active piston list; engine-level effects are queued and applied
//! after every piston has stepped.
//!
//! ## Control Code Ranges
//!
//! ```text
//! 0x0-0x7   Plain instructions (one handler per control code)
//! 0x8-0xF   Plain or meta families (up to 8 handlers per control code)
//! ```

use super::channel::Channel;
use super::engine::Shared;
use super::instruction::{DecodedArgs, Family, MetaLayout};
use super::memory::Memory;
use super::piston::{Piston, Turn};
use std::fmt;
use std::fmt::Write as FmtWrite;

/// Result of running a single instruction on a piston.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// Continue with the next cycle.
    Continue,
    /// The piston is finished and will be pruned at the end of the cycle.
    End,
    /// Stop the whole engine immediately.
    Kill,
}

/// Execution context passed to [`Handler::run`].
///
/// Provides mutable access to the stepping piston and the engine-owned
/// shared state. Only one handler runs at a time, so no locking is needed.
pub struct StepContext<'a> {
    piston: &'a mut Piston,
    shared: &'a mut Shared,
}

impl<'a> StepContext<'a> {
    pub(crate) fn new(piston: &'a mut Piston, shared: &'a mut Shared) -> Self {
        Self { piston, shared }
    }

    pub fn piston(&self) -> &Piston {
        self.piston
    }

    pub fn piston_mut(&mut self) -> &mut Piston {
        self.piston
    }

    pub fn memory(&self) -> &Memory {
        &self.shared.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.shared.memory
    }

    pub fn channel_mut(&mut self) -> &mut Channel {
        &mut self.shared.channel
    }

    /// Queue a fork of the current piston. The copy joins the active list
    /// after this cycle's steps and first runs next cycle.
    pub fn fork(&mut self, turn: Turn) {
        self.shared.fork(self.piston, turn);
    }

    /// Set the piston's priority and queue its reinsertion into the
    /// priority-ordered active list.
    pub fn change_priority(&mut self, priority: i32) {
        self.piston.set_priority(priority);
        self.shared.priority_changed(self.piston);
    }
}

/// Handler trait. Implement this to add an instruction to the registry.
pub trait Handler: Send + Sync {
    /// Control code (0x0-0xF) this handler answers to.
    fn control_code(&self) -> u8;

    /// Meta command within a meta family; `None` matches on the control code alone.
    fn meta_command(&self) -> Option<u8> {
        None
    }

    /// Family the handler must be registered under.
    fn family(&self) -> Family {
        Family::Plain
    }

    /// Single display glyph (documentation only).
    fn glyph(&self) -> char;

    /// Mnemonic (e.g., "POS_Y").
    fn mnemonic(&self) -> &'static str;

    /// Human-readable description (documentation only).
    fn description(&self) -> &'static str;

    /// Execute against the piston in `ctx`.
    fn run(&self, ctx: &mut StepContext<'_>, args: DecodedArgs) -> StepResult;
}

impl fmt::Debug for dyn Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.meta_command() {
            Some(mc) => write!(f, "Handler(0x{:X}/{} {} '{}')", self.control_code(), mc, self.mnemonic(), self.glyph()),
            None => write!(f, "Handler(0x{:X} {} '{}')", self.control_code(), self.mnemonic(), self.glyph()),
        }
    }
}

/// Render the bit-layout reference card for a handler.
pub fn reference_card(handler: &dyn Handler) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "{} ({})", handler.mnemonic(), handler.glyph());
    let _ = writeln!(s, "{}", handler.description());
    let _ = writeln!(s);
    match handler.family() {
        Family::Plain => {
            let _ = writeln!(s, "0bCCCCAAAAAAAAAAAAAAAAAAAA");
            let _ = writeln!(s, "C = Control Code (Instruction)    [4 bits] = 0x{:X}", handler.control_code());
            let _ = writeln!(s, "A = Arguments                     [20 bits]");
        }
        Family::Meta(MetaLayout::Register) => {
            let _ = writeln!(s, "0bCCCCMMMRRROOAAAAAAAAAAAA");
            let _ = writeln!(s, "C = Control Code (Instruction)    [4 bits] = 0x{:X}", handler.control_code());
            let _ = writeln!(s, "M = Meta Command                  [3 bits] = {}", handler.meta_command().unwrap_or(0));
            let _ = writeln!(s, "R = Register                      [3 bits]");
            let _ = writeln!(s, "O = Register Options              [2 bits]");
            let _ = writeln!(s, "A = Meta Command Arguments        [12 bits]");
        }
        Family::Meta(MetaLayout::Generic) => {
            let _ = writeln!(s, "0bCCCCMMMAAAAAAAAAAAAAAAAA");
            let _ = writeln!(s, "C = Control Code (Instruction)    [4 bits] = 0x{:X}", handler.control_code());
            let _ = writeln!(s, "M = Meta Command                  [3 bits] = {}", handler.meta_command().unwrap_or(0));
            let _ = writeln!(s, "A = Meta Command Arguments        [17 bits]");
        }
    }
    s
}
