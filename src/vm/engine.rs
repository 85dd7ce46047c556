//! Engine - Lock-step scheduler for every active piston
//!
//! ## Cycle
//!
//! ```text
//! 1. ended?            -> nothing to do
//! 2. step              every active piston, in list order, exactly once
//! 3. merge             apply queued forks / priority moves, in queue order
//! 4. clear             the merge queue
//! 5. prune             pistons whose ended flag is set
//! 6. cycles += 1
//! ```
//!
//! ## States
//!
//! ```text
//! Ready --run_one_instruction--> Running --last piston pruned--> Ended
//!                                   |
//!                                   +--decode error--> Aborted (until reset)
//! ```
//!
//! Execution is single-threaded. "Concurrency" is the interleaving of piston
//! steps inside a cycle, and list order is part of the observable behaviour.

use super::channel::Channel;
use super::handler::StepResult;
use super::memory::Memory;
use super::merge::{MergeQueue, MergeRequest, Side};
use super::piston::{Piston, PistonId, Turn};
use super::registry::HandlerRegistry;
use super::snapshot::PistonSnapshot;
use crate::config::EngineConfig;
use crate::error::{DecodeError, EngineError, Result};
use crate::grid::ProgramGrid;

/// Lifecycle state of an engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineState {
    /// Just reset; no cycle has run yet.
    Ready,
    /// At least one cycle has run and pistons remain.
    Running,
    /// No active pistons and nothing queued.
    Ended,
    /// A word failed to decode; the engine must be reset.
    Aborted(DecodeError),
}

/// Engine-owned state reachable from handlers.
#[derive(Debug, Clone, Default)]
pub(crate) struct Shared {
    pub(crate) memory: Memory,
    pub(crate) channel: Channel,
    pub(crate) merges: MergeQueue,
    next_id: PistonId,
}

impl Shared {
    pub(crate) fn new(input: &str) -> Self {
        Self {
            channel: Channel::new(input),
            ..Self::default()
        }
    }

    pub(crate) fn make_id(&mut self) -> PistonId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Copy `piston`, turn and advance the copy, and queue it beside the original.
    ///
    /// A reversed copy goes to the right of its parent.
    pub(crate) fn fork(&mut self, piston: &Piston, turn: Turn) {
        let mut entrant = piston.fork_copy(self.make_id());
        entrant.turn(turn);
        entrant.move_by(1);

        let side = match turn {
            Turn::Left => Side::Left,
            Turn::Right | Turn::Reverse => Side::Right,
        };
        log::debug!("^  piston forked! Id: {} from {} ({:?})", entrant.id(), piston.id(), turn);
        self.merges.push(MergeRequest::Fork {
            anchor: piston.id(),
            entrant,
            side,
        });
    }

    /// Queue `piston` to be moved to its place in priority order.
    pub(crate) fn priority_changed(&mut self, piston: &Piston) {
        self.merges.push(MergeRequest::Reprioritize {
            piston: piston.id(),
            priority: piston.priority(),
        });
    }
}

/// Runs pistons over a program grid.
pub struct Engine<'r> {
    grid: Box<dyn ProgramGrid>,
    registry: &'r HandlerRegistry,
    config: EngineConfig,
    original_input: String,
    pistons: Vec<Piston>,
    shared: Shared,
    cycles: u64,
    runs: u64,
    aborted: Option<DecodeError>,
}

impl Engine<'static> {
    /// Create an engine over the standard handler catalog, reset and ready.
    ///
    /// # Errors
    /// `EngineError::Registration` if the standard registry cannot be built.
    pub fn new(grid: impl ProgramGrid + 'static, input: &str) -> Result<Self> {
        let registry = HandlerRegistry::standard()?;
        Ok(Engine::with_config(grid, input, EngineConfig::default(), registry))
    }
}

impl<'r> Engine<'r> {
    /// Create an engine with an explicit configuration and registry.
    pub fn with_config(
        grid: impl ProgramGrid + 'static,
        input: &str,
        config: EngineConfig,
        registry: &'r HandlerRegistry,
    ) -> Self {
        let mut engine = Self {
            grid: Box::new(grid),
            registry,
            config,
            original_input: input.to_string(),
            pistons: Vec::new(),
            shared: Shared::new(input),
            cycles: 0,
            runs: 0,
            aborted: None,
        };
        engine.reset();
        engine
    }

    /// Restore the initial input, clear all state and spawn one piston per
    /// start point.
    pub fn reset(&mut self) {
        self.cycles = 0;
        self.aborted = None;
        self.shared = Shared::new(&self.original_input);
        self.pistons = self
            .grid
            .start_points()
            .iter()
            .map(|sp| Piston::new(self.shared.make_id(), sp.x, sp.y, sp.direction))
            .collect();
        self.runs += 1;
        log::info!(
            "{} has reset! Runs: {} ({} pistons)",
            self.config.name,
            self.runs,
            self.pistons.len()
        );
    }

    /// Run cycles until the engine ends.
    ///
    /// # Errors
    /// `Decode`/`Aborted` if a word fails to decode, `CycleLimit` if
    /// `max_cycles` is configured and reached first.
    pub fn run(&mut self) -> Result<()> {
        loop {
            if let Some(err) = &self.aborted {
                return Err(EngineError::Aborted(err.clone()));
            }
            if self.is_ended() {
                return Ok(());
            }
            if let Some(max) = self.config.max_cycles {
                if self.cycles >= max {
                    return Err(EngineError::CycleLimit(max));
                }
            }
            self.run_one_instruction()?;
        }
    }

    /// Run exactly one cycle.
    ///
    /// # Errors
    /// `Decode` when a piston's word fails to decode; the cycle stops there,
    /// nothing is merged or pruned and the engine is aborted. Later calls
    /// return `Aborted` until [`Engine::reset`].
    pub fn run_one_instruction(&mut self) -> Result<()> {
        if let Some(err) = &self.aborted {
            return Err(EngineError::Aborted(err.clone()));
        }
        if self.is_ended() {
            return Ok(());
        }

        let Self {
            grid,
            registry,
            config,
            pistons,
            shared,
            cycles,
            aborted,
            ..
        } = self;

        let mut killed = false;
        for piston in pistons.iter_mut() {
            match piston.run_one_instruction(&**grid, *registry, shared) {
                Ok(StepResult::Kill) => {
                    killed = true;
                    break;
                }
                Ok(_) => {}
                Err(source) => {
                    log::warn!(
                        "{}: piston {} aborted the run at ({}, {}): {}",
                        config.name,
                        piston.id(),
                        piston.pos_x(),
                        piston.pos_y(),
                        source
                    );
                    *aborted = Some(source.clone());
                    return Err(EngineError::Decode {
                        piston_id: piston.id(),
                        x: piston.pos_x(),
                        y: piston.pos_y(),
                        source,
                    });
                }
            }
        }

        if killed {
            log::debug!("{}: killed in cycle {}", config.name, cycles);
            pistons.clear();
            shared.merges.clear();
        }

        shared.merges.drain_into(pistons);
        pistons.retain(|p| !p.is_ended());
        *cycles += 1;
        Ok(())
    }

    /// Drop every piston and every queued merge immediately.
    pub fn kill(&mut self) {
        self.pistons.clear();
        self.shared.merges.clear();
    }

    /// No active pistons and an empty merge queue.
    pub fn is_ended(&self) -> bool {
        self.pistons.is_empty() && self.shared.merges.is_empty()
    }

    pub fn state(&self) -> EngineState {
        if let Some(err) = &self.aborted {
            EngineState::Aborted(err.clone())
        } else if self.is_ended() {
            EngineState::Ended
        } else if self.cycles == 0 {
            EngineState::Ready
        } else {
            EngineState::Running
        }
    }

    // === Accessors ===

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Number of resets, including the one performed on construction
    pub fn runs(&self) -> u64 {
        self.runs
    }

    pub fn output(&self) -> &str {
        self.shared.channel.output()
    }

    pub fn last_output(&self) -> i64 {
        self.shared.channel.last_output()
    }

    /// Input not yet consumed
    pub fn input(&self) -> &str {
        self.shared.channel.input()
    }

    pub fn memory(&self) -> &Memory {
        &self.shared.memory
    }

    /// Active pistons in execution order
    pub fn pistons(&self) -> &[Piston] {
        &self.pistons
    }

    pub fn snapshot(&self) -> Vec<PistonSnapshot> {
        self.pistons.iter().map(PistonSnapshot::from).collect()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &HandlerRegistry {
        self.registry
    }
}

impl std::fmt::Debug for Engine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("name", &self.config.name)
            .field("cycles", &self.cycles)
            .field("runs", &self.runs)
            .field("pistons", &self.pistons.len())
            .field("merges", &self.shared.merges.len())
            .field("state", &self.state())
            .finish()
    }
}
