//! Merge Queue - Deferred changes to the active piston list
//!
//! Handlers never edit the active list while pistons are stepping. Forks and
//! priority changes are queued here and applied in order once every piston
//! has run, so each piston present at the start of a cycle gets exactly one
//! step.
//!
//! Anchors are looked up by id at drain time, against a list already changed
//! by earlier requests in the same drain.

use super::piston::{Piston, PistonId};

/// Which side of the anchor the entrant is inserted on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Immediately before the anchor
    Left,
    /// Immediately after the anchor
    Right,
}

/// A queued change to the active list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeRequest {
    /// Insert a forked copy next to its parent.
    Fork {
        anchor: PistonId,
        entrant: Piston,
        side: Side,
    },
    /// Move a piston in front of the first piston whose priority is
    /// `<= priority`, or to the end of the list if there is none.
    Reprioritize { piston: PistonId, priority: i32 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeQueue {
    requests: Vec<MergeRequest>,
}

impl MergeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, request: MergeRequest) {
        self.requests.push(request);
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn clear(&mut self) {
        self.requests.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &MergeRequest> {
        self.requests.iter()
    }

    /// Apply every request to `pistons` in queue order, leaving the queue empty.
    pub fn drain_into(&mut self, pistons: &mut Vec<Piston>) {
        for request in self.requests.drain(..) {
            match request {
                MergeRequest::Fork { anchor, entrant, side } => {
                    match pistons.iter().position(|p| p.id() == anchor) {
                        Some(idx) => {
                            let at = match side {
                                Side::Left => idx,
                                Side::Right => idx + 1,
                            };
                            log::debug!("merge: piston {} {:?} of {}", entrant.id(), side, anchor);
                            pistons.insert(at, entrant);
                        }
                        None => {
                            log::warn!(
                                "merge: anchor {} not found for piston {}, appending",
                                anchor,
                                entrant.id()
                            );
                            pistons.push(entrant);
                        }
                    }
                }
                MergeRequest::Reprioritize { piston, priority } => {
                    let Some(idx) = pistons.iter().position(|p| p.id() == piston) else {
                        log::warn!("merge: reprioritized piston {} is gone", piston);
                        continue;
                    };
                    let moving = pistons.remove(idx);
                    match pistons.iter().position(|p| p.priority() <= priority) {
                        Some(at) => {
                            log::debug!(
                                "merge: piston {} (p={}) before {}",
                                piston,
                                priority,
                                pistons[at].id()
                            );
                            pistons.insert(at, moving);
                        }
                        None => {
                            log::debug!("merge: piston {} (p={}) has no anchor, appending", piston, priority);
                            pistons.push(moving);
                        }
                    }
                }
            }
        }
    }
}
