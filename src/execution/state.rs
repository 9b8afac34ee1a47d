/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Defines a struct as Execution State which is being updated during execution.
//!
//! This state is not as same as the concept of state in World State. Execution encapsulates the changing information
//! during execution life-cycle. It is the state of execution model, but not referring to blockchain storage.

use crate::{
    types::Transaction,
    world_state::{StateChanges, WorldState, WorldStateStorage},
};

use super::cache::WorldStateCache;

/// ExecutionState is a collection of all useful information required to transit a state through Phases.
/// Methods defined in ExecutionState do not directly update data to world state, but go through
/// the [WorldStateCache] which serves as a working copy in between runtime and world state.
pub(crate) struct ExecutionState<'a, S> {
    /*** Transaction ***/
    /// Transaction as a transition input
    pub tx: &'a Transaction,

    /*** World State ***/
    /// Working copy of the committed world state
    pub ctx: WorldStateCache<'a, S>,
}

impl<'a, S> ExecutionState<'a, S>
where
    S: WorldStateStorage,
{
    pub fn new(tx: &'a Transaction, ws: &'a WorldState<S>) -> Self {
        Self {
            tx,
            ctx: WorldStateCache::new(ws),
        }
    }

    /// Discard the changes to world state
    pub fn revert_changes(&mut self) {
        self.ctx.revert();
    }

    /// finalize the pending changes of a successful execution
    pub fn finalize(self) -> StateChanges {
        self.ctx.into_changes()
    }
}
