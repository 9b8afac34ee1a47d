/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! transition defines the formulation of state transition.
//!
//! A transition never writes to the world state it is given. It produces a [TransitionResult] that
//! carries the complete change set of a valid transaction, and [WorldState::apply_transition] commits
//! it. Running transitions and applying their results strictly in order is what keeps independently
//! validating copies of the ledger identical.

use crate::{
    error::RejectReason,
    execution::{
        execute,
        lifecycle::{Lifecycle, Stage},
    },
    types::{BlockParams, Hash, Transaction, TxStatus},
    world_state::{StateChanges, WorldState, WorldStateStorage},
};

/// Default oldest accepted transaction age: 24 hours, in milliseconds.
pub const DEFAULT_MAX_PAST_AGE: u64 = 24 * 60 * 60 * 1000;

/// Default newest accepted transaction time ahead of the block: 5 minutes, in milliseconds.
pub const DEFAULT_MAX_FUTURE_DRIFT: u64 = 5 * 60 * 1000;

/// Runtime defines a state machine for validating and applying transactions.
#[derive(Clone, Debug)]
pub struct Runtime {
    /// Oldest accepted `created_time`, relative to the block timestamp
    max_past_age: u64,
    /// Newest accepted `created_time`, relative to the block timestamp
    max_future_drift: u64,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// Instantiate Runtime.
    pub fn new() -> Self {
        Self {
            max_past_age: DEFAULT_MAX_PAST_AGE,
            max_future_drift: DEFAULT_MAX_FUTURE_DRIFT,
        }
    }

    /// specify how old (in milliseconds) a transaction may be when its block is applied.
    pub fn set_max_past_age(mut self, max_past_age: u64) -> Self {
        self.max_past_age = max_past_age;
        self
    }

    /// specify how far (in milliseconds) a transaction may be created ahead of its block.
    pub fn set_max_future_drift(mut self, max_future_drift: u64) -> Self {
        self.max_future_drift = max_future_drift;
        self
    }

    pub fn max_past_age(&self) -> u64 {
        self.max_past_age
    }

    pub fn max_future_drift(&self) -> u64 {
        self.max_future_drift
    }

    /// transition validates transaction (tx) against world state (ws) and block data (bd) and executes its commands.
    pub fn transition<S: WorldStateStorage>(
        &self,
        ws: &WorldState<S>,
        tx: &Transaction,
        bd: &BlockParams,
    ) -> TransitionResult {
        execute::execute_transaction(self, ws, tx, bd)
    }
}

/// Result of state transition. It is the return type of [Runtime::transition].
#[derive(Clone, Debug)]
pub struct TransitionResult {
    /// Hash of the transaction
    pub hash: Hash,
    lifecycle: Lifecycle,
    /// Complete change set of a valid transaction. None if rejected.
    changes: Option<StateChanges>,
    /// Reason of rejection. None if no error.
    pub error: Option<RejectReason>,
}

impl TransitionResult {
    pub(crate) fn new(
        hash: Hash,
        lifecycle: Lifecycle,
        changes: Option<StateChanges>,
        error: Option<RejectReason>,
    ) -> Self {
        Self {
            hash,
            lifecycle,
            changes,
            error,
        }
    }

    pub fn stage(&self) -> Stage {
        self.lifecycle.stage()
    }

    /// Statuses emitted so far, in lifecycle order.
    pub fn statuses(&self) -> &[TxStatus] {
        self.lifecycle.statuses()
    }

    /// Pending changes of a valid transaction.
    pub fn changes(&self) -> Option<&StateChanges> {
        self.changes.as_ref()
    }

    /// True if every command executed and the change set awaits commit.
    pub fn is_valid(&self) -> bool {
        self.changes.is_some()
    }

    pub(crate) fn into_outcome(self) -> TransactionOutcome {
        TransactionOutcome {
            hash: self.hash,
            stage: self.lifecycle.stage(),
            statuses: self.lifecycle.into_statuses(),
            error: self.error,
        }
    }
}

/// Terminal outcome of one transaction, reported back to the ordering collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionOutcome {
    pub hash: Hash,
    /// Committed or Rejected
    pub stage: Stage,
    /// Every status emitted, in lifecycle order
    pub statuses: Vec<TxStatus>,
    pub error: Option<RejectReason>,
}

impl TransactionOutcome {
    /// Final status, i.e. `COMMITTED` or `REJECTED`.
    pub fn status(&self) -> TxStatus {
        match self.stage {
            Stage::Committed => TxStatus::Committed,
            _ => TxStatus::Rejected,
        }
    }

    pub fn is_committed(&self) -> bool {
        self.stage == Stage::Committed
    }
}

impl<S: WorldStateStorage> WorldState<S> {
    /// Commit the change set of a valid transition atomically, or nothing for a rejected one.
    pub fn apply_transition(&mut self, mut result: TransitionResult) -> TransactionOutcome {
        if let Some(changes) = result.changes.take() {
            let writes = changes.len();
            self.commit(changes);
            result.lifecycle.advance(Stage::Committed);
            tracing::info!(
                target: "ledger_runtime::transition",
                tx = %hex::encode(result.hash),
                writes,
                "transaction committed"
            );
        }
        result.into_outcome()
    }
}
