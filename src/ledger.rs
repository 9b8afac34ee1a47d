/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Concurrency shell around the committed world state.
//!
//! Transactions execute one at a time under an upgradable read lock. Readers are not blocked while
//! a transaction executes, because its writes stay in its own working copy. The lock is upgraded to
//! a write lock only to commit a finished change set, so a query sees the state either before or
//! after a transaction, never in between.

use parking_lot::{RwLock, RwLockUpgradableReadGuard};

use crate::{
    error::QueryError,
    query::{execute_query, Query, QueryResponse},
    transition::{Runtime, TransactionOutcome},
    types::{BlockParams, Transaction},
    world_state::{WorldState, WorldStateStorage},
};

pub struct Ledger<S> {
    runtime: Runtime,
    state: RwLock<WorldState<S>>,
}

impl<S: WorldStateStorage> Ledger<S> {
    pub fn new(runtime: Runtime, ws: WorldState<S>) -> Self {
        Self {
            runtime,
            state: RwLock::new(ws),
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Validate and execute `tx`, then commit it if valid.
    pub fn apply(&self, tx: &Transaction, bd: &BlockParams) -> TransactionOutcome {
        let state = self.state.upgradable_read();
        let result = self.runtime.transition(&*state, tx, bd);

        let outcome = if result.is_valid() {
            let mut state = RwLockUpgradableReadGuard::upgrade(state);
            state.apply_transition(result)
        } else {
            result.into_outcome()
        };

        if let Some(reason) = &outcome.error {
            tracing::warn!(
                target: "ledger_runtime::ledger",
                tx = %hex::encode(outcome.hash),
                %reason,
                "transaction rejected"
            );
        }
        outcome
    }

    /// Apply the transactions of a block strictly in the given order.
    pub fn apply_block(&self, txs: &[Transaction], bd: &BlockParams) -> Vec<TransactionOutcome> {
        let outcomes: Vec<TransactionOutcome> = txs.iter().map(|tx| self.apply(tx, bd)).collect();
        tracing::info!(
            target: "ledger_runtime::ledger",
            height = bd.height,
            committed = outcomes.iter().filter(|outcome| outcome.is_committed()).count(),
            rejected = outcomes.iter().filter(|outcome| !outcome.is_committed()).count(),
            "block applied"
        );
        outcomes
    }

    /// Answer `query` against the committed state.
    pub fn query(&self, query: &Query) -> Result<QueryResponse, QueryError> {
        let state = self.state.read();
        execute_query(&*state, query)
    }

    /// Run `f` on a consistent snapshot of the committed state.
    pub fn read<T>(&self, f: impl FnOnce(&WorldState<S>) -> T) -> T {
        let state = self.state.read();
        f(&state)
    }

    pub fn into_world_state(self) -> WorldState<S> {
        self.state.into_inner()
    }
}
