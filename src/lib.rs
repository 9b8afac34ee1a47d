/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Ledger Runtime is the **State Transition Function** of a permissioned ledger. It decides whether an
//! ordered transaction may be admitted, applies its commands to the world state, and answers queries
//! over the committed state.
//!
//! ```text
//! f(WS, BD, TX) -> (WS', S)
//!
//! WS = World state represented by set of key-value pairs
//! BD = Block data agreed by the ordering collaborator (height, timestamp)
//! TX = Transaction, which is essentially a sequence of Commands signed by its creator's signatories
//! S = Status trail of the transaction, ending in COMMITTED or REJECTED.
//! ```
//!
//! ### Example
//!
//! ```rust
//! // prepare world state (ws), transaction (tx), and block data (bd),
//! // then run the transition and commit its result.
//! let result = ledger_runtime::Runtime::new().transition(&ws, &tx, &bd);
//! let outcome = ws.apply_transition(result);
//! ```
//!
//! In summary, a state [transition] function intakes Transaction, Block data and World State to
//! [execute](execution) the [commands], and outputs a result that is either a complete change set or
//! a rejection [error]. Public keys are handled in canonical form through [keys]. Signatories and
//! account details are kept by the [stores]. Queries are answered by [query], and [ledger] serializes
//! transactions against concurrent queries.

pub mod commands;

pub mod error;
pub use error::{CommandError, Entity, QueryError, RejectReason, StatelessError};

pub mod execution;
pub use execution::Stage;

pub mod genesis;
pub use genesis::GenesisBuilder;

pub mod keys;
pub use keys::{DecodeError, PublicKey};

pub mod ledger;
pub use ledger::Ledger;

pub mod query;
pub use query::{Query, QueryPayload, QueryResponse};

pub mod stores;

pub mod transition;
pub use transition::{Runtime, TransactionOutcome, TransitionResult};

pub mod types;
pub use types::{AccountId, BlockParams, Command, Permission, Transaction, TxStatus};

pub mod world_state;
pub use world_state::{MemoryStorage, WorldState, WorldStateStorage};
