/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! error defines sets of error definitions in entire life time of state transitions and queries.

use crate::{keys::DecodeError, types::TxStatus};

/// Kind of ledger object a [CommandError] or [QueryError] refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    Account,
    Signatory,
    Role,
    Domain,
    Peer,
    GrantedPermission,
}

/// Structural problems found before any state is consulted.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StatelessError {
    /// Transaction commands are empty
    #[error("transaction has no commands")]
    EmptyCommands,

    /// Creator account id is not of the form `name@domain`
    #[error("invalid creator account id")]
    InvalidCreator,

    /// No signature is attached
    #[error("transaction has no signatures")]
    NoSignatures,

    /// Created time is older than the accepted window
    #[error("transaction created at {created_time} is older than allowed at {now}")]
    StaleTimestamp { created_time: u64, now: u64 },

    /// Created time is too far in the future
    #[error("transaction created at {created_time} is ahead of {now}")]
    FutureTimestamp { created_time: u64, now: u64 },

    /// A command field does not have the required format
    #[error("command {command_index}: invalid {field}")]
    InvalidField {
        command_index: usize,
        field: &'static str,
    },

    /// A public key in a command cannot be decoded
    #[error("command {command_index}: {error}")]
    InvalidKey {
        command_index: usize,
        error: DecodeError,
    },

    /// A transaction with the same hash is already committed
    #[error("transaction already committed")]
    Replayed,
}

/// Descriptive error definitions of a failed Command.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// Actor does not hold the permission the command requires
    #[error("no permission")]
    NoPermission,

    /// Key material in the command cannot be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The object the command refers to does not exist
    #[error("{0:?} not found")]
    NotFound(Entity),

    /// The object the command creates already exists
    #[error("{0:?} already exists")]
    AlreadyExists(Entity),

    /// A key that canonically equals an existing one was supplied again
    #[error("duplicate key")]
    DuplicateKey,

    /// The change would leave quorum outside `1..=|signatories|`
    #[error("quorum violation")]
    QuorumViolation,

    /// The last peer of the network cannot be removed
    #[error("cannot remove the last peer")]
    LastPeer,
}

/// Reason attached to a rejected transaction.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("stateless invalid: {0}")]
    StatelessInvalid(StatelessError),

    /// A signature does not verify, or verified signatories do not reach quorum
    #[error("not enough signatures")]
    NotEnoughSignatures,

    /// Command at `command_index` failed; no change of the transaction is applied
    #[error("stateful invalid at command {command_index}: {error}")]
    StatefulInvalid {
        command_index: usize,
        error: CommandError,
    },
}

impl From<StatelessError> for RejectReason {
    fn from(error: StatelessError) -> Self {
        RejectReason::StatelessInvalid(error)
    }
}

impl<'a> From<&'a RejectReason> for TxStatus {
    fn from(value: &'a RejectReason) -> Self {
        match value {
            RejectReason::StatelessInvalid(_) => TxStatus::StatelessInvalid,
            RejectReason::NotEnoughSignatures => TxStatus::NotEnoughSignatures,
            RejectReason::StatefulInvalid { .. } => TxStatus::StatefulInvalid,
        }
    }
}

/// Errors returned to the caller of a query. Queries never mutate state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("no permission")]
    NoPermission,

    #[error("{0:?} not found")]
    NotFound(Entity),

    /// `first_record_id` does not refer to an existing record
    #[error("invalid pagination cursor")]
    InvalidCursor,

    #[error("page size must be positive")]
    InvalidPageSize,
}
