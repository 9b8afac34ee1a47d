/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Describes the business logic for executing individual [Commands](crate::types::Command).
//!
//! Every command first checks that the acting account holds the permission it requires, then
//! checks its own preconditions, and only then mutates the working copy. A failure aborts the
//! whole transaction through [abort](crate::execution::abort), so no command is ever partially applied.
//!
//! Commands are grouped as:
//! - [Signatory](signatory) Commands that change the signatory set and quorum of an account.
//! - [Account](account) Commands that create accounts and domains and write account details.
//! - [Peer](peer) Commands that change the peer list of the network.
//! - [Role](role) Commands that manage roles and grantable permissions.

pub(crate) mod account;

pub(crate) mod executable;

pub(crate) mod peer;

pub(crate) mod permission;

pub(crate) mod role;

pub(crate) mod signatory;

#[cfg(test)]
mod tests;
