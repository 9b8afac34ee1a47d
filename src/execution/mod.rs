/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Implementation of state transition functions.
//!
//! The transition function basically [executes](execute) a transaction across [phases](phase):
//! Stateless -> Signature -> Command(s). Progress is tracked by the transaction [lifecycle], and
//! commands write to a [cache] of the world state that is only committed when every command succeeds.

pub mod abort;

pub mod cache;

pub mod execute;

pub mod lifecycle;
pub use lifecycle::Stage;

pub mod phase;

pub mod state;
