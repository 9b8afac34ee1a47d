/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Typed stores over any view of the world state.
//!
//! - [signatory]: per-account signatory keys and quorum.
//! - [detail]: writer-scoped account details and their pagination.

pub mod detail;
pub use detail::{DetailPage, DetailRecord, RecordId};

pub mod signatory;
