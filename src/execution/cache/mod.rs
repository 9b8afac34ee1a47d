/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Modules for data caching during execution.
//!
//! Includes:
//! - `world_state_cache`: the working copy of world state a transaction executes against.

pub mod world_state_cache;
pub(crate) use world_state_cache::*;
