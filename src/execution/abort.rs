/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Defines constructs to abort command execution on errors.
//!
//! Used for short-circuiting command execution in the [commands](crate::commands) modules.
//! It ensures consistent clean up in command processing.

/// Causes all World State changes of the transaction to be reverted,
/// to ensure state consistency on execution failure.
macro_rules! abort {
    ($state:ident, $err_var:expr ) => {
        return {
            $state.revert_changes();
            Err($err_var)
        }
    };
}

pub(crate) use abort;

/// Revert and return the error of a failed store operation, or continue with its value.
macro_rules! abort_on_err {
    ($state:ident, $result:expr ) => {
        match $result {
            Ok(value) => value,
            Err(err) => $crate::execution::abort::abort!($state, err),
        }
    };
}

pub(crate) use abort_on_err;
