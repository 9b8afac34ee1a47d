/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Lifecycle of a transaction inside the runtime.
//!
//! ```text
//! Received -> StatelessChecked -> SignatureChecked -> Executing -> Committed
//!     \              \                   \               \
//!      +--------------+-------------------+---------------+--> Rejected
//! ```
//!
//! Each step emits the status code observed by the ordering collaborator. A stage that has been
//! left is never entered again, and Committed and Rejected are final.

use crate::{error::RejectReason, types::TxStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Received,
    StatelessChecked,
    SignatureChecked,
    Executing,
    Committed,
    Rejected,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Committed | Stage::Rejected)
    }

    fn can_advance_to(self, next: Stage) -> bool {
        match next {
            Stage::Rejected => !self.is_terminal(),
            _ => matches!(
                (self, next),
                (Stage::Received, Stage::StatelessChecked)
                    | (Stage::StatelessChecked, Stage::SignatureChecked)
                    | (Stage::SignatureChecked, Stage::Executing)
                    | (Stage::Executing, Stage::Committed)
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Lifecycle {
    stage: Stage,
    statuses: Vec<TxStatus>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            stage: Stage::Received,
            statuses: Vec::new(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn statuses(&self) -> &[TxStatus] {
        &self.statuses
    }

    pub fn into_statuses(self) -> Vec<TxStatus> {
        self.statuses
    }

    /// Move forward to `next` and emit its status.
    pub fn advance(&mut self, next: Stage) {
        debug_assert!(
            self.stage.can_advance_to(next),
            "illegal transition {:?} -> {:?}",
            self.stage,
            next
        );
        match next {
            Stage::StatelessChecked => self.statuses.push(TxStatus::StatelessValid),
            Stage::SignatureChecked => self.statuses.push(TxStatus::EnoughSignatures),
            Stage::Committed => self.statuses.push(TxStatus::Committed),
            Stage::Received | Stage::Executing | Stage::Rejected => {}
        }
        self.stage = next;
    }

    /// Every command executed; the change set awaits commit.
    pub fn executed(&mut self) {
        debug_assert_eq!(self.stage, Stage::Executing);
        self.statuses.push(TxStatus::StatefulValid);
    }

    pub fn reject(&mut self, reason: &RejectReason) {
        debug_assert!(self.stage.can_advance_to(Stage::Rejected));
        self.statuses.push(TxStatus::from(reason));
        self.statuses.push(TxStatus::Rejected);
        self.stage = Stage::Rejected;
    }
}
