use ledger_runtime::{
    keys,
    stores::signatory,
    types::{AddSignatoryInput, RemoveSignatoryInput},
    Command, CommandError, RejectReason, Runtime, Stage, TxStatus,
};

use crate::common::{TestData, ALICE_SEED, KEY_K, T0};

mod common;

fn add_signatory(public_key: String) -> Command {
    Command::AddSignatory(AddSignatoryInput {
        account_id: TestData::alice(),
        public_key,
    })
}

fn remove_signatory(public_key: String) -> Command {
    Command::RemoveSignatory(RemoveSignatoryInput {
        account_id: TestData::alice(),
        public_key,
    })
}

/// A key is the same signatory whatever letter case it is submitted in.
#[test]
fn test_signatory_key_case_end_to_end() {
    let runtime = Runtime::new();
    let mut ws = TestData::world_state();
    let bd = TestData::block_params(1);
    let k = keys::canonicalize(KEY_K).unwrap();

    // tx1 adds K in lower case
    let tx1 = TestData::transaction(
        TestData::alice(),
        T0,
        vec![add_signatory(KEY_K.to_lowercase())],
        &[ALICE_SEED],
    );
    let outcome = ws.apply_transition(runtime.transition(&ws, &tx1, &bd));
    assert_eq!(outcome.status(), TxStatus::Committed);
    assert_eq!(
        outcome.statuses,
        vec![
            TxStatus::StatelessValid,
            TxStatus::EnoughSignatures,
            TxStatus::StatefulValid,
            TxStatus::Committed
        ]
    );
    assert!(signatory::contains(&ws, &TestData::alice(), &k));

    // tx2 adds K in upper case
    let tx2 = TestData::transaction(
        TestData::alice(),
        T0 + 1,
        vec![add_signatory(KEY_K.to_uppercase())],
        &[ALICE_SEED],
    );
    let outcome = ws.apply_transition(runtime.transition(&ws, &tx2, &bd));
    assert_eq!(outcome.stage, Stage::Rejected);
    assert_eq!(
        outcome.statuses,
        vec![
            TxStatus::StatelessValid,
            TxStatus::EnoughSignatures,
            TxStatus::StatefulInvalid,
            TxStatus::Rejected
        ]
    );
    assert_eq!(
        outcome.error,
        Some(RejectReason::StatefulInvalid {
            command_index: 0,
            error: CommandError::DuplicateKey
        })
    );
    assert_eq!(signatory::signatories(&ws, &TestData::alice()).len(), 2);

    // tx3 removes K in upper case
    let tx3 = TestData::transaction(
        TestData::alice(),
        T0 + 2,
        vec![remove_signatory(KEY_K.to_uppercase())],
        &[ALICE_SEED],
    );
    let outcome = ws.apply_transition(runtime.transition(&ws, &tx3, &bd));
    assert_eq!(outcome.status(), TxStatus::Committed);
    assert!(!signatory::contains(&ws, &TestData::alice(), &k));
    assert_eq!(
        signatory::signatories(&ws, &TestData::alice()),
        vec![TestData::public_key(ALICE_SEED)]
    );
}

/// Signatures carry keys in any letter case.
#[test]
fn test_signature_key_case() {
    let runtime = Runtime::new();
    let mut ws = TestData::world_state();
    let mut tx = TestData::transaction(
        TestData::alice(),
        T0,
        vec![add_signatory(KEY_K.to_string())],
        &[ALICE_SEED],
    );
    tx.signatures[0].public_key = tx.signatures[0].public_key.to_uppercase();

    let outcome = ws.apply_transition(runtime.transition(&ws, &tx, &TestData::block_params(1)));
    assert!(outcome.is_committed());
}
