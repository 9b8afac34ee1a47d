/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Defines the checks a transaction passes before its commands execute.
//!
//! Phases include:
//! - Stateless: structural checks on the transaction and every command field, the timestamp
//! window against the block time, and replay of an already committed hash.
//! - Signature: cryptographic verification of every attached signature, then the quorum check of
//! the verified keys against the creator's signatories.
//!
//! Signature verification does not read state, so [verified_signatories] can run ahead of
//! the strictly ordered execution. Only the quorum check needs the current world state.

use ed25519_dalek::{Signature as Ed25519Signature, Verifier, VerifyingKey};

use crate::{
    error::{RejectReason, StatelessError},
    keys::{self, PublicKey},
    stores::signatory,
    transition::Runtime,
    types::{self, BlockParams, Command, Hash, Signature, Transaction},
    world_state::StateRead,
};

/// Stateless is a Phase in State Transition. It reads world state only to detect replays.
pub(crate) fn stateless<R: StateRead>(
    runtime: &Runtime,
    tx: &Transaction,
    bd: &BlockParams,
    ws: &R,
) -> Result<(), StatelessError> {
    if tx.commands.is_empty() {
        return Err(StatelessError::EmptyCommands);
    }
    if !tx.creator_account_id.is_valid() {
        return Err(StatelessError::InvalidCreator);
    }
    if tx.signatures.is_empty() {
        return Err(StatelessError::NoSignatures);
    }

    let now = bd.timestamp;
    if tx.created_time.saturating_add(runtime.max_past_age()) < now {
        return Err(StatelessError::StaleTimestamp {
            created_time: tx.created_time,
            now,
        });
    }
    if tx.created_time > now.saturating_add(runtime.max_future_drift()) {
        return Err(StatelessError::FutureTimestamp {
            created_time: tx.created_time,
            now,
        });
    }

    for (command_index, command) in tx.commands.iter().enumerate() {
        validate_command(command_index, command)?;
    }

    if ws.is_committed(&tx.hash()) {
        return Err(StatelessError::Replayed);
    }
    Ok(())
}

fn validate_command(command_index: usize, command: &Command) -> Result<(), StatelessError> {
    let field = |valid: bool, name: &'static str| {
        if valid {
            Ok(())
        } else {
            Err(StatelessError::InvalidField {
                command_index,
                field: name,
            })
        }
    };
    let key = |public_key: &str| {
        keys::canonicalize(public_key)
            .map(|_| ())
            .map_err(|error| StatelessError::InvalidKey {
                command_index,
                error,
            })
    };

    match command {
        Command::AddSignatory(input) => {
            field(input.account_id.is_valid(), "account_id")?;
            key(&input.public_key)
        }
        Command::RemoveSignatory(input) => {
            field(input.account_id.is_valid(), "account_id")?;
            key(&input.public_key)
        }
        Command::SetQuorum(input) => {
            field(input.account_id.is_valid(), "account_id")?;
            field((1..=types::MAX_QUORUM).contains(&input.quorum), "quorum")
        }
        Command::CreateAccount(input) => {
            field(types::is_valid_name(&input.account_name), "account_name")?;
            field(types::is_valid_domain(&input.domain_id), "domain_id")?;
            key(&input.public_key)
        }
        Command::CreateDomain(input) => {
            field(types::is_valid_domain(&input.domain_id), "domain_id")?;
            field(types::is_valid_name(&input.default_role), "default_role")
        }
        Command::AddPeer(input) => {
            field(types::is_valid_peer_address(&input.address), "address")?;
            key(&input.public_key)
        }
        Command::RemovePeer(input) => key(&input.public_key),
        Command::SetAccountDetail(input) => {
            field(input.account_id.is_valid(), "account_id")?;
            field(types::is_valid_detail_key(&input.key), "key")?;
            field(input.value.len() <= types::MAX_DETAIL_VALUE_LENGTH, "value")
        }
        Command::CreateRole(input) => field(types::is_valid_name(&input.role_id), "role_id"),
        Command::AppendRole(input) => {
            field(input.account_id.is_valid(), "account_id")?;
            field(types::is_valid_name(&input.role_id), "role_id")
        }
        Command::DetachRole(input) => {
            field(input.account_id.is_valid(), "account_id")?;
            field(types::is_valid_name(&input.role_id), "role_id")
        }
        Command::GrantPermission(input) => field(input.account_id.is_valid(), "account_id"),
        Command::RevokePermission(input) => field(input.account_id.is_valid(), "account_id"),
    }
}

/// Canonical keys of all attached signatures. Fails if any one of them does not verify against `hash`.
pub(crate) fn verified_signatories(
    hash: &Hash,
    signatures: &[Signature],
) -> Result<Vec<PublicKey>, RejectReason> {
    signatures
        .iter()
        .map(|signature| verify(hash, signature).ok_or(RejectReason::NotEnoughSignatures))
        .collect()
}

fn verify(hash: &Hash, signature: &Signature) -> Option<PublicKey> {
    let public_key = keys::canonicalize(&signature.public_key).ok()?;
    let signature_bytes: [u8; 64] = hex::decode(&signature.signature).ok()?.try_into().ok()?;
    let verifying_key = VerifyingKey::from_bytes(public_key.as_bytes()).ok()?;
    verifying_key
        .verify(hash, &Ed25519Signature::from_bytes(&signature_bytes))
        .ok()?;
    Some(public_key)
}

/// Signature is a Phase in State Transition. The verified keys must reach the creator's quorum.
pub(crate) fn signature<R: StateRead>(ws: &R, tx: &Transaction) -> Result<(), RejectReason> {
    let effective_signatories = verified_signatories(&tx.hash(), &tx.signatures)?;
    if signatory::verify_quorum(ws, &tx.creator_account_id, &effective_signatories) {
        Ok(())
    } else {
        Err(RejectReason::NotEnoughSignatures)
    }
}
