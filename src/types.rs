/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Defines the decoded transaction model consumed by the runtime, and other common data
//! structures used inside this library or from outside application.
//!
//! Public keys inside commands and signatures stay in their external hex form here. They are
//! canonicalized by [crate::keys] when a command is validated or executed.

use std::{fmt, str::FromStr};

use ed25519_dalek::{Signer, SigningKey};
use sha2::{Digest, Sha256};

use crate::keys::PublicKey;

/// SHA-256 digest.
pub type Hash = [u8; 32];

/// Defines information that is supplied to the state transition function by the ordering collaborator.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BlockParams {
    /// Height of the block the transaction is ordered into
    pub height: u64,
    /// Agreed block time in milliseconds since unix epoch. It is the "now" of the timestamp window.
    pub timestamp: u64,
}

/// Identifier of an account, written as `name@domain`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId {
    pub name: String,
    pub domain: String,
}

impl AccountId {
    pub fn new(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
        }
    }

    /// name is `[a-z_0-9]{1,32}` and domain is a valid domain id.
    pub fn is_valid(&self) -> bool {
        is_valid_name(&self.name) && is_valid_domain(&self.domain)
    }
}

impl FromStr for AccountId {
    type Err = InvalidAccountId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, domain) = s.split_once('@').ok_or(InvalidAccountId)?;
        let id = AccountId::new(name, domain);
        if id.is_valid() {
            Ok(id)
        } else {
            Err(InvalidAccountId)
        }
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.domain)
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("account id must be name@domain")]
pub struct InvalidAccountId;

/// Account names and role names: `[a-z_0-9]{1,32}`.
pub fn is_valid_name(name: &str) -> bool {
    (1..=32).contains(&name.len())
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

/// Dot separated labels of `[a-zA-Z0-9-]`, each 1..=63 long and not starting or ending with `-`.
pub fn is_valid_domain(domain: &str) -> bool {
    !domain.is_empty()
        && domain.len() <= 255
        && domain.split('.').all(|label| {
            (1..=63).contains(&label.len())
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        })
}

/// Account detail keys: `[A-Za-z0-9_]{1,64}`.
pub fn is_valid_detail_key(key: &str) -> bool {
    (1..=64).contains(&key.len()) && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Maximum size in bytes of an account detail value.
pub const MAX_DETAIL_VALUE_LENGTH: usize = 4096;

/// Maximum quorum an account can be configured with.
pub const MAX_QUORUM: u32 = 128;

/// Peer addresses are `host:port`.
pub fn is_valid_peer_address(address: &str) -> bool {
    match address.rsplit_once(':') {
        Some((host, port)) => !host.is_empty() && !host.contains(' ') && port.parse::<u16>().is_ok(),
        None => false,
    }
}

/// Network peer. Identity is the canonical key; the address is only where to reach it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Peer {
    pub address: String,
    pub public_key: PublicKey,
}

/// A signature over the transaction hash, with the key that claims to have produced it.
/// Both fields are hex encoded as received.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub public_key: String,
    pub signature: String,
}

/// Transaction as delivered, already decoded, by the ordering collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub creator_account_id: AccountId,
    /// Creation time in milliseconds since unix epoch
    pub created_time: u64,
    pub commands: Vec<Command>,
    pub signatures: Vec<Signature>,
}

impl Transaction {
    pub fn new(creator_account_id: AccountId, created_time: u64, commands: Vec<Command>) -> Self {
        Self {
            creator_account_id,
            created_time,
            commands,
            signatures: Vec::new(),
        }
    }

    /// Hash of the payload (creator, time and commands). Signatures are not part of it.
    pub fn hash(&self) -> Hash {
        let mut payload = Vec::new();
        write_str(&mut payload, &self.creator_account_id.to_string());
        payload.extend_from_slice(&self.created_time.to_be_bytes());
        payload.extend_from_slice(&(self.commands.len() as u32).to_be_bytes());
        for command in &self.commands {
            command.write_payload(&mut payload);
        }
        Sha256::digest(&payload).into()
    }

    /// Sign the transaction hash and attach the signature, with the key written in lowercase hex.
    pub fn sign(mut self, signing_key: &SigningKey) -> Self {
        let hash = self.hash();
        let signature = signing_key.sign(&hash);
        self.signatures.push(Signature {
            public_key: hex::encode(signing_key.verifying_key().as_bytes()),
            signature: hex::encode(signature.to_bytes()),
        });
        self
    }
}

/// Role permissions. A role is a named set of these; `Root` satisfies every check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Permission {
    Root = 0,
    CreateAccount = 1,
    CreateDomain = 2,
    CreateRole = 3,
    AppendRole = 4,
    DetachRole = 5,
    AddPeer = 6,
    RemovePeer = 7,
    AddSignatory = 8,
    RemoveSignatory = 9,
    SetQuorum = 10,
    SetDetail = 11,
    GetMyAccDetail = 12,
    GetDomainAccDetail = 13,
    GetAllAccDetail = 14,
    GetMySignatories = 15,
    GetDomainSignatories = 16,
    GetAllSignatories = 17,
    GetMyAccount = 18,
    GetDomainAccounts = 19,
    GetAllAccounts = 20,
    GetPeers = 21,
    GrantAddMySignatory = 22,
    GrantRemoveMySignatory = 23,
    GrantSetMyQuorum = 24,
    GrantSetMyAccountDetail = 25,
}

impl Permission {
    pub const ALL: [Permission; 26] = [
        Permission::Root,
        Permission::CreateAccount,
        Permission::CreateDomain,
        Permission::CreateRole,
        Permission::AppendRole,
        Permission::DetachRole,
        Permission::AddPeer,
        Permission::RemovePeer,
        Permission::AddSignatory,
        Permission::RemoveSignatory,
        Permission::SetQuorum,
        Permission::SetDetail,
        Permission::GetMyAccDetail,
        Permission::GetDomainAccDetail,
        Permission::GetAllAccDetail,
        Permission::GetMySignatories,
        Permission::GetDomainSignatories,
        Permission::GetAllSignatories,
        Permission::GetMyAccount,
        Permission::GetDomainAccounts,
        Permission::GetAllAccounts,
        Permission::GetPeers,
        Permission::GrantAddMySignatory,
        Permission::GrantRemoveMySignatory,
        Permission::GrantSetMyQuorum,
        Permission::GrantSetMyAccountDetail,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }
}

/// Permissions an account grants to another account over itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum GrantablePermission {
    AddMySignatory = 0,
    RemoveMySignatory = 1,
    SetMyQuorum = 2,
    SetMyAccountDetail = 3,
}

impl GrantablePermission {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Role permission a grantor must hold to hand this permission out.
    pub fn required_role_permission(self) -> Permission {
        match self {
            GrantablePermission::AddMySignatory => Permission::GrantAddMySignatory,
            GrantablePermission::RemoveMySignatory => Permission::GrantRemoveMySignatory,
            GrantablePermission::SetMyQuorum => Permission::GrantSetMyQuorum,
            GrantablePermission::SetMyAccountDetail => Permission::GrantSetMyAccountDetail,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddSignatoryInput {
    pub account_id: AccountId,
    pub public_key: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoveSignatoryInput {
    pub account_id: AccountId,
    pub public_key: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetQuorumInput {
    pub account_id: AccountId,
    pub quorum: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateAccountInput {
    pub account_name: String,
    pub domain_id: String,
    pub public_key: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateDomainInput {
    pub domain_id: String,
    pub default_role: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddPeerInput {
    pub address: String,
    pub public_key: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemovePeerInput {
    pub public_key: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetAccountDetailInput {
    pub account_id: AccountId,
    pub key: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateRoleInput {
    pub role_id: String,
    pub permissions: Vec<Permission>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppendRoleInput {
    pub account_id: AccountId,
    pub role_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetachRoleInput {
    pub account_id: AccountId,
    pub role_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrantPermissionInput {
    pub account_id: AccountId,
    pub permission: GrantablePermission,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevokePermissionInput {
    pub account_id: AccountId,
    pub permission: GrantablePermission,
}

/// A single state mutation requested by a transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    AddSignatory(AddSignatoryInput),
    RemoveSignatory(RemoveSignatoryInput),
    SetQuorum(SetQuorumInput),
    CreateAccount(CreateAccountInput),
    CreateDomain(CreateDomainInput),
    AddPeer(AddPeerInput),
    RemovePeer(RemovePeerInput),
    SetAccountDetail(SetAccountDetailInput),
    CreateRole(CreateRoleInput),
    AppendRole(AppendRoleInput),
    DetachRole(DetachRoleInput),
    GrantPermission(GrantPermissionInput),
    RevokePermission(RevokePermissionInput),
}

impl Command {
    /// Deterministic payload encoding: a tag byte followed by length-prefixed fields.
    fn write_payload(&self, buf: &mut Vec<u8>) {
        buf.push(CommandKind::from(self) as u8);
        match self {
            Command::AddSignatory(AddSignatoryInput { account_id, public_key })
            | Command::RemoveSignatory(RemoveSignatoryInput { account_id, public_key }) => {
                write_str(buf, &account_id.to_string());
                write_str(buf, public_key);
            }
            Command::SetQuorum(SetQuorumInput { account_id, quorum }) => {
                write_str(buf, &account_id.to_string());
                buf.extend_from_slice(&quorum.to_be_bytes());
            }
            Command::CreateAccount(CreateAccountInput { account_name, domain_id, public_key }) => {
                write_str(buf, account_name);
                write_str(buf, domain_id);
                write_str(buf, public_key);
            }
            Command::CreateDomain(CreateDomainInput { domain_id, default_role }) => {
                write_str(buf, domain_id);
                write_str(buf, default_role);
            }
            Command::AddPeer(AddPeerInput { address, public_key }) => {
                write_str(buf, address);
                write_str(buf, public_key);
            }
            Command::RemovePeer(RemovePeerInput { public_key }) => write_str(buf, public_key),
            Command::SetAccountDetail(SetAccountDetailInput { account_id, key, value }) => {
                write_str(buf, &account_id.to_string());
                write_str(buf, key);
                write_str(buf, value);
            }
            Command::CreateRole(CreateRoleInput { role_id, permissions }) => {
                write_str(buf, role_id);
                let codes: Vec<u8> = permissions.iter().map(|p| p.code()).collect();
                buf.extend_from_slice(&(codes.len() as u32).to_be_bytes());
                buf.extend_from_slice(&codes);
            }
            Command::AppendRole(AppendRoleInput { account_id, role_id })
            | Command::DetachRole(DetachRoleInput { account_id, role_id }) => {
                write_str(buf, &account_id.to_string());
                write_str(buf, role_id);
            }
            Command::GrantPermission(GrantPermissionInput { account_id, permission })
            | Command::RevokePermission(RevokePermissionInput { account_id, permission }) => {
                write_str(buf, &account_id.to_string());
                buf.push(permission.code());
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CommandKind {
    AddSignatory,
    RemoveSignatory,
    SetQuorum,
    CreateAccount,
    CreateDomain,
    AddPeer,
    RemovePeer,
    SetAccountDetail,
    CreateRole,
    AppendRole,
    DetachRole,
    GrantPermission,
    RevokePermission,
}

impl From<&Command> for CommandKind {
    fn from(command: &Command) -> Self {
        match command {
            Command::AddSignatory(_) => CommandKind::AddSignatory,
            Command::RemoveSignatory(_) => CommandKind::RemoveSignatory,
            Command::SetQuorum(_) => CommandKind::SetQuorum,
            Command::CreateAccount(_) => CommandKind::CreateAccount,
            Command::CreateDomain(_) => CommandKind::CreateDomain,
            Command::AddPeer(_) => CommandKind::AddPeer,
            Command::RemovePeer(_) => CommandKind::RemovePeer,
            Command::SetAccountDetail(_) => CommandKind::SetAccountDetail,
            Command::CreateRole(_) => CommandKind::CreateRole,
            Command::AppendRole(_) => CommandKind::AppendRole,
            Command::DetachRole(_) => CommandKind::DetachRole,
            Command::GrantPermission(_) => CommandKind::GrantPermission,
            Command::RevokePermission(_) => CommandKind::RevokePermission,
        }
    }
}

fn write_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u32).to_be_bytes());
    buf.extend_from_slice(s.as_bytes());
}

/// Status codes observable by the ordering collaborator, in lifecycle order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TxStatus {
    StatelessValid,
    StatelessInvalid,
    EnoughSignatures,
    NotEnoughSignatures,
    StatefulValid,
    StatefulInvalid,
    Committed,
    Rejected,
}

impl TxStatus {
    pub fn code(&self) -> &'static str {
        match self {
            TxStatus::StatelessValid => "STATELESS_VALID",
            TxStatus::StatelessInvalid => "STATELESS_INVALID",
            TxStatus::EnoughSignatures => "ENOUGH_SIGNATURES",
            TxStatus::NotEnoughSignatures => "NOT_ENOUGH_SIGNATURES",
            TxStatus::StatefulValid => "STATEFUL_VALID",
            TxStatus::StatefulInvalid => "STATEFUL_INVALID",
            TxStatus::Committed => "COMMITTED",
            TxStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
