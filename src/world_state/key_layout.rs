/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Layout of world state keys.
//!
//! Every key starts with a one byte table prefix followed by its segments separated by `0x00`.
//! Identifiers never contain `0x00` (they pass format validation first), so keys that share
//! their leading segments are contiguous and sort by segment, which makes per-account scans
//! and the `(writer, key)` ordering of account details fall out of plain byte order.

use crate::{
    keys::PublicKey,
    types::{AccountId, GrantablePermission, Hash},
};

use super::storage::Key;

const ACCOUNT: u8 = 0x01;
const SIGNATORY: u8 = 0x02;
const ACCOUNT_ROLE: u8 = 0x03;
const ROLE: u8 = 0x04;
const DOMAIN: u8 = 0x05;
const PEER: u8 = 0x06;
const DETAIL: u8 = 0x07;
const GRANTABLE: u8 = 0x08;
const COMMITTED_TX: u8 = 0x09;

const SEPARATOR: u8 = 0x00;

fn compose(table: u8, segments: &[&[u8]]) -> Key {
    let mut key = vec![table];
    for segment in segments {
        key.extend_from_slice(segment);
        key.push(SEPARATOR);
    }
    key
}

pub(crate) fn account(id: &AccountId) -> Key {
    compose(ACCOUNT, &[id.to_string().as_bytes()])
}

pub(crate) fn signatory_prefix(id: &AccountId) -> Key {
    compose(SIGNATORY, &[id.to_string().as_bytes()])
}

pub(crate) fn signatory(id: &AccountId, public_key: &PublicKey) -> Key {
    let mut key = signatory_prefix(id);
    key.extend_from_slice(public_key.as_bytes());
    key
}

pub(crate) fn account_role_prefix(id: &AccountId) -> Key {
    compose(ACCOUNT_ROLE, &[id.to_string().as_bytes()])
}

pub(crate) fn account_role(id: &AccountId, role_id: &str) -> Key {
    compose(ACCOUNT_ROLE, &[id.to_string().as_bytes(), role_id.as_bytes()])
}

pub(crate) fn role(role_id: &str) -> Key {
    compose(ROLE, &[role_id.as_bytes()])
}

pub(crate) fn domain(domain_id: &str) -> Key {
    compose(DOMAIN, &[domain_id.as_bytes()])
}

pub(crate) fn peer_prefix() -> Key {
    vec![PEER]
}

pub(crate) fn peer(public_key: &PublicKey) -> Key {
    let mut key = peer_prefix();
    key.extend_from_slice(public_key.as_bytes());
    key
}

pub(crate) fn detail_prefix(account: &AccountId) -> Key {
    compose(DETAIL, &[account.to_string().as_bytes()])
}

pub(crate) fn detail_writer_prefix(account: &AccountId, writer: &AccountId) -> Key {
    compose(
        DETAIL,
        &[account.to_string().as_bytes(), writer.to_string().as_bytes()],
    )
}

pub(crate) fn detail(account: &AccountId, writer: &AccountId, detail_key: &str) -> Key {
    compose(
        DETAIL,
        &[
            account.to_string().as_bytes(),
            writer.to_string().as_bytes(),
            detail_key.as_bytes(),
        ],
    )
}

pub(crate) fn grantable(
    permittee: &AccountId,
    account: &AccountId,
    permission: GrantablePermission,
) -> Key {
    compose(
        GRANTABLE,
        &[
            permittee.to_string().as_bytes(),
            account.to_string().as_bytes(),
            &[permission.code()],
        ],
    )
}

pub(crate) fn committed_tx(hash: &Hash) -> Key {
    let mut key = vec![COMMITTED_TX];
    key.extend_from_slice(hash);
    key
}

/// Segments of `key` after `prefix`, without their trailing separators.
pub(crate) fn segments_after<'a>(key: &'a [u8], prefix: &[u8]) -> Vec<&'a [u8]> {
    match key.strip_prefix(prefix) {
        Some(rest) => rest
            .strip_suffix(&[SEPARATOR])
            .unwrap_or(rest)
            .split(|b| *b == SEPARATOR)
            .collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_keys_sort_by_writer_then_key() {
        let account = AccountId::new("a", "test");
        let w1 = AccountId::new("a", "test");
        let w2 = AccountId::new("a1", "test");
        let mut keys = vec![
            detail(&account, &w2, "a"),
            detail(&account, &w1, "b"),
            detail(&account, &w1, "a"),
        ];
        keys.sort();
        // "a1@test" < "a@test" since '1' < '@'
        assert_eq!(
            keys,
            vec![
                detail(&account, &w2, "a"),
                detail(&account, &w1, "a"),
                detail(&account, &w1, "b"),
            ]
        );
    }

    #[test]
    fn writer_prefix_is_not_shared_with_longer_writer() {
        let account = AccountId::new("a", "test");
        let short = AccountId::new("user", "test");
        let long = AccountId::new("user", "test.sub");
        let key = detail(&account, &long, "k");
        assert!(!key.starts_with(&detail_writer_prefix(&account, &short)));
        assert!(key.starts_with(&detail_writer_prefix(&account, &long)));
    }

    #[test]
    fn segments_are_recovered() {
        let account = AccountId::new("a", "test");
        let writer = AccountId::new("w", "test");
        let key = detail(&account, &writer, "k");
        let segments = segments_after(&key, &detail_prefix(&account));
        assert_eq!(segments, vec![b"w@test".as_slice(), b"k".as_slice()]);
    }
}
