/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Writer-scoped account details with cursor based pagination.
//!
//! An entry is addressed by `(account, writer, key)`. Records are always returned in one total
//! order, lexicographic by writer id and then by key, independent of insertion order. Cursors are
//! record ids in that order, so a sweep stays valid while other entries are written.

use crate::{
    error::QueryError,
    types::AccountId,
    world_state::{key_layout, StateRead, StateWrite},
};

/// One account detail entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailRecord {
    pub writer: AccountId,
    pub key: String,
    pub value: String,
}

impl DetailRecord {
    pub fn id(&self) -> RecordId {
        RecordId {
            writer: self.writer.clone(),
            key: self.key.clone(),
        }
    }

    fn is(&self, id: &RecordId) -> bool {
        self.writer == id.writer && self.key == id.key
    }
}

/// Position of a record in the detail order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordId {
    pub writer: AccountId,
    pub key: String,
}

/// One page of records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailPage {
    pub records: Vec<DetailRecord>,
    /// Cursor for the next page. Set iff records remain after this page.
    pub next_record_id: Option<RecordId>,
    /// Number of records matching the filters, across all pages.
    pub total_number: usize,
}

/// Upsert `(account, writer, key) -> value`.
pub fn set<W: StateWrite + ?Sized>(
    state: &mut W,
    account: &AccountId,
    writer: &AccountId,
    key: &str,
    value: &str,
) {
    state.put(
        key_layout::detail(account, writer, key),
        value.as_bytes().to_vec(),
    );
}

/// Records of `account`, optionally restricted to one writer and/or one key.
pub fn get<R: StateRead + ?Sized>(
    state: &R,
    account: &AccountId,
    writer: Option<&AccountId>,
    key: Option<&str>,
) -> Vec<DetailRecord> {
    let account_prefix = key_layout::detail_prefix(account);
    let scan_prefix = match writer {
        Some(writer) => key_layout::detail_writer_prefix(account, writer),
        None => account_prefix.clone(),
    };

    let mut records: Vec<DetailRecord> = state
        .scan_prefix(&scan_prefix)
        .into_iter()
        .filter_map(|(raw_key, value)| {
            let segments = key_layout::segments_after(&raw_key, &account_prefix);
            let [writer_id, detail_key] = segments.as_slice() else {
                return None;
            };
            Some(DetailRecord {
                writer: std::str::from_utf8(writer_id).ok()?.parse().ok()?,
                key: String::from_utf8(detail_key.to_vec()).ok()?,
                value: String::from_utf8(value).ok()?,
            })
        })
        .filter(|record| key.map_or(true, |key| record.key == key))
        .collect();

    records.sort_by_cached_key(|record| (record.writer.to_string(), record.key.clone()));
    records
}

/// Up to `page_size` records that come strictly after `first_record_id` (or from the start).
pub fn paginate<R: StateRead + ?Sized>(
    state: &R,
    account: &AccountId,
    page_size: u32,
    first_record_id: Option<&RecordId>,
    writer: Option<&AccountId>,
    key: Option<&str>,
) -> Result<DetailPage, QueryError> {
    if page_size == 0 {
        return Err(QueryError::InvalidPageSize);
    }

    let mut records = get(state, account, writer, key);
    let total_number = records.len();

    let start = match first_record_id {
        Some(cursor) => {
            records
                .iter()
                .position(|record| record.is(cursor))
                .ok_or(QueryError::InvalidCursor)?
                + 1
        }
        None => 0,
    };
    let end = start.saturating_add(page_size as usize).min(total_number);

    let next_record_id = (end < total_number)
        .then(|| records.get(end - 1).map(DetailRecord::id))
        .flatten();

    records.truncate(end);
    let page = records.split_off(start);

    Ok(DetailPage {
        records: page,
        next_record_id,
        total_number,
    })
}
