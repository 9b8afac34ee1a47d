/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Account detail query.

use serde_json::{Map, Value};

use crate::{
    error::{Entity, QueryError},
    stores::{detail, DetailRecord, RecordId},
    types::{AccountId, Permission},
    world_state::StateRead,
};

use super::{can_read, ReadScopes};

const DETAILS: ReadScopes = ReadScopes {
    my: Permission::GetMyAccDetail,
    domain: Permission::GetDomainAccDetail,
    all: Permission::GetAllAccDetail,
};

/// Page request. The page starts right after `first_record_id`, or at the first record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaginationMeta {
    pub page_size: u32,
    pub first_record_id: Option<RecordId>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GetAccountDetailInput {
    /// Target account. Defaults to the requester.
    pub account_id: Option<AccountId>,
    pub writer: Option<AccountId>,
    pub key: Option<String>,
    /// Without pagination the whole filtered sequence is returned.
    pub pagination: Option<PaginationMeta>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountDetailResponse {
    pub records: Vec<DetailRecord>,
    /// Number of records matching the filters, across all pages.
    pub total_number: usize,
    pub next_record_id: Option<RecordId>,
}

impl AccountDetailResponse {
    /// Render the records as `{"writer": {"key": "value"}}`.
    pub fn to_json(&self) -> String {
        let mut writers = Map::new();
        for record in &self.records {
            let entry = writers
                .entry(record.writer.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(details) = entry {
                details.insert(record.key.clone(), Value::String(record.value.clone()));
            }
        }
        Value::Object(writers).to_string()
    }
}

/// Details of the target account visible to `requester`. Reading one's own details is always allowed.
pub fn get_account_detail<R: StateRead + ?Sized>(
    state: &R,
    requester: &AccountId,
    input: &GetAccountDetailInput,
) -> Result<AccountDetailResponse, QueryError> {
    let account_id = input.account_id.as_ref().unwrap_or(requester);
    if requester != account_id && !can_read(state, requester, account_id, DETAILS) {
        return Err(QueryError::NoPermission);
    }
    if !state.account_exists(account_id) {
        return Err(QueryError::NotFound(Entity::Account));
    }

    let writer = input.writer.as_ref();
    let key = input.key.as_deref();
    match &input.pagination {
        Some(PaginationMeta {
            page_size,
            first_record_id,
        }) => {
            let page = detail::paginate(
                state,
                account_id,
                *page_size,
                first_record_id.as_ref(),
                writer,
                key,
            )?;
            Ok(AccountDetailResponse {
                records: page.records,
                total_number: page.total_number,
                next_record_id: page.next_record_id,
            })
        }
        None => {
            let records = detail::get(state, account_id, writer, key);
            Ok(AccountDetailResponse {
                total_number: records.len(),
                records,
                next_record_id: None,
            })
        }
    }
}
