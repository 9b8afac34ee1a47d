/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

use crate::{
    commands::account::{create_account, create_domain, set_account_detail},
    commands::role::grant_permission,
    error::{CommandError, Entity},
    keys,
    stores::{detail, signatory, DetailRecord},
    types::{
        AccountId, CreateAccountInput, CreateDomainInput, GrantPermissionInput,
        GrantablePermission, SetAccountDetailInput,
    },
    world_state::StateRead,
};

use super::test_utils::*;

fn detail_input(key: &str, value: &str) -> SetAccountDetailInput {
    SetAccountDetailInput {
        account_id: user(),
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[test]
fn test_create_account() {
    let mut fixture = TestFixture::new();
    let input = CreateAccountInput {
        account_name: "carol".to_string(),
        domain_id: "test".to_string(),
        public_key: KEY_K.to_uppercase(),
    };

    let ret = fixture.execute(user(), |state| create_account(&user(), state, input.clone()));
    assert_eq!(ret, Err(CommandError::NoPermission));

    fixture
        .execute(admin(), |state| create_account(&admin(), state, input.clone()))
        .unwrap();
    let carol = AccountId::new("carol", "test");
    assert_eq!(fixture.ws.quorum(&carol), Some(1));
    assert_eq!(
        signatory::signatories(&fixture.ws, &carol),
        vec![keys::canonicalize(KEY_K).unwrap()]
    );
    assert_eq!(fixture.ws.account_roles(&carol), vec!["none".to_string()]);

    let ret = fixture.execute(admin(), |state| create_account(&admin(), state, input.clone()));
    assert_eq!(ret, Err(CommandError::AlreadyExists(Entity::Account)));

    let ret = fixture.execute(admin(), |state| {
        create_account(
            &admin(),
            state,
            CreateAccountInput {
                domain_id: "missing".to_string(),
                ..input
            },
        )
    });
    assert_eq!(ret, Err(CommandError::NotFound(Entity::Domain)));
}

#[test]
fn test_create_domain() {
    let mut fixture = TestFixture::new();
    let input = |domain_id: &str, default_role: &str| CreateDomainInput {
        domain_id: domain_id.to_string(),
        default_role: default_role.to_string(),
    };

    let ret = fixture.execute(admin(), |state| create_domain(&admin(), state, input("fresh", "ghost")));
    assert_eq!(ret, Err(CommandError::NotFound(Entity::Role)));
    let ret = fixture.execute(admin(), |state| create_domain(&admin(), state, input("test", "none")));
    assert_eq!(ret, Err(CommandError::AlreadyExists(Entity::Domain)));
    let ret = fixture.execute(nobody(), |state| create_domain(&nobody(), state, input("fresh", "none")));
    assert_eq!(ret, Err(CommandError::NoPermission));

    fixture
        .execute(admin(), |state| create_domain(&admin(), state, input("fresh", "user")))
        .unwrap();
    assert_eq!(fixture.ws.domain_default_role("fresh"), Some("user".to_string()));
}

/// Writing the same key twice leaves one entry with the last value.
#[test]
fn test_set_account_detail_overwrite() {
    let mut fixture = TestFixture::new();
    fixture
        .execute(user(), |state| set_account_detail(&user(), state, detail_input("k", "v1")))
        .unwrap();
    fixture
        .execute(user(), |state| set_account_detail(&user(), state, detail_input("k", "v2")))
        .unwrap();

    assert_eq!(
        detail::get(&fixture.ws, &user(), None, None),
        vec![DetailRecord {
            writer: user(),
            key: "k".to_string(),
            value: "v2".to_string(),
        }]
    );
}

#[test]
fn test_set_account_detail_permissions() {
    let mut fixture = TestFixture::new();

    let ret = fixture.execute(nobody(), |state| {
        set_account_detail(&nobody(), state, detail_input("k", "from_nobody"))
    });
    assert_eq!(ret, Err(CommandError::NoPermission));

    fixture
        .execute(user(), |state| {
            grant_permission(
                &user(),
                state,
                GrantPermissionInput {
                    account_id: nobody(),
                    permission: GrantablePermission::SetMyAccountDetail,
                },
            )
        })
        .unwrap();
    fixture
        .execute(nobody(), |state| {
            set_account_detail(&nobody(), state, detail_input("k", "from_nobody"))
        })
        .unwrap();
    fixture
        .execute(user(), |state| set_account_detail(&user(), state, detail_input("k", "from_user")))
        .unwrap();

    // both writers keep their own value under the same key
    let records = detail::get(&fixture.ws, &user(), None, Some("k"));
    let values: Vec<(String, String)> = records
        .into_iter()
        .map(|record| (record.writer.to_string(), record.value))
        .collect();
    assert_eq!(
        values,
        vec![
            ("nobody@test".to_string(), "from_nobody".to_string()),
            ("user@test".to_string(), "from_user".to_string()),
        ]
    );

    // root may write anywhere, but only to existing accounts
    let ret = fixture.execute(admin(), |state| {
        set_account_detail(
            &admin(),
            state,
            SetAccountDetailInput {
                account_id: AccountId::new("ghost", "test"),
                key: "k".to_string(),
                value: "v".to_string(),
            },
        )
    });
    assert_eq!(ret, Err(CommandError::NotFound(Entity::Account)));
}
