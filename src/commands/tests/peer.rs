/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

use crate::{
    commands::peer::{add_peer, remove_peer},
    error::{CommandError, Entity},
    keys,
    types::{AddPeerInput, RemovePeerInput},
    world_state::StateRead,
};

use super::test_utils::*;

fn add_input(public_key: &str) -> AddPeerInput {
    AddPeerInput {
        address: "127.0.0.1:10002".to_string(),
        public_key: public_key.to_string(),
    }
}

fn remove_input(public_key: &str) -> RemovePeerInput {
    RemovePeerInput {
        public_key: public_key.to_string(),
    }
}

/// Peer keys that differ only in letter case are the same peer.
#[test]
fn test_add_peer_duplicate_case() {
    let mut fixture = TestFixture::new();
    fixture
        .execute(admin(), |state| add_peer(&admin(), state, add_input(KEY_K)))
        .unwrap();
    let ret = fixture.execute(admin(), |state| {
        add_peer(&admin(), state, add_input(&KEY_K.to_uppercase()))
    });
    assert_eq!(ret, Err(CommandError::DuplicateKey));
    assert_eq!(fixture.ws.peers().len(), 2);

    let ret = fixture.execute(user(), |state| add_peer(&user(), state, add_input(KEY_K)));
    assert_eq!(ret, Err(CommandError::NoPermission));
}

#[test]
fn test_remove_peer() {
    let mut fixture = TestFixture::new();
    let genesis_peer = hex::encode(KEY_A);

    // the network keeps at least one peer
    let ret = fixture.execute(admin(), |state| {
        remove_peer(&admin(), state, remove_input(&genesis_peer))
    });
    assert_eq!(ret, Err(CommandError::LastPeer));

    let ret = fixture.execute(admin(), |state| remove_peer(&admin(), state, remove_input(KEY_K)));
    assert_eq!(ret, Err(CommandError::NotFound(Entity::Peer)));

    fixture
        .execute(admin(), |state| add_peer(&admin(), state, add_input(KEY_K)))
        .unwrap();
    fixture
        .execute(admin(), |state| {
            remove_peer(&admin(), state, remove_input(&genesis_peer.to_uppercase()))
        })
        .unwrap();

    let peers = fixture.ws.peers();
    assert_eq!(peers.len(), 1);
    assert!(keys::equals(
        &peers[0].public_key,
        &keys::canonicalize(KEY_K).unwrap()
    ));
}
