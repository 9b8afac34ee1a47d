use ed25519_dalek::SigningKey;
use ledger_runtime::{
    AccountId, BlockParams, Command, GenesisBuilder, MemoryStorage, Permission, PublicKey,
    Transaction, WorldState,
};

/// Block time of the first test block, in milliseconds.
pub const T0: u64 = 1_665_370_157_000;

pub const ADMIN_SEED: u8 = 1;
pub const ALICE_SEED: u8 = 2;
pub const BOB_SEED: u8 = 3;
pub const PEER_SEED: u8 = 9;

pub const KEY_K: &str = "0a0b0c0d0e0f101112131415161718191a1b1c1d1e1f20212223242526272829";

pub struct TestData {}

impl TestData {
    pub fn signing_key(seed: u8) -> SigningKey {
        SigningKey::from_bytes(&[seed; 32])
    }

    pub fn public_key(seed: u8) -> PublicKey {
        PublicKey::from(Self::signing_key(seed).verifying_key().to_bytes())
    }

    pub fn admin() -> AccountId {
        AccountId::new("admin", "test")
    }

    pub fn alice() -> AccountId {
        AccountId::new("alice", "test")
    }

    pub fn bob() -> AccountId {
        AccountId::new("bob", "test")
    }

    /// `admin` holds Root. `alice` and `bob` hold the default `user` role, which covers their own
    /// signatories, quorum and details.
    pub fn world_state() -> WorldState<MemoryStorage> {
        GenesisBuilder::new()
            .role("admin", [Permission::Root])
            .role(
                "user",
                [
                    Permission::AddSignatory,
                    Permission::RemoveSignatory,
                    Permission::SetQuorum,
                    Permission::GetMyAccDetail,
                    Permission::GetMySignatories,
                    Permission::GetMyAccount,
                    Permission::GrantSetMyAccountDetail,
                ],
            )
            .domain("test", "user")
            .account(Self::admin(), Self::public_key(ADMIN_SEED), ["admin"])
            .account(Self::alice(), Self::public_key(ALICE_SEED), ["user"])
            .account(Self::bob(), Self::public_key(BOB_SEED), ["user"])
            .peer("127.0.0.1:10001", Self::public_key(PEER_SEED))
            .build(MemoryStorage::new())
    }

    pub fn block_params(height: u64) -> BlockParams {
        BlockParams {
            height,
            timestamp: T0 + height * 1_000,
        }
    }

    /// Transaction of `creator` signed with the keys of `seeds`.
    pub fn transaction(
        creator: AccountId,
        created_time: u64,
        commands: Vec<Command>,
        seeds: &[u8],
    ) -> Transaction {
        seeds.iter().fold(
            Transaction::new(creator, created_time, commands),
            |tx, seed| tx.sign(&Self::signing_key(*seed)),
        )
    }
}
