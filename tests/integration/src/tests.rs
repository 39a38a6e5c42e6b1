//! Integration tests for the merkledrop contract.
//!
//! Trees and proofs are produced by `merkledrop-common` exactly as the CLI
//! produces them, then redeemed through the contract's `instantiate` /
//! `execute` / `query` entry points on `cosmwasm_std::testing` mocks.
//! Bank messages emitted by the contract are applied to a small in-memory
//! ledger so fund conservation can be checked end to end.
//!
//! Run:
//! ```bash
//! cargo test -p merkledrop-integration-tests
//! ```

use std::collections::HashMap;

use cosmwasm_std::testing::{
    message_info, mock_dependencies, mock_env, MockApi, MockQuerier, MockStorage,
};
use cosmwasm_std::{
    coins, from_json, Addr, BankMsg, CosmosMsg, Env, OwnedDeps, Response, Uint128,
};
use merkledrop::contract::{execute, instantiate, query};
use merkledrop::msg::{
    ExecuteMsg, InstantiateMsg, IsClaimedResponse, MerkledropsResponse, QueryMsg, StatusResponse,
};
use merkledrop::state::Merkledrop;
use merkledrop::ContractError;
use merkledrop_common::{
    build_drop_list, compute_leaf_hash, DropList, DropStatus, NormalizeError, RawAccountList,
};
use sha2::{Digest, Sha256};

// ─── Constants ───

const DENOM: &str = "ubtsg";
const CREATED_AT: u64 = 1_000;
const END_HEIGHT: u64 = 1_100;

// ─── Harness ───

type MockDeps = OwnedDeps<MockStorage, MockApi, MockQuerier>;

/// Mock chain: contract deps plus balances moved by emitted bank messages.
struct Chain {
    deps: MockDeps,
    contract_balance: u128,
    balances: HashMap<String, u128>,
}

impl Chain {
    fn new() -> Self {
        let mut deps = mock_dependencies();
        let admin = deps.api.addr_make("admin");
        instantiate(
            deps.as_mut(),
            mock_env(),
            message_info(&admin, &[]),
            InstantiateMsg {
                admin: None,
                creation_fee: None,
                fee_collector: None,
                max_duration_blocks: None,
            },
        )
        .unwrap();

        Chain {
            deps,
            contract_balance: 0,
            balances: HashMap::new(),
        }
    }

    fn addr(&self, name: &str) -> Addr {
        self.deps.api.addr_make(name)
    }

    fn exec(
        &mut self,
        height: u64,
        sender: &Addr,
        funds: u128,
        msg: ExecuteMsg,
    ) -> Result<Response, ContractError> {
        let funds = if funds == 0 { vec![] } else { coins(funds, DENOM) };
        let res = execute(self.deps.as_mut(), env_at(height), message_info(sender, &funds), msg)?;

        // The bank only settles on success
        self.contract_balance += funds.iter().map(|c| c.amount.u128()).sum::<u128>();
        for sub in &res.messages {
            if let CosmosMsg::Bank(BankMsg::Send { to_address, amount }) = &sub.msg {
                for c in amount {
                    assert_eq!(c.denom, DENOM);
                    self.contract_balance -= c.amount.u128();
                    *self.balances.entry(to_address.clone()).or_default() += c.amount.u128();
                }
            }
        }
        Ok(res)
    }

    fn create(&mut self, creator: &Addr, list: &DropList) -> u64 {
        let res = self
            .exec(
                CREATED_AT,
                creator,
                list.total_amount.u128(),
                ExecuteMsg::Create {
                    merkle_root: list.merkle_root.clone(),
                    leaf_count: list.leaf_count,
                    total_amount: list.total_amount,
                    denom: DENOM.to_string(),
                    start_height: 0,
                    end_height: END_HEIGHT,
                },
            )
            .unwrap();
        attr(&res, "drop_id").parse().unwrap()
    }

    fn claim(
        &mut self,
        height: u64,
        drop_id: u64,
        list: &DropList,
        who: &Addr,
    ) -> Result<Response, ContractError> {
        let entry = &list.claims[who.as_str()];
        self.exec(
            height,
            who,
            0,
            ExecuteMsg::Claim {
                drop_id,
                index: entry.index,
                amount: entry.amount,
                proof: entry.proof.clone(),
            },
        )
    }

    fn drop(&self, drop_id: u64) -> Merkledrop {
        from_json(
            query(self.deps.as_ref(), mock_env(), QueryMsg::Merkledrop { drop_id }).unwrap(),
        )
        .unwrap()
    }

    fn balance(&self, who: &Addr) -> u128 {
        self.balances.get(who.as_str()).copied().unwrap_or_default()
    }
}

fn env_at(height: u64) -> Env {
    let mut env = mock_env();
    env.block.height = height;
    env
}

fn attr(res: &Response, key: &str) -> String {
    res.attributes
        .iter()
        .find(|a| a.key == key)
        .map(|a| a.value.clone())
        .unwrap_or_default()
}

/// Three recipients ordered so that A gets leaf 0, B leaf 1 and C leaf 2.
fn abc(chain: &Chain) -> (Addr, Addr, Addr, DropList) {
    let mut addrs = vec![chain.addr("alice"), chain.addr("bob"), chain.addr("carol")];
    addrs.sort_by(|x, y| x.as_str().cmp(y.as_str()));
    let (a, b, c) = (addrs[0].clone(), addrs[1].clone(), addrs[2].clone());

    let json = format!(
        r#"{{"{}": "1000000", "{}": "2000000", "{}": "3000000"}}"#,
        a, b, c
    );
    let raw: RawAccountList = serde_json::from_str(&json).unwrap();
    let list = build_drop_list(raw.0).unwrap();
    (a, b, c, list)
}

// ─── Leaf encoding ───

#[test]
fn test_leaf_hash_layout() {
    let address = "bitsong1vgpsha4f8grmsqr6krfdxwpcf3x20h0q3ztaj2";
    let mut hasher = Sha256::new();
    hasher.update([0x00]);
    hasher.update(7u64.to_be_bytes());
    hasher.update((address.len() as u32).to_be_bytes());
    hasher.update(address.as_bytes());
    hasher.update(1_000_000u128.to_be_bytes());
    let expected: [u8; 32] = hasher.finalize().into();

    assert_eq!(compute_leaf_hash(7, address, 1_000_000), expected);
}

// ─── Scenarios ───

#[test]
fn test_claim_then_repeat() {
    let mut chain = Chain::new();
    let creator = chain.addr("creator");
    let (a, _, _, list) = abc(&chain);
    assert_eq!(list.claims[a.as_str()].index, 0);

    let id = chain.create(&creator, &list);
    assert_eq!(id, 1);

    chain.claim(1_050, id, &list, &a).unwrap();
    assert_eq!(chain.drop(id).remaining_amount, Uint128::new(5_000_000));
    assert_eq!(chain.balance(&a), 1_000_000);

    let err = chain.claim(1_051, id, &list, &a).unwrap_err();
    assert!(matches!(
        err,
        ContractError::AlreadyClaimed {
            drop_id: 1,
            index: 0
        }
    ));
    assert_eq!(chain.balance(&a), 1_000_000);
    assert_eq!(chain.drop(id).remaining_amount, Uint128::new(5_000_000));
}

#[test]
fn test_withdraw_lifecycle() {
    let mut chain = Chain::new();
    let creator = chain.addr("creator");
    let stranger = chain.addr("stranger");
    let (a, b, c, list) = abc(&chain);
    let id = chain.create(&creator, &list);

    for height in [1_050, END_HEIGHT + 10] {
        let err = chain
            .exec(height, &stranger, 0, ExecuteMsg::Withdraw { drop_id: id })
            .unwrap_err();
        assert!(matches!(err, ContractError::Unauthorized { .. }));
    }

    let err = chain
        .exec(1_050, &creator, 0, ExecuteMsg::Withdraw { drop_id: id })
        .unwrap_err();
    assert!(matches!(err, ContractError::NotExpiredYet { .. }));

    chain.claim(1_050, id, &list, &a).unwrap();
    chain.claim(1_060, id, &list, &c).unwrap();

    let res = chain
        .exec(END_HEIGHT + 1, &creator, 0, ExecuteMsg::Withdraw { drop_id: id })
        .unwrap();
    assert_eq!(attr(&res, "amount"), "2000000");
    assert_eq!(chain.balance(&creator), 2_000_000);

    let drop = chain.drop(id);
    assert!(drop.closed);
    assert!(drop.remaining_amount.is_zero());
    assert_eq!(chain.contract_balance, 0);

    // B missed the window
    let err = chain.claim(END_HEIGHT + 2, id, &list, &b).unwrap_err();
    assert!(matches!(err, ContractError::DropClosed { .. }));
}

#[test]
fn test_duplicate_addresses_merge() {
    let chain = Chain::new();
    let a = chain.addr("alice");

    let json = format!(r#"{{"{a}": "1000000", "{a}": "2000000"}}"#);
    let raw: RawAccountList = serde_json::from_str(&json).unwrap();
    assert_eq!(raw.0.len(), 2);

    let list = build_drop_list(raw.0).unwrap();
    assert_eq!(list.leaf_count, 1);
    assert_eq!(list.claims[a.as_str()].amount, Uint128::new(3_000_000));
    assert!(list.claims[a.as_str()].proof.is_empty());
}

#[test]
fn test_uppercase_input_is_claimable() {
    let mut chain = Chain::new();
    let creator = chain.addr("creator");
    let a = chain.addr("alice");

    let json = format!(r#"{{"{}": "100", "{a}": "50"}}"#, a.as_str().to_uppercase());
    let raw: RawAccountList = serde_json::from_str(&json).unwrap();
    let list = build_drop_list(raw.0).unwrap();
    assert_eq!(list.leaf_count, 1);

    let id = chain.create(&creator, &list);
    chain.claim(1_050, id, &list, &a).unwrap();
    assert_eq!(chain.balance(&a), 150);
    assert!(chain.drop(id).remaining_amount.is_zero());
}

#[test]
fn test_malformed_address_rejected_before_create() {
    let raw: RawAccountList =
        serde_json::from_str(r#"{"not-an-address!!": "5", "also bad": "6"}"#).unwrap();
    let err = build_drop_list(raw.0).unwrap_err();
    assert!(matches!(err, NormalizeError::InvalidAddress { .. }));
}

#[test]
fn test_single_recipient_drop() {
    let mut chain = Chain::new();
    let creator = chain.addr("creator");
    let a = chain.addr("alice");
    let list = build_drop_list(vec![(a.to_string(), "42".to_string())]).unwrap();
    let id = chain.create(&creator, &list);

    chain.claim(CREATED_AT, id, &list, &a).unwrap();
    assert_eq!(chain.balance(&a), 42);
    assert!(chain.drop(id).remaining_amount.is_zero());
}

// ─── Invariants ───

#[test]
fn test_conservation_with_bitmap_word_boundaries() {
    let mut chain = Chain::new();
    let creator = chain.addr("creator");

    let recipients: Vec<Addr> = (0..130).map(|i| chain.addr(&format!("user{i}"))).collect();
    let list = build_drop_list(
        recipients
            .iter()
            .enumerate()
            .map(|(i, addr)| (addr.to_string(), (100 + i as u128).to_string())),
    )
    .unwrap();
    let total = list.total_amount.u128();
    let id = chain.create(&creator, &list);
    assert_eq!(chain.contract_balance, total);

    // Every other recipient claims, hitting indices on both sides of 64 and 128
    let mut claimed = 0u128;
    for addr in recipients.iter().step_by(2) {
        chain.claim(1_050, id, &list, addr).unwrap();
        claimed += list.claims[addr.as_str()].amount.u128();

        let drop = chain.drop(id);
        assert_eq!(drop.remaining_amount.u128() + claimed, total);
        assert_eq!(chain.contract_balance, drop.remaining_amount.u128());
    }

    for addr in &recipients {
        let entry = &list.claims[addr.as_str()];
        let res: IsClaimedResponse = from_json(
            query(
                chain.deps.as_ref(),
                mock_env(),
                QueryMsg::IsClaimed {
                    drop_id: id,
                    index: entry.index,
                },
            )
            .unwrap(),
        )
        .unwrap();
        assert_eq!(res.is_claimed, chain.balance(addr) > 0);
    }

    chain
        .exec(END_HEIGHT + 1, &creator, 0, ExecuteMsg::Withdraw { drop_id: id })
        .unwrap();
    assert_eq!(chain.balance(&creator), total - claimed);
    assert_eq!(chain.contract_balance, 0);
}

#[test]
fn test_drops_are_independent() {
    let mut chain = Chain::new();
    let creator = chain.addr("creator");
    let (a, _, _, list) = abc(&chain);

    let first = chain.create(&creator, &list);
    let second = chain.create(&creator, &list);
    assert_eq!((first, second), (1, 2));

    // Same leaf, same proof, separate claimed sets
    chain.claim(1_050, first, &list, &a).unwrap();
    chain.claim(1_050, second, &list, &a).unwrap();
    assert_eq!(chain.balance(&a), 2_000_000);

    let listed: MerkledropsResponse = from_json(
        query(
            chain.deps.as_ref(),
            mock_env(),
            QueryMsg::MerkledropsByCreator {
                creator: creator.to_string(),
                start_after: Some(first),
                limit: None,
            },
        )
        .unwrap(),
    )
    .unwrap();
    assert_eq!(listed.merkledrops.len(), 1);
    assert_eq!(listed.merkledrops[0].id, second);
}

#[test]
fn test_rejected_claims_change_nothing() {
    let mut chain = Chain::new();
    let creator = chain.addr("creator");
    let mallory = chain.addr("mallory");
    let (a, b, _, list) = abc(&chain);
    let id = chain.create(&creator, &list);

    // Proof replayed by another account
    let entry = list.claims[a.as_str()].clone();
    let err = chain
        .exec(
            1_050,
            &mallory,
            0,
            ExecuteMsg::Claim {
                drop_id: id,
                index: entry.index,
                amount: entry.amount,
                proof: entry.proof.clone(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, ContractError::InvalidProof));

    // B presenting A's leaf
    let err = chain
        .exec(
            1_050,
            &b,
            0,
            ExecuteMsg::Claim {
                drop_id: id,
                index: entry.index,
                amount: entry.amount,
                proof: entry.proof,
            },
        )
        .unwrap_err();
    assert!(matches!(err, ContractError::InvalidProof));

    // Outside the window
    let err = chain.claim(END_HEIGHT + 1, id, &list, &a).unwrap_err();
    assert!(matches!(err, ContractError::NotActive { .. }));

    assert_eq!(chain.drop(id).remaining_amount, list.total_amount);
    assert_eq!(chain.contract_balance, list.total_amount.u128());
    assert!(chain.balances.is_empty());

    // A can still claim afterwards
    chain.claim(1_050, id, &list, &a).unwrap();
    assert_eq!(chain.balance(&a), 1_000_000);
}

#[test]
fn test_status_follows_height() {
    let mut chain = Chain::new();
    let creator = chain.addr("creator");
    let (_, _, _, list) = abc(&chain);
    let id = chain.create(&creator, &list);

    let status_at = |chain: &Chain, height: u64| -> DropStatus {
        let res: StatusResponse = from_json(
            query(chain.deps.as_ref(), env_at(height), QueryMsg::Status { drop_id: id }).unwrap(),
        )
        .unwrap();
        res.status
    };

    assert_eq!(status_at(&chain, CREATED_AT), DropStatus::Active);
    assert_eq!(status_at(&chain, END_HEIGHT), DropStatus::Active);
    assert_eq!(status_at(&chain, END_HEIGHT + 1), DropStatus::Expired);

    chain
        .exec(END_HEIGHT + 1, &creator, 0, ExecuteMsg::Withdraw { drop_id: id })
        .unwrap();
    assert_eq!(status_at(&chain, END_HEIGHT + 1), DropStatus::Closed);
    assert_eq!(status_at(&chain, CREATED_AT), DropStatus::Closed);
}

#[test]
fn test_proof_file_round_trip_through_json() {
    let chain = Chain::new();
    let (a, _, _, list) = abc(&chain);

    let json = serde_json::to_string(&list.claims).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    let entry = &parsed[a.as_str()];
    assert_eq!(entry["index"], 0);
    assert_eq!(entry["amount"], "1000000");
    assert_eq!(entry["proof"].as_array().unwrap().len(), 2);
    for hash in entry["proof"].as_array().unwrap() {
        assert_eq!(hex::decode(hash.as_str().unwrap()).unwrap().len(), 32);
    }
}
