#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based tests for reward accrual between a handful of stakers.
//!
//! Invariants tested:
//! - A lone staker receives the full emission, short by at most one unit of dust
//! - Two stakers together never receive more than was emitted
//! - A new staker has nothing pending at the ledger it joins
//! - Claiming twice in the same ledger pays nothing the second time
//! - A partial withdrawal returns exactly the requested stake

use proptest::prelude::*;
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::{Client as TokenClient, StellarAssetClient};
use soroban_sdk::{vec, Address, Env};
use reward_ledger::{ContractError, RewardLedgerContract, RewardLedgerContractClient};

const POOL: u32 = 7;

// ── Helpers ───────────────────────────────────────────────────────────────────

struct Setup {
    env: Env,
    client: RewardLedgerContractClient<'static>,
    stake_token: Address,
    reward_token: Address,
}

fn setup(rate: i128) -> Setup {
    let env = Env::default();
    env.mock_all_auths();

    let stake_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let contract_id = env.register(RewardLedgerContract, ());
    let client = RewardLedgerContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(&admin);
    client.create_pool(
        &admin,
        &POOL,
        &stake_token,
        &vec![&env, reward_token.clone()],
        &vec![&env, rate],
    );
    StellarAssetClient::new(&env, &reward_token).mint(&contract_id, &i128::from(u64::MAX));

    Setup {
        env,
        client,
        stake_token,
        reward_token,
    }
}

fn staker(s: &Setup, amount: i128) -> Address {
    let user = Address::generate(&s.env);
    StellarAssetClient::new(&s.env, &s.stake_token).mint(&user, &amount);
    user
}

fn pending(s: &Setup, user: &Address) -> i128 {
    s.client.pending_rewards(&POOL, user).get(0).unwrap()
}

// ── proptest! blocks ──────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A single staker is owed `rate × ledgers`, less at most one unit.
    #[test]
    fn prop_single_staker_receives_emission(
        rate in 0i128..10_000,
        amount in 1i128..1_000_000,
        ledgers in 1u32..500,
    ) {
        let s = setup(rate);
        let alice = staker(&s, amount);
        s.client.deposit(&alice, &POOL, &amount);

        s.env.ledger().set_sequence_number(ledgers);
        let owed = pending(&s, &alice);
        let emitted = rate * i128::from(ledgers);

        prop_assert!(owed <= emitted);
        prop_assert!(emitted - owed <= 1, "lost {} units", emitted - owed);
    }

    /// Two stakers never share out more than the pool emitted.
    #[test]
    fn prop_two_stakers_never_overpaid(
        rate in 1i128..10_000,
        a in 1i128..1_000_000,
        b in 1i128..1_000_000,
        ledgers in 1u32..500,
    ) {
        let s = setup(rate);
        let alice = staker(&s, a);
        let bob = staker(&s, b);
        s.client.deposit(&alice, &POOL, &a);
        s.client.deposit(&bob, &POOL, &b);

        s.env.ledger().set_sequence_number(ledgers);
        let paid = pending(&s, &alice) + pending(&s, &bob);
        let emitted = rate * i128::from(ledgers);

        prop_assert!(paid <= emitted);
        prop_assert!(emitted - paid <= 2);

        // The larger stake never earns less.
        if a >= b {
            prop_assert!(pending(&s, &alice) >= pending(&s, &bob));
        }
    }

    /// Joining a pool never grants rewards emitted before the join.
    #[test]
    fn prop_no_retroactive_rewards(
        rate in 1i128..10_000,
        first in 1i128..1_000_000,
        second in 1i128..1_000_000,
        gap in 1u32..500,
    ) {
        let s = setup(rate);
        let alice = staker(&s, first);
        let bob = staker(&s, second);
        s.client.deposit(&alice, &POOL, &first);

        s.env.ledger().set_sequence_number(gap);
        let alice_before = pending(&s, &alice);
        s.client.deposit(&bob, &POOL, &second);

        prop_assert_eq!(pending(&s, &bob), 0);
        prop_assert_eq!(pending(&s, &alice), alice_before);
    }

    /// A second claim in the same ledger transfers nothing.
    #[test]
    fn prop_claim_is_idempotent(
        rate in 0i128..10_000,
        amount in 1i128..1_000_000,
        ledgers in 0u32..500,
    ) {
        let s = setup(rate);
        let alice = staker(&s, amount);
        s.client.deposit(&alice, &POOL, &amount);

        s.env.ledger().set_sequence_number(ledgers);
        let preview = pending(&s, &alice);
        let first = s.client.claim_rewards(&alice, &POOL).get(0).unwrap();
        prop_assert_eq!(first, preview);

        let second = s.client.claim_rewards(&alice, &POOL).get(0).unwrap();
        prop_assert_eq!(second, 0);
        prop_assert_eq!(
            TokenClient::new(&s.env, &s.reward_token).balance(&alice),
            first
        );
    }

    /// Withdrawing returns exactly the requested amount and nothing beyond
    /// the position can be withdrawn.
    #[test]
    fn prop_withdraw_returns_exact_stake(
        amount in 1i128..1_000_000,
        percent in 0i128..=100,
    ) {
        let s = setup(10);
        let alice = staker(&s, amount);
        s.client.deposit(&alice, &POOL, &amount);

        let requested = amount * percent / 100;
        s.env.ledger().set_sequence_number(5);
        s.client.withdraw(&alice, &POOL, &requested);

        let remaining = amount - requested;
        prop_assert_eq!(
            TokenClient::new(&s.env, &s.stake_token).balance(&alice),
            requested
        );
        prop_assert_eq!(s.client.staked_amount(&POOL, &alice), remaining);
        prop_assert_eq!(s.client.total_staked(&POOL), remaining);

        let result = s.client.try_withdraw(&alice, &POOL, &(remaining + 1));
        match result {
            Err(Ok(e)) => prop_assert_eq!(e, ContractError::InsufficientBalance),
            _ => prop_assert!(false, "Expected InsufficientBalance error"),
        }
    }
}
