#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use reward_ledger::{RewardLedgerContract, RewardLedgerContractClient};
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::StellarAssetClient,
    vec, Address, Env,
};

const POOL: u32 = 1;

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Deposit { user: u8, amount: u32 },
    Withdraw { user: u8, amount: u32 },
    Claim { user: u8 },
    EmergencyWithdraw { user: u8 },
    SetRate { rate: u16 },
    AddRewardToken { rate: u16, settle_first: bool },
    Advance { ledgers: u8 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();

    let contract_id = env.register(RewardLedgerContract, ());
    let client = RewardLedgerContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(&admin);

    let stake_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    StellarAssetClient::new(&env, &reward_token).mint(&contract_id, &i128::from(u64::MAX));
    client.create_pool(
        &admin,
        &POOL,
        &stake_token,
        &vec![&env, reward_token],
        &vec![&env, 1_000i128],
    );

    let users: [Address; 4] = core::array::from_fn(|_| Address::generate(&env));
    let mut ledger = 0u32;
    let mut streams = 1u32;

    // Rejected calls are fine; panics and broken bookkeeping are not.
    for action in actions.into_iter().take(64) {
        match action {
            FuzzAction::Deposit { user, amount } => {
                let who = &users[user as usize % users.len()];
                let amount = i128::from(amount);
                StellarAssetClient::new(&env, &stake_token).mint(who, &amount);
                let _ = client.try_deposit(who, &POOL, &amount);
            }
            FuzzAction::Withdraw { user, amount } => {
                let who = &users[user as usize % users.len()];
                let _ = client.try_withdraw(who, &POOL, &i128::from(amount));
            }
            FuzzAction::Claim { user } => {
                let who = &users[user as usize % users.len()];
                let _ = client.try_claim_rewards(who, &POOL);
            }
            FuzzAction::EmergencyWithdraw { user } => {
                let who = &users[user as usize % users.len()];
                let _ = client.try_emergency_withdraw(who, &POOL);
            }
            FuzzAction::SetRate { rate } => {
                let rates = client.reward_rates(&POOL);
                let mut updated = soroban_sdk::Vec::new(&env);
                for _ in 0..rates.len() {
                    updated.push_back(i128::from(rate));
                }
                let _ = client.try_set_reward_rates(&admin, &POOL, &updated);
            }
            FuzzAction::AddRewardToken { rate, settle_first } => {
                if streams >= 4 {
                    continue;
                }
                let token = env
                    .register_stellar_asset_contract_v2(Address::generate(&env))
                    .address();
                StellarAssetClient::new(&env, &token).mint(&contract_id, &i128::from(u64::MAX));
                let added =
                    client.try_add_reward_token(&admin, &POOL, &token, &i128::from(rate), &settle_first);
                if added.is_ok() {
                    streams += 1;
                }
            }
            FuzzAction::Advance { ledgers } => {
                ledger += u32::from(ledgers);
                env.ledger().set_sequence_number(ledger);
            }
        }

        let total: i128 = users
            .iter()
            .map(|who| client.staked_amount(&POOL, who))
            .sum();
        assert_eq!(client.total_staked(&POOL), total);
        for who in users.iter() {
            let pending = client.pending_rewards(&POOL, who);
            assert_eq!(pending.len(), streams);
            assert!(pending.iter().all(|amount| amount >= 0));
        }
    }
});
