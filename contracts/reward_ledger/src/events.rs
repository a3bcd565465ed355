#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env, Vec};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the ledger is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub ledger: u32,
}

/// Fired when an admin opens a new pool.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolCreatedEvent {
    pub pool_id: u32,
    pub staked_token: Address,
    pub reward_tokens: Vec<Address>,
    pub rates: Vec<i128>,
    pub ledger: u32,
}

/// Fired when a reward stream is appended to a pool.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardTokenAddedEvent {
    pub pool_id: u32,
    pub token: Address,
    pub index: u32,
    pub rate: i128,
    pub scale: i128,
    pub ledger: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardRatesSetEvent {
    pub pool_id: u32,
    pub rates: Vec<i128>,
    pub ledger: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PauseSetEvent {
    pub pool_id: u32,
    pub paused: bool,
    pub ledger: u32,
}

/// Fired when stake enters a pool. `funder` differs from `beneficiary` for
/// deposits made on someone else's behalf.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositEvent {
    pub pool_id: u32,
    pub funder: Address,
    pub beneficiary: Address,
    pub amount: i128,
    pub new_total_staked: i128,
    pub ledger: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawEvent {
    pub pool_id: u32,
    pub user: Address,
    pub amount: i128,
    pub new_total_staked: i128,
    pub ledger: u32,
}

/// Fired whenever pending rewards are paid out. `amounts` is aligned with
/// `tokens`, one entry per reward stream of the pool.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsClaimedEvent {
    pub pool_id: u32,
    pub user: Address,
    pub tokens: Vec<Address>,
    pub amounts: Vec<i128>,
    pub ledger: u32,
}

/// Fired when a user pulls their stake out and forfeits pending rewards.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyWithdrawEvent {
    pub pool_id: u32,
    pub user: Address,
    pub amount: i128,
    pub ledger: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuthorizerSetEvent {
    pub admin: Address,
    pub authorizer: Option<Address>,
    pub ledger: u32,
}

/// Fired when a computed pending reward came out negative and was clamped.
/// Indexers should treat this as an alert: it signals misaligned debts.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccountingDefectEvent {
    pub pool_id: u32,
    pub user: Address,
    pub index: u32,
    pub raw_pending: i128,
    pub ledger: u32,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, admin: Address) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_pool_created(
    env: &Env,
    pool_id: u32,
    staked_token: Address,
    reward_tokens: Vec<Address>,
    rates: Vec<i128>,
) {
    env.events().publish(
        (symbol_short!("POOL_NEW"), pool_id),
        PoolCreatedEvent {
            pool_id,
            staked_token,
            reward_tokens,
            rates,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_reward_token_added(
    env: &Env,
    pool_id: u32,
    token: Address,
    index: u32,
    rate: i128,
    scale: i128,
) {
    env.events().publish(
        (symbol_short!("RWD_ADD"), pool_id),
        RewardTokenAddedEvent {
            pool_id,
            token,
            index,
            rate,
            scale,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_reward_rates_set(env: &Env, pool_id: u32, rates: Vec<i128>) {
    env.events().publish(
        (symbol_short!("RWD_RATE"), pool_id),
        RewardRatesSetEvent {
            pool_id,
            rates,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_pause_set(env: &Env, pool_id: u32, paused: bool) {
    env.events().publish(
        (symbol_short!("PAUSED"), pool_id),
        PauseSetEvent {
            pool_id,
            paused,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_deposit(
    env: &Env,
    pool_id: u32,
    funder: Address,
    beneficiary: Address,
    amount: i128,
    new_total_staked: i128,
) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), pool_id, beneficiary.clone()),
        DepositEvent {
            pool_id,
            funder,
            beneficiary,
            amount,
            new_total_staked,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_withdraw(env: &Env, pool_id: u32, user: Address, amount: i128, new_total_staked: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), pool_id, user.clone()),
        WithdrawEvent {
            pool_id,
            user,
            amount,
            new_total_staked,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_rewards_claimed(
    env: &Env,
    pool_id: u32,
    user: Address,
    tokens: Vec<Address>,
    amounts: Vec<i128>,
) {
    env.events().publish(
        (symbol_short!("CLAIMED"), pool_id, user.clone()),
        RewardsClaimedEvent {
            pool_id,
            user,
            tokens,
            amounts,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_emergency_withdraw(env: &Env, pool_id: u32, user: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("EMRG_WD"), pool_id, user.clone()),
        EmergencyWithdrawEvent {
            pool_id,
            user,
            amount,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_authorizer_set(env: &Env, admin: Address, authorizer: Option<Address>) {
    env.events().publish(
        (symbol_short!("AUTHZ"),),
        AuthorizerSetEvent {
            admin,
            authorizer,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_accounting_defect(
    env: &Env,
    pool_id: u32,
    user: Address,
    index: u32,
    raw_pending: i128,
) {
    env.events().publish(
        (symbol_short!("ACCT_ERR"), pool_id),
        AccountingDefectEvent {
            pool_id,
            user,
            index,
            raw_pending,
            ledger: env.ledger().sequence(),
        },
    );
}
