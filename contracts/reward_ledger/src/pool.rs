//! Pool records and the accrual updater.
//!
//! A pool owns an append-only list of [`RewardStream`]s. The position of a
//! stream in that list is its stable index; every per-user debt vector is
//! addressed by the same index.

use soroban_sdk::{contracttype, log, symbol_short, Address, Env, Symbol, Vec};

use crate::{rewards, ContractError, TTL_EXTEND_TO, TTL_THRESHOLD};

// ── Storage keys ─────────────────────────────────────────────────────────────

const POOL: Symbol = symbol_short!("POOL");
const TOKEN_INDEX: Symbol = symbol_short!("TOK_IDX");
const POOL_IDS: Symbol = symbol_short!("POOL_IDS");

// ── Types ────────────────────────────────────────────────────────────────────

/// One reward-token emission stream inside a pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardStream {
    pub token: Address,
    /// Reward units emitted per ledger across all stakers of the pool.
    pub rate_per_ledger: i128,
    /// Fixed-point factor, fixed when the stream is registered.
    pub scale: i128,
    /// Reward per unit of stake since the stream was registered, times `scale`.
    pub acc_per_share: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pool {
    pub staked_token: Address,
    pub reward_streams: Vec<RewardStream>,
    pub total_staked: i128,
    pub last_accrual_ledger: u32,
    pub created_ledger: u32,
    pub paused: bool,
}

impl Pool {
    pub fn new(env: &Env, staked_token: Address, now: u32) -> Self {
        Self {
            staked_token,
            reward_streams: Vec::new(env),
            total_staked: 0,
            last_accrual_ledger: now,
            created_ledger: now,
            paused: false,
        }
    }

    pub fn stream_count(&self) -> u32 {
        self.reward_streams.len()
    }

    /// Bounds-checked stream lookup.
    pub fn stream(&self, index: u32) -> Result<RewardStream, ContractError> {
        self.reward_streams
            .get(index)
            .ok_or(ContractError::TokenIndexOutOfRange)
    }

    /// Bring every accumulator current for ledger `now`.
    ///
    /// Returns `false` when the pool was already current. With nothing
    /// staked only the checkpoint moves: emission for that interval is not
    /// distributed to anyone.
    pub fn accrue(&mut self, now: u32) -> Result<bool, ContractError> {
        if now <= self.last_accrual_ledger {
            return Ok(false);
        }

        if self.total_staked > 0 {
            let elapsed = now - self.last_accrual_ledger;
            for index in 0..self.stream_count() {
                let mut stream = self.stream(index)?;
                stream.acc_per_share = rewards::accrue_per_share(
                    stream.acc_per_share,
                    stream.rate_per_ledger,
                    elapsed,
                    stream.scale,
                    self.total_staked,
                )
                .ok_or(ContractError::MathOverflow)?;
                self.reward_streams.set(index, stream);
            }
        }

        self.last_accrual_ledger = now;
        Ok(true)
    }

    pub fn reward_tokens(&self, env: &Env) -> Vec<Address> {
        let mut tokens = Vec::new(env);
        for stream in self.reward_streams.iter() {
            tokens.push_back(stream.token);
        }
        tokens
    }

    pub fn reward_rates(&self, env: &Env) -> Vec<i128> {
        let mut rates = Vec::new(env);
        for stream in self.reward_streams.iter() {
            rates.push_back(stream.rate_per_ledger);
        }
        rates
    }
}

// ── Storage ──────────────────────────────────────────────────────────────────

pub fn current_ledger(env: &Env) -> u32 {
    env.ledger().sequence()
}

pub fn exists(env: &Env, pool_id: u32) -> bool {
    env.storage().persistent().has(&(POOL, pool_id))
}

pub fn load(env: &Env, pool_id: u32) -> Result<Pool, ContractError> {
    let key = (POOL, pool_id);
    let pool: Pool = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(ContractError::PoolNotFound)?;
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    Ok(pool)
}

pub fn save(env: &Env, pool_id: u32, pool: &Pool) {
    let key = (POOL, pool_id);
    env.storage().persistent().set(&key, pool);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Record a freshly created pool in the id list.
pub fn track(env: &Env, pool_id: u32) {
    let mut ids = pool_ids(env);
    ids.push_back(pool_id);
    env.storage().persistent().set(&POOL_IDS, &ids);
    env.storage()
        .persistent()
        .extend_ttl(&POOL_IDS, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn pool_ids(env: &Env) -> Vec<u32> {
    env.storage()
        .persistent()
        .get(&POOL_IDS)
        .unwrap_or(Vec::new(env))
}

/// Load a pool, accrue it to the current ledger and persist it if anything
/// moved. Safe to call any number of times per ledger.
pub fn update_accrual(env: &Env, pool_id: u32) -> Result<Pool, ContractError> {
    let mut pool = load(env, pool_id)?;
    let now = current_ledger(env);
    if pool.total_staked == 0 && now > pool.last_accrual_ledger {
        log!(env, "pool {} idle, skipping emission", pool_id);
    }
    if pool.accrue(now)? {
        save(env, pool_id, &pool);
    }
    Ok(pool)
}

// ── Token registry ───────────────────────────────────────────────────────────

pub fn token_index(env: &Env, pool_id: u32, token: &Address) -> Option<u32> {
    env.storage()
        .persistent()
        .get(&(TOKEN_INDEX, pool_id, token.clone()))
}

/// Append a reward stream and record its stable index.
///
/// The new accumulator starts at zero. Existing streams and every user debt
/// recorded against them are left untouched.
pub fn register_stream(
    env: &Env,
    pool_id: u32,
    pool: &mut Pool,
    token: Address,
    rate_per_ledger: i128,
    scale: i128,
) -> Result<u32, ContractError> {
    if token_index(env, pool_id, &token).is_some() {
        return Err(ContractError::RewardTokenExists);
    }

    let index = pool.stream_count();
    pool.reward_streams.push_back(RewardStream {
        token: token.clone(),
        rate_per_ledger,
        scale,
        acc_per_share: 0,
    });

    let key = (TOKEN_INDEX, pool_id, token);
    env.storage().persistent().set(&key, &index);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);

    Ok(index)
}
