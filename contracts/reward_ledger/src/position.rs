//! Per-user positions and reward-debt settlement.

use soroban_sdk::{contracttype, log, symbol_short, Address, Env, Symbol, Vec};

use crate::{
    events,
    pool::{Pool, RewardStream},
    rewards, ContractError, TTL_EXTEND_TO, TTL_THRESHOLD,
};

const POSITION: Symbol = symbol_short!("POS");

/// A user's stake in one pool.
///
/// `reward_debt[i]` is the amount of stream `i` already accounted for at the
/// user's current balance. It may be shorter than the pool's stream list when
/// streams were added after the user's last interaction; missing entries
/// read as zero.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Position {
    pub amount: i128,
    pub reward_debt: Vec<i128>,
}

impl Position {
    pub fn new(env: &Env) -> Self {
        Self {
            amount: 0,
            reward_debt: Vec::new(env),
        }
    }

    /// Debt recorded for stream `index`, growing the vector with zero
    /// entries first if it is too short.
    fn backfilled_debt(&mut self, index: u32) -> i128 {
        while self.reward_debt.len() <= index {
            self.reward_debt.push_back(0);
        }
        self.reward_debt.get(index).unwrap_or(0)
    }

    /// Settle one stream.
    ///
    /// `before` is the balance the pending reward was earned on, `after` the
    /// balance the new debt baseline is recorded for. The pool must already
    /// be accrued to the current ledger. Returns the raw pending amount,
    /// which is negative only for a corrupted debt entry.
    pub fn settle(
        &mut self,
        stream: &RewardStream,
        index: u32,
        before: i128,
        after: i128,
    ) -> Result<i128, ContractError> {
        let debt = self.backfilled_debt(index);
        let raw = rewards::pending(before, stream.acc_per_share, stream.scale, debt)
            .ok_or(ContractError::MathOverflow)?;
        let new_debt = rewards::accrued(after, stream.acc_per_share, stream.scale)
            .ok_or(ContractError::MathOverflow)?;
        self.reward_debt.set(index, new_debt);
        Ok(raw)
    }

    /// Settle every stream of `pool`, returning the amounts owed to the user
    /// (one per stream index, never negative).
    pub fn settle_all(
        &mut self,
        env: &Env,
        pool_id: u32,
        user: &Address,
        pool: &Pool,
        before: i128,
        after: i128,
    ) -> Result<Vec<i128>, ContractError> {
        let mut owed = Vec::new(env);
        for index in 0..pool.stream_count() {
            let stream = pool.stream(index)?;
            let raw = self.settle(&stream, index, before, after)?;
            owed.push_back(clamp_pending(env, pool_id, user, index, raw));
        }
        Ok(owed)
    }

    /// Reset every debt to zero for an emptied position, forfeiting pending.
    pub fn forfeit(&mut self, env: &Env, pool: &Pool) {
        let mut debts = Vec::new(env);
        for _ in 0..pool.stream_count() {
            debts.push_back(0);
        }
        self.amount = 0;
        self.reward_debt = debts;
    }

    /// Pending amounts against an already-accrued pool, without touching the
    /// position. Uses the same arithmetic as [`Position::settle_all`].
    pub fn pending(&self, env: &Env, pool: &Pool) -> Result<Vec<i128>, ContractError> {
        let mut owed = Vec::new(env);
        for index in 0..pool.stream_count() {
            let stream = pool.stream(index)?;
            let debt = self.reward_debt.get(index).unwrap_or(0);
            let raw = rewards::pending(self.amount, stream.acc_per_share, stream.scale, debt)
                .ok_or(ContractError::MathOverflow)?;
            owed.push_back(raw.max(0));
        }
        Ok(owed)
    }
}

fn clamp_pending(env: &Env, pool_id: u32, user: &Address, index: u32, raw: i128) -> i128 {
    if raw >= 0 {
        return raw;
    }
    log!(
        env,
        "negative pending {} on pool {} stream {}, clamped",
        raw,
        pool_id,
        index
    );
    events::publish_accounting_defect(env, pool_id, user.clone(), index, raw);
    0
}

// ── Storage ──────────────────────────────────────────────────────────────────

pub fn load(env: &Env, pool_id: u32, user: &Address) -> Option<Position> {
    let key = (POSITION, pool_id, user.clone());
    let position: Option<Position> = env.storage().persistent().get(&key);
    if position.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    position
}

pub fn load_or_new(env: &Env, pool_id: u32, user: &Address) -> Position {
    load(env, pool_id, user).unwrap_or_else(|| Position::new(env))
}

pub fn save(env: &Env, pool_id: u32, user: &Address, position: &Position) {
    let key = (POSITION, pool_id, user.clone());
    env.storage().persistent().set(&key, position);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
