#![no_std]

//! Multi-pool, multi-token staking reward ledger.
//!
//! Users stake a pool's asset and accrue every reward stream of that pool in
//! proportion to their share of the pool's stake. Accrual is lazy: each pool
//! keeps one accumulated-per-share value per stream, and each position keeps
//! one debt per stream, so every call costs O(streams) regardless of how many
//! users are staked.
//!
//! Every balance-changing operation runs in the same order: accrue the pool,
//! settle pending rewards on the old balance, apply the balance change,
//! record new debts, persist, and only then move tokens.

pub mod access;
pub mod custody;
pub mod events;
pub mod pool;
pub mod position;
pub mod reentrancy;
pub mod rewards;

use common::admin_tiers::{self, AdminTier};
use soroban_sdk::{contract, contractimpl, log, symbol_short, Address, Env, Symbol, Vec};

use access::Action;
use pool::Pool;
use position::Position;

// ── Storage key constants ────────────────────────────────────────────────────

const ADMIN: Symbol = symbol_short!("ADMIN");
const INITIALIZED: Symbol = symbol_short!("INIT");

const DAY_IN_LEDGERS: u32 = 17_280;
pub(crate) const TTL_THRESHOLD: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const TTL_EXTEND_TO: u32 = 60 * DAY_IN_LEDGERS;

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidAmount = 4,
    InsufficientBalance = 5,
    PoolNotFound = 6,
    PoolAlreadyExists = 7,
    PoolPaused = 8,
    InvalidPoolConfig = 9,
    TransferFailed = 10,
    RewardTokenExists = 11,
    TokenIndexOutOfRange = 12,
    MathOverflow = 13,
    Reentrant = 14,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct RewardLedgerContract;

#[contractimpl]
impl RewardLedgerContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the ledger. `admin` becomes the root `SuperAdmin`.
    pub fn initialize(env: Env, admin: Address) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        admin.require_auth();

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&INITIALIZED, &true);
        admin_tiers::bootstrap(&env, &admin);
        Self::extend_instance_ttl(&env);

        events::publish_initialized(&env, admin);

        Ok(())
    }

    // ── Pool administration ─────────────────────────────────────────────────

    /// Open pool `pool_id` staking `staked_token` and emitting
    /// `reward_tokens[i]` at `rates[i]` units per ledger.
    ///
    /// Fails with `InvalidPoolConfig` when the lists differ in length, a rate
    /// is negative, a reward token is listed twice or equals the staked
    /// token, or any address does not behave like a token.
    pub fn create_pool(
        env: Env,
        caller: Address,
        pool_id: u32,
        staked_token: Address,
        reward_tokens: Vec<Address>,
        rates: Vec<i128>,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require(&env, &caller, Action::CreatePool)?;
        Self::extend_instance_ttl(&env);

        if pool::exists(&env, pool_id) {
            return Err(ContractError::PoolAlreadyExists);
        }
        if reward_tokens.len() != rates.len() {
            return Err(ContractError::InvalidPoolConfig);
        }
        if staked_token == env.current_contract_address() {
            return Err(ContractError::InvalidPoolConfig);
        }
        custody::decimals(&env, &staked_token)?;

        let mut pool = Pool::new(&env, staked_token.clone(), pool::current_ledger(&env));
        for (index, (token, rate)) in reward_tokens.iter().zip(rates.iter()).enumerate() {
            if reward_tokens.first_index_of(&token) != Some(index as u32) {
                return Err(ContractError::InvalidPoolConfig);
            }
            let scale = Self::validated_scale(&env, &pool, &token, rate)?;
            pool::register_stream(&env, pool_id, &mut pool, token, rate, scale)?;
        }

        pool::save(&env, pool_id, &pool);
        pool::track(&env, pool_id);

        log!(
            &env,
            "pool {} created with {} reward streams",
            pool_id,
            pool.stream_count()
        );
        events::publish_pool_created(&env, pool_id, staked_token, reward_tokens, rates);

        Ok(())
    }

    /// Append a reward stream to an existing pool and return its index.
    ///
    /// With `settle_first` the pool is accrued before the stream is added,
    /// so the new stream only earns from this ledger on. Without it the new
    /// stream is credited from the pool's last accrual checkpoint: current
    /// stakers are paid the new token for ledgers before it was registered,
    /// funded from whatever balance the ledger holds. Pass `true` unless
    /// that back-dated emission is intended.
    pub fn add_reward_token(
        env: Env,
        caller: Address,
        pool_id: u32,
        token: Address,
        rate: i128,
        settle_first: bool,
    ) -> Result<u32, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require(&env, &caller, Action::AddRewardToken)?;

        reentrancy::guarded(&env, pool_id, || {
            let mut pool = pool::load(&env, pool_id)?;
            if settle_first {
                pool.accrue(pool::current_ledger(&env))?;
            }

            let scale = Self::validated_scale(&env, &pool, &token, rate)?;
            let index = pool::register_stream(&env, pool_id, &mut pool, token.clone(), rate, scale)?;
            pool::save(&env, pool_id, &pool);

            events::publish_reward_token_added(&env, pool_id, token, index, rate, scale);
            Ok(index)
        })
    }

    /// Replace every emission rate of a pool. `rates` must have one entry per
    /// reward stream. The elapsed interval is accrued at the old rates first.
    pub fn set_reward_rates(
        env: Env,
        caller: Address,
        pool_id: u32,
        rates: Vec<i128>,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require(&env, &caller, Action::SetRewardRates)?;

        reentrancy::guarded(&env, pool_id, || {
            let mut pool = pool::update_accrual(&env, pool_id)?;
            if rates.len() != pool.stream_count() {
                return Err(ContractError::InvalidPoolConfig);
            }

            for (index, rate) in rates.iter().enumerate() {
                if rate < 0 {
                    return Err(ContractError::InvalidPoolConfig);
                }
                let index = index as u32;
                let mut stream = pool.stream(index)?;
                stream.rate_per_ledger = rate;
                pool.reward_streams.set(index, stream);
            }
            pool::save(&env, pool_id, &pool);

            events::publish_reward_rates_set(&env, pool_id, rates.clone());
            Ok(())
        })
    }

    /// Pause or resume deposits and withdrawals. Claims keep working.
    pub fn set_paused(
        env: Env,
        caller: Address,
        pool_id: u32,
        paused: bool,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require(&env, &caller, Action::SetPaused)?;

        reentrancy::guarded(&env, pool_id, || {
            let mut pool = pool::load(&env, pool_id)?;
            pool.paused = paused;
            pool::save(&env, pool_id, &pool);

            events::publish_pause_set(&env, pool_id, paused);
            Ok(())
        })
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Stake `amount` of the pool's asset for `caller`.
    ///
    /// Rewards pending on the existing balance are paid out first; the new
    /// stake only starts earning from the current ledger. A zero amount just
    /// harvests.
    pub fn deposit(env: Env, caller: Address, pool_id: u32, amount: i128) -> Result<(), ContractError> {
        caller.require_auth();
        Self::extend_instance_ttl(&env);
        Self::stake_into(&env, &caller, &caller, pool_id, amount)
    }

    /// Stake `amount` supplied by `caller` into `beneficiary`'s position.
    /// Rewards pending on the beneficiary's existing balance go to the
    /// beneficiary.
    pub fn deposit_for(
        env: Env,
        caller: Address,
        pool_id: u32,
        amount: i128,
        beneficiary: Address,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        Self::extend_instance_ttl(&env);
        Self::stake_into(&env, &caller, &beneficiary, pool_id, amount)
    }

    /// Unstake `amount`, paying out pending rewards on the way.
    pub fn withdraw(env: Env, caller: Address, pool_id: u32, amount: i128) -> Result<(), ContractError> {
        caller.require_auth();
        Self::extend_instance_ttl(&env);

        reentrancy::guarded(&env, pool_id, || {
            let mut pool = pool::load(&env, pool_id)?;
            if pool.paused {
                return Err(ContractError::PoolPaused);
            }
            if amount < 0 {
                return Err(ContractError::InvalidAmount);
            }
            pool.accrue(pool::current_ledger(&env))?;

            let mut position = match position::load(&env, pool_id, &caller) {
                Some(position) => position,
                None if amount == 0 => {
                    events::publish_withdraw(&env, pool_id, caller.clone(), 0, pool.total_staked);
                    return Ok(());
                }
                None => return Err(ContractError::InsufficientBalance),
            };
            if amount > position.amount {
                return Err(ContractError::InsufficientBalance);
            }
            let before = position.amount;
            let after = before - amount;
            let owed = position.settle_all(&env, pool_id, &caller, &pool, before, after)?;
            position.amount = after;
            pool.total_staked = pool
                .total_staked
                .checked_sub(amount)
                .ok_or(ContractError::MathOverflow)?;

            pool::save(&env, pool_id, &pool);
            position::save(&env, pool_id, &caller, &position);

            Self::pay_out(&env, pool_id, &caller, &pool, &owed, false)?;
            custody::push(&env, &pool.staked_token, &caller, amount)?;

            events::publish_withdraw(&env, pool_id, caller.clone(), amount, pool.total_staked);
            Ok(())
        })
    }

    /// Pay out everything pending for `caller` in every stream of the pool,
    /// leaving the stake untouched. Works while the pool is paused.
    pub fn claim_rewards(env: Env, caller: Address, pool_id: u32) -> Result<Vec<i128>, ContractError> {
        caller.require_auth();
        Self::extend_instance_ttl(&env);

        reentrancy::guarded(&env, pool_id, || {
            let mut pool = pool::load(&env, pool_id)?;
            pool.accrue(pool::current_ledger(&env))?;

            let Some(mut position) = position::load(&env, pool_id, &caller) else {
                // Never staked here: report zeros without creating a position.
                let owed = Position::new(&env).pending(&env, &pool)?;
                events::publish_rewards_claimed(
                    &env,
                    pool_id,
                    caller.clone(),
                    pool.reward_tokens(&env),
                    owed.clone(),
                );
                return Ok(owed);
            };
            let balance = position.amount;
            let owed = position.settle_all(&env, pool_id, &caller, &pool, balance, balance)?;

            pool::save(&env, pool_id, &pool);
            position::save(&env, pool_id, &caller, &position);

            Self::pay_out(&env, pool_id, &caller, &pool, &owed, true)?;
            Ok(owed)
        })
    }

    /// Return `caller`'s whole stake without paying rewards. Pending rewards
    /// are forfeited. Works while the pool is paused.
    pub fn emergency_withdraw(env: Env, caller: Address, pool_id: u32) -> Result<i128, ContractError> {
        caller.require_auth();
        Self::extend_instance_ttl(&env);

        reentrancy::guarded(&env, pool_id, || {
            let mut pool = pool::load(&env, pool_id)?;
            pool.accrue(pool::current_ledger(&env))?;

            let Some(mut position) = position::load(&env, pool_id, &caller) else {
                return Ok(0);
            };
            let amount = position.amount;
            position.forfeit(&env, &pool);
            pool.total_staked = pool
                .total_staked
                .checked_sub(amount)
                .ok_or(ContractError::MathOverflow)?;

            pool::save(&env, pool_id, &pool);
            position::save(&env, pool_id, &caller, &position);

            custody::push(&env, &pool.staked_token, &caller, amount)?;

            events::publish_emergency_withdraw(&env, pool_id, caller.clone(), amount);
            Ok(amount)
        })
    }

    /// Bring a pool's accumulators up to the current ledger. Anyone may call.
    pub fn update_pool(env: Env, pool_id: u32) -> Result<Pool, ContractError> {
        reentrancy::guarded(&env, pool_id, || pool::update_accrual(&env, pool_id))
    }

    /// [`Self::update_pool`] over several pools; stops at the first unknown id.
    pub fn update_pools(env: Env, pool_ids: Vec<u32>) -> Result<(), ContractError> {
        for pool_id in pool_ids.iter() {
            reentrancy::guarded(&env, pool_id, || pool::update_accrual(&env, pool_id))?;
        }
        Ok(())
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Rewards `user` would receive from `claim_rewards` at the current
    /// ledger, one entry per reward stream.
    pub fn pending_rewards(env: Env, pool_id: u32, user: Address) -> Result<Vec<i128>, ContractError> {
        let mut pool = pool::load(&env, pool_id)?;
        pool.accrue(pool::current_ledger(&env))?;
        position::load_or_new(&env, pool_id, &user).pending(&env, &pool)
    }

    pub fn pool_exists(env: Env, pool_id: u32) -> bool {
        pool::exists(&env, pool_id)
    }

    /// Staked balance of `user`; zero for unknown pools and users.
    pub fn staked_amount(env: Env, pool_id: u32, user: Address) -> i128 {
        position::load(&env, pool_id, &user).map_or(0, |position| position.amount)
    }

    pub fn total_staked(env: Env, pool_id: u32) -> Result<i128, ContractError> {
        Ok(pool::load(&env, pool_id)?.total_staked)
    }

    pub fn reward_tokens(env: Env, pool_id: u32) -> Result<Vec<Address>, ContractError> {
        Ok(pool::load(&env, pool_id)?.reward_tokens(&env))
    }

    pub fn reward_rates(env: Env, pool_id: u32) -> Result<Vec<i128>, ContractError> {
        Ok(pool::load(&env, pool_id)?.reward_rates(&env))
    }

    pub fn reward_token_index(env: Env, pool_id: u32, token: Address) -> Option<u32> {
        pool::token_index(&env, pool_id, &token)
    }

    /// Stored pool record, as of its last accrual.
    pub fn get_pool(env: Env, pool_id: u32) -> Result<Pool, ContractError> {
        pool::load(&env, pool_id)
    }

    /// Stored position of `user`, as of their last interaction.
    pub fn get_position(env: Env, pool_id: u32, user: Address) -> Position {
        position::load_or_new(&env, pool_id, &user)
    }

    pub fn pool_ids(env: Env) -> Vec<u32> {
        pool::pool_ids(&env)
    }

    pub fn pool_count(env: Env) -> u32 {
        pool::pool_ids(&env).len()
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)
    }

    // ── Authorization ────────────────────────────────────────────────────────

    /// Delegate pool administration checks to an external authorizer
    /// contract, or back to the local tier registry with `None`.
    ///
    /// Requires `SuperAdmin`.
    pub fn set_authorizer(
        env: Env,
        caller: Address,
        authorizer: Option<Address>,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_super_admin(&env, &caller)?;

        access::set_authorizer(&env, &authorizer);

        events::publish_authorizer_set(&env, caller, authorizer);
        Ok(())
    }

    pub fn get_authorizer(env: Env) -> Option<Address> {
        access::authorizer(&env)
    }

    /// Assign `tier` to `target`. Only a `SuperAdmin` may call this.
    pub fn promote_admin(
        env: Env,
        caller: Address,
        target: Address,
        tier: AdminTier,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !admin_tiers::promote(&env, &caller, &target, tier) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    /// Remove every tier from `target`. Only a `SuperAdmin` may call this,
    /// and the bootstrap admin cannot be demoted.
    pub fn demote_admin(env: Env, caller: Address, target: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !admin_tiers::demote(&env, &caller, &target) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    pub fn get_admin_tier(env: Env, admin: Address) -> Option<AdminTier> {
        admin_tiers::tier_of(&env, &admin)
    }

    pub fn list_admins(env: Env) -> Vec<Address> {
        admin_tiers::list_admins(&env)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    fn extend_instance_ttl(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
    }

    /// Checks a prospective reward stream and derives its scale from the
    /// token's decimals.
    fn validated_scale(
        env: &Env,
        pool: &Pool,
        token: &Address,
        rate: i128,
    ) -> Result<i128, ContractError> {
        if rate < 0 {
            return Err(ContractError::InvalidPoolConfig);
        }
        if *token == pool.staked_token || *token == env.current_contract_address() {
            return Err(ContractError::InvalidPoolConfig);
        }
        let decimals = custody::decimals(env, token)?;
        rewards::scale_for_decimals(decimals).ok_or(ContractError::InvalidPoolConfig)
    }

    /// Shared body of `deposit` and `deposit_for`.
    fn stake_into(
        env: &Env,
        funder: &Address,
        beneficiary: &Address,
        pool_id: u32,
        amount: i128,
    ) -> Result<(), ContractError> {
        reentrancy::guarded(env, pool_id, || {
            let mut pool = pool::load(env, pool_id)?;
            if pool.paused {
                return Err(ContractError::PoolPaused);
            }
            if amount < 0 {
                return Err(ContractError::InvalidAmount);
            }
            pool.accrue(pool::current_ledger(env))?;

            let mut position = position::load_or_new(env, pool_id, beneficiary);
            let before = position.amount;
            let after = before
                .checked_add(amount)
                .ok_or(ContractError::MathOverflow)?;
            let owed = position.settle_all(env, pool_id, beneficiary, &pool, before, after)?;
            position.amount = after;
            pool.total_staked = pool
                .total_staked
                .checked_add(amount)
                .ok_or(ContractError::MathOverflow)?;

            pool::save(env, pool_id, &pool);
            position::save(env, pool_id, beneficiary, &position);

            Self::pay_out(env, pool_id, beneficiary, &pool, &owed, false)?;
            custody::pull(env, &pool.staked_token, funder, amount)?;

            events::publish_deposit(
                env,
                pool_id,
                funder.clone(),
                beneficiary.clone(),
                amount,
                pool.total_staked,
            );
            Ok(())
        })
    }

    /// Transfer settled rewards to `user`. A `CLAIMED` event is published
    /// when something was paid, or always with `always_notify`.
    fn pay_out(
        env: &Env,
        pool_id: u32,
        user: &Address,
        pool: &Pool,
        owed: &Vec<i128>,
        always_notify: bool,
    ) -> Result<(), ContractError> {
        let mut paid_any = false;
        for (index, amount) in owed.iter().enumerate() {
            if amount > 0 {
                let stream = pool.stream(index as u32)?;
                custody::push(env, &stream.token, user, amount)?;
                paid_any = true;
            }
        }

        if paid_any || always_notify {
            events::publish_rewards_claimed(
                env,
                pool_id,
                user.clone(),
                pool.reward_tokens(env),
                owed.clone(),
            );
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_access;
