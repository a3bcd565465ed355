//! Token movements through the Soroban token interface.
//!
//! All calls go through the generated `try_*` client methods so a failing
//! token contract surfaces as [`ContractError::TransferFailed`] instead of a
//! host trap.

use soroban_sdk::{token, Address, Env};

use crate::ContractError;

/// Move `amount` of `token` from `from` into the ledger's custody.
pub fn pull(env: &Env, token: &Address, from: &Address, amount: i128) -> Result<(), ContractError> {
    transfer(env, token, from, &env.current_contract_address(), amount)
}

/// Move `amount` of `token` out of the ledger's custody to `to`.
pub fn push(env: &Env, token: &Address, to: &Address, amount: i128) -> Result<(), ContractError> {
    transfer(env, token, &env.current_contract_address(), to, amount)
}

fn transfer(
    env: &Env,
    token: &Address,
    from: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), ContractError> {
    if amount == 0 {
        return Ok(());
    }
    match token::Client::new(env, token).try_transfer(from, to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(ContractError::TransferFailed),
    }
}

/// Decimal precision reported by a token contract. Anything that does not
/// answer like a token is rejected as pool configuration.
pub fn decimals(env: &Env, token: &Address) -> Result<u32, ContractError> {
    match token::Client::new(env, token).try_decimals() {
        Ok(Ok(decimals)) => Ok(decimals),
        _ => Err(ContractError::InvalidPoolConfig),
    }
}
