//! Fixed-point arithmetic behind the accumulated-per-share scheme.
//!
//! Everything here is pure integer math over `i128`. Every multiplication is
//! checked; `None` means the result does not fit and the calling operation
//! must abort.

/// Target precision of every accumulator, in decimal digits.
///
/// A reward token with `d` decimals gets a scale of `10^(SCALE_DECIMALS - d)`
/// so that accumulators of tokens with different precisions carry the same
/// number of significant digits. A 7-decimal Stellar asset gets `10^11`.
pub const SCALE_DECIMALS: u32 = 18;

/// Scale factor for a reward token with `decimals` decimal places.
///
/// Tokens with `SCALE_DECIMALS` decimals or more get a scale of 1.
pub fn scale_for_decimals(decimals: u32) -> Option<i128> {
    10i128.checked_pow(SCALE_DECIMALS.saturating_sub(decimals))
}

/// Advance one accumulator by `elapsed` ticks of emission.
///
/// ```text
/// acc' = acc + rate × elapsed × scale / total_staked
/// ```
///
/// Division truncates toward zero. With nothing staked the accumulator is
/// returned unchanged.
pub fn accrue_per_share(
    acc_per_share: i128,
    rate_per_ledger: i128,
    elapsed: u32,
    scale: i128,
    total_staked: i128,
) -> Option<i128> {
    if total_staked <= 0 {
        return Some(acc_per_share);
    }
    let emitted = rate_per_ledger.checked_mul(i128::from(elapsed))?;
    let delta = emitted.checked_mul(scale)? / total_staked;
    acc_per_share.checked_add(delta)
}

/// Reward accounted for `amount` units of stake at accumulator `acc_per_share`.
///
/// ```text
/// accrued = amount × acc_per_share / scale
/// ```
///
/// The accumulator is split into whole and fractional units of `scale`
/// before multiplying, so the product never exceeds `amount × scale` plus
/// the result itself. The split is exact for non-negative operands.
pub fn accrued(amount: i128, acc_per_share: i128, scale: i128) -> Option<i128> {
    if scale <= 0 || amount < 0 || acc_per_share < 0 {
        return None;
    }
    let whole = acc_per_share / scale;
    let fraction = acc_per_share % scale;
    amount
        .checked_mul(whole)?
        .checked_add(amount.checked_mul(fraction)? / scale)
}

/// Raw pending reward before any clamping: `accrued(amount) − debt`.
///
/// A zero balance owes nothing, whatever the accumulator says. The result is
/// negative only when the debt does not belong to this accumulator, which the
/// caller treats as an accounting defect.
pub fn pending(amount: i128, acc_per_share: i128, scale: i128, debt: i128) -> Option<i128> {
    if amount == 0 {
        return Some(0);
    }
    accrued(amount, acc_per_share, scale)?.checked_sub(debt)
}
