//! Burn-redemption share
//!
//! Burning tokens redeems a pro-rata slice of the live pool balance,
//! weighted by the residual percentage left after the claimable split.
//! Redemption reads current ledger state only; checkpoints play no part.

use sluice_core::Amount;

/// Value redeemed by burning `amount` tokens.
///
/// `pool_balance * amount * residual_percent / total_supply / 100`, floor
/// division at each step in exactly that order (the amount is scaled before
/// the supply division).
pub fn redeemable_on_burn(
    pool_balance: Amount,
    amount: Amount,
    residual_percent: u8,
    total_supply: Amount,
) -> Amount {
    if pool_balance == 0 || amount == 0 || total_supply == 0 {
        return 0;
    }
    pool_balance * amount * residual_percent as Amount / total_supply / 100
}
