/// Conversions between display amounts and on-chain base units.
///
/// RING and KTON both use 18 decimals, so 1 RING = 10^18 base units. Calldata
/// and chain storage always carry base units; the staking forms show whole
/// tokens. Sub-unit dust below one base unit cannot exist on chain and is
/// dropped when converting a display amount.
use crate::decimal::{Decimal, RoundingMode};

/// Decimals of the RING and KTON tokens.
pub const TOKEN_DECIMALS: u32 = 18;

/// Convert a display amount (e.g. `1.5` RING) into base units, truncating dust.
pub fn to_base_units(amount: &Decimal, decimals: u32) -> Decimal {
    let shifted = amount * &Decimal::from(10u8).pow(decimals);
    shifted.round(0, RoundingMode::Down)
}

/// Convert base units into a display amount. Exact.
pub fn from_base_units(amount: &Decimal, decimals: u32) -> Decimal {
    let mantissa = amount.to_scaled_integer(0, RoundingMode::Down);
    Decimal::from_scaled_integer(mantissa, decimals).normalized()
}
