/// Staking power and KTON deposit-yield math.
///
/// PRECISION MODEL:
/// Every amount is a `Decimal` in base units (18 decimals for RING and KTON).
/// Sums and products are exact. Every true division runs in the default
/// division context (20 fractional places, ROUND_HALF_UP) and integer steps use
/// truncating division, in the same order the staking front-end always used.
/// Changing the order of operations changes the last digits of the output, and
/// users compare these previews against what the chain reports.
///
/// TOTALITY:
/// Both calculators are total over non-negative inputs and return a plain
/// `Decimal`. The zero-pool and zero-month cases short-circuit to zero. Negative
/// inputs are not rejected here; they produce arithmetically consistent results
/// and balance checks belong to the caller (see `staking_preview`).
use log::trace;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Pow};

use crate::config::YieldFormat;
use crate::decimal::{Decimal, DEFAULT_ROUNDING};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Log target shared by every module in this crate.
pub const LOG_TARGET: &str = "staking-power";

/// Scale applied to a pool share to produce a power score.
pub const POWER_CAP: u64 = 1_000_000_000;

/// Fixed-point precision of the per-mille reward accrual.
pub const KTON_PRECISION: u64 = 1_000;

/// Normalisation constant of the KTON reward curve. Protocol constant.
pub const KTON_SCALING_CONSTANT: u64 = 1_970_000;

/// Monthly growth ratio of the reward curve is 67/66.
pub const KTON_BASE_NUMERATOR: u32 = 67;
pub const KTON_BASE_DENOMINATOR: u32 = 66;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// RING and KTON holdings of an account (or a change to them), in base units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetAmounts {
    pub ring: Decimal,
    pub kton: Decimal,
}

impl AssetAmounts {
    pub fn new(ring: impl Into<Decimal>, kton: impl Into<Decimal>) -> Self {
        AssetAmounts { ring: ring.into(), kton: kton.into() }
    }
}

/// Global bonded totals the power score is normalised against, in base units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolTotals {
    pub ring: Decimal,
    pub kton: Decimal,
}

impl PoolTotals {
    pub fn new(ring: impl Into<Decimal>, kton: impl Into<Decimal>) -> Self {
        PoolTotals { ring: ring.into(), kton: kton.into() }
    }
}

// ---------------------------------------------------------------------------
// compute_power
// ---------------------------------------------------------------------------

/// Convert bonded RING and KTON into a power score.
///
/// KTON is priced in RING at the pool's RING/KTON ratio, so both halves of the
/// pool carry equal weight:
///
///   divider = pool_ring ÷ pool_kton            (0 when pool_kton is 0)
///   power   = (ring + kton × divider) ÷ (pool_ring × 2) × POWER_CAP
///
/// The result is rounded half away from zero to a whole number. A pool with no
/// bonded RING has no meaningful ratio and yields 0 for every input.
pub fn compute_power(ring: &Decimal, kton: &Decimal, pool_ring: &Decimal, pool_kton: &Decimal) -> Decimal {
    if pool_ring.is_zero() {
        return Decimal::zero();
    }

    // checked_div is None exactly when pool_kton is zero.
    let divider = pool_ring.checked_div(pool_kton).unwrap_or_default();

    let weighted = ring + &(kton * &divider);
    let Some(share) = weighted.checked_div(&(pool_ring * &Decimal::from(2u8))) else {
        return Decimal::zero();
    };

    let power = (share * Decimal::from(POWER_CAP)).round(0, DEFAULT_ROUNDING);
    trace!(target: LOG_TARGET, "compute_power: divider={divider} weighted={weighted} power={power}");
    power
}

/// `compute_power` over the crate's holding and pool types.
pub fn power_of(assets: &AssetAmounts, pool: &PoolTotals) -> Decimal {
    compute_power(&assets.ring, &assets.kton, &pool.ring, &pool.kton)
}

// ---------------------------------------------------------------------------
// compute_kton_yield
// ---------------------------------------------------------------------------

/// Per-mille reward accrued by a RING deposit locked for `months`.
///
/// Fixed-point emulation of the runtime's compounding curve:
///
///   n = 67^months, d = 66^months
///   accrual = KTON_PRECISION × (⌊n / d⌋ − 1) + ⌊KTON_PRECISION × (n mod d) / d⌋
///
/// Exact big-integer arithmetic throughout; n and d grow without bound.
pub fn deposit_accrual(months: u32) -> BigInt {
    if months == 0 {
        return BigInt::from(0u8);
    }

    let n: BigInt = Pow::pow(BigInt::from(KTON_BASE_NUMERATOR), months);
    let d: BigInt = Pow::pow(BigInt::from(KTON_BASE_DENOMINATOR), months);
    let (quotient, remainder) = n.div_rem(&d);

    let precision = BigInt::from(KTON_PRECISION);
    let whole = &precision * (quotient - BigInt::one());
    let fraction = (&precision * remainder).div_floor(&d);
    whole + fraction
}

/// KTON earned by locking `ring` for `months`, formatted with `format`.
///
///   yield = accrual × ring ÷ KTON_SCALING_CONSTANT
///
/// The division runs in the default 20-place context; `format` is applied once
/// to that quotient. Zero months yields exactly zero.
pub fn compute_kton_yield_with(ring: &Decimal, months: u32, format: &YieldFormat) -> Decimal {
    if months == 0 {
        return Decimal::zero();
    }

    let accrual = deposit_accrual(months);
    let scaled = Decimal::from(accrual.clone()) * ring;
    // KTON_SCALING_CONSTANT is non-zero, so the quotient always exists.
    let raw = scaled
        .checked_div(&Decimal::from(KTON_SCALING_CONSTANT))
        .unwrap_or_default();

    let result = raw.round(format.decimal_precision, format.rounding);
    trace!(target: LOG_TARGET, "compute_kton_yield: months={months} accrual={accrual} raw={raw} result={result}");
    result
}

/// `compute_kton_yield_with` at the default format: 9 digits, rounded down.
pub fn compute_kton_yield(ring: &Decimal, months: u32) -> Decimal {
    compute_kton_yield_with(ring, months, &YieldFormat::default())
}
