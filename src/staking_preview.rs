/// The preview layer behind the staking forms. While a user edits a stake or
/// unstake amount the form shows how their power will move, and a RING deposit
/// form shows the KTON the deposit will earn. This module computes both from a
/// single PreviewInput and returns a PowerPreview.
///
/// STATELESS CONTRACT:
/// Pure function over its input. Account holdings and pool totals are read by
/// the caller and passed in; nothing is fetched or stored here.
///
/// LOGIC FLOW (4 steps):
///   1. Current power of the staked holdings against the current pool
///   2. Projected holdings and pool after applying the change
///   3. Signed power delta = projected - current
///   4. KTON yield of the staked RING when it is locked as a deposit
///
/// VALIDATION:
/// The calculators in math_lib accept any input. The preview is where balance
/// sufficiency is checked, so an unstake larger than the stake is reported as
/// PreviewError::InsufficientStake instead of a negative power.
use log::debug;

use crate::decimal::Decimal;
use crate::math_lib::{self, AssetAmounts, PoolTotals, LOG_TARGET};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreviewError {
    /// A holding, change or pool figure is below zero.
    #[error("negative amount in preview input")]
    NegativeAmount,
    /// The unstake exceeds what the account has bonded.
    #[error("unstake exceeds staked {asset}")]
    InsufficientStake { asset: Asset },
    /// The unstake would take the pool total below zero.
    #[error("unstake exceeds pool {asset}")]
    InsufficientPool { asset: Asset },
}

pub type PreviewResult<T> = Result<T, PreviewError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asset {
    Ring,
    Kton,
}

impl core::fmt::Display for Asset {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Asset::Ring => f.write_str("RING"),
            Asset::Kton => f.write_str("KTON"),
        }
    }
}

// ---------------------------------------------------------------------------
// Input / Output structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StakeAction {
    Stake,
    Unstake,
}

impl StakeAction {
    /// Wire code: 0 = stake, 1 = unstake.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(StakeAction::Stake),
            1 => Some(StakeAction::Unstake),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            StakeAction::Stake => 0,
            StakeAction::Unstake => 1,
        }
    }
}

/// Everything a staking form knows when it asks for a preview. All amounts are
/// base units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewInput {
    /// What the account has bonded today. `staked.ring` is bonded RING plus
    /// RING locked in deposits that are staked, since both carry power.
    pub staked: AssetAmounts,
    /// The amount typed into the form.
    pub change: AssetAmounts,
    /// Global bonded totals today.
    pub pool: PoolTotals,
    pub action: StakeAction,
    /// Lock term for the staked RING, in months. 0 means a plain bond.
    pub deposit_months: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerPreview {
    pub current_power: Decimal,
    pub projected_power: Decimal,
    /// projected_power - current_power; negative when the change loses power.
    pub power_delta: Decimal,
    /// KTON earned by locking `change.ring` for `deposit_months`. Zero for
    /// unstakes and plain bonds.
    pub kton_yield: Decimal,
}

// ---------------------------------------------------------------------------
// Core preview function
// ---------------------------------------------------------------------------

pub fn preview(input: &PreviewInput) -> PreviewResult<PowerPreview> {
    validate(input)?;

    // --- Step 1: current power ---
    let current_power = math_lib::power_of(&input.staked, &input.pool);

    // --- Step 2: projected holdings and pool ---
    //
    // The account's change moves the pool by the same amount, so the
    // normaliser shifts along with the numerator.
    let (staked, pool) = match input.action {
        StakeAction::Stake => (
            AssetAmounts {
                ring: &input.staked.ring + &input.change.ring,
                kton: &input.staked.kton + &input.change.kton,
            },
            PoolTotals {
                ring: &input.pool.ring + &input.change.ring,
                kton: &input.pool.kton + &input.change.kton,
            },
        ),
        StakeAction::Unstake => (
            AssetAmounts {
                ring: &input.staked.ring - &input.change.ring,
                kton: &input.staked.kton - &input.change.kton,
            },
            PoolTotals {
                ring: &input.pool.ring - &input.change.ring,
                kton: &input.pool.kton - &input.change.kton,
            },
        ),
    };
    let projected_power = math_lib::power_of(&staked, &pool);

    // --- Step 3: delta ---
    let power_delta = &projected_power - &current_power;

    // --- Step 4: deposit yield ---
    let kton_yield = match input.action {
        StakeAction::Stake => math_lib::compute_kton_yield(&input.change.ring, input.deposit_months),
        StakeAction::Unstake => Decimal::zero(),
    };

    debug!(
        target: LOG_TARGET,
        "preview {:?}: power {current_power} -> {projected_power} ({power_delta}), kton yield {kton_yield}",
        input.action,
    );

    Ok(PowerPreview { current_power, projected_power, power_delta, kton_yield })
}

fn validate(input: &PreviewInput) -> PreviewResult<()> {
    let fields = [
        &input.staked.ring,
        &input.staked.kton,
        &input.change.ring,
        &input.change.kton,
        &input.pool.ring,
        &input.pool.kton,
    ];
    if fields.iter().any(|v| v.is_negative()) {
        return Err(PreviewError::NegativeAmount);
    }

    if input.action == StakeAction::Unstake {
        if input.change.ring > input.staked.ring {
            return Err(PreviewError::InsufficientStake { asset: Asset::Ring });
        }
        if input.change.kton > input.staked.kton {
            return Err(PreviewError::InsufficientStake { asset: Asset::Kton });
        }
        if input.change.ring > input.pool.ring {
            return Err(PreviewError::InsufficientPool { asset: Asset::Ring });
        }
        if input.change.kton > input.pool.kton {
            return Err(PreviewError::InsufficientPool { asset: Asset::Kton });
        }
    }

    Ok(())
}
