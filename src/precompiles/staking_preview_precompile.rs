/// pallet-revive precompile wrapper for staking_preview.
///
/// The staking contract calls this while building the stake/unstake
/// confirmation, so the user sees the power change and deposit reward before
/// signing.
///
/// REGISTERED ADDRESS: STAKING_PREVIEW_PRECOMPILE_ADDRESS (defined in precompile_set.rs)
///
/// FUNCTION:
///   previewStake(uint256,uint256,uint256,uint256,uint256,uint256,uint8,uint32)
///
/// Returns (bool success, uint256 currentPower, uint256 projectedPower,
/// bool deltaNegative, uint256 deltaMagnitude, uint256 ktonYieldScaled,
/// uint8 ktonYieldDecimals). The yield is carried at the default 9 digits.
///
/// ON ERROR:
/// Returns encode_error(code). Balance failures map to InsufficientStake or
/// InsufficientPool so the contract can show which check failed.
use std::sync::LazyLock;

use ethabi::{short_signature, ParamType};
use log::debug;

use crate::abi::{
    decode_preview_input, encode_error, encode_power_preview, encode_success, preview_error_code,
    ERR_DECODE_FAILED, ERR_INVALID_INPUT, ERR_OVERFLOW, ERR_UNKNOWN_SELECTOR,
};
use crate::config::DEFAULT_YIELD_PRECISION;
use crate::math_lib::LOG_TARGET;
use crate::precompiles::power_precompile::MAX_DEPOSIT_MONTHS;
use crate::staking_preview::preview;

// ---------------------------------------------------------------------------
// Function selector
// ---------------------------------------------------------------------------

pub static SEL_PREVIEW_STAKE: LazyLock<[u8; 4]> = LazyLock::new(|| {
    short_signature(
        "previewStake",
        &[
            ParamType::Uint(256),
            ParamType::Uint(256),
            ParamType::Uint(256),
            ParamType::Uint(256),
            ParamType::Uint(256),
            ParamType::Uint(256),
            ParamType::Uint(8),
            ParamType::Uint(32),
        ],
    )
});

// ---------------------------------------------------------------------------
// Main precompile entry point
// ---------------------------------------------------------------------------

pub fn call(input: &[u8]) -> Vec<u8> {
    let Some((selector, args)) = input.split_first_chunk::<4>() else {
        return encode_error(ERR_DECODE_FAILED);
    };

    if *selector != *SEL_PREVIEW_STAKE {
        return encode_error(ERR_UNKNOWN_SELECTOR);
    }

    let preview_input = match decode_preview_input(args) {
        Some(i) => i,
        None => return encode_error(ERR_DECODE_FAILED),
    };

    if preview_input.deposit_months > MAX_DEPOSIT_MONTHS {
        debug!(target: LOG_TARGET, "previewStake rejected: months={}", preview_input.deposit_months);
        return encode_error(ERR_INVALID_INPUT);
    }

    match preview(&preview_input) {
        Ok(result) => match encode_power_preview(&result, DEFAULT_YIELD_PRECISION as u8) {
            Some(payload) => encode_success(payload),
            None => encode_error(ERR_OVERFLOW),
        },
        Err(e) => {
            debug!(target: LOG_TARGET, "previewStake failed: {e}");
            encode_error(preview_error_code(&e))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::{ERR_INSUFFICIENT_POOL, ERR_INSUFFICIENT_STAKE};
    use ethabi::{encode, Token, Uint};

    fn build_preview_call(
        staked_ring: u128,
        staked_kton: u128,
        change_ring: u128,
        change_kton: u128,
        pool_ring: u128,
        pool_kton: u128,
        action: u8,
        months: u32,
    ) -> Vec<u8> {
        let mut input = SEL_PREVIEW_STAKE.to_vec();
        input.extend(encode(&[
            Token::Uint(staked_ring.into()),
            Token::Uint(staked_kton.into()),
            Token::Uint(change_ring.into()),
            Token::Uint(change_kton.into()),
            Token::Uint(pool_ring.into()),
            Token::Uint(pool_kton.into()),
            Token::Uint(action.into()),
            Token::Uint(months.into()),
        ]));
        input
    }

    fn word(result: &[u8], index: usize) -> Uint {
        Uint::from_big_endian(&result[index * 32..(index + 1) * 32])
    }

    /// Staking 1000 RING into an empty pool takes power from 0 to 500_000_000.
    #[test]
    fn test_preview_stake_into_empty_pool() {
        let result = call(&build_preview_call(0, 0, 1_000, 0, 0, 0, 0, 12));
        assert_eq!(result[31], 1u8, "Success flag must be 1");
        assert_eq!(word(&result, 1), Uint::zero());
        assert_eq!(word(&result, 2), Uint::from(500_000_000u64));
        assert_eq!(result[127], 0u8, "delta is positive");
        assert_eq!(word(&result, 4), Uint::from(500_000_000u64));
        // 1000 RING × 12 months = 0.1 KTON at 9 digits
        assert_eq!(word(&result, 5), Uint::from(100_000_000u64));
        assert_eq!(word(&result, 6), Uint::from(9u8));
    }

    /// Unstaking half of a sole staker's RING keeps them at half the pool.
    #[test]
    fn test_preview_unstake_sole_staker() {
        let result = call(&build_preview_call(1_000, 0, 500, 0, 1_000, 0, 1, 0));
        assert_eq!(result[31], 1u8);
        assert_eq!(word(&result, 1), Uint::from(500_000_000u64));
        assert_eq!(word(&result, 2), Uint::from(500_000_000u64));
        assert_eq!(word(&result, 4), Uint::zero());
    }

    #[test]
    fn test_preview_unstake_more_than_staked_fails() {
        let result = call(&build_preview_call(100, 0, 101, 0, 10_000, 0, 1, 0));
        assert_eq!(result[31], 0u8);
        assert_eq!(result[63], ERR_INSUFFICIENT_STAKE as u8);
    }

    #[test]
    fn test_preview_unstake_more_than_pool_fails() {
        let result = call(&build_preview_call(100, 0, 100, 0, 50, 0, 1, 0));
        assert_eq!(result[63], ERR_INSUFFICIENT_POOL as u8);
    }

    #[test]
    fn test_preview_months_above_limit_rejected() {
        let result = call(&build_preview_call(0, 0, 1_000, 0, 0, 0, 0, 37));
        assert_eq!(result[63], ERR_INVALID_INPUT as u8);
    }

    #[test]
    fn test_wrong_selector_returns_failure() {
        let mut input = vec![0xde, 0xad, 0xbe, 0xef];
        input.extend(encode(&[Token::Uint(1_000u128.into())]));
        let result = call(&input);
        assert_eq!(result[31], 0u8, "Wrong selector must return failure flag");
        assert_eq!(result[63], ERR_UNKNOWN_SELECTOR as u8);
    }

    #[test]
    fn test_short_input_returns_failure() {
        let result = call(&[0x01]);
        assert_eq!(result[31], 0u8);
    }

    #[test]
    fn test_preview_call_is_deterministic() {
        let input = build_preview_call(3_000, 20, 700, 5, 9_000_000, 41_000, 0, 6);
        assert_eq!(call(&input), call(&input), "Precompile output must be deterministic");
    }
}
