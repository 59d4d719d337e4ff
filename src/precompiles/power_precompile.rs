/// pallet-revive precompile wrapper for math_lib.
///
/// Exposes the two calculators to Solidity. Each function is identified by the
/// usual 4-byte selector (first four bytes of keccak256 of the signature)
/// prepended to the calldata.
///
/// REGISTERED ADDRESS: POWER_PRECOMPILE_ADDRESS (defined in precompile_set.rs)
///
/// FUNCTIONS:
///   computePower(uint256 ring, uint256 kton, uint256 poolRing, uint256 poolKton)
///       → (bool success, uint256 power)
///   computeKtonYield(uint256 ring, uint32 months, uint8 decimalPrecision, uint8 roundingMode)
///       → (bool success, uint256 yieldScaled, uint8 decimals)
///
/// The calculators are total, so failures here come only from the call
/// boundary: malformed calldata, an unknown selector, an unknown rounding code,
/// a lock term above MAX_DEPOSIT_MONTHS, or a precision above MAX_YIELD_DECIMALS.
use std::sync::LazyLock;

use ethabi::{decode, encode, short_signature, ParamType, Token};
use log::debug;

use crate::abi::{
    decimal_to_uint, encode_error, encode_success, token_to_amount, token_to_u32, token_to_u8,
    ERR_DECODE_FAILED, ERR_INVALID_INPUT, ERR_OVERFLOW, ERR_UNKNOWN_SELECTOR,
};
use crate::config::YieldFormat;
use crate::decimal::RoundingMode;
use crate::math_lib::{self, LOG_TARGET};
use crate::units::TOKEN_DECIMALS;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Longest RING deposit term the chain accepts. Also bounds the cost of 67^n.
pub const MAX_DEPOSIT_MONTHS: u32 = 36;

/// Amounts are already base units; digits past this are below one base unit.
pub const MAX_YIELD_DECIMALS: u8 = TOKEN_DECIMALS as u8;

// ---------------------------------------------------------------------------
// Function selectors
// ---------------------------------------------------------------------------

fn compute_power_params() -> Vec<ParamType> {
    vec![
        ParamType::Uint(256),
        ParamType::Uint(256),
        ParamType::Uint(256),
        ParamType::Uint(256),
    ]
}

fn compute_kton_yield_params() -> Vec<ParamType> {
    vec![
        ParamType::Uint(256),
        ParamType::Uint(32),
        ParamType::Uint(8),
        ParamType::Uint(8),
    ]
}

pub static SEL_COMPUTE_POWER: LazyLock<[u8; 4]> =
    LazyLock::new(|| short_signature("computePower", &compute_power_params()));

pub static SEL_COMPUTE_KTON_YIELD: LazyLock<[u8; 4]> =
    LazyLock::new(|| short_signature("computeKtonYield", &compute_kton_yield_params()));

// ---------------------------------------------------------------------------
// Main precompile entry point
// ---------------------------------------------------------------------------

/// Called by the pallet-revive runtime for every call targeting
/// POWER_PRECOMPILE_ADDRESS. Never panics; every failure is an encoded error.
pub fn call(input: &[u8]) -> Vec<u8> {
    let Some((selector, args)) = input.split_first_chunk::<4>() else {
        debug!(target: LOG_TARGET, "power precompile: calldata shorter than a selector");
        return encode_error(ERR_DECODE_FAILED);
    };

    if *selector == *SEL_COMPUTE_POWER {
        handle_compute_power(args)
    } else if *selector == *SEL_COMPUTE_KTON_YIELD {
        handle_compute_kton_yield(args)
    } else {
        debug!(target: LOG_TARGET, "power precompile: unknown selector 0x{}", hex_selector(selector));
        encode_error(ERR_UNKNOWN_SELECTOR)
    }
}

fn hex_selector(selector: &[u8; 4]) -> String {
    selector.iter().map(|b| format!("{b:02x}")).collect()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// computePower(uint256,uint256,uint256,uint256) → uint256
fn handle_compute_power(args: &[u8]) -> Vec<u8> {
    let tokens = match decode(&compute_power_params(), args) {
        Ok(t) => t,
        Err(_) => return encode_error(ERR_DECODE_FAILED),
    };

    let amounts = match tokens.iter().map(token_to_amount).collect::<Option<Vec<_>>>() {
        Some(a) if a.len() == 4 => a,
        _ => return encode_error(ERR_DECODE_FAILED),
    };

    let power = math_lib::compute_power(&amounts[0], &amounts[1], &amounts[2], &amounts[3]);

    match decimal_to_uint(&power, 0) {
        Some(word) => encode_success(encode(&[Token::Uint(word)])),
        None => encode_error(ERR_OVERFLOW),
    }
}

/// computeKtonYield(uint256,uint32,uint8,uint8) → (uint256 scaled, uint8 decimals)
fn handle_compute_kton_yield(args: &[u8]) -> Vec<u8> {
    let tokens = match decode(&compute_kton_yield_params(), args) {
        Ok(t) => t,
        Err(_) => return encode_error(ERR_DECODE_FAILED),
    };

    let ring = match token_to_amount(&tokens[0]) {
        Some(v) => v,
        None => return encode_error(ERR_DECODE_FAILED),
    };
    let months = match token_to_u32(&tokens[1]) {
        Some(v) => v,
        None => return encode_error(ERR_DECODE_FAILED),
    };
    let decimals = match token_to_u8(&tokens[2]) {
        Some(v) => v,
        None => return encode_error(ERR_DECODE_FAILED),
    };
    let rounding_code = match token_to_u8(&tokens[3]) {
        Some(v) => v,
        None => return encode_error(ERR_DECODE_FAILED),
    };

    if months > MAX_DEPOSIT_MONTHS || decimals > MAX_YIELD_DECIMALS {
        debug!(target: LOG_TARGET, "computeKtonYield rejected: months={months} decimals={decimals}");
        return encode_error(ERR_INVALID_INPUT);
    }
    let Some(rounding) = RoundingMode::from_code(rounding_code) else {
        debug!(target: LOG_TARGET, "computeKtonYield rejected: rounding code {rounding_code}");
        return encode_error(ERR_INVALID_INPUT);
    };

    let format = YieldFormat::new(u32::from(decimals), rounding);
    let kton = math_lib::compute_kton_yield_with(&ring, months, &format);

    match decimal_to_uint(&kton, u32::from(decimals)) {
        Some(word) => encode_success(encode(&[Token::Uint(word), Token::Uint(decimals.into())])),
        None => encode_error(ERR_OVERFLOW),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
