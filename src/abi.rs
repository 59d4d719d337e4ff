/// Serialisation contract between the staking contracts and the two
/// precompiles. Field order and widths must match the Solidity side exactly;
/// a mismatch decodes into silently wrong amounts rather than failing.
///
/// ENCODING MODEL:
///   - token amounts and power scores → uint256, base units, right-aligned
///   - fractional KTON yields         → uint256 scaled by 10^decimals, plus a
///                                      uint8 carrying `decimals`
///   - enums (action, rounding mode)  → uint8
///   - month counts                   → uint32
///   - signed deltas                  → (bool negative, uint256 magnitude)
///
/// Every successful response starts with `bool true`; every failure is
/// `(bool false, uint32 code)`.
use ethabi::{decode, encode, ParamType, Token, Uint};
use num_bigint::{BigInt, Sign};

use crate::decimal::{Decimal, RoundingMode};
use crate::math_lib::{AssetAmounts, PoolTotals};
use crate::staking_preview::{PowerPreview, PreviewError, PreviewInput, StakeAction};

// ---------------------------------------------------------------------------
// Error codes (shared by both precompiles)
// ---------------------------------------------------------------------------

pub const ERR_INVALID_INPUT: u32 = 1;
pub const ERR_OVERFLOW: u32 = 2;
pub const ERR_INSUFFICIENT_STAKE: u32 = 3;
pub const ERR_INSUFFICIENT_POOL: u32 = 4;
pub const ERR_UNKNOWN_SELECTOR: u32 = 5;
pub const ERR_DECODE_FAILED: u32 = 6;

pub fn preview_error_code(e: &PreviewError) -> u32 {
    match e {
        PreviewError::NegativeAmount => ERR_INVALID_INPUT,
        PreviewError::InsufficientStake { .. } => ERR_INSUFFICIENT_STAKE,
        PreviewError::InsufficientPool { .. } => ERR_INSUFFICIENT_POOL,
    }
}

// ---------------------------------------------------------------------------
// uint256 <-> Decimal
// ---------------------------------------------------------------------------

/// A uint256 word read as an integer carrying `scale` fractional digits.
pub fn uint_to_decimal(value: Uint, scale: u32) -> Decimal {
    let mut buf = [0u8; 32];
    value.to_big_endian(&mut buf);
    Decimal::from_scaled_integer(BigInt::from_bytes_be(Sign::Plus, &buf), scale)
}

/// Encode `value` as a uint256 with `scale` fractional digits, truncating any
/// further precision. None if the value is negative or does not fit 256 bits.
pub fn decimal_to_uint(value: &Decimal, scale: u32) -> Option<Uint> {
    let scaled = value.to_scaled_integer(scale, RoundingMode::Down);
    let (sign, bytes) = scaled.to_bytes_be();
    if sign == Sign::Minus || bytes.len() > 32 {
        return None;
    }
    Some(Uint::from_big_endian(&bytes))
}

/// Token → u8 / u32 without panicking on oversized words.
pub fn token_to_u8(token: &Token) -> Option<u8> {
    token.clone().into_uint().and_then(|v| u8::try_from(v).ok())
}

pub fn token_to_u32(token: &Token) -> Option<u32> {
    token.clone().into_uint().and_then(|v| u32::try_from(v).ok())
}

pub fn token_to_amount(token: &Token) -> Option<Decimal> {
    token.clone().into_uint().map(|v| uint_to_decimal(v, 0))
}

// ---------------------------------------------------------------------------
// Decode: raw calldata bytes → PreviewInput
// ---------------------------------------------------------------------------

/// ABI-decode the arguments of previewStake.
///
/// Expected Solidity encoding (abi.encode order):
///   (uint256 stakedRing, uint256 stakedKton,
///    uint256 changeRing, uint256 changeKton,
///    uint256 poolRing, uint256 poolKton,
///    uint8 action, uint32 depositMonths)
///
/// Returns None if the bytes are malformed, or if `action` or `depositMonths`
/// do not fit their declared widths or meanings.
pub fn decode_preview_input(input: &[u8]) -> Option<PreviewInput> {
    let types = vec![
        ParamType::Uint(256), // staked_ring
        ParamType::Uint(256), // staked_kton
        ParamType::Uint(256), // change_ring
        ParamType::Uint(256), // change_kton
        ParamType::Uint(256), // pool_ring
        ParamType::Uint(256), // pool_kton
        ParamType::Uint(8),   // action
        ParamType::Uint(32),  // deposit_months
    ];

    let tokens = decode(&types, input).ok()?;

    if tokens.len() != 8 {
        return None;
    }

    let staked_ring    = token_to_amount(&tokens[0])?;
    let staked_kton    = token_to_amount(&tokens[1])?;
    let change_ring    = token_to_amount(&tokens[2])?;
    let change_kton    = token_to_amount(&tokens[3])?;
    let pool_ring      = token_to_amount(&tokens[4])?;
    let pool_kton      = token_to_amount(&tokens[5])?;
    let action         = StakeAction::from_code(token_to_u8(&tokens[6])?)?;
    let deposit_months = token_to_u32(&tokens[7])?;

    Some(PreviewInput {
        staked: AssetAmounts { ring: staked_ring, kton: staked_kton },
        change: AssetAmounts { ring: change_ring, kton: change_kton },
        pool: PoolTotals { ring: pool_ring, kton: pool_kton },
        action,
        deposit_months,
    })
}

// ---------------------------------------------------------------------------
// Encode: PowerPreview → ABI bytes returned to Solidity
// ---------------------------------------------------------------------------

/// ABI-encode a PowerPreview (without the leading success flag).
///
/// Matching Solidity layout:
///   (uint256 currentPower, uint256 projectedPower,
///    bool deltaNegative, uint256 deltaMagnitude,
///    uint256 ktonYieldScaled, uint8 ktonYieldDecimals)
///
/// The yield is carried at `yield_decimals` fractional digits. None if any
/// figure is negative where unsigned is required, or wider than 256 bits.
pub fn encode_power_preview(preview: &PowerPreview, yield_decimals: u8) -> Option<Vec<u8>> {
    let current = decimal_to_uint(&preview.current_power, 0)?;
    let projected = decimal_to_uint(&preview.projected_power, 0)?;
    let delta = decimal_to_uint(&preview.power_delta.abs(), 0)?;
    let kton_yield = decimal_to_uint(&preview.kton_yield, u32::from(yield_decimals))?;

    Some(encode(&[
        Token::Uint(current),
        Token::Uint(projected),
        Token::Bool(preview.power_delta.is_negative()),
        Token::Uint(delta),
        Token::Uint(kton_yield),
        Token::Uint(yield_decimals.into()),
    ]))
}

// ---------------------------------------------------------------------------
// Success / error envelopes
// ---------------------------------------------------------------------------

/// Prefix `payload` with an ABI `bool true` word.
pub fn encode_success(payload: Vec<u8>) -> Vec<u8> {
    let mut output = encode(&[Token::Bool(true)]);
    output.extend(payload);
    output
}

/// Encode a failed call. Solidity checks the first bool field; if false it
/// reads the code and does not decode the rest.
///
/// Layout: (bool success, uint32 error_code)
pub fn encode_error(error_code: u32) -> Vec<u8> {
    encode(&[
        Token::Bool(false),
        Token::Uint(error_code.into()),
    ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
