/// Fixed precompile addresses and the PrecompileSet dispatch consumed by the
/// pallet-revive runtime configuration.
///
/// pallet-revive intercepts calls to registered addresses before contract
/// execution and routes them to the Rust handler. The staking contracts
/// hard-code these addresses, so they must match on both sides.
///
/// ADDRESS SCHEME:
/// The chain's own deposit and staking precompiles sit at 0x…0600 and 0x…0601.
/// These two take the next free range, 0x…0700 and 0x…0701.
use sp_core::H160;

use crate::precompiles::{power_precompile, staking_preview_precompile};

// ---------------------------------------------------------------------------
// Precompile address constants
// ---------------------------------------------------------------------------

/// computePower / computeKtonYield.
pub const POWER_PRECOMPILE_ADDRESS: H160 = H160([
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x07, 0x00, // 0x0000...0700
]);

/// previewStake.
pub const STAKING_PREVIEW_PRECOMPILE_ADDRESS: H160 = H160([
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x07, 0x01, // 0x0000...0701
]);

// ---------------------------------------------------------------------------
// PrecompileSet implementation
// ---------------------------------------------------------------------------

pub struct StakingPowerPrecompileSet;

impl StakingPowerPrecompileSet {
    /// Returns true if the address maps to one of this crate's precompiles.
    pub fn is_precompile(address: &H160) -> bool {
        *address == POWER_PRECOMPILE_ADDRESS
            || *address == STAKING_PREVIEW_PRECOMPILE_ADDRESS
    }

    /// Route a call and return the output bytes, or None if the address is
    /// not ours and the runtime should continue with normal execution.
    pub fn execute(address: &H160, input: &[u8]) -> Option<Vec<u8>> {
        if *address == POWER_PRECOMPILE_ADDRESS {
            return Some(power_precompile::call(input));
        }
        if *address == STAKING_PREVIEW_PRECOMPILE_ADDRESS {
            return Some(staking_preview_precompile::call(input));
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ethabi::{encode, Token};

    fn low_address(low: u16) -> H160 {
        let mut bytes = [0u8; 20];
        bytes[18..].copy_from_slice(&low.to_be_bytes());
        H160(bytes)
    }

    #[test]
    fn test_is_precompile_recognises_both_addresses() {
        assert!(StakingPowerPrecompileSet::is_precompile(&POWER_PRECOMPILE_ADDRESS));
        assert!(StakingPowerPrecompileSet::is_precompile(&STAKING_PREVIEW_PRECOMPILE_ADDRESS));
    }

    /// The chain's staking precompile is not ours.
    #[test]
    fn test_is_precompile_rejects_other_addresses() {
        assert!(!StakingPowerPrecompileSet::is_precompile(&low_address(0x0600)));
        assert!(!StakingPowerPrecompileSet::is_precompile(&H160([0xde; 20])));
    }

    #[test]
    fn test_addresses_match_documented_values() {
        assert_eq!(POWER_PRECOMPILE_ADDRESS, low_address(0x0700));
        assert_eq!(STAKING_PREVIEW_PRECOMPILE_ADDRESS, low_address(0x0701));
    }

    #[test]
    fn test_execute_unknown_address_returns_none() {
        assert!(StakingPowerPrecompileSet::execute(&H160([0xab; 20]), &[]).is_none());
    }

    /// Empty calldata fails inside the precompile but the address still
    /// resolves, so the outer Option is Some.
    #[test]
    fn test_execute_known_address_returns_some() {
        assert!(StakingPowerPrecompileSet::execute(&POWER_PRECOMPILE_ADDRESS, &[]).is_some());
        assert!(StakingPowerPrecompileSet::execute(&STAKING_PREVIEW_PRECOMPILE_ADDRESS, &[]).is_some());
    }

    /// Each address routes to its own selector table.
    #[test]
    fn test_execute_routes_by_address() {
        let mut input = power_precompile::SEL_COMPUTE_POWER.to_vec();
        input.extend(encode(&[
            Token::Uint(1_000u64.into()),
            Token::Uint(0u8.into()),
            Token::Uint(1_000u64.into()),
            Token::Uint(0u8.into()),
        ]));

        let routed = StakingPowerPrecompileSet::execute(&POWER_PRECOMPILE_ADDRESS, &input).unwrap();
        assert_eq!(routed[31], 1u8);

        let misrouted =
            StakingPowerPrecompileSet::execute(&STAKING_PREVIEW_PRECOMPILE_ADDRESS, &input).unwrap();
        assert_eq!(misrouted[31], 0u8, "previewStake precompile must not accept computePower");
    }
}
