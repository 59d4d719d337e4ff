pub mod decimal;
pub mod config;
pub mod units;
pub mod math_lib;
pub mod staking_preview;
pub mod abi;
pub mod precompiles;
pub mod precompile_set;

pub use config::YieldFormat;
pub use decimal::{Decimal, RoundingMode};
pub use math_lib::{compute_kton_yield, compute_kton_yield_with, compute_power, AssetAmounts, PoolTotals};
pub use staking_preview::{preview, PowerPreview, PreviewError, PreviewInput, StakeAction};
pub use precompile_set::{
    StakingPowerPrecompileSet,
    POWER_PRECOMPILE_ADDRESS,
    STAKING_PREVIEW_PRECOMPILE_ADDRESS,
};
