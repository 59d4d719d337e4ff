/// Output formatting for the deposit-yield calculator.
///
/// Hosts embedding the calculators (a runtime, an indexer, a CLI) can load this
/// from JSON or TOML. Rounding modes use their snake_case names:
///
/// ```json
/// { "decimal_precision": 9, "rounding": "down" }
/// ```
///
/// Missing fields fall back to the defaults below.
use serde::{Deserialize, Serialize};

use crate::decimal::RoundingMode;

/// Fractional digits in a KTON yield unless configured otherwise.
pub const DEFAULT_YIELD_PRECISION: u32 = 9;

/// Rounding applied to a KTON yield unless configured otherwise.
pub const DEFAULT_YIELD_ROUNDING: RoundingMode = RoundingMode::Down;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YieldFormat {
    /// Fractional digits kept in the reported yield.
    pub decimal_precision: u32,
    /// Applied once, when the yield is cut to `decimal_precision` digits.
    pub rounding: RoundingMode,
}

impl Default for YieldFormat {
    fn default() -> Self {
        YieldFormat {
            decimal_precision: DEFAULT_YIELD_PRECISION,
            rounding: DEFAULT_YIELD_ROUNDING,
        }
    }
}

impl YieldFormat {
    pub fn new(decimal_precision: u32, rounding: RoundingMode) -> Self {
        YieldFormat { decimal_precision, rounding }
    }
}
