/// The two precompile wrappers the pallet-revive runtime consumes. Each one
/// owns the full call lifecycle: raw bytes → decode → compute → encode → bytes.

pub mod power_precompile;
pub mod staking_preview_precompile;
