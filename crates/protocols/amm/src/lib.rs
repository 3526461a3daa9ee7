//! APWine AMM Protocol Implementation
//!
//! Routing, slippage bounding and settlement for swaps and liquidity
//! operations on APWine AMMs. Ledger access goes through the
//! `ledger-client` seams; this crate holds no connection of its own.

pub mod approval;
pub mod calculator;
pub mod client;
pub mod constants;
pub mod fetch;
pub mod liquidity;
pub mod router;
pub mod state;
pub mod swap;

// Re-exports
pub use approval::ApprovalGate;
pub use calculator::{apply_bound, protected_bound, validate_tolerance};
pub use client::{AmmClient, LiquidityParams, SwapParams};
pub use fetch::{fetch_all_lp_token_pools, fetch_lp_token_pool, is_lp_approved_for_all, LpTokenPool};
pub use liquidity::LiquidityOperations;
pub use router::{how_to_swap, resolve_swap_path, resolve_swap_path_by_name};
pub use state::{
    LiquidityRequest, NamedPath, SwapDirection, SwapError, SwapOptions, SwapPath, SwapPlan,
    SwapRequest,
};
pub use swap::SwapExecutor;
