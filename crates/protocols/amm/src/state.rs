//! AMM State Types
//!
//! Paths, requests, and the engine's error taxonomy.

use std::fmt;

use apwine_core::{Address, Amount, Deadline, PoolId, TokenKind, TransportError};
use ledger_client::SignerBinding;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which side of a swap is fixed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SwapDirection {
    /// Exact input, bounded minimum output
    In,
    /// Exact output, bounded maximum input
    Out,
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In => write!(f, "IN"),
            Self::Out => write!(f, "OUT"),
        }
    }
}

/// Route as a token sequence, with every intermediate token listed twice
/// (exit of one hop, entry of the next).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamedPath(Vec<TokenKind>);

impl NamedPath {
    /// Expand a raw node sequence `[a, b, c]` into `[a, b, b, c]`
    pub fn from_nodes(nodes: &[TokenKind]) -> Self {
        let mut tokens = Vec::with_capacity(nodes.len().saturating_sub(1) * 2);
        for pair in nodes.windows(2) {
            tokens.push(pair[0]);
            tokens.push(pair[1]);
        }
        Self(tokens)
    }

    pub fn tokens(&self) -> &[TokenKind] {
        &self.0
    }

    /// Node sequence with duplicates collapsed
    pub fn nodes(&self) -> Vec<TokenKind> {
        self.0
            .first()
            .into_iter()
            .chain(self.0.iter().skip(1).step_by(2))
            .copied()
            .collect()
    }

    pub fn hops(&self) -> usize {
        self.0.len() / 2
    }
}

/// Positional path arguments of router quote/swap calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapPath {
    /// Side index per named-path position ("tokenPath")
    pub side_index_path: Vec<u8>,
    /// Pool per hop
    pub pool_path: Vec<PoolId>,
}

/// Full routing breakdown for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapPlan {
    pub named_path: NamedPath,
    pub side_index_path: Vec<u8>,
    pub pool_path: Vec<PoolId>,
    /// e.g. `Underlying->PT->FYT`
    pub visual: String,
}

/// Swap execution options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOptions {
    /// Submit any missing approval before the mutating call
    #[serde(default)]
    pub auto_approve: bool,
}

impl SwapOptions {
    pub fn auto_approve() -> Self {
        Self { auto_approve: true }
    }
}

/// Swap request parameters
#[derive(Debug, Clone)]
pub struct SwapRequest {
    /// AMM the swap routes through
    pub amm: Address,
    pub from: TokenKind,
    pub to: TokenKind,
    /// Fixed side amount: input for IN, output for OUT
    pub amount: Amount,
    /// Percent, 0.1 to 100 inclusive
    pub slippage_tolerance: Decimal,
    /// Defaults to one minute from submission
    pub deadline: Option<Deadline>,
    pub signer: SignerBinding,
}

/// Add/remove liquidity parameters
#[derive(Debug, Clone)]
pub struct LiquidityRequest {
    pub amm: Address,
    pub pool: PoolId,
    /// LP amount to mint or burn
    pub amount: Amount,
    /// Max amounts in (add) or min amounts out (remove), PT first
    pub bounding_amounts: Option<[Amount; 2]>,
    /// Acting account, defaults to the signer address
    pub account: Option<Address>,
    pub signer: SignerBinding,
}

/// Swap engine errors.
///
/// Transport failures are wrapped as-is so callers can tell them apart from
/// request errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
    #[error("No signer bound for a mutating call")]
    NoSigner,

    #[error("No swap route from {from} to {to}")]
    InvalidSwapRoute { from: String, to: String },

    #[error("Slippage tolerance {tolerance}% outside 0.1..=100")]
    FaultySlippage { tolerance: Decimal },

    #[error("No such token: {token}")]
    NoSuchToken { token: String },

    #[error("LP tokens not approved for adding liquidity")]
    LpAddNotApproved,

    #[error("LP tokens not approved for removal")]
    LpRemovalNotApproved,

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl SwapError {
    /// Stable error name for callers branching on error kind
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoSigner => "NoSigner",
            Self::InvalidSwapRoute { .. } => "InvalidSwapRoute",
            Self::FaultySlippage { .. } => "FaultySlippage",
            Self::NoSuchToken { .. } => "NoSuchToken",
            Self::LpAddNotApproved => "LPAddNotApproved",
            Self::LpRemovalNotApproved => "LPRemovalNotApproved",
            Self::Transport(_) => "Transport",
        }
    }

    pub(crate) fn invalid_route(from: impl fmt::Display, to: impl fmt::Display) -> Self {
        Self::InvalidSwapRoute {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}
