//! ledger-client: Read and write seams onto the EVM ledger
//!
//! The engine never talks to an RPC endpoint directly. Everything it reads
//! (quotes, allowances, contract wiring) goes through [`ChainReader`], and
//! everything it submits goes through a [`Signer`]. Implementations own
//! transport concerns such as nonce ordering and retries.

pub mod reader;
pub mod signer;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

use apwine_core::TransportError;

pub use reader::{AllowanceReader, ChainReader, QuoteProvider, TokenDirectory, VaultReader};
pub use signer::{
    IdentityResolver, Signer, SignerBinding, SwapCall, TransactionHandle, TransactionSubmitter,
};

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, TransportError>;
