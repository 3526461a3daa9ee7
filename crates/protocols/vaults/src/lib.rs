//! APWine Future Vaults
//!
//! Registry listing, per-vault aggregates and controller deposits and
//! withdrawals.

pub mod actions;
pub mod fetch;
pub mod state;

pub use actions::{deposit, withdraw};
pub use fetch::{
    fetch_all_future_aggregates, fetch_all_future_vaults, fetch_future_from_address,
    fetch_future_from_index, fetch_fyt_tokens, fetch_pt_tokens,
};
pub use state::{FutureAggregate, VaultError};
