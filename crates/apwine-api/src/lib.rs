//! apwine-api: HTTP API layer for the APWine swap engine
//!
//! Exposes route planning, slippage bounds and network information over
//! a small JSON API.

pub mod dto;
pub mod routes;
pub mod server;
pub mod state;

pub use server::*;
pub use state::AppState;
