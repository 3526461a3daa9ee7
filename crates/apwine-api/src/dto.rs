//! Data Transfer Objects for API requests and responses

use amm::{SwapDirection, SwapPlan};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Query of `GET /amm/route`
#[derive(Debug, Clone, Deserialize)]
pub struct RouteQuery {
    pub from: String,
    pub to: String,
}

/// Swap route breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteResponse {
    /// Token names, intermediate tokens listed twice
    pub named_path: Vec<String>,
    pub side_index_path: Vec<u8>,
    pub pool_path: Vec<u8>,
    pub visual: String,
}

impl From<SwapPlan> for RouteResponse {
    fn from(plan: SwapPlan) -> Self {
        Self {
            named_path: plan
                .named_path
                .tokens()
                .iter()
                .map(|t| t.as_str().to_string())
                .collect(),
            side_index_path: plan.side_index_path,
            pool_path: plan.pool_path.iter().map(|p| p.as_u8()).collect(),
            visual: plan.visual,
        }
    }
}

/// Body of `POST /amm/bound`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundRequest {
    pub direction: SwapDirection,
    /// Router quote as a decimal integer string (token base units)
    pub quote: String,
    /// Percent
    pub slippage_tolerance: Decimal,
}

/// Slippage-protected bound for a quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundResponse {
    pub quote: String,
    /// Minimum output (IN) or maximum input (OUT)
    pub bound: String,
}

/// Active network settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkResponse {
    pub network: String,
    pub chain_id: u64,
    pub amm_router: Option<String>,
}

/// Generic API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<amm::SwapError> for ApiError {
    fn from(err: amm::SwapError) -> Self {
        Self::new(err.error_code(), err.to_string())
    }
}

impl From<apwine_core::ProtocolError> for ApiError {
    fn from(err: apwine_core::ProtocolError) -> Self {
        Self::new(err.error_code(), err.to_string())
    }
}
