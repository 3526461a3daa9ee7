//! Configuration Routes

use axum::{extract::State, routing::get, Json, Router};

use crate::dto::NetworkResponse;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/network", get(get_network))
}

/// GET /config/network - Active network and router
async fn get_network(State(state): State<AppState>) -> Json<NetworkResponse> {
    let config = state.config().await;
    Json(NetworkResponse {
        network: config.network.as_str().to_string(),
        chain_id: config.network.chain_id(),
        amm_router: config.contracts.amm_router.map(|a| a.to_string()),
    })
}
