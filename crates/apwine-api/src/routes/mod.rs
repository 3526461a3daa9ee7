//! API route handlers

pub mod amm;
pub mod config;

use axum::{routing::get, Json, Router};

use crate::dto::HealthResponse;
use crate::AppState;

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/amm", amm::router())
        .nest("/config", config::router())
        .with_state(state)
}

/// GET /health - Check API health
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use apwine_core::{Address, AppConfig, ContractAddresses, Network};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        send(app, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }

    fn app() -> Router {
        create_router(AppState::new())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get(app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_route_through_pt() {
        let (status, body) = get(app(), "/amm/route?from=Underlying&to=FYT").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "named_path": ["Underlying", "PT", "PT", "FYT"],
                "side_index_path": [1, 0, 0, 1],
                "pool_path": [0, 1],
                "visual": "Underlying->PT->FYT",
            })
        );
    }

    #[tokio::test]
    async fn test_route_rejections() {
        for uri in ["/amm/route?from=PT&to=PT", "/amm/route?from=DAI&to=PT"] {
            let (status, body) = get(app(), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["code"], "InvalidSwapRoute");
        }
    }

    #[tokio::test]
    async fn test_bound() {
        let (status, body) = post(
            app(),
            "/amm/bound",
            json!({"direction": "IN", "quote": "1000", "slippage_tolerance": "10"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"quote": "1000", "bound": "900"}));

        let (_, body) = post(
            app(),
            "/amm/bound",
            json!({"direction": "OUT", "quote": "1000", "slippage_tolerance": "10"}),
        )
        .await;
        assert_eq!(body["bound"], "1100");
    }

    #[tokio::test]
    async fn test_bound_rejections() {
        let (status, body) = post(
            app(),
            "/amm/bound",
            json!({"direction": "IN", "quote": "1000", "slippage_tolerance": "150"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "FaultySlippage");

        let (status, body) = post(
            app(),
            "/amm/bound",
            json!({"direction": "IN", "quote": "-5", "slippage_tolerance": "1"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_amount");
    }

    #[tokio::test]
    async fn test_network() {
        let router: Address = format!("0x{}", "ab".repeat(20)).parse().unwrap();
        let state = AppState::with_config(AppConfig {
            network: Network::Kovan,
            contracts: ContractAddresses {
                amm_router: Some(router.clone()),
                registry: None,
            },
            ..AppConfig::default()
        });

        let (status, body) = get(create_router(state), "/config/network").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["chain_id"], 42);
        assert_eq!(body["amm_router"], router.as_str());
    }
}
