//! AMM Routes

use amm::{how_to_swap, protected_bound, validate_tolerance, SwapError};
use apwine_core::{Amount, ProtocolError, TokenKind};
use axum::{
    extract::Query,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::dto::{ApiError, BoundRequest, BoundResponse, RouteQuery, RouteResponse};
use crate::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

/// Create AMM routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/route", get(get_route))
        .route("/bound", post(get_bound))
}

fn bad_request(err: impl Into<ApiError>) -> (StatusCode, Json<ApiError>) {
    (StatusCode::BAD_REQUEST, Json(err.into()))
}

/// GET /amm/route?from=&to= - Plan a swap between two tokens
async fn get_route(Query(query): Query<RouteQuery>) -> ApiResult<RouteResponse> {
    let no_route = || {
        bad_request(SwapError::InvalidSwapRoute {
            from: query.from.clone(),
            to: query.to.clone(),
        })
    };

    let from: TokenKind = query.from.parse().map_err(|_| no_route())?;
    let to: TokenKind = query.to.parse().map_err(|_| no_route())?;
    let plan = how_to_swap(from, to).ok_or_else(no_route)?;

    Ok(Json(plan.into()))
}

/// POST /amm/bound - Slippage-protected bound for a router quote
async fn get_bound(Json(request): Json<BoundRequest>) -> ApiResult<BoundResponse> {
    let quote: Amount = request.quote.trim().parse().map_err(|_| {
        bad_request(ProtocolError::InvalidAmount {
            message: format!("not an unsigned integer: {:?}", request.quote),
        })
    })?;
    validate_tolerance(request.slippage_tolerance).map_err(bad_request)?;

    let bound = protected_bound(request.direction, &quote, request.slippage_tolerance);
    Ok(Json(BoundResponse {
        quote: quote.to_string(),
        bound: bound.to_string(),
    }))
}
