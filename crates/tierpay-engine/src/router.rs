//! Axum router wiring (host-facing routes + operational endpoints).

use axum::{
    routing::{get, post},
    Router,
};

use crate::{app_state::AppState, ops, transport::http};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/initialize", post(http::initialize))
        .route("/v1/pay/quote", post(http::quote_pay))
        .route("/v1/pay/completed", post(http::pay_completed))
        .route("/v1/redeem/quote", post(http::quote_redeem))
        .route("/v1/redeem/completed", post(http::redeem_completed))
        .route("/v1/supports/:capability", get(http::supports))
        .route("/v1/allowed/:payer", get(http::allowed))
        .route("/v1/state", get(http::state))
        .route("/v1/directory/terminals", post(http::register_terminal))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
