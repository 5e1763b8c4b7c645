//! Host-facing HTTP handlers.
//!
//! Each handler decodes one JSON request, runs exactly one engine operation
//! through the `PolicyService`, and encodes the answer. Failures render as
//! `{ "error": CLIENT_CODE, "message": ... }`.

use std::str::FromStr;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use tierpay_core::error::{ClientCode, TierPayError};
use tierpay_core::protocol::{
    Address, Capability, Notification, PayParams, PayTerms, PaymentEvent, ProjectId,
    RedeemParams, RedeemTerms, RedemptionEvent,
};

use crate::app_state::AppState;
use crate::directory::TerminalDirectory;
use crate::policy::PolicySnapshot;

pub struct ApiError(pub TierPayError);

impl From<TierPayError> for ApiError {
    fn from(e: TierPayError) -> Self {
        Self(e)
    }
}

pub fn status_for(code: ClientCode) -> StatusCode {
    match code {
        ClientCode::BadRequest | ClientCode::UnsupportedVersion | ClientCode::InvalidProjectId => {
            StatusCode::BAD_REQUEST
        }
        ClientCode::AlreadyInitialized | ClientCode::NotInitialized | ClientCode::Reentrant => {
            StatusCode::CONFLICT
        }
        ClientCode::InvalidPaymentEvent
        | ClientCode::InvalidRedemptionEvent
        | ClientCode::PayerNotAllowed => StatusCode::FORBIDDEN,
        ClientCode::OverRedemption | ClientCode::ArithmeticOverflow => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code();
        let body = Json(json!({
            "error": code.as_str(),
            "message": self.0.to_string(),
        }));
        (status_for(code), body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InitializeReq {
    pub project_id: ProjectId,
    #[serde(default)]
    pub allow_list: Vec<Address>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterTerminalReq {
    pub project_id: ProjectId,
    pub terminal: Address,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Accepted {
    pub accepted: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Supported {
    pub capability: String,
    pub supported: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Allowed {
    pub payer: Address,
    pub allowed: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Registered {
    pub project_id: ProjectId,
    pub terminal: Address,
    pub registered: bool,
}

pub async fn initialize(State(app): State<AppState>, Json(req): Json<InitializeReq>) -> ApiResult<PolicySnapshot> {
    let directory: std::sync::Arc<dyn TerminalDirectory> = app.directory();
    let snapshot = app
        .service()
        .run("initialize", move |e| {
            e.initialize(req.project_id, directory, req.allow_list)?;
            Ok(e.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

pub async fn quote_pay(State(app): State<AppState>, Json(req): Json<PayParams>) -> ApiResult<PayTerms> {
    let terms = app
        .service()
        .run("quote_pay", |e| e.quote_payment_terms(&req))
        .await?;
    Ok(Json(terms))
}

pub async fn quote_redeem(State(app): State<AppState>, Json(req): Json<RedeemParams>) -> ApiResult<RedeemTerms> {
    let terms = app
        .service()
        .run("quote_redeem", |e| e.quote_redemption_terms(&req))
        .await?;
    Ok(Json(terms))
}

pub async fn pay_completed(
    State(app): State<AppState>,
    Json(n): Json<Notification<PaymentEvent>>,
) -> ApiResult<Accepted> {
    app.service()
        .run("pay_completed", |e| e.on_payment_completed(&n))
        .await?;
    Ok(Json(Accepted { accepted: true }))
}

pub async fn redeem_completed(
    State(app): State<AppState>,
    Json(n): Json<Notification<RedemptionEvent>>,
) -> ApiResult<Accepted> {
    app.service()
        .run("redeem_completed", |e| e.on_redemption_completed(&n))
        .await?;
    Ok(Json(Accepted { accepted: true }))
}

/// Unknown capability names are answered `false`, not rejected.
pub async fn supports(State(app): State<AppState>, Path(name): Path<String>) -> ApiResult<Supported> {
    let supported = match Capability::from_str(&name) {
        Ok(cap) => app.service().run("supports", |e| Ok(e.supports(cap))).await?,
        Err(_) => false,
    };
    Ok(Json(Supported {
        capability: name,
        supported,
    }))
}

pub async fn allowed(State(app): State<AppState>, Path(payer): Path<String>) -> ApiResult<Allowed> {
    let payer = Address::parse(&payer)?;
    let allowed = app
        .service()
        .run("is_allowed", |e| Ok(e.is_allowed(&payer)))
        .await?;
    Ok(Json(Allowed { payer, allowed }))
}

pub async fn state(State(app): State<AppState>) -> ApiResult<PolicySnapshot> {
    Ok(Json(app.service().snapshot().await?))
}

pub async fn register_terminal(
    State(app): State<AppState>,
    Json(req): Json<RegisterTerminalReq>,
) -> ApiResult<Registered> {
    if req.project_id.is_zero() {
        return Err(TierPayError::InvalidProjectId(req.project_id).into());
    }
    let registered = app.directory().register(req.project_id, req.terminal);
    tracing::info!(project=%req.project_id, terminal=%req.terminal, registered, "terminal registered");
    Ok(Json(Registered {
        project_id: req.project_id,
        terminal: req.terminal,
        registered,
    }))
}
