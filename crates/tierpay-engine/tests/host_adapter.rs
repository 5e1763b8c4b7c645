//! Host adapter tests: service serialization, reentrancy, handlers, metrics.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::{Arc, Mutex, OnceLock};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use tierpay_core::protocol::{Address, ProjectId};
use tierpay_core::TierPayError;
use tierpay_engine::app_state::{AppState, PolicyService};
use tierpay_engine::config;
use tierpay_engine::directory::TerminalDirectory;
use tierpay_engine::obs::PolicyMetrics;
use tierpay_engine::policy::IssuanceTracking;
use tierpay_engine::transport::http::{self, ApiError, InitializeReq};

mod common;
use common::*;

const CONFIG: &str = r#"
version: 1
engine:
  identity: "0x00000000000000000000000000000000000000ee"
bonus:
  tiers:
    - { threshold: 500, bonus_percent: 120 }
    - { threshold: 1000, bonus_percent: 150 }
directory:
  terminals:
    - { project_id: 7, terminal: "0x0000000000000000000000000000000000000010" }
project:
  id: 7
  allow_list:
    - "0x00000000000000000000000000000000000000a1"
    - "0x00000000000000000000000000000000000000b2"
"#;

fn app() -> AppState {
    AppState::new(config::load_from_str(CONFIG).unwrap()).unwrap()
}

fn unwrap_api<T>(r: Result<Json<T>, ApiError>) -> T {
    match r {
        Ok(Json(v)) => v,
        Err(ApiError(e)) => panic!("unexpected api error: {e}"),
    }
}

fn api_err<T>(r: Result<Json<T>, ApiError>) -> TierPayError {
    match r {
        Ok(_) => panic!("expected api error"),
        Err(ApiError(e)) => e,
    }
}

/// Directory that calls back into the policy service while it is consulted.
#[derive(Default)]
struct CallbackDirectory {
    service: OnceLock<Arc<PolicyService>>,
    nested: Mutex<Option<Result<u128, TierPayError>>>,
}

impl TerminalDirectory for CallbackDirectory {
    fn is_terminal_of(&self, _project_id: ProjectId, _terminal: &Address) -> bool {
        if let Some(svc) = self.service.get() {
            let res = svc.run_now("quote_pay", |e| {
                e.quote_payment_terms(&pay_params(1200)).map(|t| t.weight)
            });
            *self.nested.lock().unwrap() = Some(res);
        }
        true
    }
}

#[tokio::test]
async fn nested_call_is_rejected_as_reentrant() {
    let dir = Arc::new(CallbackDirectory::default());
    let mut e = engine(two_tier_schedule(), IssuanceTracking::LastPayment);
    let handle: Arc<dyn TerminalDirectory> = dir.clone();
    e.initialize(PROJECT, handle, [payer_a()]).unwrap();

    let metrics = Arc::new(PolicyMetrics::default());
    let svc = Arc::new(PolicyService::new(e, Arc::clone(&metrics)));
    assert!(dir.service.set(Arc::clone(&svc)).is_ok());

    svc.run("pay_completed", |e| e.on_payment_completed(&paid(terminal(), PROJECT, 0, payer_a())))
        .await
        .unwrap();

    let nested = dir.nested.lock().unwrap().take().expect("directory was consulted");
    assert_eq!(nested, Err(TierPayError::Reentrant));

    // The nested quote never reached the ledger.
    assert_eq!(svc.snapshot().await.unwrap().last_issued_weight, 0);
    assert_eq!(metrics.rejections.get(&[("code", "REENTRANT")]), 1);
}

#[tokio::test]
async fn sequential_calls_are_not_reentrant() {
    let svc = PolicyService::new(
        active_engine(two_tier_schedule(), IssuanceTracking::LastPayment),
        Arc::new(PolicyMetrics::default()),
    );
    for _ in 0..3 {
        svc.run("quote_pay", |e| e.quote_payment_terms(&pay_params(600)))
            .await
            .unwrap();
    }
    assert_eq!(svc.snapshot().await.unwrap().last_issued_weight, 720);
}

#[tokio::test]
async fn boot_config_initializes_engine() {
    let app = app();
    let snap = unwrap_api(http::state(State(app.clone())).await);
    assert!(snap.initialized);
    assert_eq!(snap.project_id, Some(PROJECT));
    assert_eq!(snap.allow_list_len, 2);
    assert_eq!(snap.highest_bonus_percent, 150);

    let cfg = app.cfg();
    assert_eq!(cfg.server.listen, "127.0.0.1:8080");
    assert_eq!(cfg.project.as_ref().map(|p| p.id), Some(PROJECT));
}

#[tokio::test]
async fn initialize_route_is_one_shot() {
    let app = app();
    let req = InitializeReq {
        project_id: ProjectId(9),
        allow_list: vec![payer_c()],
    };
    let err = api_err(http::initialize(State(app.clone()), Json(req)).await);
    assert_eq!(err, TierPayError::AlreadyInitialized { project_id: PROJECT });

    let allowed = unwrap_api(http::allowed(State(app.clone()), Path(payer_c().to_string())).await);
    assert!(!allowed.allowed);
}

#[tokio::test]
async fn initialize_route_binds_unconfigured_engine() {
    let cfg = config::load_from_str(
        r#"
version: 1
engine:
  identity: "0x00000000000000000000000000000000000000ee"
"#,
    )
    .unwrap();
    let app = AppState::new(cfg).unwrap();

    let err = api_err(http::quote_pay(State(app.clone()), Json(pay_params(1))).await);
    assert_eq!(err, TierPayError::NotInitialized);

    let req = InitializeReq {
        project_id: PROJECT,
        allow_list: vec![payer_a()],
    };
    let snap = unwrap_api(http::initialize(State(app.clone()), Json(req)).await);
    assert!(snap.initialized);
    assert_eq!(snap.allow_list_len, 1);

    // No terminal registered yet.
    let err = api_err(http::pay_completed(State(app.clone()), Json(paid(terminal(), PROJECT, 0, payer_a()))).await);
    assert_eq!(err.client_code().as_str(), "INVALID_PAYMENT_EVENT");

    let reg = http::RegisterTerminalReq {
        project_id: PROJECT,
        terminal: terminal(),
    };
    assert!(unwrap_api(http::register_terminal(State(app.clone()), Json(reg)).await).registered);

    let ok = unwrap_api(http::pay_completed(State(app.clone()), Json(paid(terminal(), PROJECT, 0, payer_a()))).await);
    assert!(ok.accepted);
}

#[tokio::test]
async fn pay_and_redeem_flow() {
    let app = app();

    let terms = unwrap_api(http::quote_pay(State(app.clone()), Json(pay_params(1200))).await);
    assert_eq!(terms.weight, 1800);

    let ok = unwrap_api(http::pay_completed(State(app.clone()), Json(paid(terminal(), PROJECT, 0, payer_a()))).await);
    assert!(ok.accepted);

    let err = api_err(http::pay_completed(State(app.clone()), Json(paid(terminal(), PROJECT, 0, payer_c()))).await);
    assert_eq!(err, TierPayError::PayerNotAllowed { payer: payer_c() });

    // 1800 * 150 is the largest reclaim backed by the recorded weight.
    let terms = unwrap_api(http::quote_redeem(State(app.clone()), Json(redeem_params(1800 * 150))).await);
    assert_eq!(terms.reclaim_amount, 270_000);

    let err = api_err(http::quote_redeem(State(app.clone()), Json(redeem_params(1801 * 150))).await);
    assert_eq!(err.client_code().as_str(), "OVER_REDEMPTION");

    let ok = unwrap_api(http::redeem_completed(State(app.clone()), Json(redeemed(terminal(), PROJECT, 0))).await);
    assert!(ok.accepted);

    let body = app.metrics().render(&app.metrics_extra().await);
    assert!(body.contains("tierpay_policy_decisions_total{op=\"quote_pay\",outcome=\"ok\"} 1"));
    assert!(body.contains("tierpay_policy_rejections_total{code=\"PAYER_NOT_ALLOWED\"} 1"));
    assert!(body.contains("tierpay_policy_rejections_total{code=\"OVER_REDEMPTION\"} 1"));
    assert!(body.contains("tierpay_policy_initialized 1"));
}

#[tokio::test]
async fn supports_route() {
    let app = app();
    for name in ["data-source", "pay-delegate", "redemption-delegate"] {
        let s = unwrap_api(http::supports(State(app.clone()), Path(name.to_string())).await);
        assert!(s.supported, "capability={name}");
    }
    for name in ["governance", "upgrade", ""] {
        let s = unwrap_api(http::supports(State(app.clone()), Path(name.to_string())).await);
        assert!(!s.supported, "capability={name}");
    }
}

#[tokio::test]
async fn allowed_route_rejects_malformed_address() {
    let app = app();
    let err = api_err(http::allowed(State(app.clone()), Path("0x1234".to_string())).await);
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");

    let a = unwrap_api(http::allowed(State(app.clone()), Path(payer_a().to_string())).await);
    assert!(a.allowed);
}

#[test]
fn error_status_mapping() {
    let cases = [
        (TierPayError::NotInitialized, StatusCode::CONFLICT),
        (TierPayError::Reentrant, StatusCode::CONFLICT),
        (TierPayError::PayerNotAllowed { payer: payer_c() }, StatusCode::FORBIDDEN),
        (
            TierPayError::OverRedemption {
                required_weight: 2,
                recorded_weight: 1,
                requested: 400,
            },
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        (TierPayError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
        (TierPayError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (e, status) in cases {
        assert_eq!(ApiError(e).into_response().status(), status);
    }
}
