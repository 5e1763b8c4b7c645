//! Redemption safety guard tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use tierpay_core::protocol::ProjectId;
use tierpay_core::TierPayError;
use tierpay_engine::policy::guard::check_redemption;
use tierpay_engine::policy::{BonusSchedule, BonusTier, IssuanceTracking};

mod common;
use common::*;

#[test]
fn bound_uses_truncating_division() {
    // 150000 / 200 = 750 <= 1000
    check_redemption(1000, 150_000, 200).unwrap();
    // 200199 / 200 = 1000 (truncated)
    check_redemption(1000, 200_199, 200).unwrap();

    let err = check_redemption(1000, 250_000, 200).unwrap_err();
    assert_eq!(
        err,
        TierPayError::OverRedemption {
            required_weight: 1250,
            recorded_weight: 1000,
            requested: 250_000,
        }
    );
    assert_eq!(err.client_code().as_str(), "OVER_REDEMPTION");

    // 200200 / 200 = 1001 > 1000
    assert!(check_redemption(1000, 200_200, 200).is_err());
}

#[test]
fn zero_reclaim_always_passes() {
    check_redemption(0, 0, 100).unwrap();
    check_redemption(0, 99, 100).unwrap();
    assert!(check_redemption(0, 100, 100).is_err());
}

fn schedule_with_top_200() -> BonusSchedule {
    BonusSchedule::new(vec![
        BonusTier::at_least(100, 110),
        BonusTier::at_least(5000, 200),
        BonusTier::at_least(1000, 150),
    ])
    .unwrap()
}

#[test]
fn engine_guard_uses_most_generous_tier() {
    let mut e = active_engine(schedule_with_top_200(), IssuanceTracking::LastPayment);
    assert_eq!(e.schedule().highest_bonus_percent(), 200);

    // 1000 base in the 150 tier -> recorded 1500.
    e.quote_payment_terms(&pay_params(1000)).unwrap();
    assert_eq!(e.last_issued_weight(), 1500);

    // 300000 / 200 = 1500: allowed.
    let terms = e.quote_redemption_terms(&redeem_params(300_000)).unwrap();
    assert_eq!(terms.reclaim_amount, 300_000);
    assert_eq!(terms.memo, "bye");
    assert_eq!(terms.delegates[0].delegate, e.identity());

    // 300200 / 200 = 1501: blocked entirely.
    let err = e.quote_redemption_terms(&redeem_params(300_200)).unwrap_err();
    assert_eq!(
        err,
        TierPayError::OverRedemption {
            required_weight: 1501,
            recorded_weight: 1500,
            requested: 300_200,
        }
    );
}

#[test]
fn guard_is_read_only() {
    let mut e = active_engine(two_tier_schedule(), IssuanceTracking::LastPayment);
    e.quote_payment_terms(&pay_params(1200)).unwrap();

    for _ in 0..3 {
        let _ = e.quote_redemption_terms(&redeem_params(10_000_000));
        e.quote_redemption_terms(&redeem_params(150)).unwrap();
    }
    assert_eq!(e.last_issued_weight(), 1800);
}

#[test]
fn single_slot_bound_follows_latest_payment() {
    let mut e = active_engine(two_tier_schedule(), IssuanceTracking::LastPayment);

    e.quote_payment_terms(&pay_params(1200)).unwrap(); // 1800
    e.check_redemption(1800 * 150).unwrap();

    // A later small payment shrinks the bound for everybody.
    e.quote_payment_terms(&pay_params(100)).unwrap(); // 100
    assert!(e.check_redemption(1800 * 150).is_err());
    e.check_redemption(100 * 150).unwrap();
}

#[test]
fn cumulative_bound_keeps_earlier_payments() {
    let mut e = active_engine(two_tier_schedule(), IssuanceTracking::Cumulative);

    e.quote_payment_terms(&pay_params(1200)).unwrap(); // 1800
    e.quote_payment_terms(&pay_params(100)).unwrap(); // +100
    e.check_redemption(1900 * 150).unwrap();
    assert!(e.check_redemption(1901 * 150).is_err());
}

#[test]
fn quotes_for_another_project_leave_the_ledger_alone() {
    let mut e = active_engine(schedule_with_top_200(), IssuanceTracking::LastPayment);
    e.quote_payment_terms(&pay_params(1000)).unwrap();
    assert_eq!(e.last_issued_weight(), 1500);

    let foreign = ProjectId(999);
    let mut pay = pay_params(1_000_000_000);
    pay.project_id = foreign;
    let err = e.quote_payment_terms(&pay).unwrap_err();
    assert_eq!(err, TierPayError::InvalidProjectId(foreign));
    assert_eq!(err.client_code().as_str(), "INVALID_PROJECT_ID");
    assert_eq!(e.last_issued_weight(), 1500);

    // The bound project's guard is unchanged by the rejected quote.
    assert!(e.check_redemption(100_000_000_000).is_err());

    // A foreign redemption quote is rejected even when it would fit the bound.
    let mut redeem = redeem_params(1000);
    redeem.project_id = foreign;
    assert_eq!(
        e.quote_redemption_terms(&redeem).unwrap_err(),
        TierPayError::InvalidProjectId(foreign)
    );
}
