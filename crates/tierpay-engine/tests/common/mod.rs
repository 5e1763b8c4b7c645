//! Shared fixtures for engine tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::sync::Arc;

use tierpay_core::protocol::{
    Address, Notification, PayParams, PaymentEvent, ProjectId, RedeemParams, RedemptionEvent,
};
use tierpay_engine::directory::{InMemoryDirectory, TerminalDirectory};
use tierpay_engine::policy::{BonusSchedule, BonusTier, IssuanceTracking, PolicyEngine};

pub const PROJECT: ProjectId = ProjectId(7);

pub fn addr(last: u8) -> Address {
    let mut b = [0u8; 20];
    b[19] = last;
    Address::new(b)
}

pub fn engine_addr() -> Address {
    addr(0xee)
}
pub fn terminal() -> Address {
    addr(0x10)
}
pub fn payer_a() -> Address {
    addr(0xa1)
}
pub fn payer_b() -> Address {
    addr(0xb2)
}
pub fn payer_c() -> Address {
    addr(0xc3)
}

/// `{(1000, 150), (500, 120)}`
pub fn two_tier_schedule() -> BonusSchedule {
    BonusSchedule::new(vec![BonusTier::at_least(1000, 150), BonusTier::at_least(500, 120)]).unwrap()
}

pub fn directory() -> Arc<InMemoryDirectory> {
    let d = Arc::new(InMemoryDirectory::new());
    d.register(PROJECT, terminal());
    d
}

pub fn engine(schedule: BonusSchedule, tracking: IssuanceTracking) -> PolicyEngine {
    PolicyEngine::new(engine_addr(), schedule, tracking)
}

/// Active engine bound to `PROJECT`, allow-list `{A, B}`.
pub fn active_engine(schedule: BonusSchedule, tracking: IssuanceTracking) -> PolicyEngine {
    let mut e = engine(schedule, tracking);
    let dir: Arc<dyn TerminalDirectory> = directory();
    e.initialize(PROJECT, dir, [payer_a(), payer_b()]).unwrap();
    e
}

pub fn pay_params(weight: u128) -> PayParams {
    PayParams {
        project_id: PROJECT,
        terminal: terminal(),
        payer: payer_a(),
        beneficiary: None,
        amount: 0,
        weight,
        memo: "memo".into(),
    }
}

pub fn redeem_params(reclaim_amount: u128) -> RedeemParams {
    RedeemParams {
        project_id: PROJECT,
        terminal: terminal(),
        holder: payer_c(),
        token_count: 0,
        reclaim_amount,
        memo: "bye".into(),
    }
}

pub fn paid(caller: Address, project_id: ProjectId, value: u128, payer: Address) -> Notification<PaymentEvent> {
    Notification {
        caller,
        value,
        event: PaymentEvent {
            project_id,
            payer,
            beneficiary: None,
            amount: 1,
            token_count: 0,
            memo: String::new(),
        },
    }
}

pub fn redeemed(caller: Address, project_id: ProjectId, value: u128) -> Notification<RedemptionEvent> {
    Notification {
        caller,
        value,
        event: RedemptionEvent {
            project_id,
            holder: payer_c(),
            token_count: 0,
            reclaimed_amount: 0,
            memo: String::new(),
        },
    }
}
