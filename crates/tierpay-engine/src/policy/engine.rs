//! Policy engine: one instance bound to one project.
//!
//! Lifecycle is `Uninitialized -> Active`, with no way back. Operations run
//! to completion on `&mut self`/`&self`; every failure returns before any
//! field is written, so a rejected call leaves the engine unchanged.

use std::sync::Arc;

use serde::Serialize;

use tierpay_core::error::{Result, TierPayError};
use tierpay_core::protocol::{
    Address, Capability, DelegateAllocation, Notification, PayParams, PayTerms, PaymentEvent,
    ProjectId, RedeemParams, RedeemTerms, RedemptionEvent,
};

use super::allowlist::AllowList;
use super::bonus::BonusSchedule;
use super::guard::{check_redemption, IssuanceLedger, IssuanceTracking};
use super::hooks::{authorize_payment, authorize_redemption, Binding};
use crate::directory::TerminalDirectory;

enum Lifecycle {
    Uninitialized,
    Active(ActiveState),
}

struct ActiveState {
    project_id: ProjectId,
    directory: Arc<dyn TerminalDirectory>,
    allow_list: AllowList,
}

/// Point-in-time view of engine state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicySnapshot {
    pub identity: Address,
    pub initialized: bool,
    pub project_id: Option<ProjectId>,
    pub allow_list_len: usize,
    pub last_issued_weight: u128,
    pub tracking: IssuanceTracking,
    pub highest_bonus_percent: u32,
}

pub struct PolicyEngine {
    /// Address the host calls back after pay/redeem (this module).
    identity: Address,
    schedule: BonusSchedule,
    ledger: IssuanceLedger,
    lifecycle: Lifecycle,
}

impl PolicyEngine {
    pub fn new(identity: Address, schedule: BonusSchedule, tracking: IssuanceTracking) -> Self {
        Self {
            identity,
            schedule,
            ledger: IssuanceLedger::new(tracking),
            lifecycle: Lifecycle::Uninitialized,
        }
    }

    pub fn identity(&self) -> Address {
        self.identity
    }

    pub fn schedule(&self) -> &BonusSchedule {
        &self.schedule
    }

    pub fn is_active(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Active(_))
    }

    pub fn project_id(&self) -> Option<ProjectId> {
        self.active().map(|a| a.project_id)
    }

    pub fn last_issued_weight(&self) -> u128 {
        self.ledger.recorded()
    }

    pub fn snapshot(&self) -> PolicySnapshot {
        PolicySnapshot {
            identity: self.identity,
            initialized: self.is_active(),
            project_id: self.project_id(),
            allow_list_len: self.active().map(|a| a.allow_list.len()).unwrap_or(0),
            last_issued_weight: self.ledger.recorded(),
            tracking: self.ledger.tracking(),
            highest_bonus_percent: self.schedule.highest_bonus_percent(),
        }
    }

    /// One-shot setup: bind the project, the terminal directory, and the
    /// initial allow-list.
    pub fn initialize<I>(
        &mut self,
        project_id: ProjectId,
        directory: Arc<dyn TerminalDirectory>,
        allow_list_seed: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = Address>,
    {
        if let Lifecycle::Active(a) = &self.lifecycle {
            tracing::warn!(project=%a.project_id, requested=%project_id, "initialize on active policy");
            return Err(TierPayError::AlreadyInitialized {
                project_id: a.project_id,
            });
        }
        if project_id.is_zero() {
            return Err(TierPayError::InvalidProjectId(project_id));
        }

        let mut allow_list = AllowList::new();
        allow_list.grant(allow_list_seed);

        tracing::info!(project=%project_id, allowed=allow_list.len(), "policy initialized");

        self.lifecycle = Lifecycle::Active(ActiveState {
            project_id,
            directory,
            allow_list,
        });
        Ok(())
    }

    pub fn is_allowed(&self, payer: &Address) -> bool {
        self.active()
            .map(|a| a.allow_list.is_allowed(payer))
            .unwrap_or(false)
    }

    /// Pure: base weight -> adjusted weight under the configured schedule.
    pub fn compute_adjusted_weight(&self, base_weight: u128) -> Result<u128> {
        self.schedule.adjust(base_weight)
    }

    /// Quote a payment and record its adjusted weight in the issuance ledger.
    pub fn quote_payment_terms(&mut self, params: &PayParams) -> Result<PayTerms> {
        self.ensure_bound_to(params.project_id)?;

        let weight = self.schedule.adjust(params.weight)?;
        let recorded = self.ledger.next(weight)?;
        self.ledger.commit(recorded);

        tracing::debug!(
            project=%params.project_id,
            payer=%params.payer,
            base=%params.weight,
            adjusted=%weight,
            recorded=%recorded,
            "payment quoted"
        );

        Ok(PayTerms {
            weight,
            memo: params.memo.clone(),
            delegates: vec![DelegateAllocation::notify_only(self.identity)],
        })
    }

    /// Read-only redemption bound against the recorded issuance weight.
    pub fn check_redemption(&self, reclaim_amount: u128) -> Result<()> {
        check_redemption(
            self.ledger.recorded(),
            reclaim_amount,
            self.schedule.highest_bonus_percent(),
        )
    }

    pub fn quote_redemption_terms(&self, params: &RedeemParams) -> Result<RedeemTerms> {
        self.ensure_bound_to(params.project_id)?;

        if let Err(e) = self.check_redemption(params.reclaim_amount) {
            tracing::warn!(
                project=%params.project_id,
                holder=%params.holder,
                reclaim=%params.reclaim_amount,
                recorded=%self.ledger.recorded(),
                "redemption blocked"
            );
            return Err(e);
        }

        tracing::debug!(project=%params.project_id, reclaim=%params.reclaim_amount, "redemption quoted");

        Ok(RedeemTerms {
            reclaim_amount: params.reclaim_amount,
            memo: params.memo.clone(),
            delegates: vec![DelegateAllocation::notify_only(self.identity)],
        })
    }

    pub fn on_payment_completed(&self, n: &Notification<PaymentEvent>) -> Result<()> {
        authorize_payment(self.binding(), self.active().map(|a| &a.allow_list), n)?;
        tracing::info!(project=%n.event.project_id, payer=%n.event.payer, amount=%n.event.amount, "payment accepted");
        Ok(())
    }

    pub fn on_redemption_completed(&self, n: &Notification<RedemptionEvent>) -> Result<()> {
        authorize_redemption(self.binding(), n)?;
        tracing::info!(project=%n.event.project_id, holder=%n.event.holder, "redemption accepted");
        Ok(())
    }

    /// Capability discovery. Everything this engine advertises is in
    /// `Capability`; unknown names never reach here.
    pub fn supports(&self, capability: Capability) -> bool {
        matches!(
            capability,
            Capability::DataSource | Capability::PayDelegate | Capability::RedemptionDelegate
        )
    }

    /// Quotes only apply to the bound project; a foreign id never reaches the ledger.
    fn ensure_bound_to(&self, project_id: ProjectId) -> Result<()> {
        let Some(a) = self.active() else {
            return Err(TierPayError::NotInitialized);
        };
        if project_id != a.project_id {
            tracing::warn!(bound=%a.project_id, requested=%project_id, "quote for foreign project");
            return Err(TierPayError::InvalidProjectId(project_id));
        }
        Ok(())
    }

    fn active(&self) -> Option<&ActiveState> {
        match &self.lifecycle {
            Lifecycle::Active(a) => Some(a),
            Lifecycle::Uninitialized => None,
        }
    }

    fn binding(&self) -> Option<Binding<'_>> {
        self.active().map(|a| Binding {
            project_id: a.project_id,
            directory: &*a.directory,
        })
    }
}
