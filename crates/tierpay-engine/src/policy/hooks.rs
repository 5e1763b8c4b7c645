//! Completion hooks: structural checks on payment/redemption notifications.
//!
//! A notification is structurally valid when no native value rides on the
//! call, the caller is a registered terminal of the bound project, and the
//! event names the bound project. Payments must also clear the allow-list.

use tierpay_core::error::{Result, TierPayError};
use tierpay_core::protocol::{Address, Notification, PaymentEvent, ProjectId, RedemptionEvent};

use super::allowlist::AllowList;
use crate::directory::TerminalDirectory;

/// Project binding an engine holds once active.
#[derive(Clone, Copy)]
pub struct Binding<'a> {
    pub project_id: ProjectId,
    pub directory: &'a dyn TerminalDirectory,
}

/// Why a notification failed the structural checks. Only logged; the error
/// returned to the caller is the event-level variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Unbound,
    AttachedValue,
    UnknownTerminal,
    ProjectMismatch,
}

impl Violation {
    pub fn as_str(self) -> &'static str {
        match self {
            Violation::Unbound => "unbound",
            Violation::AttachedValue => "attached_value",
            Violation::UnknownTerminal => "unknown_terminal",
            Violation::ProjectMismatch => "project_mismatch",
        }
    }
}

/// First structural violation, if any.
pub fn structural_violation(
    binding: Option<Binding<'_>>,
    caller: &Address,
    event_project: ProjectId,
    value: u128,
) -> Option<Violation> {
    let Some(b) = binding else {
        return Some(Violation::Unbound);
    };
    if value != 0 {
        return Some(Violation::AttachedValue);
    }
    if !b.directory.is_terminal_of(b.project_id, caller) {
        return Some(Violation::UnknownTerminal);
    }
    if event_project != b.project_id {
        return Some(Violation::ProjectMismatch);
    }
    None
}

pub fn authorize_payment(
    binding: Option<Binding<'_>>,
    allow_list: Option<&AllowList>,
    n: &Notification<PaymentEvent>,
) -> Result<()> {
    if let Some(v) = structural_violation(binding, &n.caller, n.event.project_id, n.value) {
        tracing::warn!(
            caller=%n.caller,
            project=%n.event.project_id,
            value=%n.value,
            violation=v.as_str(),
            "payment event rejected"
        );
        return Err(TierPayError::InvalidPaymentEvent {
            caller: n.caller,
            project_id: n.event.project_id,
            value: n.value,
        });
    }

    let allowed = allow_list.map(|l| l.is_allowed(&n.event.payer)).unwrap_or(false);
    if !allowed {
        tracing::warn!(payer=%n.event.payer, project=%n.event.project_id, "payer not on allow-list");
        return Err(TierPayError::PayerNotAllowed {
            payer: n.event.payer,
        });
    }
    Ok(())
}

/// Redemptions are not allow-listed: any holder may redeem.
pub fn authorize_redemption(
    binding: Option<Binding<'_>>,
    n: &Notification<RedemptionEvent>,
) -> Result<()> {
    if let Some(v) = structural_violation(binding, &n.caller, n.event.project_id, n.value) {
        tracing::warn!(
            caller=%n.caller,
            project=%n.event.project_id,
            value=%n.value,
            violation=v.as_str(),
            "redemption event rejected"
        );
        return Err(TierPayError::InvalidRedemptionEvent {
            caller: n.caller,
            project_id: n.event.project_id,
            value: n.value,
        });
    }
    Ok(())
}
