//! Allow-list compilation and membership.
//!
//! Entries are `0x`-prefixed payer addresses. Membership is insert-only: the
//! engine grants during setup and never revokes.

use std::collections::HashSet;

use tierpay_core::error::{Result, TierPayError};
use tierpay_core::protocol::Address;

/// Set of payers permitted to pay into the bound project.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    members: HashSet<Address>,
}

impl AllowList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert every payer unconditionally. Granting twice is a no-op.
    pub fn grant<I>(&mut self, payers: I)
    where
        I: IntoIterator<Item = Address>,
    {
        self.members.extend(payers);
    }

    /// Default deny: anything never granted is not allowed.
    pub fn is_allowed(&self, payer: &Address) -> bool {
        self.members.contains(payer)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

pub fn compile_allow_list(raw: &[String]) -> Result<Vec<Address>> {
    let mut out = Vec::with_capacity(raw.len());
    for s in raw {
        let addr = Address::parse(s.trim())
            .map_err(|e| TierPayError::BadRequest(format!("invalid allow_list entry: {e}")))?;
        out.push(addr);
    }
    Ok(out)
}
