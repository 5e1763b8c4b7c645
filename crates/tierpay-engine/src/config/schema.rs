use serde::{Deserialize, Serialize};
use tierpay_core::error::{Result, TierPayError};
use tierpay_core::protocol::{Address, ProjectId};

use crate::policy::allowlist::compile_allow_list;
use crate::policy::bonus::{BonusSchedule, BonusTier};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    pub engine: EngineSection,

    #[serde(default)]
    pub bonus: BonusSection,

    #[serde(default)]
    pub issuance: IssuanceSection,

    #[serde(default)]
    pub directory: DirectorySection,

    /// Present => initialize at boot.
    #[serde(default)]
    pub project: Option<ProjectSection>,
}

impl PolicyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(TierPayError::UnsupportedVersion);
        }

        self.server.validate()?;
        self.engine.validate()?;
        self.bonus.schedule()?;
        self.directory.validate()?;
        if let Some(p) = &self.project {
            p.validate()?;
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        if self.listen.trim().is_empty() {
            return Err(TierPayError::BadRequest("server.listen must not be empty".into()));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "127.0.0.1:8080".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSection {
    /// Address the host calls back as pay/redeem delegate.
    pub identity: Address,
}

impl EngineSection {
    pub fn validate(&self) -> Result<()> {
        if self.identity.is_zero() {
            return Err(TierPayError::BadRequest("engine.identity must not be zero".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct BonusSection {
    #[serde(default)]
    pub tiers: Vec<TierConfig>,
}

impl BonusSection {
    /// Compile into a validated schedule.
    pub fn schedule(&self) -> Result<BonusSchedule> {
        let tiers = self
            .tiers
            .iter()
            .enumerate()
            .map(|(i, t)| t.compile(i))
            .collect::<Result<Vec<_>>>()?;
        BonusSchedule::new(tiers)
    }
}

/// One tier: either `threshold` or `min`+`max`, plus `bonus_percent`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierConfig {
    #[serde(default)]
    pub threshold: Option<u128>,
    #[serde(default)]
    pub min: Option<u128>,
    #[serde(default)]
    pub max: Option<u128>,
    pub bonus_percent: u32,
}

impl TierConfig {
    fn compile(&self, idx: usize) -> Result<BonusTier> {
        match (self.threshold, self.min, self.max) {
            (Some(threshold), None, None) => Ok(BonusTier::at_least(threshold, self.bonus_percent)),
            (None, Some(min), Some(max)) => Ok(BonusTier::within(min, max, self.bonus_percent)),
            _ => Err(TierPayError::BadRequest(format!(
                "bonus.tiers[{idx}] needs either threshold or min+max"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssuanceTracking {
    /// Single slot, overwritten by each payment quote.
    #[default]
    LastPayment,
    /// Sum of every quoted adjusted weight.
    Cumulative,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct IssuanceSection {
    #[serde(default)]
    pub tracking: IssuanceTracking,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct DirectorySection {
    #[serde(default)]
    pub terminals: Vec<TerminalEntry>,
}

impl DirectorySection {
    pub fn validate(&self) -> Result<()> {
        for t in &self.terminals {
            if t.project_id.is_zero() {
                return Err(TierPayError::BadRequest(format!(
                    "directory.terminals: project_id 0 for terminal {}",
                    t.terminal
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TerminalEntry {
    pub project_id: ProjectId,
    pub terminal: Address,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectSection {
    pub id: ProjectId,
    #[serde(default)]
    pub allow_list: Vec<String>,
}

impl ProjectSection {
    pub fn validate(&self) -> Result<()> {
        if self.id.is_zero() {
            return Err(TierPayError::InvalidProjectId(self.id));
        }
        compile_allow_list(&self.allow_list)?;
        Ok(())
    }

    pub fn allow_list(&self) -> Result<Vec<Address>> {
        compile_allow_list(&self.allow_list)
    }
}
