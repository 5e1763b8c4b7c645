//! Shared application state for the tierpay host adapter.
//!
//! - `PolicyService` owns the engine. Calls are queued one at a time and the
//!   engine itself is only ever `try_lock`ed, so a nested call that arrives
//!   mid-operation fails with `Reentrant` instead of deadlocking.
//! - `AppState` wires config, directory, service, and metrics together.

use std::sync::{Arc, Mutex, TryLockError};
use std::time::Instant;

use tierpay_core::error::{Result, TierPayError};

use crate::config::PolicyConfig;
use crate::directory::{InMemoryDirectory, TerminalDirectory};
use crate::obs::PolicyMetrics;
use crate::policy::{PolicyEngine, PolicySnapshot};

const FAIL_FAST_ON_MISSING_TERMINALS: bool = false; // if changed to true, boot fails.

pub struct PolicyService {
    queue: tokio::sync::Mutex<()>,
    engine: Mutex<PolicyEngine>,
    metrics: Arc<PolicyMetrics>,
}

impl PolicyService {
    pub fn new(engine: PolicyEngine, metrics: Arc<PolicyMetrics>) -> Self {
        Self {
            queue: tokio::sync::Mutex::new(()),
            engine: Mutex::new(engine),
            metrics,
        }
    }

    /// Wait for our turn, then run `f` against the engine.
    pub async fn run<T, F>(&self, op: &'static str, f: F) -> Result<T>
    where
        F: FnOnce(&mut PolicyEngine) -> Result<T>,
    {
        let _turn = self.queue.lock().await;
        self.run_now(op, f)
    }

    /// Run `f` immediately. Fails with `Reentrant` while another operation
    /// holds the engine.
    pub fn run_now<T, F>(&self, op: &'static str, f: F) -> Result<T>
    where
        F: FnOnce(&mut PolicyEngine) -> Result<T>,
    {
        let started = Instant::now();
        let res = match self.engine.try_lock() {
            Ok(mut engine) => f(&mut engine),
            Err(TryLockError::WouldBlock) => {
                tracing::warn!(op, "reentrant policy call rejected");
                Err(TierPayError::Reentrant)
            }
            // Poisoned lock means a logic bug; deny rather than panic.
            Err(TryLockError::Poisoned(_)) => {
                Err(TierPayError::Internal("policy engine lock poisoned".into()))
            }
        };
        self.record(op, started, &res);
        res
    }

    pub async fn snapshot(&self) -> Result<PolicySnapshot> {
        let _turn = self.queue.lock().await;
        match self.engine.try_lock() {
            Ok(engine) => Ok(engine.snapshot()),
            Err(TryLockError::WouldBlock) => Err(TierPayError::Reentrant),
            Err(TryLockError::Poisoned(_)) => {
                Err(TierPayError::Internal("policy engine lock poisoned".into()))
            }
        }
    }

    fn record<T>(&self, op: &'static str, started: Instant, res: &Result<T>) {
        self.metrics.op_duration.observe(&[("op", op)], started.elapsed());
        match res {
            Ok(_) => self.metrics.decisions.inc(&[("op", op), ("outcome", "ok")]),
            Err(e) => {
                self.metrics.decisions.inc(&[("op", op), ("outcome", "rejected")]);
                self.metrics.rejections.inc(&[("code", e.client_code().as_str())]);
            }
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    service: Arc<PolicyService>,
    directory: Arc<InMemoryDirectory>,
    metrics: Arc<PolicyMetrics>,
}

struct AppStateInner {
    cfg: PolicyConfig,
}

impl AppState {
    /// Build application state, initializing the engine when the config
    /// carries a `project` section.
    pub fn new(cfg: PolicyConfig) -> Result<Self> {
        // 1) Compile bonus schedule
        let schedule = cfg.bonus.schedule()?;

        // 2) Seed the terminal directory
        let directory = Arc::new(InMemoryDirectory::new());
        for t in &cfg.directory.terminals {
            directory.register(t.project_id, t.terminal);
        }

        // 3) Create the engine (and bind it if configured)
        let mut engine = PolicyEngine::new(cfg.engine.identity, schedule, cfg.issuance.tracking);
        if let Some(project) = &cfg.project {
            if directory.terminals_of(project.id).is_empty() {
                tracing::warn!(project=%project.id, "no terminals registered for bound project");
                if FAIL_FAST_ON_MISSING_TERMINALS {
                    return Err(TierPayError::BadRequest(format!(
                        "project {} has no terminals in directory.terminals",
                        project.id
                    )));
                }
            }

            let dir: Arc<dyn TerminalDirectory> = directory.clone();
            engine.initialize(project.id, dir, project.allow_list()?)?;
        }

        let metrics = Arc::new(PolicyMetrics::default());
        let service = Arc::new(PolicyService::new(engine, Arc::clone(&metrics)));

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg }),
            service,
            directory,
            metrics,
        })
    }

    pub fn cfg(&self) -> &PolicyConfig {
        &self.inner.cfg
    }

    pub fn service(&self) -> Arc<PolicyService> {
        Arc::clone(&self.service)
    }

    pub fn directory(&self) -> Arc<InMemoryDirectory> {
        Arc::clone(&self.directory)
    }

    pub fn metrics(&self) -> Arc<PolicyMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn is_draining(&self) -> bool {
        self.metrics.is_draining()
    }

    /// Gauge lines appended to `/metrics`.
    pub async fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        let initialized = match self.service.snapshot().await {
            Ok(s) => u64::from(s.initialized),
            Err(_) => 0,
        };
        vec![("tierpay_policy_initialized", initialized)]
    }
}
