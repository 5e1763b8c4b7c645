//! Terminal directory: which callers are registered terminals of a project.
//!
//! The directory is owned by the host protocol. The engine only holds a
//! handle and asks one question of it.

use dashmap::{DashMap, DashSet};

use tierpay_core::protocol::{Address, ProjectId};

/// Registry of terminals per project.
pub trait TerminalDirectory: Send + Sync {
    fn is_terminal_of(&self, project_id: ProjectId, terminal: &Address) -> bool;
}

/// In-process directory:
/// - `project_id -> {terminal...}`
#[derive(Default)]
pub struct InMemoryDirectory {
    terminals: DashMap<ProjectId, DashSet<Address>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self {
            terminals: DashMap::new(),
        }
    }

    /// Returns false if the terminal was already registered.
    pub fn register(&self, project_id: ProjectId, terminal: Address) -> bool {
        self.terminals
            .entry(project_id)
            .or_insert_with(DashSet::new)
            .insert(terminal)
    }

    pub fn unregister(&self, project_id: ProjectId, terminal: &Address) -> bool {
        let Some(set) = self.terminals.get(&project_id) else {
            return false;
        };
        let removed = set.remove(terminal).is_some();
        if set.is_empty() {
            drop(set);
            self.terminals.remove(&project_id);
        }
        removed
    }

    pub fn terminals_of(&self, project_id: ProjectId) -> Vec<Address> {
        let Some(set) = self.terminals.get(&project_id) else {
            return vec![];
        };
        let mut out: Vec<Address> = set.iter().map(|a| *a.key()).collect();
        out.sort();
        out
    }
}

impl TerminalDirectory for InMemoryDirectory {
    fn is_terminal_of(&self, project_id: ProjectId, terminal: &Address) -> bool {
        self.terminals
            .get(&project_id)
            .map(|set| set.contains(terminal))
            .unwrap_or(false)
    }
}
