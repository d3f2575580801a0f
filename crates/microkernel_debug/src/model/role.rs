//! Process role detection for trace line labels.
//!
//! # Responsibility
//! - Classify the current process as coordinator, numbered worker, or unknown.
//! - Render the role as the bracketed label used in every trace line.
//!
//! # Invariants
//! - Worker detection wins over coordinator detection.
//! - Detection never fails; unknown roles fall back to the OS process id.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Environment variable carrying the worker number of a worker process.
pub const WORKER_ID_ENV: &str = "MICROKERNEL_WORKER_ID";
/// Environment variable marking the cluster role of the current process.
pub const CLUSTER_ROLE_ENV: &str = "MICROKERNEL_CLUSTER_ROLE";

/// Role of one process in a multi-process deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", content = "id", rename_all = "snake_case")]
pub enum ProcessRole {
    Coordinator,
    Worker(u32),
    /// Neither role is detectable; carries the raw OS process id.
    Unknown(u32),
}

impl ProcessRole {
    /// Label printed between brackets in trace lines.
    pub fn label(self) -> String {
        match self {
            Self::Coordinator => "MASTER".to_string(),
            Self::Worker(id) => format!("WORKER-{id}"),
            Self::Unknown(pid) => pid.to_string(),
        }
    }
}

impl Display for ProcessRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// Query for the role of the current process.
///
/// Implementations are consulted on every printed line.
pub trait RoleSource: Send + Sync {
    fn current_role(&self) -> ProcessRole;
}

/// Role source backed by process environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvRoleSource;

impl RoleSource for EnvRoleSource {
    fn current_role(&self) -> ProcessRole {
        detect_role(|key| std::env::var(key).ok(), std::process::id())
    }
}

/// Role source that always reports the same role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedRole(pub ProcessRole);

impl RoleSource for FixedRole {
    fn current_role(&self) -> ProcessRole {
        self.0
    }
}

/// Derives the process role from an environment lookup.
///
/// # Contract
/// - A parseable `MICROKERNEL_WORKER_ID` yields `Worker(id)`.
/// - `MICROKERNEL_CLUSTER_ROLE` of `coordinator` or `master` yields `Coordinator`.
/// - Anything else yields `Unknown(pid)`.
pub fn detect_role(lookup: impl Fn(&str) -> Option<String>, pid: u32) -> ProcessRole {
    if let Some(id) = lookup(WORKER_ID_ENV).and_then(|raw| raw.trim().parse::<u32>().ok()) {
        return ProcessRole::Worker(id);
    }

    match lookup(CLUSTER_ROLE_ENV)
        .map(|raw| raw.trim().to_ascii_lowercase())
        .as_deref()
    {
        Some("coordinator") | Some("master") => ProcessRole::Coordinator,
        _ => ProcessRole::Unknown(pid),
    }
}
