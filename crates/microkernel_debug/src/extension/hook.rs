//! Named hook points exposed by the host kernel.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Hook point the host dispatches latches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPoint {
    Toposort,
    TransitBefore,
    TransitAfter,
    CallBefore,
    CallAfter,
}

/// How the host treats a latch's return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    /// Return value is discarded.
    Observe,
    /// Return value replaces the value flowing through the host.
    Intercept,
}

impl HookPoint {
    /// Every hook point, in host dispatch order of one lifecycle.
    pub const ALL: [HookPoint; 5] = [
        HookPoint::Toposort,
        HookPoint::TransitBefore,
        HookPoint::TransitAfter,
        HookPoint::CallBefore,
        HookPoint::CallAfter,
    ];

    /// Stable host name of the hook point.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Toposort => HOOK_TOPOSORT,
            Self::TransitBefore => HOOK_TRANSIT_BEFORE,
            Self::TransitAfter => HOOK_TRANSIT_AFTER,
            Self::CallBefore => HOOK_CALL_BEFORE,
            Self::CallAfter => HOOK_CALL_AFTER,
        }
    }

    pub fn kind(self) -> HookKind {
        match self {
            Self::Toposort | Self::TransitBefore | Self::TransitAfter => HookKind::Observe,
            Self::CallBefore | Self::CallAfter => HookKind::Intercept,
        }
    }
}

impl Display for HookPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host name for the module-order-computed hook.
pub const HOOK_TOPOSORT: &str = "microkernel:state:toposort";
/// Host name for the transition-before hook.
pub const HOOK_TRANSIT_BEFORE: &str = "microkernel:state:transit:before";
/// Host name for the transition-after hook.
pub const HOOK_TRANSIT_AFTER: &str = "microkernel:state:transit:after";
/// Host name for the call-before hook.
pub const HOOK_CALL_BEFORE: &str = "microkernel:state:call:before";
/// Host name for the call-after hook.
pub const HOOK_CALL_AFTER: &str = "microkernel:state:call:after";

const SUPPORTED_HOOK_POINT_STRINGS: &[&str] = &[
    HOOK_TOPOSORT,
    HOOK_TRANSIT_BEFORE,
    HOOK_TRANSIT_AFTER,
    HOOK_CALL_BEFORE,
    HOOK_CALL_AFTER,
];

/// Returns supported host hook names.
pub fn supported_hook_point_strings() -> &'static [&'static str] {
    SUPPORTED_HOOK_POINT_STRINGS
}

/// Parses one hook point from its host name.
pub fn parse_hook_point(value: &str) -> Result<HookPoint, HookPointError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(HookPointError::EmptyName);
    }

    HookPoint::ALL
        .into_iter()
        .find(|point| point.as_str() == normalized)
        .ok_or_else(|| HookPointError::UnknownHookPoint(normalized.to_string()))
}

/// Hook point parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookPointError {
    EmptyName,
    UnknownHookPoint(String),
}

impl Display for HookPointError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "hook point name must not be empty"),
            Self::UnknownHookPoint(value) => write!(f, "hook point is unknown: {value}"),
        }
    }
}

impl Error for HookPointError {}
