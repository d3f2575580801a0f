//! Hook registration contract and in-process latch registry.
//!
//! # Responsibility
//! - Define the narrow registration capability extensions depend on.
//! - Dispatch observational and intercepting latches in registration order.
//!
//! # Invariants
//! - One latch per (hook point, subscriber) pair.
//! - Latch kind always matches the hook point kind.
//! - Intercept dispatch threads the value through every latch in order.

use crate::extension::hook::{HookKind, HookPoint};
use crate::model::event::HookEvent;
use crate::model::value::CallValue;
use log::{debug, trace, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use uuid::Uuid;

/// Handler of an observational hook; return value is discarded.
pub type ObserveFn = dyn Fn(&HookEvent<'_>) + Send + Sync;
/// Handler of an intercepting hook; return value continues through the host.
pub type InterceptFn = dyn Fn(CallValue, &HookEvent<'_>) -> CallValue + Send + Sync;

/// Stable identity of one latching extension instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SubscriberId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Handler registered on one hook point.
pub enum Latch {
    Observe(Box<ObserveFn>),
    Intercept(Box<InterceptFn>),
}

impl Latch {
    pub fn observe(handler: impl Fn(&HookEvent<'_>) + Send + Sync + 'static) -> Self {
        Self::Observe(Box::new(handler))
    }

    pub fn intercept(
        handler: impl Fn(CallValue, &HookEvent<'_>) -> CallValue + Send + Sync + 'static,
    ) -> Self {
        Self::Intercept(Box::new(handler))
    }

    pub fn kind(&self) -> HookKind {
        match self {
            Self::Observe(_) => HookKind::Observe,
            Self::Intercept(_) => HookKind::Intercept,
        }
    }
}

impl Debug for Latch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Observe(_) => f.write_str("Latch::Observe(..)"),
            Self::Intercept(_) => f.write_str("Latch::Intercept(..)"),
        }
    }
}

/// Registration capability a host kernel exposes to extensions.
pub trait HookRegistry {
    /// Registers one latch for `subscriber` on `point`.
    fn latch(
        &mut self,
        point: HookPoint,
        subscriber: SubscriberId,
        latch: Latch,
    ) -> Result<(), HookRegistryError>;

    /// Returns `true` when `subscriber` already holds a latch on `point`.
    fn is_latched(&self, point: HookPoint, subscriber: SubscriberId) -> bool;
}

#[derive(Debug)]
struct LatchEntry {
    subscriber: SubscriberId,
    latch: Latch,
}

/// In-process hook registry dispatching latches synchronously.
#[derive(Debug, Default)]
pub struct LatchRegistry {
    entries: BTreeMap<HookPoint, Vec<LatchEntry>>,
}

impl LatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of registered latches across all hook points.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of latches registered on one hook point.
    pub fn latch_count(&self, point: HookPoint) -> usize {
        self.entries.get(&point).map_or(0, Vec::len)
    }

    /// Invokes every observational latch for the event's hook point.
    ///
    /// Returns the number of latches invoked.
    pub fn notify(&self, event: &HookEvent<'_>) -> usize {
        let point = event.point();
        let Some(entries) = self.entries.get(&point) else {
            return 0;
        };

        let mut invoked = 0;
        for entry in entries {
            if let Latch::Observe(handler) = &entry.latch {
                handler(event);
                invoked += 1;
            }
        }
        trace!("event=hook_notify module=kernel status=ok point={point} latches={invoked}");
        invoked
    }

    /// Threads `value` through every intercepting latch for the event's hook point.
    ///
    /// Returns the value produced by the last latch, or `value` itself when
    /// no intercepting latch is registered.
    pub fn intercept(&self, value: CallValue, event: &HookEvent<'_>) -> CallValue {
        let point = event.point();
        let Some(entries) = self.entries.get(&point) else {
            return value;
        };

        let mut current = value;
        for entry in entries {
            if let Latch::Intercept(handler) = &entry.latch {
                current = handler(current, event);
            }
        }
        trace!(
            "event=hook_intercept module=kernel status=ok point={point} latches={}",
            entries.len()
        );
        current
    }
}

impl HookRegistry for LatchRegistry {
    fn latch(
        &mut self,
        point: HookPoint,
        subscriber: SubscriberId,
        latch: Latch,
    ) -> Result<(), HookRegistryError> {
        if latch.kind() != point.kind() {
            warn!(
                "event=latch_register module=kernel status=error point={point} subscriber={subscriber} error_code=kind_mismatch"
            );
            return Err(HookRegistryError::KindMismatch {
                point,
                expected: point.kind(),
                actual: latch.kind(),
            });
        }
        if self.is_latched(point, subscriber) {
            warn!(
                "event=latch_register module=kernel status=error point={point} subscriber={subscriber} error_code=duplicate_latch"
            );
            return Err(HookRegistryError::DuplicateLatch { point, subscriber });
        }

        self.entries
            .entry(point)
            .or_default()
            .push(LatchEntry { subscriber, latch });
        debug!("event=latch_register module=kernel status=ok point={point} subscriber={subscriber}");
        Ok(())
    }

    fn is_latched(&self, point: HookPoint, subscriber: SubscriberId) -> bool {
        self.entries
            .get(&point)
            .is_some_and(|entries| entries.iter().any(|entry| entry.subscriber == subscriber))
    }
}

/// Hook registration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookRegistryError {
    KindMismatch {
        point: HookPoint,
        expected: HookKind,
        actual: HookKind,
    },
    DuplicateLatch {
        point: HookPoint,
        subscriber: SubscriberId,
    },
}

impl Display for HookRegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KindMismatch {
                point,
                expected,
                actual,
            } => write!(
                f,
                "latch kind mismatch on {point}: expected {expected:?}, got {actual:?}"
            ),
            Self::DuplicateLatch { point, subscriber } => {
                write!(f, "subscriber {subscriber} already latched on {point}")
            }
        }
    }
}

impl Error for HookRegistryError {}
