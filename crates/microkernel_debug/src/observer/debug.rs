//! Debug observer latching onto kernel lifecycle hooks.
//!
//! # Responsibility
//! - Register one latch per hook point on a host registry.
//! - Print one trace line per hook invocation, labelled with the process role.
//!
//! # Invariants
//! - Intercepting latches return their input value unchanged.
//! - The observer holds no state between invocations; the role is queried on
//!   every printed line.
//! - Attaching the same observer twice never registers a second latch on a
//!   hook point.

use crate::extension::hook::{HookKind, HookPoint};
use crate::extension::kernel::{HookRegistry, HookRegistryError, Latch, SubscriberId};
use crate::model::event::{CallSite, HookEvent, Transition};
use crate::model::role::{EnvRoleSource, RoleSource};
use crate::model::value::CallValue;
use crate::observer::sink::{StdoutSink, TraceSink};
use crate::observer::style::Styling;
use log::info;
use std::sync::Arc;

/// Prefix of every trace line.
pub const TRACE_PREFIX: &str = "microkernel:";

struct Printer {
    sink: Arc<dyn TraceSink>,
    roles: Arc<dyn RoleSource>,
    styling: Styling,
}

impl Printer {
    fn output(&self, message: &str) {
        let role = self.roles.current_role();
        self.sink.write_line(&format!(
            "{TRACE_PREFIX} {} [{}]: {message}",
            self.styling.blue("DEBUG"),
            role.label()
        ));
    }

    fn module_order(&self, order: &[String]) {
        self.output(&format!(
            "{}: {}",
            self.styling.blue("module order"),
            order.join(", ")
        ));
    }

    fn transit_before(&self, transition: &Transition) {
        let s = self.styling;
        self.output(&format!(
            "{} ({}): {} -({})-> {}",
            s.blue("state transition"),
            s.bold("before"),
            s.bold(&transition.from),
            s.bold(&transition.method),
            transition.to
        ));
    }

    fn transit_after(&self, transition: &Transition) {
        let s = self.styling;
        self.output(&format!(
            "{} ({}):  {} -({})-> {}",
            s.blue("state transition"),
            s.bold("after"),
            transition.from,
            s.bold(&transition.method),
            s.bold(&transition.to)
        ));
    }

    fn call_before(&self, method: CallValue, site: &CallSite) -> CallValue {
        let s = self.styling;
        self.output(&format!(
            "{}      ({}): {}::{}()",
            s.blue("method call"),
            s.bold("before"),
            site.module_name,
            s.bold(&site.method_name)
        ));
        method
    }

    fn call_after(&self, result: CallValue, site: &CallSite) -> CallValue {
        let s = self.styling;
        self.output(&format!(
            "{}      ({}):  {}::{}(): {}",
            s.blue("method call"),
            s.bold("after"),
            site.module_name,
            s.bold(&site.method_name),
            s.bold(result.display_type())
        ));
        result
    }

    fn observe(&self, event: &HookEvent<'_>) {
        match event {
            HookEvent::ModuleOrder(order) => self.module_order(order),
            HookEvent::TransitBefore(transition) => self.transit_before(transition),
            HookEvent::TransitAfter(transition) => self.transit_after(transition),
            // Intercepting events never reach observe latches.
            HookEvent::CallBefore(_) | HookEvent::CallAfter(_) => {}
        }
    }

    fn intercept(&self, value: CallValue, event: &HookEvent<'_>) -> CallValue {
        match event {
            HookEvent::CallBefore(site) => self.call_before(value, site),
            HookEvent::CallAfter(site) => self.call_after(value, site),
            _ => value,
        }
    }
}

/// Extension printing kernel lifecycle events as trace lines.
#[derive(Clone)]
pub struct DebugObserver {
    id: SubscriberId,
    printer: Arc<Printer>,
}

impl DebugObserver {
    /// Creates an observer writing to `sink` and labelling lines via `roles`.
    pub fn new(sink: Arc<dyn TraceSink>, roles: Arc<dyn RoleSource>) -> Self {
        Self {
            id: SubscriberId::new(),
            printer: Arc::new(Printer {
                sink,
                roles,
                styling: Styling::default(),
            }),
        }
    }

    /// Creates an observer printing to stdout with environment role detection.
    pub fn stdout() -> Self {
        Self::new(Arc::new(StdoutSink), Arc::new(EnvRoleSource))
    }

    /// Switches emphasis; subscriber identity, sink and role source are kept.
    pub fn with_styling(self, styling: Styling) -> Self {
        Self {
            id: self.id,
            printer: Arc::new(Printer {
                sink: Arc::clone(&self.printer.sink),
                roles: Arc::clone(&self.printer.roles),
                styling,
            }),
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Latches onto every hook point not yet latched by this observer.
    ///
    /// Returns the number of newly registered latches.
    ///
    /// # Errors
    /// - Propagates registry rejections unchanged.
    pub fn attach(&self, registry: &mut impl HookRegistry) -> Result<usize, HookRegistryError> {
        let mut latched = 0;
        for point in HookPoint::ALL {
            if registry.is_latched(point, self.id) {
                continue;
            }
            registry.latch(point, self.id, self.latch_for(point))?;
            latched += 1;
        }
        info!(
            "event=observer_attach module=observer status=ok subscriber={} latched={} skipped={}",
            self.id,
            latched,
            HookPoint::ALL.len() - latched
        );
        Ok(latched)
    }

    fn latch_for(&self, point: HookPoint) -> Latch {
        let printer = Arc::clone(&self.printer);
        match point.kind() {
            HookKind::Observe => Latch::observe(move |event| printer.observe(event)),
            HookKind::Intercept => {
                Latch::intercept(move |value, event| printer.intercept(value, event))
            }
        }
    }

    /// Prints the resolved module order.
    pub fn module_order(&self, order: &[String]) {
        self.printer.module_order(order);
    }

    /// Prints a pending state transition.
    pub fn transit_before(&self, transition: &Transition) {
        self.printer.transit_before(transition);
    }

    /// Prints a completed state transition.
    pub fn transit_after(&self, transition: &Transition) {
        self.printer.transit_after(transition);
    }

    /// Prints an upcoming method call and returns `method` unchanged.
    pub fn call_before(&self, method: CallValue, site: &CallSite) -> CallValue {
        self.printer.call_before(method, site)
    }

    /// Prints a completed method call and returns `result` unchanged.
    pub fn call_after(&self, result: CallValue, site: &CallSite) -> CallValue {
        self.printer.call_after(result, site)
    }
}
