//! Hook event descriptors.

use crate::extension::hook::HookPoint;
use crate::model::value::{MethodRef, ModuleRef};

/// Pending or completed state transition of the host kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: String,
    pub to: String,
    /// Kernel method driving the transition, e.g. `boot`.
    pub method: String,
}

impl Transition {
    pub fn new(from: impl Into<String>, to: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            method: method.into(),
        }
    }
}

/// Module method call intercepted by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct CallSite {
    pub module: ModuleRef,
    pub method_name: String,
    pub module_name: String,
}

impl CallSite {
    /// Builds a call site from a module and one of its methods.
    pub fn new(module: &ModuleRef, method: &MethodRef) -> Self {
        Self {
            module: module.clone(),
            method_name: method.name().to_string(),
            module_name: module.name().to_string(),
        }
    }
}

/// Arguments of one hook invocation, borrowed from the host.
#[derive(Debug, Clone, Copy)]
pub enum HookEvent<'a> {
    ModuleOrder(&'a [String]),
    TransitBefore(&'a Transition),
    TransitAfter(&'a Transition),
    CallBefore(&'a CallSite),
    CallAfter(&'a CallSite),
}

impl HookEvent<'_> {
    /// Hook point this event is dispatched on.
    pub fn point(&self) -> HookPoint {
        match self {
            Self::ModuleOrder(_) => HookPoint::Toposort,
            Self::TransitBefore(_) => HookPoint::TransitBefore,
            Self::TransitAfter(_) => HookPoint::TransitAfter,
            Self::CallBefore(_) => HookPoint::CallBefore,
            Self::CallAfter(_) => HookPoint::CallAfter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CallSite, HookEvent, Transition};
    use crate::extension::hook::HookPoint;
    use crate::model::value::{CallValue, MethodRef, ModuleRef};

    #[test]
    fn call_site_copies_names_and_keeps_module_identity() {
        let module = ModuleRef::new("http");
        let method = MethodRef::new("listen", |_| CallValue::Undefined);
        let site = CallSite::new(&module, &method);

        assert_eq!(site.module_name, "http");
        assert_eq!(site.method_name, "listen");
        assert!(site.module.same_module(&module));
    }

    #[test]
    fn events_map_to_hook_points() {
        let order = vec!["a".to_string()];
        let transition = Transition::new("dead", "booted", "boot");
        let site = CallSite::new(
            &ModuleRef::new("m"),
            &MethodRef::new("f", |_| CallValue::Undefined),
        );

        assert_eq!(HookEvent::ModuleOrder(&order).point(), HookPoint::Toposort);
        assert_eq!(HookEvent::TransitBefore(&transition).point(), HookPoint::TransitBefore);
        assert_eq!(HookEvent::TransitAfter(&transition).point(), HookPoint::TransitAfter);
        assert_eq!(HookEvent::CallBefore(&site).point(), HookPoint::CallBefore);
        assert_eq!(HookEvent::CallAfter(&site).point(), HookPoint::CallAfter);
    }
}
